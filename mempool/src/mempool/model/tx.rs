use crate::model::mempool_entry::{MempoolEntry, RelativesStats};
use txpool_consensus_core::{
    fee_rate::FeeRate,
    tx::{MutableTransaction, TransactionId, TransactionOutpoint, WitnessTransactionId},
};
use txpool_mempool_errors::mempool::RuleError;

pub(crate) struct MempoolTransaction {
    pub(crate) mtx: MutableTransaction,
    pub(crate) added_at: u64,
    pub(crate) fee: u64,
    pub(crate) fee_delta: i64,
    pub(crate) virtual_size: u64,
    /// Aggregate over this transaction and all its ancestors in the pool
    pub(crate) ancestors: RelativesStats,
    /// Aggregate over this transaction and all its descendants in the pool
    pub(crate) descendants: RelativesStats,
}

impl MempoolTransaction {
    pub(crate) fn new(mtx: MutableTransaction, added_at: u64, fee_delta: i64) -> Self {
        assert!(mtx.is_fully_populated(), "expected to be called for validated txs only");
        let (Some(fee), Some(virtual_size)) = (mtx.calculated_fee, mtx.calculated_virtual_size) else {
            panic!("expected to be called for validated txs only");
        };
        let own = RelativesStats::new(1, virtual_size, (fee as i64).saturating_add(fee_delta));
        Self { mtx, added_at, fee, fee_delta, virtual_size, ancestors: own, descendants: own }
    }

    pub(crate) fn id(&self) -> TransactionId {
        self.mtx.tx.id()
    }

    pub(crate) fn witness_id(&self) -> WitnessTransactionId {
        self.mtx.tx.witness_id()
    }

    pub(crate) fn modified_fee(&self) -> i64 {
        (self.fee as i64).saturating_add(self.fee_delta)
    }

    pub(crate) fn fee_rate(&self) -> FeeRate {
        FeeRate::from_fee_and_size(self.modified_fee(), self.virtual_size)
    }

    /// The contribution of this transaction alone to the aggregates of its relatives
    pub(crate) fn own_stats(&self) -> RelativesStats {
        RelativesStats::new(1, self.virtual_size, self.modified_fee())
    }

    pub(crate) fn to_entry(&self) -> MempoolEntry {
        MempoolEntry {
            transaction: self.mtx.tx.clone(),
            added_at: self.added_at,
            fee: self.fee,
            modified_fee: self.modified_fee(),
            virtual_size: self.virtual_size,
            ancestors: self.ancestors,
            descendants: self.descendants,
        }
    }
}

pub(crate) struct DoubleSpend {
    pub outpoint: TransactionOutpoint,
    pub owner_id: TransactionId,
}

impl DoubleSpend {
    pub fn new(outpoint: TransactionOutpoint, owner_id: TransactionId) -> Self {
        Self { outpoint, owner_id }
    }
}

impl From<DoubleSpend> for RuleError {
    fn from(value: DoubleSpend) -> Self {
        RuleError::RejectDoubleSpendInMempool(value.outpoint, value.owner_id)
    }
}

impl From<&DoubleSpend> for RuleError {
    fn from(value: &DoubleSpend) -> Self {
        RuleError::RejectDoubleSpendInMempool(value.outpoint, value.owner_id)
    }
}

/// The evictions a candidate transaction requires, as approved by the replace by fee rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReplacementPlan {
    /// Pool transactions directly conflicting with the candidate
    pub(crate) conflicts: Vec<TransactionId>,
    /// Direct conflicts and all their descendants, without duplicates
    pub(crate) evicted: Vec<TransactionId>,
    pub(crate) evicted_modified_fees: i64,
    pub(crate) evicted_virtual_size: u64,
}
