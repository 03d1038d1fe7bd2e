use std::sync::Arc;
use txpool_consensus_core::{
    fee_rate::FeeRate,
    tx::{Transaction, TransactionId, WitnessTransactionId},
};

/// Aggregated figures over a transaction and a group of its relatives in the mempool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelativesStats {
    pub count: u64,
    pub virtual_size: u64,
    pub modified_fees: i64,
}

impl RelativesStats {
    pub fn new(count: u64, virtual_size: u64, modified_fees: i64) -> Self {
        Self { count, virtual_size, modified_fees }
    }
}

impl core::ops::AddAssign for RelativesStats {
    fn add_assign(&mut self, rhs: Self) {
        self.count += rhs.count;
        self.virtual_size += rhs.virtual_size;
        self.modified_fees = self.modified_fees.saturating_add(rhs.modified_fees);
    }
}

impl core::ops::SubAssign for RelativesStats {
    fn sub_assign(&mut self, rhs: Self) {
        self.count -= rhs.count;
        self.virtual_size -= rhs.virtual_size;
        self.modified_fees = self.modified_fees.saturating_sub(rhs.modified_fees);
    }
}

/// Read-only snapshot of a transaction accepted in the mempool
#[derive(Debug, Clone)]
pub struct MempoolEntry {
    pub transaction: Arc<Transaction>,
    /// Entry time in milliseconds since UNIX epoch
    pub added_at: u64,
    pub fee: u64,
    /// Fee including the prioritisation delta
    pub modified_fee: i64,
    pub virtual_size: u64,
    /// Ancestors aggregate, including the entry itself
    pub ancestors: RelativesStats,
    /// Descendants aggregate, including the entry itself
    pub descendants: RelativesStats,
}

impl MempoolEntry {
    pub fn id(&self) -> TransactionId {
        self.transaction.id()
    }

    pub fn witness_id(&self) -> WitnessTransactionId {
        self.transaction.witness_id()
    }

    pub fn fee_rate(&self) -> FeeRate {
        FeeRate::from_fee_and_size(self.modified_fee, self.virtual_size)
    }
}
