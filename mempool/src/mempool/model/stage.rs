use super::{
    map::TransactionIdSet,
    tx::{MempoolTransaction, ReplacementPlan},
};
use crate::model::mempool_entry::RelativesStats;
use indexmap::IndexMap;
use std::collections::HashMap;
use txpool_consensus_core::{
    tx::{MutableTransaction, TransactionId, TransactionOutpoint},
    utxo::{UNACCEPTED_BLOCK_HEIGHT, UtxoEntry},
};

/// A package member that passed the pre-validation and awaits script checks and commit
#[derive(Debug, Clone)]
pub(crate) struct StagedTransaction {
    pub(crate) mtx: MutableTransaction,
    pub(crate) fee_delta: i64,
    /// All ancestors, either in the pool or staged before this transaction
    pub(crate) ancestor_ids: TransactionIdSet,
    /// Aggregate over this transaction and all its ancestors
    pub(crate) ancestors: RelativesStats,
    pub(crate) replacement: Option<ReplacementPlan>,
}

impl StagedTransaction {
    pub(crate) fn id(&self) -> TransactionId {
        self.mtx.id()
    }

    pub(crate) fn fee(&self) -> u64 {
        self.mtx.calculated_fee.unwrap_or_default()
    }

    pub(crate) fn virtual_size(&self) -> u64 {
        self.mtx.calculated_virtual_size.unwrap_or_default()
    }

    pub(crate) fn modified_fee(&self) -> i64 {
        (self.fee() as i64).saturating_add(self.fee_delta)
    }

    pub(crate) fn own_stats(&self) -> RelativesStats {
        RelativesStats::new(1, self.virtual_size(), self.modified_fee())
    }

    pub(crate) fn evicted(&self) -> &[TransactionId] {
        self.replacement.as_ref().map(|x| x.evicted.as_slice()).unwrap_or_default()
    }
}

/// Working view of a package being evaluated on top of the pool.
///
/// Members are staged in package order so every member sees the outputs of the
/// earlier ones, the pool transactions they evict and the descendants they add
/// to pool transactions, while the pool itself stays untouched.
#[derive(Default)]
pub(crate) struct PackageStage {
    staged: IndexMap<TransactionId, StagedTransaction>,
    evicted: TransactionIdSet,
    /// Descendants added by staged transactions to pool or staged ancestors
    added_descendants: HashMap<TransactionId, RelativesStats>,
}

impl PackageStage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, transaction_id: &TransactionId) -> Option<&StagedTransaction> {
        self.staged.get(transaction_id)
    }

    pub(crate) fn has(&self, transaction_id: &TransactionId) -> bool {
        self.staged.contains_key(transaction_id)
    }

    pub(crate) fn is_evicted(&self, transaction_id: &TransactionId) -> bool {
        self.evicted.contains(transaction_id)
    }

    /// Whether `transaction_id` is an ancestor of some staged transaction
    pub(crate) fn is_staged_ancestor(&self, transaction_id: &TransactionId) -> bool {
        self.added_descendants.contains_key(transaction_id)
    }

    /// Returns the UTXO entry a staged transaction output would create
    pub(crate) fn get_output_entry(&self, outpoint: &TransactionOutpoint) -> Option<UtxoEntry> {
        let staged = self.get(&outpoint.transaction_id)?;
        let output = staged.mtx.tx.outputs.get(outpoint.index as usize)?;
        Some(UtxoEntry::new(output.value, output.script_public_key.clone(), UNACCEPTED_BLOCK_HEIGHT, false))
    }

    /// Returns the descendants count and size of an ancestor once the staged transactions are added,
    /// the ancestor itself included
    pub(crate) fn descendants_of(&self, ancestor_id: &TransactionId, pool_transaction: Option<&MempoolTransaction>) -> RelativesStats {
        let mut descendants = match pool_transaction {
            Some(transaction) => transaction.descendants,
            None => self.get(ancestor_id).map(|x| x.own_stats()).unwrap_or_default(),
        };
        if let Some(added) = self.added_descendants.get(ancestor_id) {
            descendants += *added;
        }
        descendants
    }

    pub(crate) fn stage(&mut self, transaction: StagedTransaction) {
        let own = transaction.own_stats();
        for ancestor_id in transaction.ancestor_ids.iter() {
            *self.added_descendants.entry(*ancestor_id).or_default() += own;
        }
        self.evicted.extend(transaction.evicted().iter().copied());
        self.staged.insert(transaction.id(), transaction);
    }

    /// Returns the staged transactions descending from `transaction_id`, in package order
    pub(crate) fn staged_descendants(&self, transaction_id: &TransactionId) -> Vec<TransactionId> {
        self.staged.values().filter(|x| x.ancestor_ids.contains(transaction_id)).map(|x| x.id()).collect()
    }

    pub(crate) fn into_transactions(self) -> impl Iterator<Item = StagedTransaction> {
        self.staged.into_values()
    }

    pub(crate) fn transactions(&self) -> impl Iterator<Item = &StagedTransaction> {
        self.staged.values()
    }
}
