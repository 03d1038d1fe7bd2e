use super::{
    map::{IdToTransactionMap, TransactionIdSet, TransactionsEdges, WitnessIdToIdMap},
    pool::Pool,
    tx::{DoubleSpend, MempoolTransaction},
    utxo_set::MempoolUtxoSet,
};
use crate::mempool::{errors::RuleResult, tx::RbfTransactionState};
use txpool_consensus_core::{
    tx::{MutableTransaction, Transaction, TransactionId, TransactionOutpoint, WitnessTransactionId},
    utxo::{UNACCEPTED_BLOCK_HEIGHT, UtxoEntry},
};

/// Pool of the transactions accepted by the mempool
///
/// [MempoolTransaction]s are owned by `all_transactions` without any other external
/// reference so no smart pointer is needed. Relations are kept as id edges:
///
/// - `parent_transaction_ids_in_pool` maps a transaction to its direct parents in the pool,
/// - `chained_transaction_ids_by_parent_id` maps a transaction to its direct children in the pool.
///
/// The ancestors and descendants aggregates of every transaction are maintained on
/// each insertion, removal and fee delta application.
pub(crate) struct TransactionsPool {
    all_transactions: IdToTransactionMap,
    witness_ids: WitnessIdToIdMap,
    parent_transaction_ids_in_pool: TransactionsEdges,
    chained_transaction_ids_by_parent_id: TransactionsEdges,
    pub(crate) utxo_set: MempoolUtxoSet,
}

impl TransactionsPool {
    pub(crate) fn new() -> Self {
        Self {
            all_transactions: IdToTransactionMap::default(),
            witness_ids: WitnessIdToIdMap::default(),
            parent_transaction_ids_in_pool: TransactionsEdges::default(),
            chained_transaction_ids_by_parent_id: TransactionsEdges::default(),
            utxo_set: MempoolUtxoSet::new(),
        }
    }

    /// Inserts a validated transaction, links it to its parents in the pool and
    /// updates the aggregates of all its ancestors.
    pub(crate) fn add_transaction(&mut self, transaction: MutableTransaction, added_at: u64, fee_delta: i64) -> TransactionId {
        let mut transaction = MempoolTransaction::new(transaction, added_at, fee_delta);
        let id = transaction.id();
        let parents = self.get_parent_transaction_ids_in_pool(&transaction.mtx);
        let ancestors = self.get_ancestor_ids_of_parents(&parents);

        let own = transaction.own_stats();
        for ancestor_id in ancestors.iter() {
            if let Some(ancestor) = self.all_transactions.get_mut(ancestor_id) {
                transaction.ancestors += ancestor.own_stats();
                ancestor.descendants += own;
            }
        }

        for parent_id in parents.iter() {
            self.chained_transaction_ids_by_parent_id.entry(*parent_id).or_default().insert(id);
        }
        self.parent_transaction_ids_in_pool.insert(id, parents);
        self.utxo_set.add_transaction(&transaction.mtx);
        self.witness_ids.insert(transaction.witness_id(), id);
        self.all_transactions.insert(id, transaction);
        id
    }

    /// Removes a set of transactions at once.
    ///
    /// The aggregates of every remaining relative are first updated while all the edges
    /// are still in place, then the removed transactions are unlinked. Ids missing from
    /// the pool are ignored. The removed transactions are returned in input order.
    pub(crate) fn remove_transactions(&mut self, transaction_ids: &[TransactionId]) -> Vec<MempoolTransaction> {
        let removed: TransactionIdSet = transaction_ids.iter().copied().filter(|id| self.has(id)).collect();

        for transaction_id in transaction_ids.iter().filter(|id| removed.contains(*id)) {
            let own = self.all_transactions[transaction_id].own_stats();
            let ancestors = self.get_ancestor_ids_in_pool(transaction_id);
            let descendants = self.get_redeemer_ids_in_pool(transaction_id);
            for ancestor_id in ancestors.iter().filter(|id| !removed.contains(*id)) {
                if let Some(ancestor) = self.all_transactions.get_mut(ancestor_id) {
                    ancestor.descendants -= own;
                }
            }
            for descendant_id in descendants.iter().filter(|id| !removed.contains(*id)) {
                if let Some(descendant) = self.all_transactions.get_mut(descendant_id) {
                    descendant.ancestors -= own;
                }
            }
        }

        let mut removed_transactions = Vec::with_capacity(removed.len());
        for transaction_id in transaction_ids.iter() {
            let Some(transaction) = self.all_transactions.remove(transaction_id) else {
                continue;
            };
            if let Some(parents) = self.parent_transaction_ids_in_pool.remove(transaction_id) {
                for parent_id in parents.iter() {
                    if let Some(siblings) = self.chained_transaction_ids_by_parent_id.get_mut(parent_id) {
                        siblings.remove(transaction_id);
                        if siblings.is_empty() {
                            self.chained_transaction_ids_by_parent_id.remove(parent_id);
                        }
                    }
                }
            }
            if let Some(children) = self.chained_transaction_ids_by_parent_id.remove(transaction_id) {
                for child_id in children.iter() {
                    if let Some(parents) = self.parent_transaction_ids_in_pool.get_mut(child_id) {
                        parents.remove(transaction_id);
                    }
                }
            }
            self.utxo_set.remove_transaction(&transaction.mtx);
            if self.witness_ids.get(&transaction.witness_id()) == Some(transaction_id) {
                self.witness_ids.remove(&transaction.witness_id());
            }
            removed_transactions.push(transaction);
        }
        removed_transactions
    }

    /// Adds `delta` to the modified fee of a transaction and to the aggregates of all its relatives.
    /// Returns false if the transaction is not in the pool.
    pub(crate) fn apply_fee_delta(&mut self, transaction_id: &TransactionId, delta: i64) -> bool {
        let Some(transaction) = self.all_transactions.get_mut(transaction_id) else {
            return false;
        };
        transaction.fee_delta = transaction.fee_delta.saturating_add(delta);
        transaction.ancestors.modified_fees = transaction.ancestors.modified_fees.saturating_add(delta);
        transaction.descendants.modified_fees = transaction.descendants.modified_fees.saturating_add(delta);

        for ancestor_id in self.get_ancestor_ids_in_pool(transaction_id) {
            if let Some(ancestor) = self.all_transactions.get_mut(&ancestor_id) {
                ancestor.descendants.modified_fees = ancestor.descendants.modified_fees.saturating_add(delta);
            }
        }
        for descendant_id in self.get_redeemer_ids_in_pool(transaction_id) {
            if let Some(descendant) = self.all_transactions.get_mut(&descendant_id) {
                descendant.ancestors.modified_fees = descendant.ancestors.modified_fees.saturating_add(delta);
            }
        }
        true
    }

    pub(crate) fn get_by_witness_id(&self, witness_id: &WitnessTransactionId) -> Option<&MempoolTransaction> {
        self.witness_ids.get(witness_id).and_then(|id| self.get(id))
    }

    pub(crate) fn get_double_spend_owner<'a>(&'a self, double_spend: &DoubleSpend) -> RuleResult<&'a MempoolTransaction> {
        match self.get(&double_spend.owner_id) {
            Some(transaction) => Ok(transaction),
            None => Err(double_spend.into()),
        }
    }

    /// Returns the UTXO entry a pool transaction output would create
    pub(crate) fn get_output_entry(&self, outpoint: &TransactionOutpoint) -> Option<UtxoEntry> {
        let transaction = self.get(&outpoint.transaction_id)?;
        let output = transaction.mtx.tx.outputs.get(outpoint.index as usize)?;
        Some(UtxoEntry::new(output.value, output.script_public_key.clone(), UNACCEPTED_BLOCK_HEIGHT, false))
    }

    /// Returns the replaceability of `transaction` as inherited from its own inputs or from its ancestors in the pool
    pub(crate) fn is_rbf_opt_in(&self, transaction: &Transaction) -> RbfTransactionState {
        if transaction.signals_opt_in_rbf() {
            return RbfTransactionState::ReplaceableBip125;
        }
        let transaction_id = transaction.id();
        if !self.has(&transaction_id) {
            return RbfTransactionState::Unknown;
        }
        let signaling_ancestor = self
            .get_ancestor_ids_in_pool(&transaction_id)
            .iter()
            .filter_map(|id| self.get(id))
            .any(|ancestor| ancestor.mtx.tx.signals_opt_in_rbf());
        match signaling_ancestor {
            true => RbfTransactionState::ReplaceableBip125,
            false => RbfTransactionState::Final,
        }
    }
}

impl Pool for TransactionsPool {
    fn all(&self) -> &IdToTransactionMap {
        &self.all_transactions
    }

    fn parents(&self) -> &TransactionsEdges {
        &self.parent_transaction_ids_in_pool
    }

    fn chained(&self) -> &TransactionsEdges {
        &self.chained_transaction_ids_by_parent_id
    }
}
