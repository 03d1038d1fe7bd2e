use super::{
    map::{IdToTransactionMap, TransactionIdSet, TransactionsEdges},
    tx::MempoolTransaction,
};
use std::collections::{HashSet, VecDeque};
use txpool_consensus_core::tx::{MutableTransaction, TransactionId};

pub(crate) trait Pool {
    fn all(&self) -> &IdToTransactionMap;

    /// Maps a transaction id to the ids of its direct parents in the pool
    fn parents(&self) -> &TransactionsEdges;

    /// Maps a transaction id to the ids of its direct children in the pool
    fn chained(&self) -> &TransactionsEdges;

    fn has(&self, transaction_id: &TransactionId) -> bool {
        self.all().contains_key(transaction_id)
    }

    fn get(&self, transaction_id: &TransactionId) -> Option<&MempoolTransaction> {
        self.all().get(transaction_id)
    }

    /// Returns the number of transactions in the pool
    fn len(&self) -> usize {
        self.all().len()
    }

    /// Returns the ids of all transactions being parents of `transaction` and existing in the pool.
    fn get_parent_transaction_ids_in_pool(&self, transaction: &MutableTransaction) -> TransactionIdSet {
        let mut parents = HashSet::with_capacity(transaction.tx.inputs.len());
        for input in transaction.tx.inputs.iter() {
            if self.has(&input.previous_outpoint.transaction_id) {
                parents.insert(input.previous_outpoint.transaction_id);
            }
        }
        parents
    }

    /// Returns the ids of all transactions `transaction_id` directly and indirectly depends on
    /// and existing in the pool.
    fn get_ancestor_ids_in_pool(&self, transaction_id: &TransactionId) -> TransactionIdSet {
        match self.parents().get(transaction_id) {
            Some(parents) => self.get_ancestor_ids_of_parents(parents),
            None => TransactionIdSet::new(),
        }
    }

    /// Returns `parents` along with all their ancestors in the pool.
    fn get_ancestor_ids_of_parents(&self, parents: &TransactionIdSet) -> TransactionIdSet {
        let mut ancestors = TransactionIdSet::with_capacity(parents.len());
        let mut queue = VecDeque::from_iter(parents.iter().copied());
        while let Some(ancestor_id) = queue.pop_front() {
            if !ancestors.insert(ancestor_id) {
                continue;
            }
            if let Some(grand_parents) = self.parents().get(&ancestor_id) {
                queue.extend(grand_parents.iter().filter(|x| !ancestors.contains(*x)).copied());
            }
        }
        ancestors
    }

    /// Returns the ids of all transactions being directly and indirectly chained to `transaction_id`
    /// and existing in the pool.
    ///
    /// The transactions are traversed in BFS mode. The returned order is not guaranteed to be
    /// topological.
    ///
    /// NOTE: this operation's complexity might become linear in the size of the mempool if the mempool
    /// contains deeply chained transactions
    fn get_redeemer_ids_in_pool(&self, transaction_id: &TransactionId) -> Vec<TransactionId> {
        let mut visited = TransactionIdSet::new();
        let mut descendants = vec![];
        if let Some(transaction) = self.get(transaction_id) {
            let mut queue = VecDeque::new();
            queue.push_back(transaction);
            while let Some(transaction) = queue.pop_front() {
                if let Some(chains) = self.chained().get(&transaction.id()) {
                    chains.iter().for_each(|redeemer_id| {
                        if let Some(redeemer) = self.get(redeemer_id) {
                            if visited.insert(*redeemer_id) {
                                descendants.push(*redeemer_id);
                                queue.push_back(redeemer);
                            }
                        }
                    })
                }
            }
        }
        descendants
    }

    /// Returns a vector with clones of all the transactions in the pool.
    fn get_all_transactions(&self) -> Vec<MutableTransaction> {
        self.all().values().map(|x| x.mtx.clone()).collect()
    }
}
