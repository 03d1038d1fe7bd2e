use crate::mempool::Mempool;
use txpool_consensus_core::tx::TransactionId;
use txpool_core::debug;

impl Mempool {
    /// Accumulates a signed fee delta for `transaction_id`.
    ///
    /// The delta applies right away to the modified fee of the matching pool transaction and to
    /// the aggregates of its relatives. It is otherwise kept and applied when the transaction enters
    /// the pool.
    pub(crate) fn prioritise_transaction(&mut self, transaction_id: TransactionId, fee_delta: i64) {
        let total = {
            let total = self.fee_deltas.entry(transaction_id).or_default();
            *total = total.saturating_add(fee_delta);
            *total
        };
        if total == 0 {
            self.fee_deltas.remove(&transaction_id);
        }
        if self.transaction_pool.apply_fee_delta(&transaction_id, fee_delta) {
            debug!("Prioritised transaction {} in the mempool by {} (total delta {})", transaction_id, fee_delta, total);
        } else {
            debug!("Prioritised transaction {} by {} (total delta {}), not yet in the mempool", transaction_id, fee_delta, total);
        }
    }

    /// Returns the accumulated fee delta of `transaction_id`
    pub(crate) fn fee_delta(&self, transaction_id: &TransactionId) -> i64 {
        self.fee_deltas.get(transaction_id).copied().unwrap_or_default()
    }

    pub(crate) fn clear_fee_delta(&mut self, transaction_id: &TransactionId) {
        self.fee_deltas.remove(transaction_id);
    }
}
