use crate::mempool::{
    Mempool,
    errors::{RuleError, RuleResult},
    model::pool::Pool,
    tx::TxRemovalReason,
};
use itertools::Itertools;
use txpool_consensus_core::tx::TransactionId;
use txpool_core::debug;

impl Mempool {
    /// Removes a transaction from the pool, along with its descendants.
    ///
    /// Descendants are only kept, when `remove_redeemers` is unset, for a `Confirmed` removal since the
    /// outputs they spend become UTXOs. Any other reason always removes them.
    ///
    /// Descendants staying in the pool get their ancestors aggregate reduced. Transactions removed
    /// because they were confirmed also lose their prioritisation.
    pub(crate) fn remove_transaction(
        &mut self,
        transaction_id: &TransactionId,
        remove_redeemers: bool,
        reason: TxRemovalReason,
        extra_info: &str,
    ) -> RuleResult<Vec<TransactionId>> {
        if !self.transaction_pool.has(transaction_id) {
            return Err(RuleError::RejectMissingTransaction(*transaction_id));
        }

        let mut transaction_ids = vec![*transaction_id];
        if remove_redeemers || reason != TxRemovalReason::Confirmed {
            transaction_ids.extend(self.transaction_pool.get_redeemer_ids_in_pool(transaction_id));
        }
        let removed_transactions = self.transaction_pool.remove_transactions(&transaction_ids);
        let removed_ids = removed_transactions.iter().map(|x| x.id()).collect_vec();

        if reason == TxRemovalReason::Confirmed {
            removed_ids.iter().for_each(|x| self.clear_fee_delta(x));
        }

        match removed_ids.len() {
            0 => {}
            1 => debug!("Removed transaction ({}) {}{}", reason, removed_ids[0], extra_info),
            n => debug!("Removed {} transactions ({}): {}{}", n, reason, removed_ids.iter().join(", "), extra_info),
        }

        Ok(removed_ids)
    }
}
