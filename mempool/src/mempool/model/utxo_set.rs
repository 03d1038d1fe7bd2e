use super::{map::OutpointToIdMap, tx::DoubleSpend};
use std::collections::HashSet;
use txpool_consensus_core::tx::{MutableTransaction, TransactionId, TransactionOutpoint};

/// Index of the outpoints spent by mempool transactions
pub(crate) struct MempoolUtxoSet {
    outpoint_owner_id: OutpointToIdMap,
}

impl MempoolUtxoSet {
    pub(crate) fn new() -> Self {
        Self { outpoint_owner_id: OutpointToIdMap::default() }
    }

    pub(crate) fn add_transaction(&mut self, transaction: &MutableTransaction) {
        let transaction_id = transaction.id();
        for input in transaction.tx.inputs.iter() {
            let previous_owner = self.outpoint_owner_id.insert(input.previous_outpoint, transaction_id);
            assert!(
                previous_owner.is_none(),
                "outpoint {} of {} is already spent in the mempool by {:?}",
                input.previous_outpoint,
                transaction_id,
                previous_owner
            );
        }
    }

    pub(crate) fn remove_transaction(&mut self, transaction: &MutableTransaction) {
        let transaction_id = transaction.id();
        for input in transaction.tx.inputs.iter() {
            if self.outpoint_owner_id.get(&input.previous_outpoint) == Some(&transaction_id) {
                self.outpoint_owner_id.remove(&input.previous_outpoint);
            }
        }
    }

    pub(crate) fn get_outpoint_owner_id(&self, outpoint: &TransactionOutpoint) -> Option<&TransactionId> {
        self.outpoint_owner_id.get(outpoint)
    }

    /// Returns the first double spend of every transaction in the mempool double spending on `transaction`
    pub(crate) fn get_double_spend_transaction_ids(&self, transaction: &MutableTransaction) -> Vec<DoubleSpend> {
        let transaction_id = transaction.id();
        let mut double_spends = vec![];
        let mut visited = HashSet::new();
        for input in transaction.tx.inputs.iter() {
            if let Some(existing_transaction_id) = self.get_outpoint_owner_id(&input.previous_outpoint) {
                if *existing_transaction_id != transaction_id && visited.insert(*existing_transaction_id) {
                    double_spends.push(DoubleSpend::new(input.previous_outpoint, *existing_transaction_id));
                }
            }
        }
        double_spends
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.outpoint_owner_id.len()
    }
}
