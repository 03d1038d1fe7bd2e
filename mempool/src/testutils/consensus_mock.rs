use parking_lot::RwLock;
use std::collections::HashMap;
use txpool_consensus_core::{
    api::ConsensusApi,
    errors::tx::{TxResult, TxRuleError},
    tx::{MutableTransaction, Transaction, TransactionId, TransactionOutpoint},
    utxo::{UtxoCollection, UtxoEntry},
};

/// Confirmed block height given to the UTXOs created by [`ConsensusMock::add_transaction`]
pub(crate) const CONFIRMED_BLOCK_HEIGHT: u64 = 100;

pub(crate) struct ConsensusMock {
    statuses: RwLock<HashMap<TransactionId, TxResult<()>>>,
    sigop_costs: RwLock<HashMap<TransactionId, u64>>,
    utxos: RwLock<UtxoCollection>,
}

impl ConsensusMock {
    pub(crate) fn new() -> Self {
        Self {
            statuses: RwLock::new(HashMap::default()),
            sigop_costs: RwLock::new(HashMap::default()),
            utxos: RwLock::new(HashMap::default()),
        }
    }

    /// Registers a script validation status returned for `transaction_id`
    pub(crate) fn set_status(&self, transaction_id: TransactionId, status: TxResult<()>) {
        self.statuses.write().insert(transaction_id, status);
    }

    pub(crate) fn set_sigop_cost(&self, transaction_id: TransactionId, sigop_cost: u64) {
        self.sigop_costs.write().insert(transaction_id, sigop_cost);
    }

    /// Simulates the confirmation of `transaction`: its inputs are spent and its outputs become confirmed UTXOs
    pub(crate) fn add_transaction(&self, transaction: &Transaction) {
        let mut utxos = self.utxos.write();
        transaction.inputs.iter().for_each(|x| {
            utxos.remove(&x.previous_outpoint);
        });
        transaction.outputs.iter().enumerate().for_each(|(i, x)| {
            utxos.insert(
                TransactionOutpoint::new(transaction.id(), i as u32),
                UtxoEntry::new(x.value, x.script_public_key.clone(), CONFIRMED_BLOCK_HEIGHT, transaction.is_coinbase()),
            );
        });
    }
}

impl ConsensusApi for ConsensusMock {
    fn get_utxo_entry(&self, outpoint: &TransactionOutpoint) -> Option<UtxoEntry> {
        self.utxos.read().get(outpoint).cloned()
    }

    fn validate_mempool_transaction(&self, transaction: &MutableTransaction) -> TxResult<()> {
        // If a predefined status was registered to simulate an error, return it right away
        if let Some(status) = self.statuses.read().get(&transaction.id()) {
            if status.is_err() {
                return status.clone();
            }
        }
        if !transaction.is_fully_populated() {
            return Err(TxRuleError::MissingTxOutpoints);
        }
        Ok(())
    }

    fn calculate_transaction_sigop_cost(&self, transaction: &MutableTransaction) -> u64 {
        self.sigop_costs.read().get(&transaction.id()).copied().unwrap_or(4)
    }
}
