use crate::{
    errors::tx::TxResult,
    tx::{MutableTransaction, TransactionOutpoint},
    utxo::UtxoEntry,
};
use rayon::prelude::*;
use std::sync::Arc;

/// Abstracts the consensus external to the mempool: the confirmed UTXO set and
/// the script verification engine.
pub trait ConsensusApi: Send + Sync {
    /// Returns the confirmed and spendable entry located at `outpoint`, if any
    fn get_utxo_entry(&self, outpoint: &TransactionOutpoint) -> Option<UtxoEntry>;

    /// Verifies the scripts of a transaction whose entries are fully populated
    fn validate_mempool_transaction(&self, transaction: &MutableTransaction) -> TxResult<()>;

    /// Verifies a batch of independent transactions, returning one result per transaction in input order
    fn validate_mempool_transactions_in_parallel(&self, transactions: &[MutableTransaction]) -> Vec<TxResult<()>> {
        transactions.par_iter().map(|transaction| self.validate_mempool_transaction(transaction)).collect()
    }

    /// Returns the weighted signature operations cost of a populated transaction
    fn calculate_transaction_sigop_cost(&self, transaction: &MutableTransaction) -> u64;
}

pub type DynConsensus = Arc<dyn ConsensusApi>;
