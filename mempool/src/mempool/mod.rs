use self::{
    config::Config,
    model::{pool::Pool, transactions_pool::TransactionsPool},
};
use crate::model::mempool_entry::MempoolEntry;
use std::{collections::HashMap, sync::Arc};
use txpool_consensus_core::tx::{MutableTransaction, TransactionId, WitnessTransactionId};

pub mod check_package;
pub(crate) mod check_transaction_standard;
pub mod config;
pub mod errors;
pub(crate) mod model;
pub(crate) mod populate_entries;
pub(crate) mod prioritise_transaction;
pub(crate) mod remove_transaction;
pub mod replace_by_fee;
pub(crate) mod validate_and_insert_package;

/// Mempool contains the unconfirmed transactions accepted for relay and mining.
///
/// Some important properties to consider:
///
/// - Transactions can be chained, so a transaction can have parents and chained
///   dependencies in the mempool.
/// - Every transaction carries the aggregates (count, virtual size, modified fees)
///   of its ancestors and of its descendants in the mempool.
/// - Transactions are submitted as packages: either a single transaction or a
///   child along with its direct unconfirmed parents. A package is admitted as a
///   whole or not at all.
/// - A submitted transaction may replace conflicting mempool transactions if it
///   satisfies the replace by fee (RBF) rules.
/// - The fee of a transaction can be prioritised by a signed delta, yielding its
///   modified fee which all the policies rely upon.
pub(crate) struct Mempool {
    config: Arc<Config>,
    transaction_pool: TransactionsPool,
    /// Prioritisation deltas by transaction id, whether the transaction is in the pool or not
    fee_deltas: HashMap<TransactionId, i64>,
}

impl Mempool {
    pub(crate) fn new(config: Arc<Config>) -> Self {
        Self { config, transaction_pool: TransactionsPool::new(), fee_deltas: HashMap::new() }
    }

    pub(crate) fn get_transaction(&self, transaction_id: &TransactionId) -> Option<MutableTransaction> {
        self.transaction_pool.get(transaction_id).map(|x| x.mtx.clone())
    }

    pub(crate) fn get_entry(&self, transaction_id: &TransactionId) -> Option<MempoolEntry> {
        self.transaction_pool.get(transaction_id).map(|x| x.to_entry())
    }

    pub(crate) fn has_transaction(&self, transaction_id: &TransactionId) -> bool {
        self.transaction_pool.has(transaction_id)
    }

    pub(crate) fn has_witness_transaction(&self, witness_id: &WitnessTransactionId) -> bool {
        self.transaction_pool.get_by_witness_id(witness_id).is_some()
    }

    pub(crate) fn transaction_count(&self) -> usize {
        self.transaction_pool.len()
    }

    pub(crate) fn get_all_transactions(&self) -> Vec<MutableTransaction> {
        self.transaction_pool.get_all_transactions()
    }
}

pub mod tx {
    use std::fmt::{Display, Formatter};

    /// Replaceability of a transaction under the opt-in replace by fee rules
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RbfTransactionState {
        /// Unconfirmed transaction whose replaceability cannot be inferred: it does not signal
        /// by itself and is not in the mempool, so its ancestors are unknown
        Unknown,
        /// Either this transaction or one of its unconfirmed ancestors signals replaceability
        ReplaceableBip125,
        /// Neither this transaction nor any of its ancestors signals replaceability
        Final,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TxRemovalReason {
        ReplacedByFee,
        Confirmed,
        Expired,
        Manual,
    }

    impl TxRemovalReason {
        pub fn as_str(&self) -> &'static str {
            match self {
                TxRemovalReason::ReplacedByFee => "replaced by fee",
                TxRemovalReason::Confirmed => "confirmed in a block",
                TxRemovalReason::Expired => "expired",
                TxRemovalReason::Manual => "manually removed",
            }
        }
    }

    impl Display for TxRemovalReason {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str())
        }
    }
}
