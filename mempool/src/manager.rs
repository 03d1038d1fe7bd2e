use crate::{
    MempoolCounters,
    errors::MempoolManagerResult,
    mempool::{
        Mempool,
        check_package::check_package,
        config::Config,
        errors::{PackageRuleResult, RuleResult},
        tx::{RbfTransactionState, TxRemovalReason},
    },
    model::{
        mempool_entry::MempoolEntry,
        package::{PackageResult, PackageTopology, TransactionAcceptance},
    },
};
use itertools::Itertools;
use parking_lot::RwLock;
use std::sync::{Arc, atomic::Ordering};
use tokio::task::spawn_blocking;
use txpool_consensus_core::{
    api::{ConsensusApi, DynConsensus},
    tx::{MutableTransaction, Transaction, TransactionId, WitnessTransactionId},
};
use txpool_core::{debug, time::Stopwatch};

/// Entry point of the mempool: admits packages and single transactions, answers queries and
/// applies external removals.
///
/// The mempool lives behind a single lock. A test acceptance holds the read lock during the
/// whole package processing and a committing submission holds the write lock until the package
/// is fully applied, so concurrent submissions always serialize and never observe a partially
/// applied package.
pub struct MempoolManager {
    config: Arc<Config>,
    pub(crate) mempool: RwLock<Mempool>,
    counters: Arc<MempoolCounters>,
}

impl MempoolManager {
    pub fn new(relay_non_std_transactions: bool, counters: Arc<MempoolCounters>) -> Self {
        Self::with_config(Config::build_default(relay_non_std_transactions), counters)
    }

    pub fn with_config(config: Config, counters: Arc<MempoolCounters>) -> Self {
        let config = Arc::new(config);
        let mempool = RwLock::new(Mempool::new(config.clone()));
        Self { config, mempool, counters }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks the structure of a package without looking at the mempool or the consensus
    pub fn validate_package_structure<T: AsRef<Transaction>>(&self, transactions: &[T]) -> PackageRuleResult<PackageTopology> {
        check_package(transactions, &self.config)
    }

    /// Validates a package and, unless `test_accept` is set, applies it to the mempool if
    /// every transaction is acceptable, replacing the conflicting mempool transactions.
    ///
    /// The result holds the outcome of every transaction in package order, unless the package
    /// breaks a structural policy, in which case no transaction is judged.
    pub fn process_package(&self, consensus: &dyn ConsensusApi, transactions: Vec<Transaction>, test_accept: bool) -> PackageResult {
        let _sw = Stopwatch::<500>::with_threshold("process_package op");
        let transactions = transactions.into_iter().map(Arc::new).collect_vec();
        match check_package(&transactions, &self.config) {
            Ok(topology) => self.process_checked_package(consensus, &transactions, topology, test_accept),
            Err(err) => {
                debug!("Package of {} transactions rejected: {}", transactions.len(), err);
                if !test_accept {
                    self.counters.increase_package_counts(false);
                }
                PackageResult::rejected(err)
            }
        }
    }

    /// Validates a single transaction and, unless `test_accept` is set, adds it to the mempool if
    /// acceptable. No package structure rule applies.
    pub fn validate_and_insert_transaction(
        &self,
        consensus: &dyn ConsensusApi,
        transaction: Transaction,
        test_accept: bool,
    ) -> TransactionAcceptance {
        let _sw = Stopwatch::<500>::with_threshold("validate_and_insert_transaction op");
        let transaction = Arc::new(transaction);
        let witness_id = transaction.witness_id();
        let mut result = self.process_checked_package(consensus, &[transaction], PackageTopology::SingleTx, test_accept);
        result.tx_results.swap_remove(&witness_id).expect("a single transaction package yields exactly one outcome")
    }

    fn process_checked_package(
        &self,
        consensus: &dyn ConsensusApi,
        transactions: &[Arc<Transaction>],
        topology: PackageTopology,
        test_accept: bool,
    ) -> PackageResult {
        if test_accept {
            let mempool = self.mempool.read();
            return mempool.validate_package(consensus, transactions, topology).result;
        }

        let mut mempool = self.mempool.write();
        let validation = mempool.validate_package(consensus, transactions, topology);
        if !validation.result.is_valid() {
            drop(mempool);
            if let Some(failure) = validation.result.failure() {
                debug!("Package of {} transactions rejected: {}", transactions.len(), failure);
            }
            self.counters.increase_package_counts(false);
            return validation.result;
        }

        let accepted = validation.stage.transactions().map(|x| x.mtx.tx.clone()).collect_vec();
        let replaced = mempool.commit_package(validation.stage);
        drop(mempool);

        self.counters.increase_package_counts(true);
        self.counters.tx_accepted_counts.fetch_add(accepted.len() as u64, Ordering::Relaxed);
        self.counters.tx_replaced_counts.fetch_add(replaced.len() as u64, Ordering::Relaxed);
        self.counters.input_counts.fetch_add(accepted.iter().map(|x| x.inputs.len() as u64).sum(), Ordering::Relaxed);
        self.counters.output_counts.fetch_add(accepted.iter().map(|x| x.outputs.len() as u64).sum(), Ordering::Relaxed);
        validation.result
    }

    pub fn get_transaction(&self, transaction_id: &TransactionId) -> Option<MutableTransaction> {
        self.mempool.read().get_transaction(transaction_id)
    }

    pub fn get_entry(&self, transaction_id: &TransactionId) -> Option<MempoolEntry> {
        self.mempool.read().get_entry(transaction_id)
    }

    pub fn has_transaction(&self, transaction_id: &TransactionId) -> bool {
        self.mempool.read().has_transaction(transaction_id)
    }

    pub fn has_witness_transaction(&self, witness_id: &WitnessTransactionId) -> bool {
        self.mempool.read().has_witness_transaction(witness_id)
    }

    pub fn transaction_count(&self) -> usize {
        self.mempool.read().transaction_count()
    }

    /// Returns clones of all the transactions in the mempool
    pub fn get_all_transactions(&self) -> Vec<MutableTransaction> {
        self.mempool.read().get_all_transactions()
    }

    /// Returns the replaceability of `transaction` as inferred from the mempool content
    pub fn rbf_transaction_state(&self, transaction: &Transaction) -> RbfTransactionState {
        self.mempool.read().rbf_transaction_state(transaction)
    }

    /// Adds `fee_delta` to the modified fee of a transaction, whether it is already in the mempool or not
    pub fn prioritise_transaction(&self, transaction_id: TransactionId, fee_delta: i64) {
        self.mempool.write().prioritise_transaction(transaction_id, fee_delta)
    }

    /// Removes a transaction and its descendants on an external trigger. Descendants may only be kept,
    /// by unsetting `remove_redeemers`, when the transaction got confirmed.
    /// Returns the ids of the removed transactions.
    pub fn remove_transaction(
        &self,
        transaction_id: &TransactionId,
        remove_redeemers: bool,
        reason: TxRemovalReason,
    ) -> RuleResult<Vec<TransactionId>> {
        self.mempool.write().remove_transaction(transaction_id, remove_redeemers, reason, "")
    }
}

/// Async proxy for the mempool manager, running every operation on the blocking thread pool
#[derive(Clone)]
pub struct MempoolManagerProxy {
    inner: Arc<MempoolManager>,
}

impl MempoolManagerProxy {
    pub fn new(inner: Arc<MempoolManager>) -> Self {
        Self { inner }
    }

    pub fn validate_package_structure(&self, transactions: &[Transaction]) -> PackageRuleResult<PackageTopology> {
        self.inner.validate_package_structure(transactions)
    }

    pub async fn process_package(
        self,
        consensus: DynConsensus,
        transactions: Vec<Transaction>,
        test_accept: bool,
    ) -> MempoolManagerResult<PackageResult> {
        Ok(spawn_blocking(move || self.inner.process_package(consensus.as_ref(), transactions, test_accept)).await?)
    }

    pub async fn validate_and_insert_transaction(
        self,
        consensus: DynConsensus,
        transaction: Transaction,
        test_accept: bool,
    ) -> MempoolManagerResult<TransactionAcceptance> {
        Ok(spawn_blocking(move || self.inner.validate_and_insert_transaction(consensus.as_ref(), transaction, test_accept)).await?)
    }

    pub async fn get_entry(self, transaction_id: TransactionId) -> MempoolManagerResult<Option<MempoolEntry>> {
        Ok(spawn_blocking(move || self.inner.get_entry(&transaction_id)).await?)
    }

    pub async fn has_transaction(self, transaction_id: TransactionId) -> MempoolManagerResult<bool> {
        Ok(spawn_blocking(move || self.inner.has_transaction(&transaction_id)).await?)
    }

    pub async fn transaction_count(self) -> MempoolManagerResult<usize> {
        Ok(spawn_blocking(move || self.inner.transaction_count()).await?)
    }

    pub async fn prioritise_transaction(self, transaction_id: TransactionId, fee_delta: i64) -> MempoolManagerResult<()> {
        Ok(spawn_blocking(move || self.inner.prioritise_transaction(transaction_id, fee_delta)).await?)
    }

    pub async fn remove_transaction(
        self,
        transaction_id: TransactionId,
        remove_redeemers: bool,
        reason: TxRemovalReason,
    ) -> MempoolManagerResult<RuleResult<Vec<TransactionId>>> {
        Ok(spawn_blocking(move || self.inner.remove_transaction(&transaction_id, remove_redeemers, reason)).await?)
    }
}
