use crate::{
    mempool::{
        Mempool,
        errors::{PackageRuleError, PackageRuleResult, RuleError, RuleResult},
        model::{
            map::TransactionIdSet,
            pool::Pool,
            stage::{PackageStage, StagedTransaction},
            tx::MempoolTransaction,
        },
    },
    model::{
        mempool_entry::RelativesStats,
        package::{PackageResult, PackageTopology, TransactionAcceptance},
    },
};
use indexmap::IndexMap;
use std::{collections::HashSet, sync::Arc};
use txpool_consensus_core::{
    api::ConsensusApi,
    errors::tx::TxRuleError,
    mass::transaction_virtual_size,
    tx::{MutableTransaction, Transaction, TransactionId, validation::check_transaction_in_isolation},
};
use txpool_core::{debug, time::unix_now, trace, warn};

/// Outcome of a package validation along with the staged transactions ready to be committed
pub(crate) struct PackageValidation {
    pub(crate) result: PackageResult,
    pub(crate) stage: PackageStage,
}

impl PackageValidation {
    fn rejected(err: PackageRuleError) -> Self {
        Self { result: PackageResult::rejected(err), stage: PackageStage::new() }
    }
}

impl Mempool {
    /// Validates a structurally checked package against the mempool and the consensus,
    /// without mutating anything.
    ///
    /// Members are evaluated in package order, every member seeing the outputs and the planned
    /// evictions of the earlier ones. A failing member does not stop the evaluation of the next
    /// ones, so every member gets its own outcome. The scripts of all staged members are then
    /// verified in one parallel batch.
    pub(crate) fn validate_package(
        &self,
        consensus: &dyn ConsensusApi,
        transactions: &[Arc<Transaction>],
        topology: PackageTopology,
    ) -> PackageValidation {
        if topology == PackageTopology::ChildWithParents {
            if let Err(err) = self.check_child_with_unconfirmed_parents(consensus, transactions) {
                return PackageValidation::rejected(err);
            }
        }

        let mut stage = PackageStage::new();
        let mut outcomes: IndexMap<TransactionId, Option<TransactionAcceptance>> = IndexMap::with_capacity(transactions.len());
        for transaction in transactions.iter() {
            let transaction_id = transaction.id();
            let outcome = match self.transaction_pool.get(&transaction_id).filter(|x| !stage.is_evicted(&x.id())) {
                Some(existing) if existing.witness_id() == transaction.witness_id() => {
                    Some(TransactionAcceptance::AlreadyInPool { virtual_size: existing.virtual_size, fee: existing.fee })
                }
                Some(existing) => Some(TransactionAcceptance::SameTxidDifferentWitness(existing.witness_id())),
                None => match self.pre_validate_transaction(consensus, transaction.clone(), &stage) {
                    Ok(staged) => {
                        stage.stage(staged);
                        None
                    }
                    Err(err) => {
                        debug!("Transaction {} rejected: {}", transaction_id, err);
                        Some(TransactionAcceptance::Invalid(err))
                    }
                },
            };
            outcomes.insert(transaction_id, outcome);
        }

        // Verify the scripts of the staged transactions, a failure propagating to the staged descendants
        let staged_transactions = stage.transactions().map(|x| x.mtx.clone()).collect::<Vec<_>>();
        let script_results = match staged_transactions.is_empty() {
            true => vec![],
            false => consensus.validate_mempool_transactions_in_parallel(&staged_transactions),
        };
        for (transaction, script_result) in staged_transactions.iter().zip(script_results) {
            let transaction_id = transaction.id();
            if let Err(err) = script_result {
                debug!("Transaction {} failed script validation: {}", transaction_id, err);
                outcomes.insert(transaction_id, Some(TransactionAcceptance::Invalid(err.into())));
                for descendant_id in stage.staged_descendants(&transaction_id) {
                    if let Some(outcome) = outcomes.get_mut(&descendant_id).filter(|x| x.is_none()) {
                        *outcome = Some(TransactionAcceptance::Invalid(RuleError::RejectMissingOutpoint));
                    }
                }
            }
        }

        let tx_results = transactions
            .iter()
            .map(|transaction| {
                let outcome = outcomes.get(&transaction.id()).cloned().flatten().unwrap_or_else(|| {
                    let staged = stage.get(&transaction.id());
                    TransactionAcceptance::Valid {
                        virtual_size: staged.map(|x| x.virtual_size()).unwrap_or_default(),
                        fee: staged.map(|x| x.fee()).unwrap_or_default(),
                        replaced: staged.map(|x| x.evicted().to_vec()).unwrap_or_default(),
                    }
                });
                (transaction.witness_id(), outcome)
            })
            .collect();

        PackageValidation { result: PackageResult::from_tx_results(tx_results), stage }
    }

    /// Every child input must either spend an output of a package parent or a confirmed UTXO
    fn check_child_with_unconfirmed_parents(
        &self,
        consensus: &dyn ConsensusApi,
        transactions: &[Arc<Transaction>],
    ) -> PackageRuleResult<()> {
        let Some((child, parents)) = transactions.split_last() else {
            return Ok(());
        };
        let parent_ids: HashSet<TransactionId> = parents.iter().map(|x| x.id()).collect();
        for input in child.inputs.iter() {
            let outpoint = &input.previous_outpoint;
            if parent_ids.contains(&outpoint.transaction_id) || consensus.get_utxo_entry(outpoint).is_some() {
                continue;
            }
            return Err(PackageRuleError::NotChildWithUnconfirmedParents(child.id(), *outpoint));
        }
        Ok(())
    }

    /// Runs all the checks of a single transaction but the scripts verification
    fn pre_validate_transaction(
        &self,
        consensus: &dyn ConsensusApi,
        transaction: Arc<Transaction>,
        stage: &PackageStage,
    ) -> RuleResult<StagedTransaction> {
        let mut transaction = MutableTransaction::from_tx(transaction);
        let transaction_id = transaction.id();

        check_transaction_in_isolation(&transaction.tx)?;
        if !self.config.accept_non_standard {
            self.check_transaction_standard_in_isolation(&transaction)?;
        }

        self.populate_entries(consensus, &mut transaction, stage);
        if !transaction.is_fully_populated() {
            return Err(RuleError::RejectMissingOutpoint);
        }

        let total_in = transaction.total_input_value().ok_or(TxRuleError::InputsValueOverflow(u64::MAX))?;
        let total_out = transaction.tx.total_output_value().ok_or(TxRuleError::OutputsValueOverflow(u64::MAX))?;
        if total_in < total_out {
            return Err(TxRuleError::SpendTooHigh(total_in, total_out).into());
        }
        let fee = total_in - total_out;
        let sigop_cost = consensus.calculate_transaction_sigop_cost(&transaction);
        let virtual_size = transaction_virtual_size(&transaction.tx, sigop_cost, self.config.bytes_per_sigop);
        transaction.calculated_fee = Some(fee);
        transaction.calculated_virtual_size = Some(virtual_size);

        let fee_delta = self.fee_delta(&transaction_id);
        let modified_fee = (fee as i64).saturating_add(fee_delta);
        let minimum_fee = self.config.minimum_relay_transaction_fee.fee(virtual_size);
        if modified_fee < minimum_fee {
            return Err(RuleError::RejectInsufficientFee(transaction_id, modified_fee, minimum_fee));
        }

        let own = RelativesStats::new(1, virtual_size, modified_fee);
        let (ancestor_ids, ancestors) = self.collect_ancestors(&transaction, own, stage);

        let double_spends = self
            .transaction_pool
            .utxo_set
            .get_double_spend_transaction_ids(&transaction)
            .into_iter()
            .filter(|x| !stage.is_evicted(&x.owner_id))
            .collect::<Vec<_>>();
        let replacement = match double_spends.is_empty() {
            true => None,
            false => Some(self.evaluate_replacement(&transaction, modified_fee, &ancestor_ids, &double_spends, stage)?),
        };

        self.check_chain_limits(&transaction_id, &ancestor_ids, ancestors, own, stage)?;

        Ok(StagedTransaction { mtx: transaction, fee_delta, ancestor_ids, ancestors, replacement })
    }

    /// Returns the ids of all the unconfirmed ancestors of `transaction`, staged or in the pool,
    /// along with their aggregate including `transaction` itself
    fn collect_ancestors(
        &self,
        transaction: &MutableTransaction,
        own: RelativesStats,
        stage: &PackageStage,
    ) -> (TransactionIdSet, RelativesStats) {
        let mut ancestor_ids = TransactionIdSet::new();
        let mut pool_parents = TransactionIdSet::new();
        for input in transaction.tx.inputs.iter() {
            let parent_id = input.previous_outpoint.transaction_id;
            if let Some(staged) = stage.get(&parent_id) {
                ancestor_ids.insert(parent_id);
                ancestor_ids.extend(staged.ancestor_ids.iter().copied());
            } else if self.transaction_pool.has(&parent_id) && !stage.is_evicted(&parent_id) {
                pool_parents.insert(parent_id);
            }
        }
        ancestor_ids.extend(self.transaction_pool.get_ancestor_ids_of_parents(&pool_parents));

        let mut ancestors = own;
        for ancestor_id in ancestor_ids.iter() {
            if let Some(staged) = stage.get(ancestor_id) {
                ancestors += staged.own_stats();
            } else if let Some(pooled) = self.transaction_pool.get(ancestor_id) {
                ancestors += pooled.own_stats();
            }
        }
        (ancestor_ids, ancestors)
    }

    fn check_chain_limits(
        &self,
        transaction_id: &TransactionId,
        ancestor_ids: &TransactionIdSet,
        ancestors: RelativesStats,
        own: RelativesStats,
        stage: &PackageStage,
    ) -> RuleResult<()> {
        let too_long = |reason: String| Err(RuleError::RejectTooLongMempoolChain(*transaction_id, reason));

        if ancestors.count > self.config.maximum_ancestor_count {
            return too_long(format!("too many unconfirmed ancestors [limit: {}]", self.config.maximum_ancestor_count));
        }
        if ancestors.virtual_size > self.config.maximum_ancestor_virtual_size {
            return too_long(format!("exceeds ancestor size limit [limit: {}]", self.config.maximum_ancestor_virtual_size));
        }

        for ancestor_id in ancestor_ids.iter() {
            let pool_transaction: Option<&MempoolTransaction> = match stage.has(ancestor_id) {
                true => None,
                false => self.transaction_pool.get(ancestor_id),
            };
            let mut descendants = stage.descendants_of(ancestor_id, pool_transaction);
            descendants += own;
            if descendants.count > self.config.maximum_descendant_count {
                return too_long(format!(
                    "too many descendants for tx {} [limit: {}]",
                    ancestor_id, self.config.maximum_descendant_count
                ));
            }
            if descendants.virtual_size > self.config.maximum_descendant_virtual_size {
                return too_long(format!(
                    "exceeds descendant size limit for tx {} [limit: {}]",
                    ancestor_id, self.config.maximum_descendant_virtual_size
                ));
            }
        }
        Ok(())
    }

    /// Applies a valid package: for every staged transaction in package order, the transactions
    /// it replaces are removed, then it is inserted.
    ///
    /// Returns the ids of all the replaced transactions.
    pub(crate) fn commit_package(&mut self, stage: PackageStage) -> Vec<TransactionId> {
        let mut replaced = vec![];
        for staged in stage.into_transactions() {
            let transaction_id = staged.id();
            if let Some(plan) = staged.replacement.as_ref() {
                let removed = self.transaction_pool.remove_transactions(&plan.evicted);
                if removed.len() != plan.evicted.len() {
                    warn!(
                        "Transaction {} was planned to replace {} transactions but only {} were found in the mempool",
                        transaction_id,
                        plan.evicted.len(),
                        removed.len()
                    );
                }
                debug!(
                    "Transaction {} replaced {} transactions ({} conflicts) paying {} in fees for {} vbytes",
                    transaction_id,
                    removed.len(),
                    plan.conflicts.len(),
                    plan.evicted_modified_fees,
                    plan.evicted_virtual_size
                );
                replaced.extend(removed.iter().map(|x| x.id()));
            }
            self.transaction_pool.add_transaction(staged.mtx, unix_now(), staged.fee_delta);
            trace!("Transaction {} added to the mempool", transaction_id);
        }
        replaced
    }
}
