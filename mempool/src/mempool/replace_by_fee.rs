use crate::mempool::{
    Mempool,
    errors::{RuleError, RuleResult},
    model::{
        map::TransactionIdSet,
        pool::Pool,
        stage::PackageStage,
        tx::{DoubleSpend, MempoolTransaction, ReplacementPlan},
    },
    tx::RbfTransactionState,
};
use txpool_consensus_core::{
    fee_rate::FeeRate,
    tx::{MutableTransaction, Transaction},
};

/// Returns the replaceability of a transaction considered on its own, without any mempool
/// to look its ancestors up.
pub fn is_rbf_opt_in_empty_mempool(transaction: &Transaction) -> RbfTransactionState {
    match transaction.signals_opt_in_rbf() {
        true => RbfTransactionState::ReplaceableBip125,
        false => RbfTransactionState::Unknown,
    }
}

impl Mempool {
    /// Returns the replaceability of `transaction` against the current mempool content
    pub(crate) fn rbf_transaction_state(&self, transaction: &Transaction) -> RbfTransactionState {
        self.transaction_pool.is_rbf_opt_in(transaction)
    }

    /// Decides whether `transaction` may replace the mempool transactions it double spends.
    ///
    /// `modified_fee` includes the prioritisation delta of `transaction` and `ancestor_ids` holds
    /// all its unconfirmed ancestors, staged package members included. Evictions already planned
    /// by earlier members of `stage` are disregarded.
    ///
    /// On success the returned plan names every transaction to be removed before inserting
    /// `transaction`. Nothing is mutated.
    pub(crate) fn evaluate_replacement(
        &self,
        transaction: &MutableTransaction,
        modified_fee: i64,
        ancestor_ids: &TransactionIdSet,
        double_spends: &[DoubleSpend],
        stage: &PackageStage,
    ) -> RuleResult<ReplacementPlan> {
        let transaction_id = transaction.id();
        let virtual_size = transaction.calculated_virtual_size.unwrap_or_default();

        let conflicts = double_spends
            .iter()
            .map(|double_spend| self.transaction_pool.get_double_spend_owner(double_spend))
            .collect::<RuleResult<Vec<&MempoolTransaction>>>()?;

        // Every conflict must signal replaceability, by itself or through an unconfirmed ancestor
        if !self.config.full_replace_by_fee {
            for (double_spend, conflict) in double_spends.iter().zip(conflicts.iter()) {
                if self.transaction_pool.is_rbf_opt_in(&conflict.mtx.tx) == RbfTransactionState::Final {
                    return Err(double_spend.into());
                }
            }
        }

        // Bound the eviction work. Descendant counts are summed, possibly counting shared descendants
        // more than once, and the sum is aborted as soon as it passes the limit.
        let mut candidate_count = 0;
        for conflict in conflicts.iter() {
            candidate_count += conflict.descendants.count;
            if candidate_count > self.config.maximum_replacement_candidates {
                return Err(RuleError::RejectTooManyReplacements(
                    transaction_id,
                    candidate_count,
                    self.config.maximum_replacement_candidates,
                ));
            }
        }

        let mut evicted_set = TransactionIdSet::new();
        let mut evicted = vec![];
        for conflict in conflicts.iter() {
            let conflict_id = conflict.id();
            for id in std::iter::once(conflict_id).chain(self.transaction_pool.get_redeemer_ids_in_pool(&conflict_id)) {
                if !stage.is_evicted(&id) && evicted_set.insert(id) {
                    evicted.push(id);
                }
            }
        }

        // The replacement may only spend unconfirmed outputs the conflicts already depended upon
        let conflicts_parents: TransactionIdSet =
            conflicts.iter().flat_map(|conflict| conflict.mtx.tx.inputs.iter().map(|x| x.previous_outpoint.transaction_id)).collect();
        for (i, input) in transaction.tx.inputs.iter().enumerate() {
            let parent_id = input.previous_outpoint.transaction_id;
            if conflicts_parents.contains(&parent_id) {
                continue;
            }
            if stage.has(&parent_id) || (self.transaction_pool.has(&parent_id) && !stage.is_evicted(&parent_id)) {
                return Err(RuleError::RejectReplacementAddsUnconfirmed(transaction_id, i));
            }
        }

        // Neither the replacement nor an earlier package member may depend on an evicted transaction
        if let Some(ancestor_id) = evicted.iter().find(|id| ancestor_ids.contains(*id) || stage.is_staged_ancestor(id)) {
            return Err(RuleError::RejectSpendsConflictingTransaction(transaction_id, *ancestor_id));
        }

        // The fee rate must strictly improve on every direct conflict
        let fee_rate = FeeRate::from_fee_and_size(modified_fee, virtual_size);
        for conflict in conflicts.iter() {
            let conflict_fee_rate = conflict.fee_rate();
            if fee_rate <= conflict_fee_rate {
                return Err(RuleError::RejectReplacementFeerateTooLow(transaction_id, fee_rate, conflict_fee_rate));
            }
        }

        let evicted_transactions = evicted.iter().filter_map(|id| self.transaction_pool.get(id)).collect::<Vec<_>>();
        let evicted_modified_fees = evicted_transactions.iter().fold(0i64, |acc, x| acc.saturating_add(x.modified_fee()));
        let evicted_virtual_size = evicted_transactions.iter().map(|x| x.virtual_size).sum::<u64>();

        // The replacement pays at least for everything it evicts...
        if modified_fee < evicted_modified_fees {
            return Err(RuleError::RejectReplacementFeeBelowConflicts(transaction_id, modified_fee, evicted_modified_fees));
        }

        // ...plus its own relay at the incremental rate
        let additional_fees = modified_fee.saturating_sub(evicted_modified_fees);
        let required_fees = self.config.incremental_relay_fee.fee(virtual_size);
        if additional_fees < required_fees {
            return Err(RuleError::RejectReplacementFeeBelowRelay(transaction_id, additional_fees, required_fees));
        }

        Ok(ReplacementPlan {
            conflicts: conflicts.iter().map(|x| x.id()).collect(),
            evicted,
            evicted_modified_fees,
            evicted_virtual_size,
        })
    }
}
