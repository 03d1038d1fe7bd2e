use thiserror::Error;
use txpool_consensus_core::{
    errors::tx::TxRuleError,
    fee_rate::FeeRate,
    tx::{TransactionId, TransactionOutpoint},
};

/// Reason a single transaction is refused by the mempool
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A consensus transaction rule error
    ///
    /// Note that following variants are converted:
    ///
    /// - TxRuleError::MissingTxOutpoints => RuleError::RejectMissingOutpoint
    #[error(transparent)]
    RejectTxRule(TxRuleError),

    #[error("at least one outpoint of transaction is lacking a matching UTXO entry")]
    RejectMissingOutpoint,

    /// The owner is either not replaceable or missing from the pool
    #[error("output {0} already spent by transaction {1} in the memory pool")]
    RejectDoubleSpendInMempool(TransactionOutpoint, TransactionId),

    /// An error emitted by mempool/src/mempool/check_transaction_standard.rs
    #[error(transparent)]
    RejectNonStandard(NonStandardError),

    #[error("transaction {0} has {1} modified fees which is under the required amount of {2} for relay")]
    RejectInsufficientFee(TransactionId, i64, i64),

    #[error("transaction {0} exceeds the mempool chain limits: {1}")]
    RejectTooLongMempoolChain(TransactionId, String),

    #[error("transaction {0} doesn't exist in transaction pool")]
    RejectMissingTransaction(TransactionId),

    #[error("rejecting replacement {0}; too many potential replacements ({1} > {2})")]
    RejectTooManyReplacements(TransactionId, u64, u64),

    #[error("replacement {0} adds unconfirmed input, idx {1}")]
    RejectReplacementAddsUnconfirmed(TransactionId, usize),

    #[error("{0} spends conflicting transaction {1}")]
    RejectSpendsConflictingTransaction(TransactionId, TransactionId),

    #[error("rejecting replacement {0}; new feerate {1} <= old feerate {2}")]
    RejectReplacementFeerateTooLow(TransactionId, FeeRate, FeeRate),

    #[error("rejecting replacement {0}, less fees than conflicting txs; {1} < {2}")]
    RejectReplacementFeeBelowConflicts(TransactionId, i64, i64),

    #[error("rejecting replacement {0}, not enough additional fees to relay; {1} < {2}")]
    RejectReplacementFeeBelowRelay(TransactionId, i64, i64),
}

impl RuleError {
    /// Short machine-readable reason, as relayed to peers and RPC callers
    pub fn reject_reason(&self) -> &'static str {
        match self {
            RuleError::RejectTxRule(err) => err.reject_reason(),
            RuleError::RejectMissingOutpoint => "bad-txns-inputs-missingorspent",
            RuleError::RejectDoubleSpendInMempool(_, _) => "txn-mempool-conflict",
            RuleError::RejectNonStandard(err) => err.reject_reason(),
            RuleError::RejectInsufficientFee(_, _, _) => "min-relay-fee-not-met",
            RuleError::RejectTooLongMempoolChain(_, _) => "too-long-mempool-chain",
            RuleError::RejectMissingTransaction(_) => "txn-not-in-mempool",
            RuleError::RejectTooManyReplacements(_, _, _) => "too-many-potential-replacements",
            RuleError::RejectReplacementAddsUnconfirmed(_, _) => "adds-unconfirmed-input",
            RuleError::RejectSpendsConflictingTransaction(_, _) => "spends-conflicting-transaction",
            RuleError::RejectReplacementFeerateTooLow(_, _, _) => "feerate-too-low",
            RuleError::RejectReplacementFeeBelowConflicts(_, _, _) | RuleError::RejectReplacementFeeBelowRelay(_, _, _) => {
                "insufficient-fee-for-relay"
            }
        }
    }
}

impl From<NonStandardError> for RuleError {
    fn from(item: NonStandardError) -> Self {
        RuleError::RejectNonStandard(item)
    }
}

impl From<TxRuleError> for RuleError {
    fn from(item: TxRuleError) -> Self {
        match item {
            TxRuleError::MissingTxOutpoints => RuleError::RejectMissingOutpoint,
            _ => RuleError::RejectTxRule(item),
        }
    }
}

pub type RuleResult<T> = std::result::Result<T, RuleError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NonStandardError {
    #[error("transaction {0} version {1} is not in the valid range of {2}-{3}")]
    RejectVersion(TransactionId, u32, u32, u32),

    #[error("transaction {0} weight of {1} is larger than max allowed weight of {2}")]
    RejectTransactionWeight(TransactionId, u64, u64),

    #[error("transaction {0} size without witness of {1} is smaller than the min allowed size of {2}")]
    RejectTransactionTooSmall(TransactionId, u64, u64),

    #[error("transaction {0} input #{1}: signature script size of {2} bytes is larger than the maximum allowed size of {3} bytes")]
    RejectSignatureScriptSize(TransactionId, usize, u64, u64),
}

impl NonStandardError {
    pub fn transaction_id(&self) -> &TransactionId {
        match self {
            NonStandardError::RejectVersion(id, _, _, _) => id,
            NonStandardError::RejectTransactionWeight(id, _, _) => id,
            NonStandardError::RejectTransactionTooSmall(id, _, _) => id,
            NonStandardError::RejectSignatureScriptSize(id, _, _, _) => id,
        }
    }

    pub fn reject_reason(&self) -> &'static str {
        match self {
            NonStandardError::RejectVersion(_, _, _, _) => "version",
            NonStandardError::RejectTransactionWeight(_, _, _) => "tx-size",
            NonStandardError::RejectTransactionTooSmall(_, _, _) => "tx-size-small",
            NonStandardError::RejectSignatureScriptSize(_, _, _, _) => "scriptsig-size",
        }
    }
}

pub type NonStandardResult<T> = std::result::Result<T, NonStandardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_reasons() {
        let id = TransactionId::from_u64_word(1);
        assert_eq!(RuleError::from(TxRuleError::MissingTxOutpoints), RuleError::RejectMissingOutpoint);
        assert_eq!(RuleError::from(TxRuleError::SpendTooHigh(1, 2)).reject_reason(), "bad-txns-in-belowout");
        assert_eq!(RuleError::from(NonStandardError::RejectTransactionWeight(id, 400_001, 400_000)).reject_reason(), "tx-size");
        assert_eq!(RuleError::RejectReplacementFeeBelowConflicts(id, 1, 2).reject_reason(), "insufficient-fee-for-relay");
        assert_eq!(RuleError::RejectReplacementFeeBelowRelay(id, 1, 2).reject_reason(), "insufficient-fee-for-relay");
        assert_eq!(
            RuleError::RejectReplacementFeerateTooLow(id, FeeRate::from_satoshis_per_kvb(1), FeeRate::from_satoshis_per_kvb(2))
                .reject_reason(),
            "feerate-too-low"
        );
    }

    #[test]
    fn test_double_spend_display() {
        let (spent, owner) = (TransactionId::from_u64_word(3), TransactionId::from_u64_word(7));
        let err = RuleError::RejectDoubleSpendInMempool(TransactionOutpoint::new(spent, 1), owner);
        assert_eq!(err.reject_reason(), "txn-mempool-conflict");
        assert_eq!(err.to_string(), format!("output ({}, 1) already spent by transaction {} in the memory pool", spent, owner));
    }

    #[test]
    fn test_non_standard_display_keeps_transaction_id() {
        let id = TransactionId::from_u64_word(42);
        let err = NonStandardError::RejectVersion(id, 3, 1, 2);
        assert_eq!(err.transaction_id(), &id);
        assert!(RuleError::from(err).to_string().contains(&id.to_string()));
    }
}
