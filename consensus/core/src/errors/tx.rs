use crate::tx::TransactionOutpoint;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxRuleError {
    #[error("transaction has no inputs")]
    NoTxInputs,

    #[error("transaction has no outputs")]
    NoTxOutputs,

    #[error("transaction has duplicate inputs spending {0}")]
    TxDuplicateInputs(TransactionOutpoint),

    #[error("transaction output {0} has value {1} which is higher than the max allowed value of {2}")]
    TxOutTooHigh(usize, u64, u64),

    #[error("transaction outputs sum is higher than the max allowed value of {0}")]
    OutputsValueOverflow(u64),

    #[error("coinbase transactions are only valid in a block")]
    LooseCoinbase,

    #[error("one of the transaction inputs spends a missing or already spent output")]
    MissingTxOutpoints,

    #[error("transaction inputs sum is higher than the max allowed value of {0}")]
    InputsValueOverflow(u64),

    #[error("transaction total inputs spent amount {0} is lower than the total outputs amount {1}")]
    SpendTooHigh(u64, u64),

    #[error("signature script of input {0} failed verification: {1}")]
    SignatureInvalid(usize, String),
}

impl TxRuleError {
    /// Short machine-readable reason, as relayed to peers and RPC callers
    pub fn reject_reason(&self) -> &'static str {
        match self {
            TxRuleError::NoTxInputs => "bad-txns-vin-empty",
            TxRuleError::NoTxOutputs => "bad-txns-vout-empty",
            TxRuleError::TxDuplicateInputs(_) => "bad-txns-inputs-duplicate",
            TxRuleError::TxOutTooHigh(_, _, _) => "bad-txns-vout-toolarge",
            TxRuleError::OutputsValueOverflow(_) => "bad-txns-txouttotal-toolarge",
            TxRuleError::LooseCoinbase => "coinbase",
            TxRuleError::MissingTxOutpoints => "bad-txns-inputs-missingorspent",
            TxRuleError::InputsValueOverflow(_) => "bad-txns-inputvalues-outofrange",
            TxRuleError::SpendTooHigh(_, _) => "bad-txns-in-belowout",
            TxRuleError::SignatureInvalid(_, _) => "mandatory-script-verify-flag-failed",
        }
    }
}

pub type TxResult<T> = std::result::Result<T, TxRuleError>;
