use thiserror::Error;
use txpool_consensus_core::tx::{TransactionId, TransactionOutpoint};

/// Reason a package is refused as a whole, before any of its transactions is judged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackageRuleError {
    #[error("package has {0} transactions which is more than the max allowed amount of {1}")]
    TooManyTransactions(usize, usize),

    #[error("package virtual size of {0} is larger than the max allowed size of {1}")]
    TooLarge(u64, u64),

    #[error("package contains transaction {0} more than once")]
    ContainsDuplicates(TransactionId),

    #[error("package is not topologically sorted: transaction {0} spends {1} which appears later")]
    NotSorted(TransactionId, TransactionId),

    #[error("package transactions {0} and {1} both spend {2}")]
    ConflictInPackage(TransactionId, TransactionId, TransactionOutpoint),

    #[error("package is not a child with its direct parents")]
    NotChildWithParents,

    #[error("package child {0} spends {1} which is neither confirmed nor in the package")]
    NotChildWithUnconfirmedParents(TransactionId, TransactionOutpoint),
}

impl PackageRuleError {
    /// Short machine-readable reason, as relayed to peers and RPC callers
    pub fn reject_reason(&self) -> &'static str {
        match self {
            PackageRuleError::TooManyTransactions(_, _) => "package-too-many-transactions",
            PackageRuleError::TooLarge(_, _) => "package-too-large",
            PackageRuleError::ContainsDuplicates(_) => "package-contains-duplicates",
            PackageRuleError::NotSorted(_, _) => "package-not-sorted",
            PackageRuleError::ConflictInPackage(_, _, _) => "conflict-in-package",
            PackageRuleError::NotChildWithParents => "package-not-child-with-parents",
            PackageRuleError::NotChildWithUnconfirmedParents(_, _) => "package-not-child-with-unconfirmed-parents",
        }
    }
}

pub type PackageRuleResult<T> = std::result::Result<T, PackageRuleError>;
