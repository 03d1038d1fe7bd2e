use indexmap::IndexMap;
use std::fmt::{Display, Formatter};
use txpool_consensus_core::tx::{TransactionId, WitnessTransactionId};
use txpool_mempool_errors::{mempool::RuleError, package::PackageRuleError};

/// Shape of a package that passed the structural checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageTopology {
    /// A lone transaction, with no ordering constraint
    SingleTx,
    /// The last transaction is a child and every other transaction is one of its direct parents
    ChildWithParents,
}

/// Outcome for a single transaction of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAcceptance {
    /// The transaction passed every check. It is in the mempool unless processing was a test acceptance.
    Valid { virtual_size: u64, fee: u64, replaced: Vec<TransactionId> },

    /// The transaction was refused for its own reason
    Invalid(RuleError),

    /// A transaction with the same id and witness id is already in the mempool
    AlreadyInPool { virtual_size: u64, fee: u64 },

    /// A transaction with the same id but another witness is already in the mempool and kept.
    /// Carries the witness id of the pool entry.
    SameTxidDifferentWitness(WitnessTransactionId),
}

impl TransactionAcceptance {
    /// Whether this outcome lets the whole package be valid
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, TransactionAcceptance::Invalid(_))
    }

    pub fn reject_reason(&self) -> Option<&'static str> {
        match self {
            TransactionAcceptance::Invalid(err) => Some(err.reject_reason()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFailureKind {
    /// The package as a whole breaks a policy; no transaction was judged
    PolicyFailure,
    /// At least one transaction failed its own validation
    TransactionFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageFailure {
    Policy(PackageRuleError),
    Transaction,
}

impl PackageFailure {
    pub fn kind(&self) -> PackageFailureKind {
        match self {
            PackageFailure::Policy(_) => PackageFailureKind::PolicyFailure,
            PackageFailure::Transaction => PackageFailureKind::TransactionFailure,
        }
    }

    pub fn reject_reason(&self) -> &'static str {
        match self {
            PackageFailure::Policy(err) => err.reject_reason(),
            PackageFailure::Transaction => "transaction failed",
        }
    }
}

impl Display for PackageFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageFailure::Policy(err) => write!(f, "{}", err),
            PackageFailure::Transaction => f.write_str("transaction failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageState {
    Valid,
    Invalid(PackageFailure),
}

/// Aggregated outcome of a package submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageResult {
    pub state: PackageState,
    /// Per-transaction outcomes keyed by witness id, in package order.
    /// Empty when the package failed a policy check.
    pub tx_results: IndexMap<WitnessTransactionId, TransactionAcceptance>,
}

impl PackageResult {
    pub fn rejected(err: PackageRuleError) -> Self {
        Self { state: PackageState::Invalid(PackageFailure::Policy(err)), tx_results: IndexMap::new() }
    }

    /// Builds a result from per-transaction outcomes; the package is valid only if every outcome is acceptable
    pub fn from_tx_results(tx_results: IndexMap<WitnessTransactionId, TransactionAcceptance>) -> Self {
        let state = match tx_results.values().all(|x| x.is_acceptable()) {
            true => PackageState::Valid,
            false => PackageState::Invalid(PackageFailure::Transaction),
        };
        Self { state, tx_results }
    }

    pub fn is_valid(&self) -> bool {
        self.state == PackageState::Valid
    }

    pub fn failure(&self) -> Option<&PackageFailure> {
        match &self.state {
            PackageState::Valid => None,
            PackageState::Invalid(failure) => Some(failure),
        }
    }

    pub fn get(&self, witness_id: &WitnessTransactionId) -> Option<&TransactionAcceptance> {
        self.tx_results.get(witness_id)
    }
}
