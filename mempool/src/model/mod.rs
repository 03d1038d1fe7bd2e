use std::collections::HashSet;
use txpool_consensus_core::tx::TransactionId;

pub mod mempool_entry;
pub mod package;

/// A set of unique transaction ids
pub type TransactionIdSet = HashSet<TransactionId>;
