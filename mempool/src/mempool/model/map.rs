use super::tx::MempoolTransaction;
use std::collections::HashMap;
use txpool_consensus_core::tx::{TransactionId, TransactionOutpoint, WitnessTransactionId};

pub(crate) use crate::model::TransactionIdSet;

/// IdToTransactionMap maps a transaction id to a mempool transaction
pub(crate) type IdToTransactionMap = HashMap<TransactionId, MempoolTransaction>;

/// WitnessIdToIdMap maps a witness transaction id to the id of the matching mempool transaction
pub(crate) type WitnessIdToIdMap = HashMap<WitnessTransactionId, TransactionId>;

/// OutpointToIdMap maps an outpoint to a transaction id
pub(crate) type OutpointToIdMap = HashMap<TransactionOutpoint, TransactionId>;

/// TransactionsEdges maps a transaction id to a set of related transaction ids
pub(crate) type TransactionsEdges = HashMap<TransactionId, TransactionIdSet>;
