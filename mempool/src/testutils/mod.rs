pub(crate) mod consensus_mock;
pub(crate) mod tx_helpers;
