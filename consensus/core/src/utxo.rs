use crate::tx::{ScriptPublicKey, TransactionOutpoint};
use std::collections::HashMap;

/// Block height assigned to entries created by transactions not yet in a block
pub const UNACCEPTED_BLOCK_HEIGHT: u64 = u64::MAX;

/// Holds details about an individual transaction output in a utxo
/// set such as whether or not it was contained in a coinbase tx, the height
/// of the block that contains the tx, its public key script, and how
/// much it pays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoEntry {
    pub amount: u64,
    pub script_public_key: ScriptPublicKey,
    pub block_height: u64,
    pub is_coinbase: bool,
}

impl UtxoEntry {
    pub fn new(amount: u64, script_public_key: ScriptPublicKey, block_height: u64, is_coinbase: bool) -> Self {
        Self { amount, script_public_key, block_height, is_coinbase }
    }

    pub fn is_confirmed(&self) -> bool {
        self.block_height != UNACCEPTED_BLOCK_HEIGHT
    }
}

pub type UtxoCollection = HashMap<TransactionOutpoint, UtxoEntry>;
