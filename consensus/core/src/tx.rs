mod script_public_key;
pub mod validation;

pub use script_public_key::{ScriptPublicKey, ScriptVec};

use crate::{
    constants::{MAX_BIP125_RBF_SEQUENCE, NULL_OUTPOINT_INDEX},
    hashing,
    utxo::UtxoEntry,
};
use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

/// Represents the ID of a transaction, computed over all fields but the witness data
pub type TransactionId = txpool_hashes::Hash;

/// Represents the witness ID of a transaction, computed over all fields including the witness data
pub type WitnessTransactionId = txpool_hashes::Hash;

/// A single stack item of an input witness
pub type WitnessItem = Vec<u8>;

/// Represents a transaction outpoint
#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, PartialOrd, Ord)]
pub struct TransactionOutpoint {
    pub transaction_id: TransactionId,
    pub index: u32,
}

impl TransactionOutpoint {
    pub fn new(transaction_id: TransactionId, index: u32) -> Self {
        Self { transaction_id, index }
    }

    /// The outpoint referenced by the single input of a coinbase transaction
    pub fn null() -> Self {
        Self { transaction_id: TransactionId::default(), index: NULL_OUTPOINT_INDEX }
    }

    pub fn is_null(&self) -> bool {
        self.index == NULL_OUTPOINT_INDEX && self.transaction_id.is_zero()
    }
}

impl Display for TransactionOutpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.transaction_id, self.index)
    }
}

/// Represents a transaction input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    pub previous_outpoint: TransactionOutpoint,
    pub signature_script: Vec<u8>,
    pub sequence: u32,
    pub witness: Vec<WitnessItem>,
}

impl TransactionInput {
    pub fn new(previous_outpoint: TransactionOutpoint, signature_script: Vec<u8>, sequence: u32, witness: Vec<WitnessItem>) -> Self {
        Self { previous_outpoint, signature_script, sequence, witness }
    }

    /// Whether this input signals opt-in replaceability of its transaction
    pub fn signals_replaceability(&self) -> bool {
        self.sequence <= MAX_BIP125_RBF_SEQUENCE
    }
}

/// Represents a transaction output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub value: u64,
    pub script_public_key: ScriptPublicKey,
}

impl TransactionOutput {
    pub fn new(value: u64, script_public_key: ScriptPublicKey) -> Self {
        Self { value, script_public_key }
    }
}

/// Represents a transaction.
///
/// Identities are cached at construction. Any mutation of a public field must be
/// followed by a call to [`Transaction::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,

    id: TransactionId,
    witness_id: WitnessTransactionId,
}

impl Transaction {
    pub fn new(version: u32, inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>, lock_time: u32) -> Self {
        let mut tx = Self {
            version,
            inputs,
            outputs,
            lock_time,
            // Temp init before the finalize below
            id: Default::default(),
            witness_id: Default::default(),
        };
        tx.finalize();
        tx
    }

    /// Recompute and finalize the tx identities based on tx fields
    pub fn finalize(&mut self) {
        self.id = hashing::tx::id(self);
        self.witness_id = hashing::tx::witness_id(self);
    }

    /// Returns the transaction ID
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the transaction witness ID
    pub fn witness_id(&self) -> WitnessTransactionId {
        self.witness_id
    }

    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_outpoint.is_null()
    }

    /// Whether any input of this transaction signals opt-in replaceability
    pub fn signals_opt_in_rbf(&self) -> bool {
        self.inputs.iter().any(|input| input.signals_replaceability())
    }

    /// Returns the sum of all output values or `None` on overflow
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs.iter().try_fold(0u64, |total, output| total.checked_add(output.value))
    }
}

impl AsRef<Transaction> for Transaction {
    fn as_ref(&self) -> &Transaction {
        self
    }
}

/// Represents a transaction being validated, along with the UTXO entries its inputs
/// resolve to and the values computed during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutableTransaction {
    /// The inner transaction
    pub tx: Arc<Transaction>,
    /// Partially filled UTXO entry data
    pub entries: Vec<Option<UtxoEntry>>,
    /// Populated fee
    pub calculated_fee: Option<u64>,
    /// Populated virtual size, in virtual bytes
    pub calculated_virtual_size: Option<u64>,
}

impl MutableTransaction {
    pub fn new(tx: Transaction) -> Self {
        Self::from_tx(Arc::new(tx))
    }

    pub fn from_tx(tx: Arc<Transaction>) -> Self {
        let entries = vec![None; tx.inputs.len()];
        Self { tx, entries, calculated_fee: None, calculated_virtual_size: None }
    }

    pub fn with_entries(tx: Arc<Transaction>, entries: Vec<UtxoEntry>) -> Self {
        assert_eq!(tx.inputs.len(), entries.len());
        Self { tx, entries: entries.into_iter().map(Some).collect(), calculated_fee: None, calculated_virtual_size: None }
    }

    pub fn id(&self) -> TransactionId {
        self.tx.id()
    }

    pub fn witness_id(&self) -> WitnessTransactionId {
        self.tx.witness_id()
    }

    pub fn is_fully_populated(&self) -> bool {
        self.entries.iter().all(|entry| entry.is_some())
    }

    pub fn missing_outpoints(&self) -> impl Iterator<Item = TransactionOutpoint> + '_ {
        assert_eq!(self.entries.len(), self.tx.inputs.len());
        self.entries.iter().enumerate().filter_map(|(i, entry)| {
            if entry.is_none() { Some(self.tx.inputs[i].previous_outpoint) } else { None }
        })
    }

    pub fn clear_entries(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
    }

    /// Returns the sum of all populated input amounts, or `None` if an entry is missing or on overflow
    pub fn total_input_value(&self) -> Option<u64> {
        self.entries.iter().try_fold(0u64, |total, entry| total.checked_add(entry.as_ref()?.amount))
    }
}

impl AsRef<Transaction> for MutableTransaction {
    fn as_ref(&self) -> &Transaction {
        &self.tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEQUENCE_FINAL;

    fn input(index: u32, sequence: u32, witness: Vec<WitnessItem>) -> TransactionInput {
        TransactionInput::new(TransactionOutpoint::new(TransactionId::from_u64_word(7), index), vec![], sequence, witness)
    }

    fn output(value: u64) -> TransactionOutput {
        TransactionOutput::new(value, ScriptPublicKey::new(vec![0x51]))
    }

    #[test]
    fn test_identities() {
        let tx = Transaction::new(2, vec![input(0, SEQUENCE_FINAL, vec![])], vec![output(10)], 0);
        assert_eq!(tx.id(), tx.witness_id(), "without witness data both identities coincide");

        let mut witnessed = tx.clone();
        witnessed.inputs[0].witness = vec![vec![1, 2, 3]];
        witnessed.finalize();
        assert_eq!(tx.id(), witnessed.id(), "the witness must not affect the transaction id");
        assert_ne!(witnessed.id(), witnessed.witness_id());

        let mut other_witness = witnessed.clone();
        other_witness.inputs[0].witness = vec![vec![4, 5, 6]];
        other_witness.finalize();
        assert_eq!(witnessed.id(), other_witness.id());
        assert_ne!(witnessed.witness_id(), other_witness.witness_id());
    }

    #[test]
    fn test_opt_in_signaling() {
        let final_tx = Transaction::new(2, vec![input(0, SEQUENCE_FINAL, vec![]), input(1, SEQUENCE_FINAL - 1, vec![])], vec![], 0);
        assert!(!final_tx.signals_opt_in_rbf());

        let signaling = Transaction::new(2, vec![input(0, SEQUENCE_FINAL, vec![]), input(1, MAX_BIP125_RBF_SEQUENCE, vec![])], vec![], 0);
        assert!(signaling.signals_opt_in_rbf());
    }

    #[test]
    fn test_coinbase_and_values() {
        let coinbase = Transaction::new(
            1,
            vec![TransactionInput::new(TransactionOutpoint::null(), vec![0], SEQUENCE_FINAL, vec![])],
            vec![output(u64::MAX), output(1)],
            0,
        );
        assert!(coinbase.is_coinbase());
        assert_eq!(coinbase.total_output_value(), None);

        let tx = Transaction::new(1, vec![input(0, SEQUENCE_FINAL, vec![])], vec![output(3), output(4)], 0);
        assert!(!tx.is_coinbase());
        assert_eq!(tx.total_output_value(), Some(7));
    }

    #[test]
    fn test_mutable_transaction_entries() {
        let tx = Transaction::new(2, vec![input(0, SEQUENCE_FINAL, vec![]), input(1, SEQUENCE_FINAL, vec![])], vec![output(5)], 0);
        let mut mtx = MutableTransaction::new(tx);
        assert!(!mtx.is_fully_populated());
        assert_eq!(mtx.missing_outpoints().count(), 2);
        assert_eq!(mtx.total_input_value(), None);

        mtx.entries[0] = Some(UtxoEntry::new(3, ScriptPublicKey::new(vec![0x51]), 1, false));
        mtx.entries[1] = Some(UtxoEntry::new(4, ScriptPublicKey::new(vec![0x51]), 1, false));
        assert!(mtx.is_fully_populated());
        assert_eq!(mtx.total_input_value(), Some(7));

        mtx.clear_entries();
        assert_eq!(mtx.missing_outpoints().collect::<Vec<_>>(), mtx.tx.inputs.iter().map(|x| x.previous_outpoint).collect::<Vec<_>>());
    }
}
