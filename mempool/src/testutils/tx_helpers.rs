use crate::mempool::config::DEFAULT_BYTES_PER_SIGOP;
use txpool_consensus_core::{
    constants::SEQUENCE_FINAL,
    mass::transaction_virtual_size,
    tx::{MutableTransaction, ScriptPublicKey, Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput},
    utxo::UtxoEntry,
};

pub(crate) const FUNDING_OUTPUT_COUNT: usize = 4;
pub(crate) const FUNDING_OUTPUT_VALUE: u64 = 1_000_000;

/// A pay-to-witness-pubkey-hash shaped script
pub(crate) fn p2wpkh_script(tag: u8) -> ScriptPublicKey {
    let mut script = vec![0x00, 0x14];
    script.extend([tag; 20]);
    ScriptPublicKey::new(script)
}

pub(crate) fn create_transaction(inputs: Vec<TransactionInput>, output_values: &[u64]) -> Transaction {
    let outputs = output_values.iter().map(|value| TransactionOutput::new(*value, p2wpkh_script(0x11))).collect();
    Transaction::new(2, inputs, outputs, 0)
}

/// An input spending output `index` of `transaction`, carrying a signature and a public key as witness
pub(crate) fn spend(transaction: &Transaction, index: u32, sequence: u32) -> TransactionInput {
    TransactionInput::new(TransactionOutpoint::new(transaction.id(), index), vec![], sequence, vec![vec![0x30; 72], vec![0x02; 33]])
}

/// A transaction with [`FUNDING_OUTPUT_COUNT`] outputs of [`FUNDING_OUTPUT_VALUE`], distinct for every `seed`.
/// It is intended to be confirmed in the consensus UTXO set.
pub(crate) fn funding_transaction(seed: u64) -> Transaction {
    let outpoint = TransactionOutpoint::new(TransactionId::from_u64_word(seed + 1), 0);
    create_transaction(
        vec![TransactionInput::new(outpoint, vec![], SEQUENCE_FINAL, vec![])],
        &[FUNDING_OUTPUT_VALUE; FUNDING_OUTPUT_COUNT],
    )
}

/// A transaction spending a random outpoint
pub(crate) fn placeholder_transaction() -> Transaction {
    let outpoint = TransactionOutpoint::new(TransactionId::from_bytes(rand::random()), rand::random::<u32>() % 16);
    create_transaction(vec![TransactionInput::new(outpoint, vec![], SEQUENCE_FINAL, vec![])], &[1_000])
}

/// Returns `transaction` as validated by the mempool, its inputs being resolved to `input_amounts`
pub(crate) fn populated(transaction: Transaction, input_amounts: &[u64]) -> MutableTransaction {
    let entries = input_amounts.iter().map(|amount| UtxoEntry::new(*amount, p2wpkh_script(0x11), 1, false)).collect();
    let virtual_size = transaction_virtual_size(&transaction, 0, DEFAULT_BYTES_PER_SIGOP);
    let fee = input_amounts.iter().sum::<u64>() - transaction.total_output_value().unwrap_or_default();
    let mut mtx = MutableTransaction::with_entries(transaction.into(), entries);
    mtx.calculated_fee = Some(fee);
    mtx.calculated_virtual_size = Some(virtual_size);
    mtx
}
