use super::HasherExtensions;
use crate::tx::{Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput, WitnessTransactionId};
use txpool_hashes::{Hasher, HasherBase, TransactionHash};

/// Marker and flag bytes announcing the extended (witness) serialization
const WITNESS_MARKER_AND_FLAG: [u8; 2] = [0x00, 0x01];

/// Not intended for direct use by clients. Instead use `tx.id()`
pub fn id(tx: &Transaction) -> TransactionId {
    let mut hasher = TransactionHash::new();
    write_transaction(&mut hasher, tx, false);
    hasher.finalize()
}

/// Not intended for direct use by clients. Instead use `tx.witness_id()`
pub fn witness_id(tx: &Transaction) -> WitnessTransactionId {
    if !tx.has_witness() {
        return id(tx);
    }
    let mut hasher = TransactionHash::new();
    write_transaction(&mut hasher, tx, true);
    hasher.finalize()
}

/// Write the transaction into the provided hasher, with or without the witness data
fn write_transaction<T: HasherBase>(hasher: &mut T, tx: &Transaction, include_witness: bool) {
    hasher.update(tx.version.to_le_bytes());
    if include_witness {
        hasher.update(WITNESS_MARKER_AND_FLAG);
    }

    hasher.write_compact_size(tx.inputs.len());
    for input in tx.inputs.iter() {
        write_input(hasher, input);
    }

    hasher.write_compact_size(tx.outputs.len());
    for output in tx.outputs.iter() {
        write_output(hasher, output);
    }

    if include_witness {
        for input in tx.inputs.iter() {
            hasher.write_compact_size(input.witness.len());
            for item in input.witness.iter() {
                hasher.write_var_bytes(item);
            }
        }
    }

    hasher.update(tx.lock_time.to_le_bytes());
}

#[inline(always)]
fn write_input<T: HasherBase>(hasher: &mut T, input: &TransactionInput) {
    write_outpoint(hasher, &input.previous_outpoint);
    hasher.write_var_bytes(input.signature_script.as_slice()).update(input.sequence.to_le_bytes());
}

#[inline(always)]
fn write_outpoint<T: HasherBase>(hasher: &mut T, outpoint: &TransactionOutpoint) {
    hasher.update(outpoint.transaction_id).update(outpoint.index.to_le_bytes());
}

#[inline(always)]
fn write_output<T: HasherBase>(hasher: &mut T, output: &TransactionOutput) {
    hasher.update(output.value.to_le_bytes()).write_var_bytes(output.script_public_key.script());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::ScriptPublicKey;
    use std::str::FromStr;
    use txpool_hashes::Hash;

    fn test_transaction(witness: Vec<Vec<u8>>) -> Transaction {
        let previous_outpoint = TransactionOutpoint::new(Hash::from_bytes([0x11; 32]), 1);
        Transaction::new(
            2,
            vec![TransactionInput::new(previous_outpoint, vec![0xab, 0xcd], 0xffff_fffd, witness)],
            vec![TransactionOutput::new(50_000, ScriptPublicKey::new(vec![0x00, 0x14, 0x22, 0x22]))],
            0,
        )
    }

    #[test]
    fn test_transaction_id() {
        let tx = test_transaction(vec![]);
        let expected = Hash::from_str("fdba8134305b718961e1698edd9d9d0c52b4f7262ad2c09a9d2b9ff15c6adc80").unwrap();
        assert_eq!(tx.id(), expected);
        assert_eq!(tx.witness_id(), expected);
    }

    #[test]
    fn test_witness_transaction_id() {
        let tx = test_transaction(vec![vec![0x01, 0x02], vec![]]);
        assert_eq!(tx.id(), Hash::from_str("fdba8134305b718961e1698edd9d9d0c52b4f7262ad2c09a9d2b9ff15c6adc80").unwrap());
        assert_eq!(tx.witness_id(), Hash::from_str("d620789f814f205378ecccca196002fb5b0aa3c2b69a06211068a9a7079f6616").unwrap());
    }
}
