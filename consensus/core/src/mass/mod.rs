use crate::{
    constants::WITNESS_SCALE_FACTOR,
    hashing::compact_size_len,
    tx::{Transaction, TransactionInput, TransactionOutput},
};

/// Returns the number of bytes of the serialization without witness data
pub fn transaction_base_size(tx: &Transaction) -> u64 {
    let mut size: u64 = 0;
    size += 4; // version (u32)
    size += compact_size_len(tx.inputs.len() as u64);
    size += tx.inputs.iter().map(transaction_input_serialized_size).sum::<u64>();
    size += compact_size_len(tx.outputs.len() as u64);
    size += tx.outputs.iter().map(transaction_output_serialized_size).sum::<u64>();
    size += 4; // lock time (u32)
    size
}

/// Returns the number of bytes of the full serialization, including witness data when present
pub fn transaction_total_size(tx: &Transaction) -> u64 {
    if !tx.has_witness() {
        return transaction_base_size(tx);
    }
    let mut size = transaction_base_size(tx);
    size += 2; // marker and flag
    size += tx.inputs.iter().map(transaction_input_witness_size).sum::<u64>();
    size
}

/// Returns the weight of the transaction: non-witness bytes count four times, witness bytes once
pub fn transaction_weight(tx: &Transaction) -> u64 {
    transaction_base_size(tx) * (WITNESS_SCALE_FACTOR - 1) + transaction_total_size(tx)
}

/// Converts a weight into virtual bytes, charging signature operations at `bytes_per_sigop` when
/// they dominate the weight.
pub fn virtual_size(weight: u64, sigop_cost: u64, bytes_per_sigop: u64) -> u64 {
    let weight = weight.max(sigop_cost.saturating_mul(bytes_per_sigop));
    weight.div_ceil(WITNESS_SCALE_FACTOR)
}

pub fn transaction_virtual_size(tx: &Transaction, sigop_cost: u64, bytes_per_sigop: u64) -> u64 {
    virtual_size(transaction_weight(tx), sigop_cost, bytes_per_sigop)
}

fn transaction_input_serialized_size(input: &TransactionInput) -> u64 {
    let mut size = 0;
    size += 32 + 4; // previous outpoint (transaction id and index)
    size += compact_size_len(input.signature_script.len() as u64);
    size += input.signature_script.len() as u64;
    size += 4; // sequence (u32)
    size
}

fn transaction_input_witness_size(input: &TransactionInput) -> u64 {
    compact_size_len(input.witness.len() as u64)
        + input.witness.iter().map(|item| compact_size_len(item.len() as u64) + item.len() as u64).sum::<u64>()
}

fn transaction_output_serialized_size(output: &TransactionOutput) -> u64 {
    let mut size = 0;
    size += 8; // value (u64)
    size += compact_size_len(output.script_public_key.len() as u64);
    size += output.script_public_key.len() as u64;
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{ScriptPublicKey, TransactionOutpoint};
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
    fn test_sizes_without_witness() {
        let tx = test_transaction(vec![]);
        assert_eq!(transaction_base_size(&tx), 66);
        assert_eq!(transaction_total_size(&tx), 66);
        assert_eq!(transaction_weight(&tx), 264);
        assert_eq!(transaction_virtual_size(&tx, 0, 20), 66);
    }

    #[test]
    fn test_sizes_with_witness() {
        let tx = test_transaction(vec![vec![0x01, 0x02], vec![]]);
        assert_eq!(transaction_base_size(&tx), 66);
        assert_eq!(transaction_total_size(&tx), 73);
        assert_eq!(transaction_weight(&tx), 271);
        assert_eq!(transaction_virtual_size(&tx, 0, 20), 68, "virtual size rounds up");
    }

    #[test]
    fn test_sigop_adjusted_virtual_size() {
        assert_eq!(virtual_size(400, 0, 20), 100);
        assert_eq!(virtual_size(400, 20, 20), 100, "sigop cost equal to weight does not change the size");
        assert_eq!(virtual_size(400, 40, 20), 200, "dominating sigop cost takes over");
        assert_eq!(virtual_size(401, 0, 20), 101);
    }
}
