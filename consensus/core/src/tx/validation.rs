use crate::{
    constants::MAX_MONEY,
    errors::tx::{TxResult, TxRuleError},
    tx::Transaction,
};
use std::collections::HashSet;

/// Performs the consensus checks that need nothing but the transaction itself
pub fn check_transaction_in_isolation(tx: &Transaction) -> TxResult<()> {
    if tx.inputs.is_empty() {
        return Err(TxRuleError::NoTxInputs);
    }
    if tx.outputs.is_empty() {
        return Err(TxRuleError::NoTxOutputs);
    }
    check_duplicate_transaction_inputs(tx)?;
    check_transaction_output_values(tx)?;
    if tx.is_coinbase() {
        return Err(TxRuleError::LooseCoinbase);
    }
    Ok(())
}

fn check_duplicate_transaction_inputs(tx: &Transaction) -> TxResult<()> {
    let mut existing = HashSet::with_capacity(tx.inputs.len());
    for input in tx.inputs.iter() {
        if !existing.insert(input.previous_outpoint) {
            return Err(TxRuleError::TxDuplicateInputs(input.previous_outpoint));
        }
    }
    Ok(())
}

fn check_transaction_output_values(tx: &Transaction) -> TxResult<()> {
    let mut total: u64 = 0;
    for (i, output) in tx.outputs.iter().enumerate() {
        if output.value > MAX_MONEY {
            return Err(TxRuleError::TxOutTooHigh(i, output.value, MAX_MONEY));
        }
        total = total.checked_add(output.value).ok_or(TxRuleError::OutputsValueOverflow(MAX_MONEY))?;
        if total > MAX_MONEY {
            return Err(TxRuleError::OutputsValueOverflow(MAX_MONEY));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::SEQUENCE_FINAL,
        tx::{ScriptPublicKey, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput},
    };

    fn input(index: u32) -> TransactionInput {
        TransactionInput::new(TransactionOutpoint::new(TransactionId::from_u64_word(1), index), vec![], SEQUENCE_FINAL, vec![])
    }

    fn output(value: u64) -> TransactionOutput {
        TransactionOutput::new(value, ScriptPublicKey::new(vec![0x51]))
    }

    #[test]
    fn test_check_transaction_in_isolation() {
        struct Test {
            name: &'static str,
            tx: Transaction,
            expected: TxResult<()>,
        }

        let tests = vec![
            Test { name: "valid", tx: Transaction::new(2, vec![input(0), input(1)], vec![output(10)], 0), expected: Ok(()) },
            Test { name: "no inputs", tx: Transaction::new(2, vec![], vec![output(10)], 0), expected: Err(TxRuleError::NoTxInputs) },
            Test { name: "no outputs", tx: Transaction::new(2, vec![input(0)], vec![], 0), expected: Err(TxRuleError::NoTxOutputs) },
            Test {
                name: "duplicate inputs",
                tx: Transaction::new(2, vec![input(0), input(0)], vec![output(10)], 0),
                expected: Err(TxRuleError::TxDuplicateInputs(input(0).previous_outpoint)),
            },
            Test {
                name: "output too high",
                tx: Transaction::new(2, vec![input(0)], vec![output(MAX_MONEY + 1)], 0),
                expected: Err(TxRuleError::TxOutTooHigh(0, MAX_MONEY + 1, MAX_MONEY)),
            },
            Test {
                name: "outputs sum too high",
                tx: Transaction::new(2, vec![input(0)], vec![output(MAX_MONEY), output(1)], 0),
                expected: Err(TxRuleError::OutputsValueOverflow(MAX_MONEY)),
            },
            Test {
                name: "coinbase",
                tx: Transaction::new(
                    2,
                    vec![TransactionInput::new(TransactionOutpoint::null(), vec![1], SEQUENCE_FINAL, vec![])],
                    vec![output(10)],
                    0,
                ),
                expected: Err(TxRuleError::LooseCoinbase),
            },
        ];

        for test in tests {
            assert_eq!(check_transaction_in_isolation(&test.tx), test.expected, "test '{}' failed", test.name);
        }
    }
}
