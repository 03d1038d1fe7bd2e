use super::{
    Mempool,
    errors::{NonStandardError, NonStandardResult},
};
use txpool_consensus_core::{
    mass::{transaction_base_size, transaction_weight},
    tx::MutableTransaction,
};

impl Mempool {
    pub(crate) fn check_transaction_standard_in_isolation(&self, transaction: &MutableTransaction) -> NonStandardResult<()> {
        let transaction_id = transaction.id();

        // The transaction must be a currently supported version.
        if transaction.tx.version > self.config.maximum_standard_transaction_version
            || transaction.tx.version < self.config.minimum_standard_transaction_version
        {
            return Err(NonStandardError::RejectVersion(
                transaction_id,
                transaction.tx.version,
                self.config.minimum_standard_transaction_version,
                self.config.maximum_standard_transaction_version,
            ));
        }

        // Since extremely large transactions with a lot of inputs can cost
        // almost as much to process as the sender fees, limit the maximum
        // weight of a transaction. This also helps mitigate CPU exhaustion
        // attacks.
        let weight = transaction_weight(&transaction.tx);
        if weight > self.config.maximum_standard_transaction_weight {
            return Err(NonStandardError::RejectTransactionWeight(transaction_id, weight, self.config.maximum_standard_transaction_weight));
        }

        // A transaction with a non-witness size of 64 bytes can be confused with an inner
        // merkle node, so tiny transactions are not relayed.
        let base_size = transaction_base_size(&transaction.tx);
        if base_size < self.config.minimum_standard_transaction_non_witness_size {
            return Err(NonStandardError::RejectTransactionTooSmall(
                transaction_id,
                base_size,
                self.config.minimum_standard_transaction_non_witness_size,
            ));
        }

        for (i, input) in transaction.tx.inputs.iter().enumerate() {
            // Each transaction input signature script must not exceed the
            // maximum size allowed for a standard transaction.
            let signature_script_len = input.signature_script.len() as u64;
            if signature_script_len > self.config.maximum_standard_signature_script_size {
                return Err(NonStandardError::RejectSignatureScriptSize(
                    transaction_id,
                    i,
                    signature_script_len,
                    self.config.maximum_standard_signature_script_size,
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mempool::config::Config,
        testutils::tx_helpers::{create_transaction, funding_transaction, spend},
    };
    use std::sync::Arc;
    use txpool_consensus_core::{constants::SEQUENCE_FINAL, tx::Transaction};

    #[test]
    fn test_check_transaction_standard_in_isolation() {
        struct Test {
            name: &'static str,
            tx: Transaction,
            expected_reason: Option<&'static str>,
        }

        let funding = funding_transaction(7);
        let base = create_transaction(vec![spend(&funding, 0, SEQUENCE_FINAL)], &[1000]);
        let with = |f: &dyn Fn(&mut Transaction)| {
            let mut tx = base.clone();
            f(&mut tx);
            tx.finalize();
            tx
        };

        let tests = vec![
            Test { name: "standard transaction", tx: base.clone(), expected_reason: None },
            Test { name: "version too low", tx: with(&|tx| tx.version = 0), expected_reason: Some("version") },
            Test { name: "version too high", tx: with(&|tx| tx.version = 3), expected_reason: Some("version") },
            Test {
                name: "weight above the limit",
                tx: with(&|tx| tx.inputs[0].witness = vec![vec![0; 400_000]]),
                expected_reason: Some("tx-size"),
            },
            Test {
                name: "non-witness size below the minimum",
                tx: with(&|tx| tx.outputs[0].script_public_key = Default::default()),
                expected_reason: Some("tx-size-small"),
            },
            Test {
                name: "signature script too large",
                tx: with(&|tx| tx.inputs[0].signature_script = vec![0; 1651]),
                expected_reason: Some("scriptsig-size"),
            },
            Test {
                name: "signature script at the limit",
                tx: with(&|tx| tx.inputs[0].signature_script = vec![0; 1650]),
                expected_reason: None,
            },
        ];

        let mempool = Mempool::new(Arc::new(Config::default()));
        for test in tests {
            let result = mempool.check_transaction_standard_in_isolation(&MutableTransaction::new(test.tx));
            assert_eq!(result.as_ref().err().map(|x| x.reject_reason()), test.expected_reason, "{}: {:?}", test.name, result);
        }
    }
}
