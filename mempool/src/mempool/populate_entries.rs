use crate::mempool::{Mempool, model::stage::PackageStage};
use txpool_consensus_core::{api::ConsensusApi, tx::MutableTransaction};

impl Mempool {
    /// Resolves the UTXO entries of `transaction` inputs.
    ///
    /// An outpoint is looked up successively in the earlier staged members of the package,
    /// in the pool transactions not evicted by the package and in the consensus UTXO set.
    /// Unresolved inputs keep a `None` entry.
    pub(crate) fn populate_entries(&self, consensus: &dyn ConsensusApi, transaction: &mut MutableTransaction, stage: &PackageStage) {
        for (i, input) in transaction.tx.inputs.iter().enumerate() {
            let outpoint = &input.previous_outpoint;
            transaction.entries[i] = stage
                .get_output_entry(outpoint)
                .or_else(|| match stage.is_evicted(&outpoint.transaction_id) {
                    true => None,
                    false => self.transaction_pool.get_output_entry(outpoint),
                })
                .or_else(|| consensus.get_utxo_entry(outpoint));
        }
    }
}
