pub(crate) mod map;
pub(crate) mod pool;
pub(crate) mod stage;
pub(crate) mod transactions_pool;
pub(crate) mod tx;
pub(crate) mod utxo_set;
