use txpool_consensus_core::fee_rate::FeeRate;

pub(crate) const DEFAULT_MAXIMUM_PACKAGE_COUNT: usize = 25;
pub(crate) const DEFAULT_MAXIMUM_PACKAGE_VIRTUAL_SIZE: u64 = 101_000;

/// Maximum number of transactions a single replacement may evict, counting descendants
pub(crate) const DEFAULT_MAXIMUM_REPLACEMENT_CANDIDATES: u64 = 100;

pub(crate) const DEFAULT_MAXIMUM_ANCESTOR_COUNT: u64 = 25;
pub(crate) const DEFAULT_MAXIMUM_ANCESTOR_VIRTUAL_SIZE: u64 = 101_000;
pub(crate) const DEFAULT_MAXIMUM_DESCENDANT_COUNT: u64 = 25;
pub(crate) const DEFAULT_MAXIMUM_DESCENDANT_VIRTUAL_SIZE: u64 = 101_000;

pub(crate) const DEFAULT_MAXIMUM_STANDARD_TRANSACTION_WEIGHT: u64 = 400_000;
pub(crate) const DEFAULT_MINIMUM_STANDARD_TRANSACTION_NON_WITNESS_SIZE: u64 = 65;
pub(crate) const DEFAULT_MAXIMUM_STANDARD_SIGNATURE_SCRIPT_SIZE: u64 = 1650;
pub(crate) const DEFAULT_MINIMUM_STANDARD_TRANSACTION_VERSION: u32 = 1;
pub(crate) const DEFAULT_MAXIMUM_STANDARD_TRANSACTION_VERSION: u32 = 2;

pub(crate) const DEFAULT_BYTES_PER_SIGOP: u64 = 20;

/// DEFAULT_MINIMUM_RELAY_TRANSACTION_FEE specifies the minimum transaction fee for a transaction to be accepted to
/// the mempool and relayed. It is specified in satoshis per 1000 virtual bytes.
pub(crate) const DEFAULT_MINIMUM_RELAY_TRANSACTION_FEE: i64 = 1000;

/// DEFAULT_INCREMENTAL_RELAY_FEE is the fee rate a replacement must pay for its own size on top of
/// the fees of everything it evicts. It is specified in satoshis per 1000 virtual bytes.
pub(crate) const DEFAULT_INCREMENTAL_RELAY_FEE: i64 = 1000;

#[derive(Clone, Debug)]
pub struct Config {
    pub maximum_package_count: usize,
    pub maximum_package_virtual_size: u64,
    pub maximum_replacement_candidates: u64,
    pub maximum_ancestor_count: u64,
    pub maximum_ancestor_virtual_size: u64,
    pub maximum_descendant_count: u64,
    pub maximum_descendant_virtual_size: u64,
    pub maximum_standard_transaction_weight: u64,
    pub minimum_standard_transaction_non_witness_size: u64,
    pub maximum_standard_signature_script_size: u64,
    pub minimum_standard_transaction_version: u32,
    pub maximum_standard_transaction_version: u32,
    pub bytes_per_sigop: u64,
    pub minimum_relay_transaction_fee: FeeRate,
    pub incremental_relay_fee: FeeRate,
    pub accept_non_standard: bool,
    /// When set, conflicting transactions are replaceable even if they do not signal it
    pub full_replace_by_fee: bool,
}

impl Config {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        maximum_package_count: usize,
        maximum_package_virtual_size: u64,
        maximum_replacement_candidates: u64,
        maximum_ancestor_count: u64,
        maximum_ancestor_virtual_size: u64,
        maximum_descendant_count: u64,
        maximum_descendant_virtual_size: u64,
        maximum_standard_transaction_weight: u64,
        minimum_standard_transaction_non_witness_size: u64,
        maximum_standard_signature_script_size: u64,
        minimum_standard_transaction_version: u32,
        maximum_standard_transaction_version: u32,
        bytes_per_sigop: u64,
        minimum_relay_transaction_fee: FeeRate,
        incremental_relay_fee: FeeRate,
        accept_non_standard: bool,
        full_replace_by_fee: bool,
    ) -> Self {
        Self {
            maximum_package_count,
            maximum_package_virtual_size,
            maximum_replacement_candidates,
            maximum_ancestor_count,
            maximum_ancestor_virtual_size,
            maximum_descendant_count,
            maximum_descendant_virtual_size,
            maximum_standard_transaction_weight,
            minimum_standard_transaction_non_witness_size,
            maximum_standard_signature_script_size,
            minimum_standard_transaction_version,
            maximum_standard_transaction_version,
            bytes_per_sigop,
            minimum_relay_transaction_fee,
            incremental_relay_fee,
            accept_non_standard,
            full_replace_by_fee,
        }
    }

    /// Build a default config.
    pub fn build_default(relay_non_std_transactions: bool) -> Self {
        Self {
            maximum_package_count: DEFAULT_MAXIMUM_PACKAGE_COUNT,
            maximum_package_virtual_size: DEFAULT_MAXIMUM_PACKAGE_VIRTUAL_SIZE,
            maximum_replacement_candidates: DEFAULT_MAXIMUM_REPLACEMENT_CANDIDATES,
            maximum_ancestor_count: DEFAULT_MAXIMUM_ANCESTOR_COUNT,
            maximum_ancestor_virtual_size: DEFAULT_MAXIMUM_ANCESTOR_VIRTUAL_SIZE,
            maximum_descendant_count: DEFAULT_MAXIMUM_DESCENDANT_COUNT,
            maximum_descendant_virtual_size: DEFAULT_MAXIMUM_DESCENDANT_VIRTUAL_SIZE,
            maximum_standard_transaction_weight: DEFAULT_MAXIMUM_STANDARD_TRANSACTION_WEIGHT,
            minimum_standard_transaction_non_witness_size: DEFAULT_MINIMUM_STANDARD_TRANSACTION_NON_WITNESS_SIZE,
            maximum_standard_signature_script_size: DEFAULT_MAXIMUM_STANDARD_SIGNATURE_SCRIPT_SIZE,
            minimum_standard_transaction_version: DEFAULT_MINIMUM_STANDARD_TRANSACTION_VERSION,
            maximum_standard_transaction_version: DEFAULT_MAXIMUM_STANDARD_TRANSACTION_VERSION,
            bytes_per_sigop: DEFAULT_BYTES_PER_SIGOP,
            minimum_relay_transaction_fee: FeeRate::from_satoshis_per_kvb(DEFAULT_MINIMUM_RELAY_TRANSACTION_FEE),
            incremental_relay_fee: FeeRate::from_satoshis_per_kvb(DEFAULT_INCREMENTAL_RELAY_FEE),
            accept_non_standard: relay_non_std_transactions,
            full_replace_by_fee: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::build_default(false)
    }
}
