/// Number of satoshis in one coin
pub const SATOSHI_PER_COIN: u64 = 100_000_000;

/// Upper bound of any single amount and of any sum of amounts
pub const MAX_MONEY: u64 = 21_000_000 * SATOSHI_PER_COIN;

/// Witness bytes are discounted by this factor when computing weight
pub const WITNESS_SCALE_FACTOR: u64 = 4;

/// Setting every input sequence to this value disables lock time and replaceability
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// Highest input sequence still signaling opt-in replaceability.
/// An input with a sequence number at or below this value makes its transaction replaceable.
pub const MAX_BIP125_RBF_SEQUENCE: u32 = 0xffff_fffd;

/// Output index used by the null outpoint of a coinbase input
pub const NULL_OUTPOINT_INDEX: u32 = u32::MAX;
