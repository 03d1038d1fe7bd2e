mod hashers;

use std::fmt::{Debug, Display, Formatter};
use std::str::{self, FromStr};

pub use hashers::{Hasher, HasherBase, TransactionHash};

pub const HASH_SIZE: usize = 32;

pub const ZERO_HASH: Hash = Hash([0; HASH_SIZE]);

#[derive(PartialEq, Eq, Clone, Copy, Hash, Default, Debug, PartialOrd, Ord)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    #[inline(always)]
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    #[inline(always)]
    pub const fn as_bytes(self) -> [u8; HASH_SIZE] {
        self.0
    }

    /// Builds a hash whose first 8 bytes are the little-endian encoding of `word`.
    /// Mostly useful for tests and placeholders.
    #[inline(always)]
    pub fn from_u64_word(word: u64) -> Self {
        let mut bytes = [0u8; HASH_SIZE];
        bytes[..8].copy_from_slice(&word.to_le_bytes());
        Hash(bytes)
    }

    pub fn is_zero(&self) -> bool {
        *self == ZERO_HASH
    }
}

impl AsRef<[u8]> for Hash {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(value: [u8; HASH_SIZE]) -> Self {
        Hash(value)
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut hex = [0u8; HASH_SIZE * 2];
        hex::encode_to_slice(self.0, &mut hex).map_err(|_| std::fmt::Error)?;
        f.write_str(str::from_utf8(&hex).map_err(|_| std::fmt::Error)?)
    }
}

impl FromStr for Hash {
    type Err = hex::FromHexError;

    fn from_str(hash_str: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(hash_str, &mut bytes)?;
        Ok(Hash(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::Hash;
    use std::str::FromStr;

    #[test]
    fn test_hash_basics() {
        let hash_str = "8e40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3af";
        let hash = Hash::from_str(hash_str).unwrap();
        assert_eq!(hash_str, hash.to_string());
        let hash2 = Hash::from_str(hash_str).unwrap();
        assert_eq!(hash, hash2);

        let hash3 = Hash::from_str("8e40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3ab").unwrap();
        assert_ne!(hash2, hash3);

        let odd_str = "8e40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3a";
        let short_str = "8e40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3";

        assert_eq!(Hash::from_str(odd_str), Err(hex::FromHexError::OddLength));
        assert_eq!(Hash::from_str(short_str), Err(hex::FromHexError::InvalidStringLength));
    }

    #[test]
    fn test_from_u64_word() {
        let hash = Hash::from_u64_word(0x0102);
        assert_eq!(hash.as_bytes()[..2], [0x02, 0x01]);
        assert!(hash.as_bytes()[8..].iter().all(|&b| b == 0));
        assert!(!hash.is_zero());
        assert!(Hash::from_u64_word(0).is_zero());
    }
}
