use crate::Hash;
use sha2::{Digest, Sha256};

pub trait HasherBase {
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self;
}

pub trait Hasher: HasherBase + Clone + Default {
    fn finalize(self) -> Hash;
    fn reset(&mut self);
    #[inline(always)]
    fn hash<A: AsRef<[u8]>>(data: A) -> Hash {
        let mut hasher = Self::default();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Double SHA-256, the hash behind both transaction identities
#[derive(Clone, Default)]
pub struct TransactionHash(Sha256);

impl TransactionHash {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HasherBase for TransactionHash {
    #[inline(always)]
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
        self.0.update(data);
        self
    }
}

impl Hasher for TransactionHash {
    #[inline(always)]
    fn finalize(self) -> Hash {
        let first = self.0.finalize();
        Hash::from_bytes(Sha256::digest(first).into())
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.0.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_hash_is_double_sha256() {
        // sha256d("hello")
        let expected = Hash::from_str("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50").unwrap();
        assert_eq!(TransactionHash::hash(b"hello"), expected);

        let mut hasher = TransactionHash::new();
        hasher.update(b"hel").update(b"lo");
        assert_eq!(hasher.finalize(), expected, "incremental updates should match a one-shot hash");
    }

    #[test]
    fn test_reset() {
        let mut hasher = TransactionHash::new();
        hasher.update(b"garbage");
        hasher.reset();
        hasher.update(b"hello");
        assert_eq!(hasher.finalize(), TransactionHash::hash(b"hello"));
    }
}
