use std::fmt::{Display, Formatter};

/// Raw script bytes
pub type ScriptVec = Vec<u8>;

/// Represents the spending condition of a transaction output
#[derive(Default, Debug, PartialEq, Eq, Clone, Hash)]
pub struct ScriptPublicKey {
    script: ScriptVec,
}

impl ScriptPublicKey {
    pub fn new(script: ScriptVec) -> Self {
        Self { script }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }
}

impl Display for ScriptPublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(&self.script))
    }
}
