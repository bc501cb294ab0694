//! Cache key computation for recovered descriptions.

use sha2::{Digest, Sha256};

/// Everything that determines what a recovery call returns.
#[derive(Debug)]
pub struct RecoveryKey<'a> {
    /// Recovery backend identity (the model name).
    pub scope: &'a str,
    /// Revision of the instruction template.
    pub revision: &'a str,
    /// Raw SVG of the fragment.
    pub fragment: &'a str,
}

impl RecoveryKey<'_> {
    /// SHA-256 hex digest of `"{scope}:{revision}:{fragment}"`.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let content = format!("{}:{}:{}", self.scope, self.revision, self.fragment);
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }
}
