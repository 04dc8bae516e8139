use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte identifier: validator identity, account address or program id.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub const LENGTH: usize = 32;

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Generates a new random key. Only meaningful for tests and fixtures; the system
    /// program id and other well-known keys are fixed constants, not random.
    pub fn new_rand() -> Self {
        let mut bytes = [0u8; 32];
        use rand::RngCore;
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParsePublicKeyError {
    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),
    #[error("wrong length: expected 32 bytes, got {0}")]
    WrongSize(usize),
}

impl FromStr for PublicKey {
    type Err = ParsePublicKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s).into_vec()?;
        if decoded.len() != 32 {
            return Err(ParsePublicKeyError::WrongSize(decoded.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

/// The well-known owner of wallet (non-program) accounts.
pub const SYSTEM_PROGRAM_ID: PublicKey = PublicKey([0u8; 32]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_roundtrips_through_base58() {
        let key = PublicKey::new_rand();
        let text = key.to_string();
        let parsed: PublicKey = text.parse().unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn ordering_is_byte_lexicographic() {
        let a = PublicKey([0u8; 32]);
        let mut b = [0u8; 32];
        b[31] = 1;
        let b = PublicKey(b);
        assert!(a < b);
    }
}
