use crate::pubkey::PublicKey;
use ed25519_dalek::{Keypair as DalekKeypair, PublicKey as DalekPublicKey, Signature as DalekSignature, Signer, Verifier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 64-byte opaque Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub const LENGTH: usize = 64;

    pub fn new(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Verifies this signature over `message` under `signer`. Malformed keys or
    /// signatures are treated as verification failure, never a panic.
    pub fn verify(&self, signer: &PublicKey, message: &[u8]) -> bool {
        let (Ok(dalek_key), Ok(dalek_sig)) = (
            DalekPublicKey::from_bytes(&signer.0),
            DalekSignature::from_bytes(&self.0),
        ) else {
            return false;
        };
        dalek_key.verify(message, &dalek_sig).is_ok()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; 64])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseSignatureError {
    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),
    #[error("wrong length: expected 64 bytes, got {0}")]
    WrongSize(usize),
}

impl FromStr for Signature {
    type Err = ParseSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s).into_vec()?;
        if decoded.len() != 64 {
            return Err(ParseSignatureError::WrongSize(decoded.len()));
        }
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

/// A signing keypair, used by tests and fixtures to produce valid signatures.
pub struct Keypair(DalekKeypair);

impl Keypair {
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng {};
        Self(DalekKeypair::generate(&mut csprng))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.public.to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.0.sign(message);
        Signature(sig.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_succeeds() {
        let keypair = Keypair::generate();
        let sig = keypair.sign(b"hello");
        assert!(sig.verify(&keypair.public_key(), b"hello"));
    }

    #[test]
    fn verify_rejects_wrong_message() {
        let keypair = Keypair::generate();
        let sig = keypair.sign(b"hello");
        assert!(!sig.verify(&keypair.public_key(), b"goodbye"));
    }

    #[test]
    fn verify_rejects_wrong_signer() {
        let keypair = Keypair::generate();
        let other = Keypair::generate();
        let sig = keypair.sign(b"hello");
        assert!(!sig.verify(&other.public_key(), b"hello"));
    }

    #[test]
    fn verify_never_panics_on_garbage() {
        let sig = Signature::default();
        let key = PublicKey::default();
        assert!(!sig.verify(&key, b"anything"));
    }
}
