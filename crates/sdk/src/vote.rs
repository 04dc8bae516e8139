use serde::{Deserialize, Serialize};

use crate::clock::{Slot, UnixTimestamp};
use crate::hash::Hash;
use crate::pubkey::PublicKey;
use crate::signature::Signature;

/// A validator's vote for a block. `signature` verifies `slot || block_hash`
/// under `validator_identity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub slot: Slot,
    pub block_hash: Hash,
    pub validator_identity: PublicKey,
    pub signature: Signature,
    pub timestamp: UnixTimestamp,
}

impl Vote {
    pub fn verify(&self) -> bool {
        let mut message = Vec::with_capacity(8 + 32);
        message.extend_from_slice(&self.slot.to_le_bytes());
        message.extend_from_slice(self.block_hash.as_bytes());
        self.signature.verify(&self.validator_identity, &message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Keypair;

    #[test]
    fn vote_verifies_over_slot_and_block_hash() {
        let keypair = Keypair::generate();
        let block_hash = Hash::hash(b"block");
        let mut message = Vec::new();
        message.extend_from_slice(&7u64.to_le_bytes());
        message.extend_from_slice(block_hash.as_bytes());
        let signature = keypair.sign(&message);

        let vote = Vote {
            slot: 7,
            block_hash,
            validator_identity: keypair.public_key(),
            signature,
            timestamp: 0,
        };
        assert!(vote.verify());
    }

    #[test]
    fn tampered_slot_fails_verification() {
        let keypair = Keypair::generate();
        let block_hash = Hash::hash(b"block");
        let mut message = Vec::new();
        message.extend_from_slice(&7u64.to_le_bytes());
        message.extend_from_slice(block_hash.as_bytes());
        let signature = keypair.sign(&message);

        let vote = Vote {
            slot: 8,
            block_hash,
            validator_identity: keypair.public_key(),
            signature,
            timestamp: 0,
        };
        assert!(!vote.verify());
    }
}
