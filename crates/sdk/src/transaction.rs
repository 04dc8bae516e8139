use serde::{Deserialize, Serialize};

use crate::hash::Hash;
use crate::message::Message;
use crate::signature::Signature;

/// A signed transaction: signatures plus the message they cover, with the message
/// hash memoized at construction: `tx.hash` is a deterministic function of
/// `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
    pub hash: Hash,
}

impl Transaction {
    pub fn new(message: Message, signatures: Vec<Signature>) -> Self {
        let hash = Self::compute_hash(&message);
        Self {
            signatures,
            message,
            hash,
        }
    }

    pub fn compute_hash(message: &Message) -> Hash {
        Hash::hash(&message.serialize())
    }

    /// Re-derives the hash from the message and checks the declared signer count;
    /// used by the block validator's per-transaction verification.
    pub fn is_valid(&self) -> bool {
        if self.signatures.is_empty() {
            return false;
        }
        if self.hash != Self::compute_hash(&self.message) {
            return false;
        }
        self.signatures.len() == self.message.num_required_signatures as usize
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn serialize(&self) -> Vec<u8> {
        bincode::serialize(self).expect("Transaction always serializes")
    }

    pub fn deserialize(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubkey::PublicKey;
    use crate::signature::Keypair;

    fn sample_message() -> Message {
        Message {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 0,
            account_keys: vec![PublicKey::new_rand(), PublicKey::new_rand()],
            recent_blockhash: Hash::default(),
            instructions: vec![],
        }
    }

    #[test]
    fn hash_is_deterministic_function_of_message() {
        let message = sample_message();
        let tx1 = Transaction::new(message.clone(), vec![Signature::default()]);
        let tx2 = Transaction::new(message, vec![Signature::default()]);
        assert_eq!(tx1.hash, tx2.hash);
    }

    #[test]
    fn valid_transaction_round_trips() {
        let keypair = Keypair::generate();
        let message = Message {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 0,
            account_keys: vec![keypair.public_key(), PublicKey::new_rand()],
            recent_blockhash: Hash::default(),
            instructions: vec![],
        };
        let hash = Transaction::compute_hash(&message);
        let sig = keypair.sign(hash.as_bytes());
        let tx = Transaction::new(message, vec![sig]);
        assert!(tx.is_valid());

        let bytes = tx.serialize();
        let decoded = Transaction::deserialize(&bytes).unwrap();
        assert_eq!(tx, decoded);
    }

    #[test]
    fn mismatched_signature_count_is_invalid() {
        let message = sample_message();
        let tx = Transaction::new(message, vec![]);
        assert!(!tx.is_valid());
    }
}
