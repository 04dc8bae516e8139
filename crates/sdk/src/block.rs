use serde::{Deserialize, Serialize};

use crate::clock::{Slot, UnixTimestamp};
use crate::hash::Hash;
use crate::pubkey::PublicKey;
use crate::signature::Signature;
use crate::transaction::Transaction;

/// A block: the unit the ledger store persists and the validator core votes on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub parent_hash: Hash,
    pub block_hash: Hash,
    pub slot: Slot,
    pub transactions: Vec<Transaction>,
    pub timestamp: UnixTimestamp,
    pub producer: PublicKey,
    pub producer_signature: Signature,
}

impl Block {
    /// Builds a block and computes its hash over the other fields:
    /// `block_hash = H(parent_hash || slot || timestamp || producer || tx_merkle(transactions))`.
    /// `producer_signature` must be attached afterward (it signs the resulting hash).
    pub fn new_unsigned(
        parent_hash: Hash,
        slot: Slot,
        transactions: Vec<Transaction>,
        timestamp: UnixTimestamp,
        producer: PublicKey,
    ) -> Self {
        let block_hash = Self::compute_hash(&parent_hash, slot, timestamp, &producer, &transactions);
        Self {
            parent_hash,
            block_hash,
            slot,
            transactions,
            timestamp,
            producer,
            producer_signature: Signature::default(),
        }
    }

    pub fn compute_hash(
        parent_hash: &Hash,
        slot: Slot,
        timestamp: UnixTimestamp,
        producer: &PublicKey,
        transactions: &[Transaction],
    ) -> Hash {
        let merkle = transaction_merkle_root(transactions);
        Hash::hash_parts(&[
            parent_hash.as_bytes(),
            &slot.to_le_bytes(),
            &timestamp.to_le_bytes(),
            producer.as_bytes(),
            merkle.as_bytes(),
        ])
    }

    /// Recomputes `block_hash` from the other fields and compares; used by
    /// `store_block` and the block validator's structural check.
    pub fn recompute_and_verify_hash(&self) -> bool {
        self.block_hash
            == Self::compute_hash(
                &self.parent_hash,
                self.slot,
                self.timestamp,
                &self.producer,
                &self.transactions,
            )
    }

    /// Verifies the producer's signature over `block_hash`.
    pub fn verify_producer_signature(&self) -> bool {
        self.producer_signature
            .verify(&self.producer, self.block_hash.as_bytes())
    }

    pub fn is_genesis(&self) -> bool {
        self.slot == 0
    }

    pub fn serialize(&self) -> Vec<u8> {
        bincode::serialize(self).expect("Block always serializes")
    }

    pub fn deserialize(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}

/// Binary merkle root over transaction hashes; an empty transaction list hashes to
/// the zero hash so that genesis blocks are still deterministic.
pub fn transaction_merkle_root(transactions: &[Transaction]) -> Hash {
    if transactions.is_empty() {
        return Hash::default();
    }
    let mut level: Vec<Hash> = transactions.iter().map(|tx| tx.hash).collect();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let combined = if pair.len() == 2 {
                Hash::hash_parts(&[pair[0].as_bytes(), pair[1].as_bytes()])
            } else {
                Hash::hash_parts(&[pair[0].as_bytes(), pair[0].as_bytes()])
            };
            next.push(combined);
        }
        level = next;
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::signature::Keypair;

    fn sample_tx() -> Transaction {
        let message = Message {
            num_required_signatures: 0,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 0,
            account_keys: vec![],
            recent_blockhash: Hash::default(),
            instructions: vec![],
        };
        Transaction::new(message, vec![])
    }

    #[test]
    fn merkle_root_is_order_sensitive_and_deterministic() {
        let tx_a = sample_tx();
        let mut tx_b = sample_tx();
        tx_b.hash = Hash::hash(b"different");

        let root_ab = transaction_merkle_root(&[tx_a.clone(), tx_b.clone()]);
        let root_ba = transaction_merkle_root(&[tx_b, tx_a]);
        assert_ne!(root_ab, root_ba);
        assert_eq!(transaction_merkle_root(&[]), Hash::default());
    }

    #[test]
    fn block_hash_matches_recompute() {
        let block = Block::new_unsigned(Hash::default(), 0, vec![], 100, PublicKey::new_rand());
        assert!(block.recompute_and_verify_hash());
    }

    #[test]
    fn producer_signature_verifies_over_block_hash() {
        let keypair = Keypair::generate();
        let mut block = Block::new_unsigned(Hash::default(), 1, vec![], 100, keypair.public_key());
        block.producer_signature = keypair.sign(block.block_hash.as_bytes());
        assert!(block.verify_producer_signature());
    }

    #[test]
    fn tampered_block_fails_signature_check() {
        let keypair = Keypair::generate();
        let mut block = Block::new_unsigned(Hash::default(), 1, vec![], 100, keypair.public_key());
        block.producer_signature = keypair.sign(block.block_hash.as_bytes());
        block.timestamp += 1;
        assert!(!block.recompute_and_verify_hash());
    }
}
