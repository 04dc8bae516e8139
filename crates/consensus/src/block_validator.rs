//! Block validation, mirroring `original_source/include/validator/core.h`'s
//! `BlockValidator`.

use validator_ledger::LedgerStore;
use validator_sdk::{Block, Hash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BlockValidationError {
    #[error("block structure is invalid (empty hash, missing producer, or no signature)")]
    InvalidStructure,
    #[error("producer signature does not verify over block_hash")]
    InvalidSignature,
    #[error("parent block is not present in the ledger")]
    BrokenChain,
    #[error("a transaction in the block failed verification")]
    InvalidTransaction,
}

pub struct BlockValidator<'a> {
    ledger: &'a LedgerStore,
}

impl<'a> BlockValidator<'a> {
    pub fn new(ledger: &'a LedgerStore) -> Self {
        Self { ledger }
    }

    pub fn validate_block_structure(&self, block: &Block) -> bool {
        block.block_hash != Hash::default()
            && (block.is_genesis() || block.parent_hash != Hash::default())
            && block.producer != validator_sdk::PublicKey::default()
    }

    pub fn validate_block_signature(&self, block: &Block) -> bool {
        block.recompute_and_verify_hash() && block.verify_producer_signature()
    }

    pub fn validate_chain_continuity(&self, block: &Block) -> bool {
        block.is_genesis() || self.ledger.get_block(&block.parent_hash).is_some()
    }

    pub fn validate_transactions(&self, block: &Block) -> bool {
        block.transactions.iter().all(|tx| tx.is_valid())
    }

    /// Runs the full validation sequence: structure, signature, chain continuity,
    /// then per-transaction checks, in that order. Does not commit anything.
    pub fn validate(&self, block: &Block) -> Result<(), BlockValidationError> {
        if !self.validate_block_structure(block) {
            return Err(BlockValidationError::InvalidStructure);
        }
        if !self.validate_block_signature(block) {
            return Err(BlockValidationError::InvalidSignature);
        }
        if !self.validate_chain_continuity(block) {
            return Err(BlockValidationError::BrokenChain);
        }
        if !self.validate_transactions(block) {
            return Err(BlockValidationError::InvalidTransaction);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator_sdk::{Keypair, PublicKey};

    #[test]
    fn genesis_with_valid_signature_passes() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LedgerStore::open(dir.path()).unwrap();
        let keypair = Keypair::generate();
        let mut block = Block::new_unsigned(Hash::default(), 0, vec![], 0, keypair.public_key());
        block.producer_signature = keypair.sign(block.block_hash.as_bytes());

        let validator = BlockValidator::new(&ledger);
        assert!(validator.validate(&block).is_ok());
    }

    #[test]
    fn missing_parent_is_broken_chain() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LedgerStore::open(dir.path()).unwrap();
        let keypair = Keypair::generate();
        let mut block = Block::new_unsigned(Hash::hash(b"missing-parent"), 1, vec![], 0, keypair.public_key());
        block.producer_signature = keypair.sign(block.block_hash.as_bytes());

        let validator = BlockValidator::new(&ledger);
        assert_eq!(validator.validate(&block), Err(BlockValidationError::BrokenChain));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LedgerStore::open(dir.path()).unwrap();
        let keypair = Keypair::generate();
        let wrong_signer = Keypair::generate();
        let mut block = Block::new_unsigned(Hash::default(), 0, vec![], 0, keypair.public_key());
        block.producer_signature = wrong_signer.sign(block.block_hash.as_bytes());

        let validator = BlockValidator::new(&ledger);
        assert_eq!(validator.validate(&block), Err(BlockValidationError::InvalidSignature));
    }

    #[test]
    fn zero_hash_producer_fails_structure_check() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LedgerStore::open(dir.path()).unwrap();
        let block = Block::new_unsigned(Hash::default(), 0, vec![], 0, PublicKey::default());

        let validator = BlockValidator::new(&ledger);
        assert_eq!(validator.validate(&block), Err(BlockValidationError::InvalidStructure));
    }
}
