#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("block_hash does not match the recomputed hash of its contents")]
    InvalidStructure,
    #[error("parent block {0:?} not found in the store")]
    BrokenChain(validator_sdk::Hash),
    #[error("a block with hash {0:?} is already stored")]
    DuplicateHash(validator_sdk::Hash),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] Box<bincode::ErrorKind>),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
