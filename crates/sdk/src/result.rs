/// The fallible-return envelope shared by operations that don't warrant their own
/// error enum (snapshot import, ledger compaction). Components with richer failure
/// semantics (ledger store, account store, SVM pipeline, RPC dispatcher) define their
/// own typed error enums instead of routing through this one; see each crate's
/// `error.rs`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("{0}")]
    Internal(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
