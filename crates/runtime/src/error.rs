use validator_sdk::PublicKey;

#[derive(Debug, thiserror::Error)]
pub enum AccountStoreError {
    #[error("account {0} already exists")]
    Duplicate(PublicKey),
    #[error("account {0} not found")]
    NotFound(PublicKey),
}

pub type Result<T> = std::result::Result<T, AccountStoreError>;
