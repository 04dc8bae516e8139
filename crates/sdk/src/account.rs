use serde::{Deserialize, Serialize};

use crate::clock::{Epoch, Lamports};
use crate::pubkey::PublicKey;

/// An on-chain account. `data.len()` is fixed at creation; callers that need to
/// resize an account must create a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: PublicKey,
    pub owner: PublicKey,
    pub lamports: Lamports,
    pub data: Vec<u8>,
    pub executable: bool,
    pub rent_epoch: Epoch,
}

impl Account {
    pub fn new(address: PublicKey, owner: PublicKey, lamports: Lamports, data: Vec<u8>) -> Self {
        Self {
            address,
            owner,
            lamports,
            data,
            executable: false,
            rent_epoch: 0,
        }
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}
