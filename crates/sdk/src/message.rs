use serde::{Deserialize, Serialize};

use crate::hash::Hash;
use crate::pubkey::PublicKey;

/// One instruction inside a transaction's message: a reference to the program to
/// invoke, the indices of the accounts it touches (into `Message::account_keys`), and
/// opaque instruction data. The SVM pipeline hands resolved instructions to the
/// `ExecutionEngine` capability; this crate never interprets `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// The signed payload of a transaction. Follows the same header layout real Solana
/// messages use: the first `num_required_signatures` entries of `account_keys` are
/// signers, and within each of the signer/non-signer partitions the last
/// `num_readonly_*_accounts` entries are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    pub fn is_signer(&self, index: usize) -> bool {
        index < self.num_required_signatures as usize
    }

    pub fn is_writable(&self, index: usize) -> bool {
        let num_signed = self.num_required_signatures as usize;
        if index < num_signed {
            index < num_signed.saturating_sub(self.num_readonly_signed_accounts as usize)
        } else {
            let num_unsigned = self.account_keys.len().saturating_sub(num_signed);
            let readonly_unsigned = self.num_readonly_unsigned_accounts as usize;
            index < self.account_keys.len().saturating_sub(
                num_unsigned.min(readonly_unsigned),
            )
        }
    }

    pub fn fee_payer(&self) -> Option<&PublicKey> {
        self.account_keys.first()
    }

    pub fn serialize(&self) -> Vec<u8> {
        bincode::serialize(self).expect("Message always serializes")
    }
}
