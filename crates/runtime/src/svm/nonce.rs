//! Nonce account handling (fixed 80-byte layout), mirroring
//! `original_source/include/svm/nonce_info.h`.

use validator_sdk::{Account, Hash, Lamports, PublicKey, SYSTEM_PROGRAM_ID};

pub const NONCE_ACCOUNT_SIZE: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceState {
    Uninitialized,
    Initialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceData {
    pub authority: PublicKey,
    pub blockhash: Hash,
    pub fee_lamports_per_signature: Lamports,
}

impl NonceData {
    pub fn encode(&self) -> [u8; NONCE_ACCOUNT_SIZE] {
        let mut bytes = [0u8; NONCE_ACCOUNT_SIZE];
        bytes[0..4].copy_from_slice(&1u32.to_le_bytes());
        bytes[4..36].copy_from_slice(self.authority.as_bytes());
        bytes[36..68].copy_from_slice(self.blockhash.as_bytes());
        bytes[68..76].copy_from_slice(&self.fee_lamports_per_signature.to_le_bytes());
        bytes
    }

    pub fn decode(data: &[u8]) -> Option<(NonceState, Option<Self>)> {
        if data.len() < NONCE_ACCOUNT_SIZE {
            return None;
        }
        let discriminant = u32::from_le_bytes(data[0..4].try_into().unwrap());
        if discriminant == 0 {
            return Some((NonceState::Uninitialized, None));
        }
        let mut authority_bytes = [0u8; 32];
        authority_bytes.copy_from_slice(&data[4..36]);
        let mut hash_bytes = [0u8; 32];
        hash_bytes.copy_from_slice(&data[36..68]);
        let fee = u64::from_le_bytes(data[68..76].try_into().unwrap());
        Some((
            NonceState::Initialized,
            Some(NonceData {
                authority: PublicKey::new(authority_bytes),
                blockhash: Hash::new(hash_bytes),
                fee_lamports_per_signature: fee,
            }),
        ))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NonceError {
    #[error("nonce account data is not a valid nonce layout")]
    InvalidAccountData,
    #[error("nonce account is not initialized")]
    NotInitialized,
    #[error("nonce account is already initialized")]
    AlreadyInitialized,
    #[error("new blockhash must differ from the stored blockhash")]
    BlockhashUnchanged,
    #[error("authority does not match the stored authority")]
    InvalidAuthority,
    #[error("withdrawal amount exceeds account balance")]
    InsufficientFunds,
}

/// An in-memory view over a nonce account's data, produced from and written back to
/// an `Account`.
pub struct NonceInfo {
    pub address: PublicKey,
    account: Account,
    state: NonceState,
    data: Option<NonceData>,
}

impl NonceInfo {
    pub fn from_account(account: Account) -> Result<Self, NonceError> {
        if account.owner != SYSTEM_PROGRAM_ID || account.data.len() < NONCE_ACCOUNT_SIZE {
            return Err(NonceError::InvalidAccountData);
        }
        let (state, data) = NonceData::decode(&account.data).ok_or(NonceError::InvalidAccountData)?;
        Ok(Self {
            address: account.address,
            account,
            state,
            data,
        })
    }

    pub fn is_nonce_account(account: &Account) -> bool {
        account.owner == SYSTEM_PROGRAM_ID && account.data.len() >= NONCE_ACCOUNT_SIZE
    }

    pub fn state(&self) -> NonceState {
        self.state
    }

    pub fn data(&self) -> Option<&NonceData> {
        self.data.as_ref()
    }

    fn write_back(&mut self, data: NonceData) {
        self.account.data[0..NONCE_ACCOUNT_SIZE].copy_from_slice(&data.encode());
        self.state = NonceState::Initialized;
        self.data = Some(data);
    }

    pub fn initialize(
        &mut self,
        authority: PublicKey,
        blockhash: Hash,
        fee: Lamports,
    ) -> Result<(), NonceError> {
        if self.state != NonceState::Uninitialized {
            return Err(NonceError::AlreadyInitialized);
        }
        self.write_back(NonceData {
            authority,
            blockhash,
            fee_lamports_per_signature: fee,
        });
        Ok(())
    }

    pub fn advance(&mut self, new_blockhash: Hash, fee: Lamports) -> Result<(), NonceError> {
        let current = self.data.as_ref().ok_or(NonceError::NotInitialized)?;
        if self.state != NonceState::Initialized {
            return Err(NonceError::NotInitialized);
        }
        if current.blockhash == new_blockhash {
            return Err(NonceError::BlockhashUnchanged);
        }
        let authority = current.authority;
        self.write_back(NonceData {
            authority,
            blockhash: new_blockhash,
            fee_lamports_per_signature: fee,
        });
        Ok(())
    }

    pub fn authorize(
        &mut self,
        current_authority: PublicKey,
        new_authority: PublicKey,
    ) -> Result<(), NonceError> {
        let current = self.data.clone().ok_or(NonceError::NotInitialized)?;
        if current.authority != current_authority {
            return Err(NonceError::InvalidAuthority);
        }
        self.write_back(NonceData {
            authority: new_authority,
            ..current
        });
        Ok(())
    }

    pub fn withdraw(
        &mut self,
        authority: PublicKey,
        amount: Lamports,
        remaining_balance: Lamports,
    ) -> Result<(), NonceError> {
        let current = self.data.as_ref().ok_or(NonceError::NotInitialized)?;
        if current.authority != authority {
            return Err(NonceError::InvalidAuthority);
        }
        if self.account.lamports < amount {
            return Err(NonceError::InsufficientFunds);
        }
        self.account.lamports = remaining_balance;
        Ok(())
    }

    pub fn into_account(self) -> Account {
        self.account
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator_sdk::Account;

    fn fresh_nonce_account() -> Account {
        Account::new(
            PublicKey::new_rand(),
            SYSTEM_PROGRAM_ID,
            1_000_000,
            vec![0u8; NONCE_ACCOUNT_SIZE],
        )
    }

    #[test]
    fn initialize_then_advance_round_trips() {
        let mut nonce = NonceInfo::from_account(fresh_nonce_account()).unwrap();
        let authority = PublicKey::new_rand();
        let hash_a = Hash::hash(b"a");
        let hash_b = Hash::hash(b"b");

        nonce.initialize(authority, hash_a, 5_000).unwrap();
        assert_eq!(nonce.data().unwrap().blockhash, hash_a);

        nonce.advance(hash_b, 5_000).unwrap();
        assert_eq!(nonce.data().unwrap().blockhash, hash_b);
        assert_eq!(nonce.data().unwrap().authority, authority);
    }

    #[test]
    fn advance_with_same_blockhash_is_rejected() {
        let mut nonce = NonceInfo::from_account(fresh_nonce_account()).unwrap();
        let authority = PublicKey::new_rand();
        let hash_a = Hash::hash(b"a");
        nonce.initialize(authority, hash_a, 5_000).unwrap();
        assert_eq!(nonce.advance(hash_a, 5_000), Err(NonceError::BlockhashUnchanged));
    }

    #[test]
    fn authorize_requires_matching_current_authority() {
        let mut nonce = NonceInfo::from_account(fresh_nonce_account()).unwrap();
        let authority = PublicKey::new_rand();
        let wrong = PublicKey::new_rand();
        nonce.initialize(authority, Hash::hash(b"a"), 0).unwrap();
        assert_eq!(
            nonce.authorize(wrong, PublicKey::new_rand()),
            Err(NonceError::InvalidAuthority)
        );
    }

    #[test]
    fn non_system_owner_is_not_a_nonce_account() {
        let account = Account::new(PublicKey::new_rand(), PublicKey::new_rand(), 0, vec![0u8; 80]);
        assert!(!NonceInfo::is_nonce_account(&account));
    }
}
