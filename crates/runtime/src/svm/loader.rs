//! Transaction account loading, mirroring
//! `original_source/include/svm/account_loader.h`.

use std::collections::HashSet;

use validator_sdk::{Account, Lamports, PublicKey, Slot};

const DEFAULT_MAX_LOADED_ACCOUNTS_DATA_SIZE: usize = usize::MAX;
const PER_ACCOUNT_SIZE_OVERHEAD: usize = 128;

/// The account source the loader reads through. Implemented by the runtime's wiring
/// over `AccountStore` plus a `RentCalculator` and the pipeline's current slot.
pub trait AccountLoadingCallback {
    fn get_account(&self, address: &PublicKey) -> Option<Account>;
    fn account_exists(&self, address: &PublicKey) -> bool;
    fn get_slot(&self) -> Slot;
    fn calculate_rent(&self, data_size: usize) -> Lamports;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionLoadResult {
    Success,
    AccountNotFound(PublicKey),
    InsufficientFunds,
    InvalidAccountForFee,
    DuplicateInstruction,
    MaxLoadedAccountsDataSizeExceeded,
}

impl TransactionLoadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedAccount {
    pub address: PublicKey,
    pub account: Account,
    pub loaded_size: usize,
    pub slot: Slot,
    pub is_writable: bool,
    pub is_signer: bool,
}

#[derive(Debug, Clone)]
pub struct LoadedTransaction {
    pub accounts: Vec<LoadedAccount>,
    pub fee: Lamports,
    pub rent: Lamports,
    pub loaded_accounts_data_size: usize,
    pub load_result: TransactionLoadResult,
}

impl LoadedTransaction {
    fn failure(result: TransactionLoadResult) -> Self {
        Self {
            accounts: Vec::new(),
            fee: 0,
            rent: 0,
            loaded_accounts_data_size: 0,
            load_result: result,
        }
    }

    pub fn is_success(&self) -> bool {
        self.load_result.is_success()
    }

    pub fn account(&self, address: &PublicKey) -> Option<&LoadedAccount> {
        self.accounts.iter().find(|a| &a.address == address)
    }
}

pub struct AccountLoader<'a> {
    callback: &'a dyn AccountLoadingCallback,
}

impl<'a> AccountLoader<'a> {
    pub fn new(callback: &'a dyn AccountLoadingCallback) -> Self {
        Self { callback }
    }

    pub fn validate_fee_payer(
        &self,
        fee_payer: &PublicKey,
        fee_amount: Lamports,
        rent_amount: Lamports,
    ) -> TransactionLoadResult {
        match self.callback.get_account(fee_payer) {
            None => TransactionLoadResult::AccountNotFound(*fee_payer),
            Some(account) => {
                if account.lamports < fee_amount + rent_amount {
                    TransactionLoadResult::InsufficientFunds
                } else {
                    TransactionLoadResult::Success
                }
            }
        }
    }

    pub fn load_account(&self, address: &PublicKey, is_writable: bool, is_signer: bool) -> Option<LoadedAccount> {
        let account = self.callback.get_account(address)?;
        let loaded_size = account.data.len();
        Some(LoadedAccount {
            address: *address,
            account,
            loaded_size,
            slot: self.callback.get_slot(),
            is_writable,
            is_signer,
        })
    }

    pub fn load_transaction_accounts(
        &self,
        account_keys: &[PublicKey],
        is_signer: &[bool],
        is_writable: &[bool],
        fee_payer: &PublicKey,
        fee_amount: Lamports,
        max_loaded_accounts_data_size: usize,
    ) -> LoadedTransaction {
        let max_size = if max_loaded_accounts_data_size == 0 {
            DEFAULT_MAX_LOADED_ACCOUNTS_DATA_SIZE
        } else {
            max_loaded_accounts_data_size
        };

        let mut writable_seen = HashSet::new();
        for (address, writable) in account_keys.iter().zip(is_writable.iter()) {
            if *writable && !writable_seen.insert(address) {
                return LoadedTransaction::failure(TransactionLoadResult::DuplicateInstruction);
            }
        }

        // Size is checked against every named account before the fee payer or
        // missing-account checks run, so an oversized load is reported as
        // `MaxLoadedAccountsDataSizeExceeded` even when an account named in the
        // transaction (fee payer or otherwise) does not exist.
        let total_data_size: usize = account_keys
            .iter()
            .map(|address| {
                self.callback
                    .get_account(address)
                    .map(|account| account.data.len() + PER_ACCOUNT_SIZE_OVERHEAD)
                    .unwrap_or(PER_ACCOUNT_SIZE_OVERHEAD)
            })
            .sum();
        if total_data_size > max_size {
            return LoadedTransaction::failure(TransactionLoadResult::MaxLoadedAccountsDataSizeExceeded);
        }

        let fee_payer_check = self.validate_fee_payer(fee_payer, fee_amount, 0);
        if !fee_payer_check.is_success() {
            return LoadedTransaction::failure(fee_payer_check);
        }

        let mut loaded = Vec::with_capacity(account_keys.len());
        let mut rent = 0;

        for (i, address) in account_keys.iter().enumerate() {
            let writable = is_writable.get(i).copied().unwrap_or(false);
            let signer = is_signer.get(i).copied().unwrap_or(false);
            let Some(account) = self.load_account(address, writable, signer) else {
                return LoadedTransaction::failure(TransactionLoadResult::AccountNotFound(*address));
            };

            if account.account.lamports == 0 {
                rent += self.callback.calculate_rent(account.loaded_size);
            }
            loaded.push(account);
        }

        LoadedTransaction {
            accounts: loaded,
            fee: fee_amount,
            rent,
            loaded_accounts_data_size: total_data_size,
            load_result: TransactionLoadResult::Success,
        }
    }
}
