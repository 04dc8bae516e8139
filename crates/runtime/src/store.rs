//! Account store: a base map of committed accounts plus a staged overlay that
//! is merged in atomically by `commit_changes`.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use validator_sdk::{Account, PublicKey};

use crate::error::{AccountStoreError, Result};

struct Base {
    accounts: HashMap<PublicKey, Account>,
    owner_index: HashMap<PublicKey, HashSet<PublicKey>>,
}

pub struct AccountStore {
    base: RwLock<Base>,
    overlay: Mutex<HashMap<PublicKey, Account>>,
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            base: RwLock::new(Base {
                accounts: HashMap::new(),
                owner_index: HashMap::new(),
            }),
            overlay: Mutex::new(HashMap::new()),
        }
    }

    pub fn create_account(&self, account: Account) -> Result<()> {
        let base = self.base.read().unwrap();
        let mut overlay = self.overlay.lock().unwrap();
        if base.accounts.contains_key(&account.address) || overlay.contains_key(&account.address) {
            return Err(AccountStoreError::Duplicate(account.address));
        }
        overlay.insert(account.address, account);
        Ok(())
    }

    pub fn update_account(&self, account: Account) -> Result<()> {
        let base = self.base.read().unwrap();
        let mut overlay = self.overlay.lock().unwrap();
        if !base.accounts.contains_key(&account.address) && !overlay.contains_key(&account.address) {
            return Err(AccountStoreError::NotFound(account.address));
        }
        overlay.insert(account.address, account);
        Ok(())
    }

    pub fn get_account(&self, address: &PublicKey) -> Option<Account> {
        if let Some(account) = self.overlay.lock().unwrap().get(address) {
            return Some(account.clone());
        }
        self.base.read().unwrap().accounts.get(address).cloned()
    }

    pub fn account_exists(&self, address: &PublicKey) -> bool {
        self.overlay.lock().unwrap().contains_key(address)
            || self.base.read().unwrap().accounts.contains_key(address)
    }

    /// Accounts owned by `owner`, reading the committed owner index plus any staged
    /// overlay entries that have not been committed yet.
    pub fn get_accounts_by_owner(&self, owner: &PublicKey) -> Vec<Account> {
        let base = self.base.read().unwrap();
        let overlay = self.overlay.lock().unwrap();

        let mut seen = HashSet::new();
        let mut result = Vec::new();

        if let Some(addresses) = base.owner_index.get(owner) {
            for address in addresses {
                if let Some(account) = overlay.get(address) {
                    if &account.owner == owner {
                        result.push(account.clone());
                    }
                } else if let Some(account) = base.accounts.get(address) {
                    result.push(account.clone());
                }
                seen.insert(*address);
            }
        }
        for (address, account) in overlay.iter() {
            if &account.owner == owner && !seen.contains(address) {
                result.push(account.clone());
            }
        }
        result
    }

    /// Same lookup as `get_accounts_by_owner`; kept as a distinct name because the RPC
    /// layer's `getProgramAccounts` and the internal owner-index lookup are reached
    /// from different call sites even though the semantics coincide.
    pub fn get_program_accounts(&self, owner: &PublicKey) -> Vec<Account> {
        self.get_accounts_by_owner(owner)
    }

    pub fn get_all_accounts(&self) -> Vec<Account> {
        let base = self.base.read().unwrap();
        let overlay = self.overlay.lock().unwrap();
        let mut result: HashMap<PublicKey, Account> = base.accounts.clone();
        for (address, account) in overlay.iter() {
            result.insert(*address, account.clone());
        }
        result.into_values().collect()
    }

    /// Atomically merges the staged overlay into the base map, updating the
    /// owner index for every touched address.
    pub fn commit_changes(&self) {
        let mut overlay = self.overlay.lock().unwrap();
        if overlay.is_empty() {
            return;
        }
        let mut base = self.base.write().unwrap();
        for (address, account) in overlay.drain() {
            if let Some(previous) = base.accounts.get(&address) {
                if previous.owner != account.owner {
                    if let Some(set) = base.owner_index.get_mut(&previous.owner) {
                        set.remove(&address);
                    }
                }
            }
            base.owner_index.entry(account.owner).or_default().insert(address);
            base.accounts.insert(address, account);
        }
    }
}
