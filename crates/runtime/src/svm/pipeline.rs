//! Transaction pipeline orchestration, wiring the account loader, nonce handling,
//! rollback set, balance collector, and error metrics around an `ExecutionEngine`.

use std::collections::{HashMap, HashSet};

use validator_sdk::{Account, Lamports, PublicKey, Slot, Transaction};

use crate::store::AccountStore;

use super::balances::TransactionBalances;
use super::engine::{ExecutionEngine, ExecutionOutcome};
use super::error_metrics::{ErrorKind, TransactionErrorMetrics};
use super::loader::{AccountLoadingCallback, AccountLoader, LoadedTransaction, TransactionLoadResult};
use super::nonce::NonceInfo;
use super::rent::RentCalculator;
use super::rollback::RollbackAccounts;

struct StoreLoadingCallback<'a> {
    store: &'a AccountStore,
    rent: &'a RentCalculator,
    slot: Slot,
}

impl<'a> AccountLoadingCallback for StoreLoadingCallback<'a> {
    fn get_account(&self, address: &PublicKey) -> Option<Account> {
        self.store.get_account(address)
    }

    fn account_exists(&self, address: &PublicKey) -> bool {
        self.store.account_exists(address)
    }

    fn get_slot(&self) -> Slot {
        self.slot
    }

    fn calculate_rent(&self, data_size: usize) -> Lamports {
        self.rent.calculate_rent(data_size)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub loaded: LoadedTransaction,
    pub outcome: Option<ExecutionOutcome>,
    pub balances: TransactionBalances,
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        self.outcome.as_ref().map(|o| o.success).unwrap_or(false)
    }
}

pub struct TransactionPipeline<'a> {
    engine: &'a dyn ExecutionEngine,
    rent: RentCalculator,
}

impl<'a> TransactionPipeline<'a> {
    pub fn new(engine: &'a dyn ExecutionEngine, rent: RentCalculator) -> Self {
        Self { engine, rent }
    }

    /// Runs one transaction through the full pipeline, mutating `store` in place
    /// (via staged overlay writes) and accumulating into `metrics`. `store`'s
    /// `commit_changes` is left to the caller.
    pub fn process_transaction(
        &self,
        tx: &Transaction,
        store: &AccountStore,
        current_slot: Slot,
        fee_amount: Lamports,
        max_loaded_accounts_data_size: usize,
        metrics: &mut TransactionErrorMetrics,
    ) -> PipelineResult {
        let account_keys = tx.message.account_keys.clone();
        let fee_payer = match tx.message.fee_payer() {
            Some(address) => *address,
            None => {
                metrics.classify(ErrorKind::AccountNotFound);
                return PipelineResult {
                    loaded: LoadedTransaction {
                        accounts: Vec::new(),
                        fee: 0,
                        rent: 0,
                        loaded_accounts_data_size: 0,
                        load_result: TransactionLoadResult::AccountNotFound(PublicKey::default()),
                    },
                    outcome: None,
                    balances: TransactionBalances::default(),
                };
            }
        };

        let mut balances = TransactionBalances::default();
        let pre_accounts = snapshot_map(store, &account_keys);
        balances.record_pre_balances(&account_keys, &pre_accounts);

        let callback = StoreLoadingCallback {
            store,
            rent: &self.rent,
            slot: current_slot,
        };
        let loader = AccountLoader::new(&callback);
        let is_signer: Vec<bool> = (0..account_keys.len())
            .map(|i| tx.message.is_signer(i))
            .collect();
        let is_writable: Vec<bool> = (0..account_keys.len())
            .map(|i| tx.message.is_writable(i))
            .collect();

        let loaded = loader.load_transaction_accounts(
            &account_keys,
            &is_signer,
            &is_writable,
            &fee_payer,
            fee_amount,
            max_loaded_accounts_data_size,
        );

        if !loaded.is_success() {
            classify_load_failure(loaded.load_result, metrics);
            return PipelineResult {
                loaded,
                outcome: None,
                balances,
            };
        }

        let mut accounts: HashMap<PublicKey, Account> =
            loaded.accounts.iter().map(|a| (a.address, a.account.clone())).collect();
        let writable_addresses: HashSet<PublicKey> =
            loaded.accounts.iter().filter(|a| a.is_writable).map(|a| a.address).collect();
        let signer_addresses: HashSet<PublicKey> =
            loaded.accounts.iter().filter(|a| a.is_signer).map(|a| a.address).collect();

        let nonce_snapshot = advance_nonce_if_present(
            &mut accounts,
            &writable_addresses,
            &signer_addresses,
            &tx.message.recent_blockhash,
            fee_amount,
        );

        let fee_payer_rent_epoch = accounts
            .get(&fee_payer)
            .map(|a| a.rent_epoch)
            .unwrap_or(0);
        let fee_payer_snapshot_before_fee = accounts.get(&fee_payer).cloned().unwrap_or_else(|| {
            Account::new(fee_payer, validator_sdk::SYSTEM_PROGRAM_ID, 0, vec![])
        });

        let mut rollback =
            RollbackAccounts::create_fee_only_rollback(fee_payer, fee_payer_snapshot_before_fee, fee_amount);
        rollback.fee_payer_rent_epoch = fee_payer_rent_epoch;
        rollback.nonce_account = nonce_snapshot;

        if let Some(account) = accounts.get_mut(&fee_payer) {
            account.lamports = account.lamports.saturating_sub(fee_amount);
        }

        let outcome = self.engine.execute(&tx.message.instructions, &mut accounts);

        if !outcome.success {
            if let Some(kind) = outcome.error_kind {
                metrics.classify(kind);
            }
            rollback.apply_rollback(&mut accounts);
            persist(store, &accounts, &loaded);
            balances.record_post_balances(&account_keys, &accounts);
            return PipelineResult {
                loaded,
                outcome: Some(outcome),
                balances,
            };
        }

        balances.record_post_balances(&account_keys, &accounts);
        if !balances.is_balanced(fee_amount) {
            metrics.classify(ErrorKind::UnbalancedTransaction);
            rollback.apply_rollback(&mut accounts);
            persist(store, &accounts, &loaded);
            balances.record_post_balances(&account_keys, &accounts);
            return PipelineResult {
                loaded,
                outcome: Some(ExecutionOutcome::failure(ErrorKind::UnbalancedTransaction)),
                balances,
            };
        }

        persist(store, &accounts, &loaded);
        PipelineResult {
            loaded,
            outcome: Some(outcome),
            balances,
        }
    }
}

fn snapshot_map(store: &AccountStore, addresses: &[PublicKey]) -> HashMap<PublicKey, Account> {
    addresses
        .iter()
        .filter_map(|a| store.get_account(a).map(|acc| (*a, acc)))
        .collect()
}

fn persist(store: &AccountStore, accounts: &HashMap<PublicKey, Account>, loaded: &LoadedTransaction) {
    for loaded_account in &loaded.accounts {
        if !loaded_account.is_writable {
            continue;
        }
        if let Some(account) = accounts.get(&loaded_account.address) {
            if let Err(e) = store.update_account(account.clone()) {
                log::warn!("failed to stage post-execution update for {}: {}", loaded_account.address, e);
            }
        }
    }
}

/// Best-effort durable-nonce advance: if a *writable* loaded account is an
/// initialized nonce account *and* one of the transaction's signers matches its
/// stored authority, advance it to the transaction's recent blockhash. A nonce
/// account merely referenced read-only, or whose authority did not sign, is left
/// untouched — advancing it would let an unrelated transaction invalidate someone
/// else's durable nonce. Failures here are not fatal to the transaction.
fn advance_nonce_if_present(
    accounts: &mut HashMap<PublicKey, Account>,
    writable: &HashSet<PublicKey>,
    signers: &HashSet<PublicKey>,
    recent_blockhash: &validator_sdk::Hash,
    fee: Lamports,
) -> Option<(PublicKey, Account)> {
    let nonce_address = accounts
        .iter()
        .find(|(address, account)| writable.contains(*address) && NonceInfo::is_nonce_account(account))
        .map(|(address, _)| *address)?;

    let account = accounts.get(&nonce_address)?.clone();
    let mut nonce = NonceInfo::from_account(account).ok()?;
    let authority = nonce.data()?.authority;
    if !signers.contains(&authority) {
        return None;
    }
    if nonce.advance(*recent_blockhash, fee).is_ok() {
        let advanced = nonce.into_account();
        accounts.insert(nonce_address, advanced.clone());
        Some((nonce_address, advanced))
    } else {
        let original = nonce.into_account();
        Some((nonce_address, original))
    }
}

fn classify_load_failure(result: TransactionLoadResult, metrics: &mut TransactionErrorMetrics) {
    let kind = match result {
        TransactionLoadResult::AccountNotFound(_) => ErrorKind::AccountNotFound,
        TransactionLoadResult::InsufficientFunds => ErrorKind::InsufficientFundsForFee,
        TransactionLoadResult::InvalidAccountForFee => ErrorKind::InvalidAccountForFee,
        TransactionLoadResult::DuplicateInstruction => ErrorKind::DuplicateInstruction,
        TransactionLoadResult::MaxLoadedAccountsDataSizeExceeded => {
            ErrorKind::MaxLoadedAccountsDataSizeExceeded
        }
        TransactionLoadResult::Success => return,
    };
    metrics.classify(kind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svm::engine::NoopEngine;
    use crate::svm::nonce::NONCE_ACCOUNT_SIZE;
    use validator_sdk::{CompiledInstruction, Hash, Message, SYSTEM_PROGRAM_ID};

    fn simple_message(fee_payer: PublicKey, other: PublicKey) -> Message {
        Message {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 0,
            account_keys: vec![fee_payer, other],
            recent_blockhash: validator_sdk::Hash::default(),
            instructions: vec![CompiledInstruction {
                program_id_index: 0,
                accounts: vec![0, 1],
                data: vec![],
            }],
        }
    }

    #[test]
    fn successful_noop_execution_charges_only_the_fee() {
        let store = AccountStore::new();
        let fee_payer = PublicKey::new_rand();
        let other = PublicKey::new_rand();
        store
            .create_account(Account::new(fee_payer, SYSTEM_PROGRAM_ID, 1_000, vec![]))
            .unwrap();
        store
            .create_account(Account::new(other, SYSTEM_PROGRAM_ID, 0, vec![]))
            .unwrap();
        store.commit_changes();

        let message = simple_message(fee_payer, other);
        let tx = Transaction::new(message, vec![validator_sdk::Signature::default()]);

        let engine = NoopEngine;
        let pipeline = TransactionPipeline::new(&engine, RentCalculator::default());
        let mut metrics = TransactionErrorMetrics::default();
        let result = pipeline.process_transaction(&tx, &store, 0, 10, 0, &mut metrics);

        assert!(result.is_success());
        assert!(result.balances.is_balanced(10));
        store.commit_changes();
        assert_eq!(store.get_account(&fee_payer).unwrap().lamports, 990);
    }

    #[test]
    fn nonce_account_untouched_when_its_authority_did_not_sign() {
        let store = AccountStore::new();
        let fee_payer = PublicKey::new_rand();
        let authority = PublicKey::new_rand();
        let nonce_address = PublicKey::new_rand();
        store
            .create_account(Account::new(fee_payer, SYSTEM_PROGRAM_ID, 1_000, vec![]))
            .unwrap();

        let mut nonce = NonceInfo::from_account(Account::new(
            nonce_address,
            SYSTEM_PROGRAM_ID,
            1_000_000,
            vec![0u8; NONCE_ACCOUNT_SIZE],
        ))
        .unwrap();
        let original_blockhash = Hash::hash(b"original");
        nonce.initialize(authority, original_blockhash, 5_000).unwrap();
        store.create_account(nonce.into_account()).unwrap();
        store.commit_changes();

        // `fee_payer` is the only signer; `nonce_address` is writable but its
        // authority never signed this transaction.
        let mut message = simple_message(fee_payer, nonce_address);
        message.recent_blockhash = Hash::hash(b"new");
        let tx = Transaction::new(message, vec![validator_sdk::Signature::default()]);

        let engine = NoopEngine;
        let pipeline = TransactionPipeline::new(&engine, RentCalculator::default());
        let mut metrics = TransactionErrorMetrics::default();
        pipeline.process_transaction(&tx, &store, 0, 10, 0, &mut metrics);
        store.commit_changes();

        let stored = NonceInfo::from_account(store.get_account(&nonce_address).unwrap()).unwrap();
        assert_eq!(stored.data().unwrap().blockhash, original_blockhash);
    }

    #[test]
    fn missing_account_is_classified_without_mutating_state() {
        let store = AccountStore::new();
        let fee_payer = PublicKey::new_rand();
        let missing = PublicKey::new_rand();

        let message = simple_message(fee_payer, missing);
        let tx = Transaction::new(message, vec![validator_sdk::Signature::default()]);

        let engine = NoopEngine;
        let pipeline = TransactionPipeline::new(&engine, RentCalculator::default());
        let mut metrics = TransactionErrorMetrics::default();
        let result = pipeline.process_transaction(&tx, &store, 0, 10, 0, &mut metrics);

        assert!(!result.is_success());
        assert_eq!(metrics.account_not_found, 1);
    }
}
