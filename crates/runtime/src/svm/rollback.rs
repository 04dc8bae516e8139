//! Pre-execution account snapshot used to undo a failed transaction, mirroring
//! `original_source/include/svm/rollback_accounts.h`.

use std::collections::HashMap;

use validator_sdk::{Account, Epoch, Lamports, PublicKey};

use super::nonce::NonceData;

#[derive(Debug, Clone)]
pub struct RollbackAccounts {
    pub nonce_account: Option<(PublicKey, Account)>,
    pub fee_payer_address: PublicKey,
    pub fee_payer_rollback_account: Account,
    pub fee_payer_rent_epoch: Epoch,
}

impl RollbackAccounts {
    pub fn new(
        nonce_account: Option<(PublicKey, Account)>,
        fee_payer_address: PublicKey,
        fee_payer_rollback_account: Account,
        fee_payer_rent_epoch: Epoch,
    ) -> Self {
        Self {
            nonce_account,
            fee_payer_address,
            fee_payer_rollback_account,
            fee_payer_rent_epoch,
        }
    }

    pub fn has_nonce_account(&self) -> bool {
        self.nonce_account.is_some()
    }

    /// Builds a rollback for a transaction that only paid its fee before failing: the
    /// fee payer is restored to its pre-transaction balance minus the fee.
    pub fn create_fee_only_rollback(
        fee_payer_address: PublicKey,
        fee_payer_account: Account,
        fee_amount: Lamports,
    ) -> Self {
        let mut rollback_account = fee_payer_account.clone();
        rollback_account.lamports = fee_payer_account.lamports.saturating_sub(fee_amount);
        let rent_epoch = fee_payer_account.rent_epoch;
        Self {
            nonce_account: None,
            fee_payer_address,
            fee_payer_rollback_account: rollback_account,
            fee_payer_rent_epoch: rent_epoch,
        }
    }

    /// Restores the fee payer (and nonce account, if any) to their snapshot state.
    pub fn apply_rollback(&self, accounts: &mut HashMap<PublicKey, Account>) {
        let mut restored = self.fee_payer_rollback_account.clone();
        restored.rent_epoch = self.fee_payer_rent_epoch;
        accounts.insert(self.fee_payer_address, restored);

        if let Some((address, account)) = &self.nonce_account {
            accounts.insert(*address, account.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fee_payer_rollback_account.lamports == 0 && self.nonce_account.is_none()
    }
}

/// Builds a rollback set from a pre-execution snapshot, recording the nonce account's
/// advanced state if one is in use.
pub fn rollback_from_snapshot(
    fee_payer_address: PublicKey,
    fee_payer_snapshot: Account,
    fee_payer_rent_epoch: Epoch,
    nonce_snapshot: Option<(PublicKey, Account, NonceData)>,
) -> RollbackAccounts {
    let nonce_account = nonce_snapshot.map(|(address, account, _)| (address, account));
    RollbackAccounts::new(nonce_account, fee_payer_address, fee_payer_snapshot, fee_payer_rent_epoch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator_sdk::SYSTEM_PROGRAM_ID;

    #[test]
    fn fee_only_rollback_deducts_fee_from_snapshot() {
        let fee_payer = PublicKey::new_rand();
        let account = Account::new(fee_payer, SYSTEM_PROGRAM_ID, 1_000, vec![]);
        let rollback = RollbackAccounts::create_fee_only_rollback(fee_payer, account, 100);
        assert_eq!(rollback.fee_payer_rollback_account.lamports, 900);
        assert!(!rollback.has_nonce_account());
    }

    #[test]
    fn apply_rollback_restores_fee_payer_and_nonce() {
        let fee_payer = PublicKey::new_rand();
        let nonce_address = PublicKey::new_rand();
        let snapshot_account = Account::new(fee_payer, SYSTEM_PROGRAM_ID, 500, vec![]);
        let nonce_snapshot = Account::new(nonce_address, SYSTEM_PROGRAM_ID, 10, vec![0; 80]);

        let rollback = RollbackAccounts::new(
            Some((nonce_address, nonce_snapshot.clone())),
            fee_payer,
            snapshot_account.clone(),
            3,
        );

        let mut accounts = HashMap::new();
        accounts.insert(fee_payer, Account::new(fee_payer, SYSTEM_PROGRAM_ID, 1, vec![]));
        accounts.insert(nonce_address, Account::new(nonce_address, SYSTEM_PROGRAM_ID, 999, vec![0; 80]));

        rollback.apply_rollback(&mut accounts);

        assert_eq!(accounts[&fee_payer].lamports, 500);
        assert_eq!(accounts[&fee_payer].rent_epoch, 3);
        assert_eq!(accounts[&nonce_address].lamports, 10);
    }
}
