//! Pre/post balance recording, mirroring
//! `original_source/include/svm/transaction_balances.h`.

use std::collections::HashMap;

use validator_sdk::{Account, Lamports, PublicKey};

const SUSPICIOUS_CHANGE_THRESHOLD: i128 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountBalance {
    pub address: PublicKey,
    pub pre_balance: Lamports,
    pub post_balance: Lamports,
}

impl AccountBalance {
    pub fn balance_change(&self) -> i128 {
        self.post_balance as i128 - self.pre_balance as i128
    }

    pub fn has_changed(&self) -> bool {
        self.pre_balance != self.post_balance
    }
}

/// Recorded pre/post balances for a single transaction's declared account list.
#[derive(Debug, Default)]
pub struct TransactionBalances {
    pre_balances: HashMap<PublicKey, Lamports>,
    post_balances: HashMap<PublicKey, Lamports>,
}

impl TransactionBalances {
    pub fn record_pre_balances(&mut self, addresses: &[PublicKey], accounts: &HashMap<PublicKey, Account>) {
        for address in addresses {
            let balance = accounts.get(address).map(|a| a.lamports).unwrap_or(0);
            self.pre_balances.insert(*address, balance);
        }
    }

    pub fn record_post_balances(&mut self, addresses: &[PublicKey], accounts: &HashMap<PublicKey, Account>) {
        for address in addresses {
            let balance = accounts.get(address).map(|a| a.lamports).unwrap_or(0);
            self.post_balances.insert(*address, balance);
        }
    }

    pub fn balances(&self) -> Vec<AccountBalance> {
        let mut result = Vec::new();
        for (address, pre) in &self.pre_balances {
            let post = self.post_balances.get(address).copied().unwrap_or(*pre);
            result.push(AccountBalance {
                address: *address,
                pre_balance: *pre,
                post_balance: post,
            });
        }
        result
    }

    pub fn changed_balances(&self) -> Vec<AccountBalance> {
        self.balances().into_iter().filter(|b| b.has_changed()).collect()
    }

    pub fn total_balance_change(&self) -> i128 {
        self.balances().iter().map(|b| b.balance_change()).sum()
    }

    /// A transaction is balanced if the net lamport change across all tracked
    /// accounts equals zero once the fee paid is added back in.
    pub fn is_balanced(&self, fee: Lamports) -> bool {
        self.total_balance_change() + fee as i128 == 0
    }

    pub fn is_complete(&self) -> bool {
        !self.pre_balances.is_empty() && !self.post_balances.is_empty()
    }

    pub fn suspicious_changes(&self) -> Vec<AccountBalance> {
        self.balances()
            .into_iter()
            .filter(|b| {
                b.balance_change().abs() > SUSPICIOUS_CHANGE_THRESHOLD
                    || (b.pre_balance > 0 && b.post_balance == 0)
            })
            .collect()
    }
}

/// Aggregates `TransactionBalances` across many transactions in a block.
#[derive(Debug, Default)]
pub struct BalanceCollector {
    all_balances: Vec<TransactionBalances>,
}

impl BalanceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, balances: TransactionBalances) {
        self.all_balances.push(balances);
    }

    pub fn all_balances(&self) -> &[TransactionBalances] {
        &self.all_balances
    }

    pub fn transaction_count(&self) -> usize {
        self.all_balances.len()
    }

    pub fn has_unbalanced_transactions(&self, fees: &[Lamports]) -> bool {
        self.all_balances.iter().enumerate().any(|(i, balances)| {
            let fee = fees.get(i).copied().unwrap_or(0);
            !balances.is_balanced(fee)
        })
    }

    pub fn reset(&mut self) {
        self.all_balances.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator_sdk::SYSTEM_PROGRAM_ID;

    #[test]
    fn balanced_transfer_nets_to_zero_after_fee() {
        let sender = PublicKey::new_rand();
        let receiver = PublicKey::new_rand();
        let mut pre = HashMap::new();
        pre.insert(sender, Account::new(sender, SYSTEM_PROGRAM_ID, 1_000, vec![]));
        pre.insert(receiver, Account::new(receiver, SYSTEM_PROGRAM_ID, 0, vec![]));

        let mut post = HashMap::new();
        post.insert(sender, Account::new(sender, SYSTEM_PROGRAM_ID, 895, vec![]));
        post.insert(receiver, Account::new(receiver, SYSTEM_PROGRAM_ID, 100, vec![]));

        let mut balances = TransactionBalances::default();
        balances.record_pre_balances(&[sender, receiver], &pre);
        balances.record_post_balances(&[sender, receiver], &post);

        assert!(balances.is_balanced(5));
    }

    #[test]
    fn unbalanced_transaction_is_flagged() {
        let addr = PublicKey::new_rand();
        let mut pre = HashMap::new();
        pre.insert(addr, Account::new(addr, SYSTEM_PROGRAM_ID, 1_000, vec![]));
        let mut post = HashMap::new();
        post.insert(addr, Account::new(addr, SYSTEM_PROGRAM_ID, 1_000_000, vec![]));

        let mut balances = TransactionBalances::default();
        balances.record_pre_balances(&[addr], &pre);
        balances.record_post_balances(&[addr], &post);

        assert!(!balances.is_balanced(0));

        let mut collector = BalanceCollector::new();
        collector.push(balances);
        assert!(collector.has_unbalanced_transactions(&[0]));
    }

    #[test]
    fn drained_account_is_suspicious() {
        let addr = PublicKey::new_rand();
        let mut pre = HashMap::new();
        pre.insert(addr, Account::new(addr, SYSTEM_PROGRAM_ID, 500, vec![]));
        let mut post = HashMap::new();
        post.insert(addr, Account::new(addr, SYSTEM_PROGRAM_ID, 0, vec![]));

        let mut balances = TransactionBalances::default();
        balances.record_pre_balances(&[addr], &pre);
        balances.record_post_balances(&[addr], &post);

        assert_eq!(balances.suspicious_changes().len(), 1);
    }
}
