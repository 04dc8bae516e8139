//! Transaction error counters, mirroring
//! `original_source/include/svm/transaction_error_metrics.h`. Field set is trimmed to
//! the kinds this pipeline actually raises; the original's program-cache and
//! compute-budget counters have no producer in this crate and are dropped.

/// The classified outcome kinds the pipeline can raise; `classify` maps any of these
/// (or an unrecognized string, via `InstructionError`) onto a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AccountNotFound,
    InvalidAccountForFee,
    InvalidAccountIndex,
    AccountInUse,
    DuplicateInstruction,
    InsufficientFunds,
    InsufficientFundsForFee,
    InsufficientFundsForRent,
    InstructionError,
    BlockhashNotFound,
    InvalidNonce,
    MaxLoadedAccountsDataSizeExceeded,
    TooManyAccountLocks,
    MissingSignatureForFee,
    SignatureFailure,
    UnbalancedTransaction,
    InvalidWritableAccount,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionErrorMetrics {
    pub account_not_found: u64,
    pub invalid_account_for_fee: u64,
    pub invalid_account_index: u64,
    pub account_in_use: u64,
    pub duplicate_instruction: u64,
    pub insufficient_funds: u64,
    pub insufficient_funds_for_fee: u64,
    pub insufficient_funds_for_rent: u64,
    pub instruction_error: u64,
    pub blockhash_not_found: u64,
    pub invalid_nonce: u64,
    pub max_loaded_accounts_data_size_exceeded: u64,
    pub too_many_account_locks: u64,
    pub missing_signature_for_fee: u64,
    pub signature_failure: u64,
    pub unbalanced_transaction: u64,
    pub invalid_writable_account: u64,
}

impl TransactionErrorMetrics {
    pub fn total(&self) -> u64 {
        self.account_not_found
            + self.invalid_account_for_fee
            + self.invalid_account_index
            + self.account_in_use
            + self.duplicate_instruction
            + self.insufficient_funds
            + self.insufficient_funds_for_fee
            + self.insufficient_funds_for_rent
            + self.instruction_error
            + self.blockhash_not_found
            + self.invalid_nonce
            + self.max_loaded_accounts_data_size_exceeded
            + self.too_many_account_locks
            + self.missing_signature_for_fee
            + self.signature_failure
            + self.unbalanced_transaction
            + self.invalid_writable_account
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn add(&mut self, other: &Self) {
        self.account_not_found += other.account_not_found;
        self.invalid_account_for_fee += other.invalid_account_for_fee;
        self.invalid_account_index += other.invalid_account_index;
        self.account_in_use += other.account_in_use;
        self.duplicate_instruction += other.duplicate_instruction;
        self.insufficient_funds += other.insufficient_funds;
        self.insufficient_funds_for_fee += other.insufficient_funds_for_fee;
        self.insufficient_funds_for_rent += other.insufficient_funds_for_rent;
        self.instruction_error += other.instruction_error;
        self.blockhash_not_found += other.blockhash_not_found;
        self.invalid_nonce += other.invalid_nonce;
        self.max_loaded_accounts_data_size_exceeded += other.max_loaded_accounts_data_size_exceeded;
        self.too_many_account_locks += other.too_many_account_locks;
        self.missing_signature_for_fee += other.missing_signature_for_fee;
        self.signature_failure += other.signature_failure;
        self.unbalanced_transaction += other.unbalanced_transaction;
        self.invalid_writable_account += other.invalid_writable_account;
    }

    pub fn error_rate(&self, total_transactions: u64) -> f64 {
        if total_transactions == 0 {
            return 0.0;
        }
        self.total() as f64 / total_transactions as f64
    }

    pub fn most_common(&self) -> Option<ErrorKind> {
        let counted = [
            (ErrorKind::AccountNotFound, self.account_not_found),
            (ErrorKind::InvalidAccountForFee, self.invalid_account_for_fee),
            (ErrorKind::InvalidAccountIndex, self.invalid_account_index),
            (ErrorKind::AccountInUse, self.account_in_use),
            (ErrorKind::DuplicateInstruction, self.duplicate_instruction),
            (ErrorKind::InsufficientFunds, self.insufficient_funds),
            (ErrorKind::InsufficientFundsForFee, self.insufficient_funds_for_fee),
            (ErrorKind::InsufficientFundsForRent, self.insufficient_funds_for_rent),
            (ErrorKind::InstructionError, self.instruction_error),
            (ErrorKind::BlockhashNotFound, self.blockhash_not_found),
            (ErrorKind::InvalidNonce, self.invalid_nonce),
            (
                ErrorKind::MaxLoadedAccountsDataSizeExceeded,
                self.max_loaded_accounts_data_size_exceeded,
            ),
            (ErrorKind::TooManyAccountLocks, self.too_many_account_locks),
            (ErrorKind::MissingSignatureForFee, self.missing_signature_for_fee),
            (ErrorKind::SignatureFailure, self.signature_failure),
            (ErrorKind::UnbalancedTransaction, self.unbalanced_transaction),
            (ErrorKind::InvalidWritableAccount, self.invalid_writable_account),
        ];
        counted
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .max_by_key(|(_, count)| *count)
            .map(|(kind, _)| kind)
    }

    /// Total classification function: any kind not explicitly matched falls to
    /// `instruction_error`, mirroring the original's catch-all behavior.
    pub fn classify(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::AccountNotFound => self.account_not_found += 1,
            ErrorKind::InvalidAccountForFee => self.invalid_account_for_fee += 1,
            ErrorKind::InvalidAccountIndex => self.invalid_account_index += 1,
            ErrorKind::AccountInUse => self.account_in_use += 1,
            ErrorKind::DuplicateInstruction => self.duplicate_instruction += 1,
            ErrorKind::InsufficientFunds => self.insufficient_funds += 1,
            ErrorKind::InsufficientFundsForFee => self.insufficient_funds_for_fee += 1,
            ErrorKind::InsufficientFundsForRent => self.insufficient_funds_for_rent += 1,
            ErrorKind::BlockhashNotFound => self.blockhash_not_found += 1,
            ErrorKind::InvalidNonce => self.invalid_nonce += 1,
            ErrorKind::MaxLoadedAccountsDataSizeExceeded => {
                self.max_loaded_accounts_data_size_exceeded += 1
            }
            ErrorKind::TooManyAccountLocks => self.too_many_account_locks += 1,
            ErrorKind::MissingSignatureForFee => self.missing_signature_for_fee += 1,
            ErrorKind::SignatureFailure => self.signature_failure += 1,
            ErrorKind::UnbalancedTransaction => self.unbalanced_transaction += 1,
            ErrorKind::InvalidWritableAccount => self.invalid_writable_account += 1,
            ErrorKind::InstructionError => self.instruction_error += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_total_and_total_sums_all_fields() {
        let mut metrics = TransactionErrorMetrics::default();
        metrics.classify(ErrorKind::AccountNotFound);
        metrics.classify(ErrorKind::AccountNotFound);
        metrics.classify(ErrorKind::InstructionError);
        assert_eq!(metrics.total(), 3);
        assert_eq!(metrics.most_common(), Some(ErrorKind::AccountNotFound));
    }

    #[test]
    fn add_accumulates_element_wise() {
        let mut a = TransactionErrorMetrics::default();
        a.classify(ErrorKind::AccountNotFound);
        let mut b = TransactionErrorMetrics::default();
        b.classify(ErrorKind::AccountNotFound);
        b.classify(ErrorKind::SignatureFailure);
        a.add(&b);
        assert_eq!(a.account_not_found, 2);
        assert_eq!(a.signature_failure, 1);
    }

    #[test]
    fn error_rate_handles_zero_transactions() {
        let metrics = TransactionErrorMetrics::default();
        assert_eq!(metrics.error_rate(0), 0.0);
    }
}
