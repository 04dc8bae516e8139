//! SVM transaction pipeline: account loading, rent, nonce handling, rollback,
//! balance collection, error metrics, and the execution engine capability, composed
//! by `pipeline::TransactionPipeline`.

pub mod balances;
pub mod engine;
pub mod error_metrics;
pub mod loader;
pub mod nonce;
pub mod pipeline;
pub mod rent;
pub mod rollback;

pub use balances::{AccountBalance, BalanceCollector, TransactionBalances};
pub use engine::{ExecutionEngine, ExecutionOutcome, NoopEngine};
pub use error_metrics::{ErrorKind, TransactionErrorMetrics};
pub use loader::{AccountLoader, AccountLoadingCallback, LoadedAccount, LoadedTransaction, TransactionLoadResult};
pub use nonce::{NonceData, NonceError, NonceInfo, NonceState};
pub use pipeline::{PipelineResult, TransactionPipeline};
pub use rent::{RentCalculator, RentCollection, RentConfig};
pub use rollback::RollbackAccounts;
