//! Account store and SVM transaction pipeline (C3, C4).

pub mod error;
pub mod store;
pub mod svm;

pub use error::{AccountStoreError, Result};
pub use store::AccountStore;
