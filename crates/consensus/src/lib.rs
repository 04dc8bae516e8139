//! Fork choice, block validation, staking views, and the validator core
//! orchestrator (C5, C6).

pub mod block_validator;
pub mod fork_choice;
pub mod orchestrator;
pub mod snapshot;
pub mod stake;

pub use block_validator::{BlockValidationError, BlockValidator};
pub use fork_choice::ForkChoice;
pub use orchestrator::{OrchestratorError, ValidatorCore, ValidatorState};
pub use snapshot::{SnapshotError, SnapshotMetadata};
pub use stake::{StakeAccount, StakeView, StaticStakeView, ValidatorStakeInfo};
