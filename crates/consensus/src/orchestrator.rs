//! Validator core orchestrator, mirroring
//! `original_source/include/validator/core.h`'s `ValidatorCore` state machine.

use std::sync::Arc;

use validator_ledger::{LedgerError, LedgerStore};
use validator_runtime::AccountStore;
use validator_sdk::{Block, Hash, PublicKey, Slot, Vote};

use crate::block_validator::BlockValidator;
use crate::fork_choice::ForkChoice;
use crate::snapshot::{self, SnapshotError, SnapshotMetadata};
use crate::stake::StakeView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorState {
    Uninitialized,
    Initialized,
    Running,
    Stopped,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("illegal state transition from {0:?}")]
    IllegalTransition(ValidatorState),
}

pub type BlockCallback = Box<dyn Fn(&Block) + Send + Sync>;
pub type VoteCallback = Box<dyn Fn(&Vote) + Send + Sync>;

pub struct ValidatorCore {
    state: ValidatorState,
    ledger: Arc<LedgerStore>,
    accounts: Arc<AccountStore>,
    fork_choice: ForkChoice,
    stake_view: Arc<dyn StakeView + Send + Sync>,
    validator_identity: PublicKey,
    block_callback: Option<BlockCallback>,
    vote_callback: Option<VoteCallback>,
}

impl ValidatorCore {
    /// Constructs the orchestrator in the `Initialized` state: identity loaded,
    /// ledger and account store wired in, fork choice and the stake view attached.
    pub fn initialize(
        ledger: Arc<LedgerStore>,
        accounts: Arc<AccountStore>,
        validator_identity: PublicKey,
        stake_view: Arc<dyn StakeView + Send + Sync>,
    ) -> Self {
        let mut fork_choice = ForkChoice::new();
        if let Some(genesis) = ledger.get_block_by_slot(0) {
            fork_choice.add_block(&genesis);
        }
        Self {
            state: ValidatorState::Initialized,
            ledger,
            accounts,
            fork_choice,
            stake_view,
            validator_identity,
            block_callback: None,
            vote_callback: None,
        }
    }

    pub fn state(&self) -> ValidatorState {
        self.state
    }

    pub fn validator_identity(&self) -> PublicKey {
        self.validator_identity
    }

    pub fn accounts(&self) -> &Arc<AccountStore> {
        &self.accounts
    }

    pub fn ledger(&self) -> &Arc<LedgerStore> {
        &self.ledger
    }

    pub fn fork_choice(&self) -> &ForkChoice {
        &self.fork_choice
    }

    pub fn stake_view(&self) -> &Arc<dyn StakeView + Send + Sync> {
        &self.stake_view
    }

    pub fn set_block_callback(&mut self, callback: BlockCallback) {
        self.block_callback = Some(callback);
    }

    pub fn set_vote_callback(&mut self, callback: VoteCallback) {
        self.vote_callback = Some(callback);
    }

    pub fn start(&mut self) -> Result<(), OrchestratorError> {
        if self.state != ValidatorState::Initialized {
            return Err(OrchestratorError::IllegalTransition(self.state));
        }
        self.state = ValidatorState::Running;
        log::info!("validator core started, identity={}", self.validator_identity);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), OrchestratorError> {
        if self.state != ValidatorState::Running {
            return Err(OrchestratorError::IllegalTransition(self.state));
        }
        self.state = ValidatorState::Stopped;
        log::info!("validator core stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.state == ValidatorState::Running
    }

    pub fn get_current_slot(&self) -> Slot {
        self.fork_choice.get_head_slot()
    }

    pub fn get_current_head(&self) -> Option<Hash> {
        self.fork_choice.get_head()
    }

    /// Validates, then admits a block into fork choice; commits to the ledger when
    /// the block directly extends the prior head. A `BrokenChain` race (another
    /// writer committed concurrently) is retried once before the block is dropped.
    pub fn process_block(&mut self, block: Block) {
        let validator = BlockValidator::new(&self.ledger);
        if let Err(e) = validator.validate(&block) {
            log::warn!("dropping invalid block at slot {}: {}", block.slot, e);
            return;
        }

        let prior_head = self.fork_choice.get_head();
        let extends_head = match prior_head {
            Some(head) => block.parent_hash == head,
            None => block.is_genesis(),
        };

        self.fork_choice.add_block(&block);

        if extends_head {
            match self.ledger.store_block(block.clone()) {
                Ok(()) => {
                    if let Some(callback) = &self.block_callback {
                        callback(&block);
                    }
                }
                Err(LedgerError::BrokenChain(_)) => match self.ledger.store_block(block.clone()) {
                    Ok(()) => {
                        if let Some(callback) = &self.block_callback {
                            callback(&block);
                        }
                    }
                    Err(e) => log::error!("dropping block at slot {} after retry: {}", block.slot, e),
                },
                Err(e) => log::error!("failed to commit block at slot {}: {}", block.slot, e),
            }
        }
    }

    /// Imports a snapshot artifact: accounts are inserted into the account
    /// store and fork choice's head is set synthetically at the snapshot's slot.
    /// Does not require the orchestrator to be `Running` — this is how a core
    /// bootstraps state before it ever starts processing live blocks.
    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<SnapshotMetadata, SnapshotError> {
        snapshot::import_snapshot(bytes, &self.accounts, &mut self.fork_choice)
    }

    pub fn process_vote(&mut self, vote: Vote) {
        if !vote.verify() {
            log::warn!("dropping vote with invalid signature for slot {}", vote.slot);
            return;
        }
        self.fork_choice.add_vote(&vote, self.stake_view.as_ref());
        if let Some(callback) = &self.vote_callback {
            callback(&vote);
        }
    }
}
