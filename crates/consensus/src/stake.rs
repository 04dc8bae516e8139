//! Read-only staking records, grounded on
//! `original_source/include/staking/manager.h`. Reward/APR computation
//! (`RewardsCalculator`) is out of scope; only the record types and a lookup
//! capability needed by fork choice and the RPC staking family are kept.

use serde::{Deserialize, Serialize};

use validator_sdk::{Epoch, Lamports, PublicKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeAccount {
    pub stake_pubkey: PublicKey,
    pub validator_pubkey: PublicKey,
    pub delegator_pubkey: PublicKey,
    pub stake_amount: Lamports,
    pub activation_epoch: Epoch,
    pub deactivation_epoch: Epoch,
    pub is_active: bool,
}

impl StakeAccount {
    pub fn serialize(&self) -> Vec<u8> {
        bincode::serialize(self).expect("StakeAccount always serializes")
    }

    pub fn deserialize(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorStakeInfo {
    pub validator_identity: PublicKey,
    pub total_stake: Lamports,
    pub self_stake: Lamports,
    pub delegated_stake: Lamports,
    pub commission_rate_bps: u32,
    pub last_vote_epoch: Epoch,
    pub vote_credits: u64,
    pub uptime_percentage: f64,
    pub skip_rate: f64,
}

/// Read-only stake lookup consumed by fork choice's weight calculation and the RPC
/// vote-accounts/stake-activation handlers.
pub trait StakeView {
    fn stake_of(&self, validator_identity: &PublicKey) -> Option<Lamports>;
    fn validator_stake_info(&self, validator_identity: &PublicKey) -> Option<ValidatorStakeInfo>;
}

/// A fixed, in-memory `StakeView` built from a snapshot of stake accounts; this is
/// what a running validator would populate from vote-account state, but the source
/// of that state is out of scope here.
#[derive(Debug, Default)]
pub struct StaticStakeView {
    info: std::collections::HashMap<PublicKey, ValidatorStakeInfo>,
}

impl StaticStakeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: ValidatorStakeInfo) {
        self.info.insert(info.validator_identity, info);
    }
}

impl StakeView for StaticStakeView {
    fn stake_of(&self, validator_identity: &PublicKey) -> Option<Lamports> {
        self.info.get(validator_identity).map(|i| i.total_stake)
    }

    fn validator_stake_info(&self, validator_identity: &PublicKey) -> Option<ValidatorStakeInfo> {
        self.info.get(validator_identity).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stake_account_round_trips_through_bincode() {
        let account = StakeAccount {
            stake_pubkey: PublicKey::new_rand(),
            validator_pubkey: PublicKey::new_rand(),
            delegator_pubkey: PublicKey::new_rand(),
            stake_amount: 1_000,
            activation_epoch: 1,
            deactivation_epoch: u64::MAX,
            is_active: true,
        };
        let bytes = account.serialize();
        assert_eq!(StakeAccount::deserialize(&bytes).unwrap(), account);
    }

    #[test]
    fn unknown_validator_has_no_stake() {
        let view = StaticStakeView::new();
        assert_eq!(view.stake_of(&PublicKey::new_rand()), None);
    }
}
