//! Fork choice, mirroring `original_source/include/validator/core.h`'s
//! `ForkChoice` — maintains the set of seen blocks, accumulated vote weight, and the
//! current head under the (weight, slot, hash) tie-break rule.

use std::collections::{HashMap, HashSet};

use validator_sdk::{Block, Hash, Lamports, Slot, Vote};

use crate::stake::StakeView;

#[derive(Debug, Clone, Copy)]
struct BlockMeta {
    parent_hash: Hash,
    slot: Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Weight(u128, Slot, Hash);

pub struct ForkChoice {
    blocks: HashMap<Hash, BlockMeta>,
    children: HashMap<Hash, HashSet<Hash>>,
    vote_weight: HashMap<Hash, u128>,
    head: Option<Hash>,
}

impl Default for ForkChoice {
    fn default() -> Self {
        Self::new()
    }
}

impl ForkChoice {
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
            children: HashMap::new(),
            vote_weight: HashMap::new(),
            head: None,
        }
    }

    fn weight_of(&self, hash: &Hash) -> Weight {
        let accumulated = self.vote_weight.get(hash).copied().unwrap_or(0);
        let slot = self.blocks.get(hash).map(|m| m.slot).unwrap_or(0);
        Weight(accumulated, slot, *hash)
    }

    /// Replaces the head purely by `(accumulated weight, slot, hash)` comparison —
    /// no lineage/descent check against the current head. A sibling fork with a
    /// higher slot and tied (zero) weight must win over the current head on sight;
    /// gating that on descent-from-current-head would leave an un-voted higher-slot
    /// fork permanently unable to displace a stale head until votes arrive, which
    /// is a liveness problem rather than a safety one this comparison is meant to
    /// avoid.
    fn consider_for_head(&mut self, hash: Hash) {
        let candidate_weight = self.weight_of(&hash);
        let current_is_better = match self.head {
            Some(current) => self.weight_of(&current) >= candidate_weight,
            None => false,
        };
        if !current_is_better {
            self.head = Some(hash);
        }
    }

    pub fn add_block(&mut self, block: &Block) {
        self.blocks.insert(
            block.block_hash,
            BlockMeta {
                parent_hash: block.parent_hash,
                slot: block.slot,
            },
        );
        if !block.is_genesis() {
            self.children.entry(block.parent_hash).or_default().insert(block.block_hash);
        }
        self.consider_for_head(block.block_hash);
    }

    /// Adds a vote's weight to the block it targets; stake is looked up via
    /// `StakeView`, falling back to weight 1 where the validator's stake is unknown.
    pub fn add_vote(&mut self, vote: &Vote, stake_view: &dyn StakeView) {
        let weight: Lamports = stake_view.stake_of(&vote.validator_identity).unwrap_or(1);
        *self.vote_weight.entry(vote.block_hash).or_insert(0) += weight as u128;
        self.consider_for_head(vote.block_hash);
    }

    pub fn get_head(&self) -> Option<Hash> {
        self.head
    }

    /// Installs `hash` as the head unconditionally, with no parent and no accumulated
    /// vote weight, for snapshot import: the imported state has no block history to
    /// weigh, only the slot the snapshot was taken at.
    pub fn set_synthetic_head(&mut self, hash: Hash, slot: Slot) {
        self.blocks.insert(
            hash,
            BlockMeta {
                parent_hash: Hash::default(),
                slot,
            },
        );
        self.head = Some(hash);
    }

    pub fn get_head_slot(&self) -> Slot {
        self.head
            .and_then(|h| self.blocks.get(&h))
            .map(|m| m.slot)
            .unwrap_or(0)
    }

    /// Blocks with no known child: the set of distinct head candidates.
    pub fn forks(&self) -> Vec<Hash> {
        self.blocks
            .keys()
            .filter(|hash| self.children.get(*hash).map(|c| c.is_empty()).unwrap_or(true))
            .copied()
            .collect()
    }

    pub fn fork_weight(&self, hash: &Hash) -> Lamports {
        self.vote_weight.get(hash).copied().unwrap_or(0) as Lamports
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.blocks.contains_key(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator_sdk::PublicKey;

    struct NoStake;
    impl StakeView for NoStake {
        fn stake_of(&self, _validator_identity: &PublicKey) -> Option<Lamports> {
            None
        }
        fn validator_stake_info(&self, _validator_identity: &PublicKey) -> Option<crate::stake::ValidatorStakeInfo> {
            None
        }
    }

    fn block(parent: Hash, slot: u64) -> Block {
        Block::new_unsigned(parent, slot, vec![], slot, PublicKey::new_rand())
    }

    fn vote(block_hash: Hash, slot: u64) -> Vote {
        Vote {
            slot,
            block_hash,
            validator_identity: PublicKey::new_rand(),
            signature: validator_sdk::Signature::default(),
            timestamp: 0,
        }
    }

    #[test]
    fn head_advances_to_higher_slot_with_no_votes() {
        let mut fc = ForkChoice::new();
        let genesis = block(Hash::default(), 0);
        let genesis_hash = genesis.block_hash;
        fc.add_block(&genesis);
        assert_eq!(fc.get_head(), Some(genesis_hash));

        let b1 = block(genesis_hash, 1);
        let b1_hash = b1.block_hash;
        fc.add_block(&b1);
        assert_eq!(fc.get_head(), Some(b1_hash));
        assert_eq!(fc.get_head_slot(), 1);
    }

    #[test]
    fn higher_weight_fork_wins_over_higher_slot() {
        let mut fc = ForkChoice::new();
        let genesis = block(Hash::default(), 0);
        let genesis_hash = genesis.block_hash;
        fc.add_block(&genesis);

        let fork_a = block(genesis_hash, 1);
        let fork_a_hash = fork_a.block_hash;
        fc.add_block(&fork_a);

        let fork_b = block(genesis_hash, 2);
        fc.add_block(&fork_b);
        assert_eq!(fc.get_head(), Some(fork_b.block_hash));

        let stake = NoStake;
        fc.add_vote(&vote(fork_a_hash, 1), &stake);
        fc.add_vote(&vote(fork_a_hash, 1), &stake);
        assert_eq!(fc.get_head(), Some(fork_a_hash));
        assert_eq!(fc.fork_weight(&fork_a_hash), 2);
    }

    #[test]
    fn synthetic_head_overrides_any_prior_weighted_head() {
        let mut fc = ForkChoice::new();
        let genesis = block(Hash::default(), 0);
        fc.add_block(&genesis);

        let fork_a = block(genesis.block_hash, 1);
        fc.add_block(&fork_a);
        let stake = NoStake;
        fc.add_vote(&vote(fork_a.block_hash, 1), &stake);
        assert_eq!(fc.get_head(), Some(fork_a.block_hash));

        let snapshot_hash = Hash::hash(b"synthetic");
        fc.set_synthetic_head(snapshot_hash, 50);
        assert_eq!(fc.get_head(), Some(snapshot_hash));
        assert_eq!(fc.get_head_slot(), 50);
    }

    #[test]
    fn forks_lists_blocks_with_no_children() {
        let mut fc = ForkChoice::new();
        let genesis = block(Hash::default(), 0);
        let genesis_hash = genesis.block_hash;
        fc.add_block(&genesis);
        let b1 = block(genesis_hash, 1);
        let b1_hash = b1.block_hash;
        fc.add_block(&b1);

        let forks = fc.forks();
        assert_eq!(forks, vec![b1_hash]);
    }
}
