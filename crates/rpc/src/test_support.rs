//! Test-only fixture: a fully wired `RpcContext` over a throwaway ledger directory.

use std::sync::{Arc, RwLock};

use validator_consensus::{StaticStakeView, ValidatorCore};
use validator_ledger::LedgerStore;
use validator_net::SubscriptionRegistry;
use validator_runtime::AccountStore;
use validator_sdk::{Block, Hash, Keypair};

use crate::context::RpcContext;

pub struct TestFixture {
    _dir: tempfile::TempDir,
    pub ctx: RpcContext,
}

impl std::ops::Deref for TestFixture {
    type Target = RpcContext;
    fn deref(&self) -> &RpcContext {
        &self.ctx
    }
}

pub fn test_context() -> TestFixture {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(LedgerStore::open(dir.path()).unwrap());
    let keypair = Keypair::generate();
    let mut genesis = Block::new_unsigned(Hash::default(), 0, vec![], 0, keypair.public_key());
    genesis.producer_signature = keypair.sign(genesis.block_hash.as_bytes());
    let genesis_hash = genesis.block_hash;
    ledger.store_block(genesis).unwrap();

    let accounts = Arc::new(AccountStore::new());
    let core = ValidatorCore::initialize(
        ledger.clone(),
        accounts.clone(),
        keypair.public_key(),
        Arc::new(StaticStakeView::new()),
    );

    let ctx = RpcContext::new(
        Arc::new(RwLock::new(core)),
        ledger,
        accounts,
        Arc::new(SubscriptionRegistry::new()),
        genesis_hash,
        keypair.public_key(),
    );
    TestFixture { _dir: dir, ctx }
}
