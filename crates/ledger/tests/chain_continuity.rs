use validator_ledger::{LedgerError, LedgerStore};
use validator_sdk::{Block, Hash, PublicKey};

fn block(parent: Hash, slot: u64) -> Block {
    Block::new_unsigned(parent, slot, vec![], 1_000 + slot, PublicKey::new_rand())
}

#[test]
fn broken_chain_is_rejected_and_head_tracks_longest_valid_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::open(dir.path()).unwrap();

    let genesis = block(Hash::default(), 0);
    let genesis_hash = genesis.block_hash;
    store.store_block(genesis).unwrap();

    let b1 = block(genesis_hash, 1);
    let b1_hash = b1.block_hash;
    store.store_block(b1).unwrap();

    let orphan = block(Hash::hash(b"nonexistent-parent"), 3);
    let orphan_parent = orphan.parent_hash;
    match store.store_block(orphan) {
        Err(LedgerError::BrokenChain(parent)) => assert_eq!(parent, orphan_parent),
        other => panic!("expected BrokenChain, got {:?}", other),
    }

    assert_eq!(store.get_latest_slot(), 1);
    assert_eq!(store.get_latest_block_hash(), b1_hash);

    let chain = store.get_block_chain(&b1_hash, 10);
    assert_eq!(chain, vec![b1_hash, genesis_hash]);
}

#[test]
fn get_block_chain_respects_count_and_stops_at_genesis() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::open(dir.path()).unwrap();

    let genesis = block(Hash::default(), 0);
    let genesis_hash = genesis.block_hash;
    store.store_block(genesis).unwrap();

    let mut parent = genesis_hash;
    for slot in 1..=5u64 {
        let b = block(parent, slot);
        parent = b.block_hash;
        store.store_block(b).unwrap();
    }

    assert_eq!(store.get_block_chain(&parent, 0).len(), 0);
    assert_eq!(store.get_block_chain(&parent, 3).len(), 3);
    assert_eq!(store.get_block_chain(&parent, 100).len(), 6);
}

#[test]
fn duplicate_block_hash_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::open(dir.path()).unwrap();

    let genesis = block(Hash::default(), 0);
    store.store_block(genesis.clone()).unwrap();

    match store.store_block(genesis) {
        Err(LedgerError::DuplicateHash(_)) => {}
        other => panic!("expected DuplicateHash, got {:?}", other),
    }
}

#[test]
fn reopening_store_rebuilds_state_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let genesis_hash;
    let b1_hash;
    {
        let store = LedgerStore::open(dir.path()).unwrap();
        let genesis = block(Hash::default(), 0);
        genesis_hash = genesis.block_hash;
        store.store_block(genesis).unwrap();
        let b1 = block(genesis_hash, 1);
        b1_hash = b1.block_hash;
        store.store_block(b1).unwrap();
    }

    let reopened = LedgerStore::open(dir.path()).unwrap();
    assert_eq!(reopened.get_latest_slot(), 1);
    assert_eq!(reopened.get_latest_block_hash(), b1_hash);
    assert!(reopened.get_block(&genesis_hash).is_some());
    assert!(reopened.is_chain_consistent());
}

#[test]
fn compact_ledger_prunes_blocks_off_the_canonical_chain() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::open(dir.path()).unwrap();

    let genesis = block(Hash::default(), 0);
    let genesis_hash = genesis.block_hash;
    store.store_block(genesis).unwrap();

    // Two competing children of genesis at the same slot; only the second call's
    // write wins the slot_index entry for slot 1, so the first becomes prunable.
    let fork_a = block(genesis_hash, 1);
    let fork_a_hash = fork_a.block_hash;
    store.store_block(fork_a).unwrap();

    let fork_b = block(genesis_hash, 1);
    store.store_block(fork_b).unwrap();

    let pruned = store.compact_ledger().unwrap();
    assert_eq!(pruned, 1);
    assert!(store.get_block(&fork_a_hash).is_none() || store.get_latest_block_hash() != fork_a_hash);
}
