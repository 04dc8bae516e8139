//! Persistent block/transaction index with chain-continuity enforcement.
//!
//! Follows a fixed on-disk layout: a `blocks/` directory of one length-prefixed,
//! bincode-encoded `Block` per file named by the hex block hash, and a `slot_index`
//! file of sorted 40-byte `(slot, hash)` records. This is a deliberately simpler
//! persistence scheme than a RocksDB column-family store — the file layout here is
//! fixed by design, so there is no column-family space to use; the in-memory indices
//! and the `Database`-holds-an-`Arc`-backend shape follow the same spirit.

use byteorder::{BigEndian, ByteOrder};
use log::{error, info, warn};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use validator_sdk::{Block, Hash, Slot, Transaction};

use crate::error::{LedgerError, Result};

const SLOT_INDEX_RECORD_LEN: usize = 40; // 8 (slot) + 32 (hash)

struct Inner {
    blocks_by_hash: HashMap<Hash, Block>,
    slot_index: std::collections::BTreeMap<Slot, Hash>,
    tx_index: HashMap<Hash, Vec<Hash>>, // tx hash -> block hashes containing it
    head_slot: Slot,
    head_hash: Hash,
}

/// The ledger store: a mapping `block_hash -> Block` plus a `slot -> block_hash`
/// index, backed by the `blocks/`/`slot_index` on-disk layout.
pub struct LedgerStore {
    path: PathBuf,
    inner: RwLock<Inner>,
}

impl LedgerStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(path.join("blocks"))?;

        let mut inner = Inner {
            blocks_by_hash: HashMap::new(),
            slot_index: std::collections::BTreeMap::new(),
            tx_index: HashMap::new(),
            head_slot: 0,
            head_hash: Hash::default(),
        };

        Self::load_blocks(&path, &mut inner)?;
        Self::load_or_rebuild_slot_index(&path, &mut inner)?;
        Self::recompute_head(&mut inner);

        Ok(Self {
            path,
            inner: RwLock::new(inner),
        })
    }

    fn block_path(path: &Path, hash: &Hash) -> PathBuf {
        path.join("blocks").join(hex_encode(hash.as_bytes()))
    }

    fn slot_index_path(path: &Path) -> PathBuf {
        path.join("slot_index")
    }

    fn load_blocks(path: &Path, inner: &mut Inner) -> Result<()> {
        let dir = path.join("blocks");
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let bytes = fs::read(entry.path())?;
            if bytes.len() < 4 {
                warn!("skipping truncated ledger file {:?}", entry.path());
                continue;
            }
            let len = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
            let block: Block = bincode::deserialize(&bytes[4..4 + len])?;
            inner
                .tx_index
                .entry(block.block_hash)
                .or_default();
            for tx in &block.transactions {
                inner.tx_index.entry(tx.hash).or_default().push(block.block_hash);
            }
            inner.blocks_by_hash.insert(block.block_hash, block);
        }
        Ok(())
    }

    fn load_or_rebuild_slot_index(path: &Path, inner: &mut Inner) -> Result<()> {
        let index_path = Self::slot_index_path(path);
        let rebuild = match fs::read(&index_path) {
            Ok(bytes) => bytes.len() % SLOT_INDEX_RECORD_LEN != 0
                || bytes.len() / SLOT_INDEX_RECORD_LEN != inner.blocks_by_hash.len(),
            Err(_) => true,
        };

        if rebuild {
            info!("slot_index missing or inconsistent, rebuilding from blocks/");
            inner.slot_index.clear();
            for block in inner.blocks_by_hash.values() {
                inner.slot_index.insert(block.slot, block.block_hash);
            }
            Self::persist_slot_index(path, inner)?;
        } else {
            let bytes = fs::read(&index_path)?;
            inner.slot_index.clear();
            for chunk in bytes.chunks(SLOT_INDEX_RECORD_LEN) {
                let slot = BigEndian::read_u64(&chunk[0..8]);
                let mut hash_bytes = [0u8; 32];
                hash_bytes.copy_from_slice(&chunk[8..40]);
                inner.slot_index.insert(slot, Hash::new(hash_bytes));
            }
        }
        Ok(())
    }

    fn persist_slot_index(path: &Path, inner: &Inner) -> Result<()> {
        let mut bytes = Vec::with_capacity(inner.slot_index.len() * SLOT_INDEX_RECORD_LEN);
        for (slot, hash) in inner.slot_index.iter() {
            let mut record = [0u8; SLOT_INDEX_RECORD_LEN];
            BigEndian::write_u64(&mut record[0..8], *slot);
            record[8..40].copy_from_slice(hash.as_bytes());
            bytes.extend_from_slice(&record);
        }
        fs::write(Self::slot_index_path(path), bytes)?;
        Ok(())
    }

    fn persist_block(path: &Path, block: &Block) -> Result<()> {
        let encoded = bincode::serialize(block)?;
        let mut bytes = Vec::with_capacity(4 + encoded.len());
        bytes.extend_from_slice(&(encoded.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&encoded);
        fs::write(Self::block_path(path, &block.block_hash), bytes)?;
        Ok(())
    }

    fn recompute_head(inner: &mut Inner) {
        if let Some((&slot, &hash)) = inner.slot_index.iter().next_back() {
            inner.head_slot = slot;
            inner.head_hash = hash;
        }
    }

    /// Validates and persists a block. Slot 0 may be stored only once;
    /// non-genesis blocks require their parent to already be present.
    pub fn store_block(&self, block: Block) -> Result<()> {
        let mut inner = self.inner.write().unwrap();

        if !block.recompute_and_verify_hash() {
            return Err(LedgerError::InvalidStructure);
        }
        if inner.blocks_by_hash.contains_key(&block.block_hash) {
            return Err(LedgerError::DuplicateHash(block.block_hash));
        }
        if block.slot == 0 {
            if inner.slot_index.contains_key(&0) {
                return Err(LedgerError::DuplicateHash(block.block_hash));
            }
        } else if !inner.blocks_by_hash.contains_key(&block.parent_hash) {
            return Err(LedgerError::BrokenChain(block.parent_hash));
        }

        Self::persist_block(&self.path, &block)?;

        for tx in &block.transactions {
            inner.tx_index.entry(tx.hash).or_default().push(block.block_hash);
        }
        inner.slot_index.insert(block.slot, block.block_hash);
        if block.slot >= inner.head_slot || inner.blocks_by_hash.is_empty() {
            inner.head_slot = block.slot;
            inner.head_hash = block.block_hash;
        }
        inner.blocks_by_hash.insert(block.block_hash, block);

        Self::persist_slot_index(&self.path, &inner)?;
        Ok(())
    }

    pub fn get_block(&self, hash: &Hash) -> Option<Block> {
        self.inner.read().unwrap().blocks_by_hash.get(hash).cloned()
    }

    pub fn get_block_by_slot(&self, slot: Slot) -> Option<Block> {
        let inner = self.inner.read().unwrap();
        let hash = inner.slot_index.get(&slot)?;
        inner.blocks_by_hash.get(hash).cloned()
    }

    pub fn get_latest_block_hash(&self) -> Hash {
        self.inner.read().unwrap().head_hash
    }

    pub fn get_latest_slot(&self) -> Slot {
        self.inner.read().unwrap().head_slot
    }

    /// Walks parent links starting at `from_hash`, returning at most `count` hashes
    /// oldest-last; stops early if a parent is missing from the store.
    pub fn get_block_chain(&self, from_hash: &Hash, count: usize) -> Vec<Hash> {
        let inner = self.inner.read().unwrap();
        let mut result = Vec::new();
        let mut current = *from_hash;
        while result.len() < count {
            match inner.blocks_by_hash.get(&current) {
                Some(block) => {
                    result.push(current);
                    if block.is_genesis() {
                        break;
                    }
                    current = block.parent_hash;
                }
                None => break,
            }
        }
        result
    }

    /// Returns the transaction from the canonical chain if present there, otherwise
    /// the first block known to contain it (reorg scenario).
    pub fn get_transaction(&self, hash: &Hash) -> Option<Transaction> {
        let inner = self.inner.read().unwrap();
        let containing = inner.tx_index.get(hash)?;
        let canonical: HashSet<Hash> = inner.slot_index.values().copied().collect();
        let block_hash = containing
            .iter()
            .find(|h| canonical.contains(h))
            .or_else(|| containing.first())?;
        let block = inner.blocks_by_hash.get(block_hash)?;
        block.transactions.iter().find(|tx| &tx.hash == hash).cloned()
    }

    pub fn get_transactions_by_slot(&self, slot: Slot) -> Vec<Transaction> {
        let inner = self.inner.read().unwrap();
        inner
            .slot_index
            .get(&slot)
            .and_then(|hash| inner.blocks_by_hash.get(hash))
            .map(|block| block.transactions.clone())
            .unwrap_or_default()
    }

    /// O(n) auditing pass: every parent link in the canonical chain must resolve.
    pub fn is_chain_consistent(&self) -> bool {
        let inner = self.inner.read().unwrap();
        for hash in inner.slot_index.values() {
            let Some(block) = inner.blocks_by_hash.get(hash) else {
                return false;
            };
            if block.slot == 0 {
                continue;
            }
            if !inner.blocks_by_hash.contains_key(&block.parent_hash) {
                return false;
            }
        }
        true
    }

    /// Removes blocks unreachable from the head via parent walks; never removes the
    /// head chain.
    pub fn compact_ledger(&self) -> Result<usize> {
        let mut inner = self.inner.write().unwrap();
        let mut reachable = HashSet::new();
        let mut current = inner.head_hash;
        loop {
            let Some(block) = inner.blocks_by_hash.get(&current) else {
                break;
            };
            reachable.insert(current);
            if block.is_genesis() {
                break;
            }
            current = block.parent_hash;
        }

        let to_remove: Vec<Hash> = inner
            .blocks_by_hash
            .keys()
            .filter(|h| !reachable.contains(*h))
            .copied()
            .collect();

        for hash in &to_remove {
            if let Err(e) = fs::remove_file(Self::block_path(&self.path, hash)) {
                error!("failed to remove pruned ledger block {:?}: {}", hash, e);
            }
            inner.blocks_by_hash.remove(hash);
        }
        inner.slot_index.retain(|_, hash| reachable.contains(hash));

        Ok(to_remove.len())
    }

    /// Byte size of the persisted ledger (block files + slot index), an ambient
    /// operability metric surfaced through the RPC system/performance family.
    pub fn get_ledger_size(&self) -> u64 {
        let mut total = 0u64;
        if let Ok(metadata) = fs::metadata(Self::slot_index_path(&self.path)) {
            total += metadata.len();
        }
        if let Ok(dir) = fs::read_dir(self.path.join("blocks")) {
            for entry in dir.flatten() {
                if let Ok(metadata) = entry.metadata() {
                    total += metadata.len();
                }
            }
        }
        total
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
