//! Snapshot artifact import: the core does not discover, download, or extract
//! snapshots — that is a peripheral collaborator's job — it only consumes the bytes
//! of an already-fetched artifact. Simplified from
//! `original_source/include/validator/snapshot.h`'s `SnapshotMetadata`/
//! `AccountSnapshot` down to a fixed wire layout: a length-prefixed metadata record
//! followed by N length-prefixed account records.

use byteorder::{ByteOrder, LittleEndian};

use validator_runtime::AccountStore;
use validator_sdk::{Account, Hash, PublicKey, Slot};

use crate::fork_choice::ForkChoice;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot artifact truncated: needed {needed} more bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },
    #[error("account version string is not valid utf-8")]
    InvalidVersion,
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMetadata {
    pub slot: Slot,
    pub producer_block_hash: Hash,
    pub timestamp: u64,
    pub account_count: u64,
    pub version: String,
    pub is_incremental: bool,
    pub base_slot: Slot,
}

/// One account record as laid out on the wire: pubkey, lamports, data, owner,
/// executable flag, rent epoch, in that order.
struct AccountRecord {
    account: Account,
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.bytes.len() < self.offset + len {
            return Err(SnapshotError::Truncated {
                offset: self.offset,
                needed: self.offset + len - self.bytes.len(),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn take_array32(&mut self) -> Result<[u8; 32]> {
        self.take(32)?.try_into().map_err(|_| SnapshotError::Truncated { offset: self.offset, needed: 32 })
    }

    fn take_u64_le(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    fn take_u32_le(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    fn take_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads the framing length prefix (u32 LE) and returns a sub-reader scoped to
    /// exactly that many following bytes.
    fn take_framed(&mut self) -> Result<Reader<'a>> {
        let len = self.take_u32_le()? as usize;
        let body = self.take(len)?;
        Ok(Reader::new(body))
    }
}

fn parse_metadata(reader: &mut Reader) -> Result<SnapshotMetadata> {
    let slot = reader.take_u64_le()?;
    let producer_block_hash = Hash::new(reader.take_array32()?);
    let timestamp = reader.take_u64_le()?;
    let account_count = reader.take_u64_le()?;
    let version_len = reader.take_u32_le()? as usize;
    let version = std::str::from_utf8(reader.take(version_len)?)
        .map_err(|_| SnapshotError::InvalidVersion)?
        .to_string();
    let is_incremental = reader.take_u8()? != 0;
    let base_slot = reader.take_u64_le()?;
    Ok(SnapshotMetadata {
        slot,
        producer_block_hash,
        timestamp,
        account_count,
        version,
        is_incremental,
        base_slot,
    })
}

fn parse_account_record(reader: &mut Reader) -> Result<AccountRecord> {
    let address = PublicKey::new(reader.take_array32()?);
    let lamports = reader.take_u64_le()?;
    let data_len = reader.take_u32_le()? as usize;
    let data = reader.take(data_len)?.to_vec();
    let owner = PublicKey::new(reader.take_array32()?);
    let executable = reader.take_u8()? != 0;
    let rent_epoch = reader.take_u64_le()?;
    Ok(AccountRecord {
        account: Account {
            address,
            owner,
            lamports,
            data,
            executable,
            rent_epoch,
        },
    })
}

/// Imports a snapshot artifact: inserts every account into `accounts` (overwriting
/// any existing account at the same address) and installs a synthetic head in
/// `fork_choice` at the snapshot's slot. Returns the parsed metadata so the caller
/// can log or report it; does not touch the ledger store, since a snapshot has no
/// block history to replay.
pub fn import_snapshot(bytes: &[u8], accounts: &AccountStore, fork_choice: &mut ForkChoice) -> Result<SnapshotMetadata> {
    let mut reader = Reader::new(bytes);
    let mut metadata_reader = reader.take_framed()?;
    let metadata = parse_metadata(&mut metadata_reader)?;

    for _ in 0..metadata.account_count {
        let mut record_reader = reader.take_framed()?;
        let record = parse_account_record(&mut record_reader)?;
        if accounts.account_exists(&record.account.address) {
            accounts.update_account(record.account).expect("existence just checked");
        } else {
            accounts.create_account(record.account).expect("duplicate just ruled out");
        }
    }
    accounts.commit_changes();

    let synthetic_hash = Hash::hash_parts(&[metadata.producer_block_hash.as_bytes(), &metadata.slot.to_le_bytes()]);
    fork_choice.set_synthetic_head(synthetic_hash, metadata.slot);

    log::info!(
        "imported snapshot at slot {} ({} accounts, incremental={})",
        metadata.slot,
        metadata.account_count,
        metadata.is_incremental
    );
    Ok(metadata)
}
