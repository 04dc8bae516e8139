//! Fixed-width identifiers, numeric aliases, and the fallible-return envelope
//! shared by every validator component.

pub mod account;
pub mod block;
pub mod clock;
pub mod hash;
pub mod message;
pub mod pubkey;
pub mod result;
pub mod signature;
pub mod transaction;
pub mod vote;

pub use account::Account;
pub use block::Block;
pub use clock::{Epoch, Lamports, Slot, UnixTimestamp};
pub use hash::Hash;
pub use message::{CompiledInstruction, Message};
pub use pubkey::{PublicKey, SYSTEM_PROGRAM_ID};
pub use result::{CoreError, CoreResult};
pub use signature::{Keypair, Signature};
pub use transaction::Transaction;
pub use vote::Vote;
