//! Shared, read-only handles RPC handlers consult per request, each one a
//! consistent snapshot handle obtained fresh per request. Nothing here is mutated by
//! the RPC layer; writes only ever happen through `ValidatorCore`.

use std::sync::{Arc, RwLock};

use validator_consensus::ValidatorCore;
use validator_ledger::LedgerStore;
use validator_net::SubscriptionRegistry;
use validator_runtime::AccountStore;
use validator_sdk::{Hash, PublicKey};

pub struct RpcContext {
    pub core: Arc<RwLock<ValidatorCore>>,
    pub ledger: Arc<LedgerStore>,
    pub accounts: Arc<AccountStore>,
    pub subscriptions: Arc<SubscriptionRegistry>,
    pub genesis_hash: Hash,
    pub identity: PublicKey,
}

impl RpcContext {
    pub fn new(
        core: Arc<RwLock<ValidatorCore>>,
        ledger: Arc<LedgerStore>,
        accounts: Arc<AccountStore>,
        subscriptions: Arc<SubscriptionRegistry>,
        genesis_hash: Hash,
        identity: PublicKey,
    ) -> Self {
        Self {
            core,
            ledger,
            accounts,
            subscriptions,
            genesis_hash,
            identity,
        }
    }
}
