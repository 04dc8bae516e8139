//! Subscription bookkeeping: the RPC layer's `*Subscribe` methods register
//! interest here and get back an opaque id; `unsubscribe` is keyed only by that id
//! so callers never need to remember which family they subscribed under.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionFamily {
    Account,
    Signature,
    Program,
    Slot,
    Block,
    Root,
    SlotsUpdates,
    Vote,
    Logs,
}

impl SubscriptionFamily {
    fn is_keyed(self) -> bool {
        matches!(self, Self::Account | Self::Signature | Self::Program)
    }
}

#[derive(Default)]
struct Tables {
    keyed: HashMap<SubscriptionFamily, HashMap<String, HashSet<u64>>>,
    unkeyed: HashMap<SubscriptionFamily, HashSet<u64>>,
    id_to_family: HashMap<u64, SubscriptionFamily>,
    id_to_key: HashMap<u64, String>,
}

pub struct SubscriptionRegistry {
    next_id: AtomicU64,
    tables: RwLock<Tables>,
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers interest in `family`, keyed by `key` for the account/signature/
    /// program families (the key is ignored, and should be `None`, for the rest).
    /// Returns a fresh id, unique for the lifetime of this registry.
    pub fn subscribe(&self, family: SubscriptionFamily, key: Option<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.write().unwrap();
        if family.is_keyed() {
            let key = key.unwrap_or_default();
            tables
                .keyed
                .entry(family)
                .or_default()
                .entry(key.clone())
                .or_default()
                .insert(id);
            tables.id_to_key.insert(id, key);
        } else {
            tables.unkeyed.entry(family).or_default().insert(id);
        }
        tables.id_to_family.insert(id, family);
        id
    }

    /// Idempotent: removing an id that was never registered, or was already
    /// removed, still returns `true`.
    pub fn unsubscribe(&self, id: u64) -> bool {
        let mut tables = self.tables.write().unwrap();
        if let Some(family) = tables.id_to_family.remove(&id) {
            if family.is_keyed() {
                if let Some(key) = tables.id_to_key.remove(&id) {
                    if let Some(set) = tables.keyed.get_mut(&family) {
                        set.get_mut(&key).map(|ids| ids.remove(&id));
                        if set.get(&key).map(|ids| ids.is_empty()).unwrap_or(false) {
                            set.remove(&key);
                        }
                    }
                }
            } else if let Some(set) = tables.unkeyed.get_mut(&family) {
                set.remove(&id);
            }
        }
        true
    }

    pub fn ids_for(&self, family: SubscriptionFamily, key: Option<&str>) -> Vec<u64> {
        let tables = self.tables.read().unwrap();
        if family.is_keyed() {
            let key = key.unwrap_or("");
            tables
                .keyed
                .get(&family)
                .and_then(|m| m.get(key))
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default()
        } else {
            tables
                .unkeyed
                .get(&family)
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default()
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tables.read().unwrap().id_to_family.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_start_at_one() {
        let registry = SubscriptionRegistry::new();
        let a = registry.subscribe(SubscriptionFamily::Slot, None);
        let b = registry.subscribe(SubscriptionFamily::Slot, None);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn keyed_subscriptions_are_looked_up_by_key() {
        let registry = SubscriptionRegistry::new();
        let id = registry.subscribe(SubscriptionFamily::Account, Some("abc".to_string()));
        assert_eq!(registry.ids_for(SubscriptionFamily::Account, Some("abc")), vec![id]);
        assert!(registry.ids_for(SubscriptionFamily::Account, Some("xyz")).is_empty());
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let registry = SubscriptionRegistry::new();
        let id = registry.subscribe(SubscriptionFamily::Root, None);
        assert!(registry.unsubscribe(id));
        assert!(registry.unsubscribe(id));
        assert!(registry.unsubscribe(9999));
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribing_one_key_leaves_others_registered() {
        let registry = SubscriptionRegistry::new();
        let id1 = registry.subscribe(SubscriptionFamily::Program, Some("prog".to_string()));
        let id2 = registry.subscribe(SubscriptionFamily::Program, Some("prog".to_string()));
        registry.unsubscribe(id1);
        assert_eq!(registry.ids_for(SubscriptionFamily::Program, Some("prog")), vec![id2]);
    }
}
