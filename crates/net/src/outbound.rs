//! Outbound notification sinks: synchronous fan-out of validator events to
//! whatever transport the RPC layer (or another subscriber) registers. Grounded on
//! `original_source/include/validator/core.h`'s callback-based notification hooks.

use std::sync::{Arc, RwLock};

use validator_sdk::{Account, Hash, PublicKey, Slot};

/// A single notification destination. All methods default to a no-op so a sink
/// only needs to override the events it actually cares about.
pub trait NotifierSink {
    fn account_changed(&self, _address: &PublicKey, _account: &Account) {}
    fn signature_status(&self, _signature: &validator_sdk::Signature, _succeeded: bool) {}
    fn slot_advanced(&self, _slot: Slot, _parent_slot: Slot, _root_slot: Slot) {}
    fn block_committed(&self, _slot: Slot, _block_hash: &Hash) {}
    fn program_account_changed(&self, _program: &PublicKey, _address: &PublicKey, _account: &Account) {}
}

#[derive(Default)]
pub struct OutboundNotifier {
    sinks: RwLock<Vec<Arc<dyn NotifierSink + Send + Sync>>>,
}

impl OutboundNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, sink: Arc<dyn NotifierSink + Send + Sync>) {
        self.sinks.write().unwrap().push(sink);
    }

    pub fn notify_account_changed(&self, address: &PublicKey, account: &Account) {
        for sink in self.sinks.read().unwrap().iter() {
            sink.account_changed(address, account);
        }
    }

    pub fn notify_signature_status(&self, signature: &validator_sdk::Signature, succeeded: bool) {
        for sink in self.sinks.read().unwrap().iter() {
            sink.signature_status(signature, succeeded);
        }
    }

    pub fn notify_slot_advanced(&self, slot: Slot, parent_slot: Slot, root_slot: Slot) {
        for sink in self.sinks.read().unwrap().iter() {
            sink.slot_advanced(slot, parent_slot, root_slot);
        }
    }

    pub fn notify_block_committed(&self, slot: Slot, block_hash: &Hash) {
        for sink in self.sinks.read().unwrap().iter() {
            sink.block_committed(slot, block_hash);
        }
    }

    pub fn notify_program_account_changed(&self, program: &PublicKey, address: &PublicKey, account: &Account) {
        for sink in self.sinks.read().unwrap().iter() {
            sink.program_account_changed(program, address, account);
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        blocks_seen: AtomicUsize,
    }

    impl NotifierSink for CountingSink {
        fn block_committed(&self, _slot: Slot, _block_hash: &Hash) {
            self.blocks_seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn registered_sinks_receive_events_unregistered_sinks_do_not_exist() {
        let notifier = OutboundNotifier::new();
        let sink = Arc::new(CountingSink { blocks_seen: AtomicUsize::new(0) });
        notifier.register(sink.clone());

        notifier.notify_block_committed(5, &Hash::default());
        notifier.notify_block_committed(6, &Hash::default());

        assert_eq!(sink.blocks_seen.load(Ordering::SeqCst), 2);
        assert_eq!(notifier.sink_count(), 1);
    }

    #[test]
    fn default_methods_are_no_ops_for_sinks_that_dont_override_them() {
        struct SilentSink;
        impl NotifierSink for SilentSink {}

        let notifier = OutboundNotifier::new();
        notifier.register(Arc::new(SilentSink));
        notifier.notify_slot_advanced(1, 0, 0);
        notifier.notify_account_changed(&PublicKey::default(), &Account::new(PublicKey::default(), PublicKey::default(), 0, vec![]));
    }
}
