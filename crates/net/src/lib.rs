//! Peer message ingress, outbound notification sinks, and subscription
//! bookkeeping.

pub mod inbound;
pub mod outbound;
pub mod subscriptions;

pub use inbound::{InboundAdapter, PeerMessage};
pub use outbound::{NotifierSink, OutboundNotifier};
pub use subscriptions::{SubscriptionFamily, SubscriptionRegistry};
