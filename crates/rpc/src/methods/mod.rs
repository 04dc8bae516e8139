//! Method registry assembly: each family module registers its own handlers.

pub mod accounts;
pub mod blocks;
pub mod staking;
pub mod subscriptions;
pub mod system;
pub mod network;
pub mod token;
pub mod transactions;
pub mod utility;
pub mod validator;

use crate::dispatcher::MethodRegistry;

pub fn build_registry() -> MethodRegistry {
    let mut registry = MethodRegistry::new();
    accounts::register(&mut registry);
    blocks::register(&mut registry);
    transactions::register(&mut registry);
    network::register(&mut registry);
    validator::register(&mut registry);
    staking::register(&mut registry);
    utility::register(&mut registry);
    system::register(&mut registry);
    token::register(&mut registry);
    subscriptions::register(&mut registry);
    registry
}
