//! Subscription lifecycle: subscribe/unsubscribe endpoints for account, block, logs,
//! program, root, signature, slot, slots-updates, vote. Bookkeeping lives in C8's
//! `SubscriptionRegistry`; actual push delivery is a collaborator concern.

use serde_json::{json, Value};
use validator_net::SubscriptionFamily;

use crate::context::RpcContext;
use crate::dispatcher::{HandlerError, HandlerResult, MethodRegistry};

fn subscribe(ctx: &RpcContext, params: &Value, family: SubscriptionFamily, keyed: bool) -> HandlerResult {
    let key = if keyed {
        Some(
            params
                .get(0)
                .and_then(Value::as_str)
                .ok_or_else(|| HandlerError::InvalidParams("expected a key (pubkey or signature)".into()))?
                .to_string(),
        )
    } else {
        None
    };
    let id = ctx.subscriptions.subscribe(family, key);
    Ok(json!(id))
}

fn unsubscribe(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let id = params
        .get(0)
        .and_then(Value::as_u64)
        .ok_or_else(|| HandlerError::InvalidParams("expected a subscription id".into()))?;
    Ok(json!(ctx.subscriptions.unsubscribe(id)))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register(
        "accountSubscribe",
        Box::new(|ctx, p| subscribe(ctx, p, SubscriptionFamily::Account, true)),
    );
    registry.register("accountUnsubscribe", Box::new(unsubscribe));
    registry.register(
        "blockSubscribe",
        Box::new(|ctx, p| subscribe(ctx, p, SubscriptionFamily::Block, false)),
    );
    registry.register("blockUnsubscribe", Box::new(unsubscribe));
    registry.register(
        "logsSubscribe",
        Box::new(|ctx, p| subscribe(ctx, p, SubscriptionFamily::Logs, false)),
    );
    registry.register("logsUnsubscribe", Box::new(unsubscribe));
    registry.register(
        "programSubscribe",
        Box::new(|ctx, p| subscribe(ctx, p, SubscriptionFamily::Program, true)),
    );
    registry.register("programUnsubscribe", Box::new(unsubscribe));
    registry.register(
        "rootSubscribe",
        Box::new(|ctx, p| subscribe(ctx, p, SubscriptionFamily::Root, false)),
    );
    registry.register("rootUnsubscribe", Box::new(unsubscribe));
    registry.register(
        "signatureSubscribe",
        Box::new(|ctx, p| subscribe(ctx, p, SubscriptionFamily::Signature, true)),
    );
    registry.register("signatureUnsubscribe", Box::new(unsubscribe));
    registry.register(
        "slotSubscribe",
        Box::new(|ctx, p| subscribe(ctx, p, SubscriptionFamily::Slot, false)),
    );
    registry.register("slotUnsubscribe", Box::new(unsubscribe));
    registry.register(
        "slotsUpdatesSubscribe",
        Box::new(|ctx, p| subscribe(ctx, p, SubscriptionFamily::SlotsUpdates, false)),
    );
    registry.register("slotsUpdatesUnsubscribe", Box::new(unsubscribe));
    registry.register(
        "voteSubscribe",
        Box::new(|ctx, p| subscribe(ctx, p, SubscriptionFamily::Vote, false)),
    );
    registry.register("voteUnsubscribe", Box::new(unsubscribe));
}
