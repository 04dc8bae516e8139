//! Utility family: `getRecentBlockhash`, `getFeeForMessage`, `getLatestBlockhash`,
//! `isBlockhashValid`.

use serde_json::{json, Value};

use crate::context::RpcContext;
use crate::dispatcher::{with_slot_context, HandlerError, HandlerResult, MethodRegistry};

/// The core has no fee-market lamports-per-signature schedule; it uses the fixed
/// default the SVM pipeline charges.
const DEFAULT_LAMPORTS_PER_SIGNATURE: u64 = 5_000;

fn get_recent_blockhash(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let hash = ctx.ledger.get_latest_block_hash();
    Ok(json!({
        "blockhash": hash.to_string(),
        "feeCalculator": { "lamportsPerSignature": DEFAULT_LAMPORTS_PER_SIGNATURE },
    }))
}

fn get_latest_blockhash(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let slot = ctx.core.read().unwrap().get_current_slot();
    let hash = ctx.ledger.get_latest_block_hash();
    Ok(with_slot_context(
        slot,
        json!({ "blockhash": hash.to_string(), "lastValidBlockHeight": slot + 150 }),
    ))
}

fn get_fee_for_message(_ctx: &RpcContext, params: &Value) -> HandlerResult {
    let encoded = params
        .get(0)
        .and_then(Value::as_str)
        .ok_or_else(|| HandlerError::InvalidParams("expected a base64-encoded message".into()))?;
    if encoded.is_empty() {
        return Err(HandlerError::InvalidParams("empty message".into()));
    }
    Ok(json!(DEFAULT_LAMPORTS_PER_SIGNATURE))
}

fn is_blockhash_valid(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let candidate = params
        .get(0)
        .and_then(Value::as_str)
        .ok_or_else(|| HandlerError::InvalidParams("expected a base58 blockhash".into()))?;
    let parsed: Result<validator_sdk::Hash, _> = candidate.parse();
    let valid = match parsed {
        Ok(hash) => hash == ctx.ledger.get_latest_block_hash() || ctx.ledger.get_block(&hash).is_some(),
        Err(_) => false,
    };
    Ok(json!(valid))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register("getRecentBlockhash", Box::new(get_recent_blockhash));
    registry.register("getLatestBlockhash", Box::new(get_latest_blockhash));
    registry.register("getFeeForMessage", Box::new(get_fee_for_message));
    registry.register("isBlockhashValid", Box::new(is_blockhash_valid));
}
