//! Block family: `getSlot`, `getBlock`, `getBlockHeight`, `getBlocks`,
//! `getBlocksWithLimit`, `getFirstAvailableBlock`, `getGenesisHash`,
//! `getSlotLeaders`, `getBlockProduction`.

use serde_json::{json, Value};
use validator_sdk::Transaction;

use crate::context::RpcContext;
use crate::dispatcher::{HandlerError, HandlerResult, MethodRegistry};

fn transaction_to_json(tx: &Transaction) -> Value {
    json!({
        "signatures": tx.signatures.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        "hash": tx.hash.to_string(),
        "numRequiredSignatures": tx.message.num_required_signatures,
    })
}

fn get_slot(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!(ctx.core.read().unwrap().get_current_slot()))
}

fn get_block(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let slot = params
        .get(0)
        .and_then(Value::as_u64)
        .ok_or_else(|| HandlerError::InvalidParams("expected a slot number".into()))?;
    Ok(match ctx.ledger.get_block_by_slot(slot) {
        Some(block) => json!({
            "blockhash": block.block_hash.to_string(),
            "previousBlockhash": block.parent_hash.to_string(),
            "parentSlot": block.slot.saturating_sub(1),
            "blockTime": block.timestamp,
            "transactions": block.transactions.iter().map(transaction_to_json).collect::<Vec<_>>(),
        }),
        None => Value::Null,
    })
}

fn get_block_height(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!(ctx.ledger.get_latest_slot()))
}

fn get_blocks(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let start = params.get(0).and_then(Value::as_u64).unwrap_or(0);
    let end = params.get(1).and_then(Value::as_u64).unwrap_or_else(|| ctx.ledger.get_latest_slot());
    let count = (end.saturating_sub(start) + 1) as usize;
    let hashes = ctx.ledger.get_block_chain(&ctx.ledger.get_latest_block_hash(), count);
    let slots: Vec<u64> = hashes
        .into_iter()
        .filter_map(|h| ctx.ledger.get_block(&h).map(|b| b.slot))
        .filter(|slot| *slot >= start && *slot <= end)
        .collect();
    Ok(json!(slots))
}

fn get_blocks_with_limit(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let start = params.get(0).and_then(Value::as_u64).unwrap_or(0);
    let limit = params.get(1).and_then(Value::as_u64).unwrap_or(0) as usize;
    let hashes = ctx.ledger.get_block_chain(&ctx.ledger.get_latest_block_hash(), limit);
    let slots: Vec<u64> = hashes
        .into_iter()
        .filter_map(|h| ctx.ledger.get_block(&h).map(|b| b.slot))
        .filter(|slot| *slot >= start)
        .collect();
    Ok(json!(slots))
}

fn get_first_available_block(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!(ctx.ledger.get_block_by_slot(0).map(|b| b.slot).unwrap_or(0)))
}

fn get_genesis_hash(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!(ctx.genesis_hash.to_string()))
}

fn get_slot_leaders(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!([ctx.identity.to_string()]))
}

fn get_block_production(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let core = ctx.core.read().unwrap();
    let identity = core.validator_identity().to_string();
    let slot = core.get_current_slot();
    Ok(json!({
        "byIdentity": { identity: [slot, slot] },
        "range": { "firstSlot": 0, "lastSlot": slot },
    }))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register("getSlot", Box::new(get_slot));
    registry.register("getBlock", Box::new(get_block));
    registry.register("getConfirmedBlock", Box::new(get_block));
    registry.register("getBlockHeight", Box::new(get_block_height));
    registry.register("getBlocks", Box::new(get_blocks));
    registry.register("getConfirmedBlocks", Box::new(get_blocks));
    registry.register("getBlocksWithLimit", Box::new(get_blocks_with_limit));
    registry.register("getConfirmedBlocksWithLimit", Box::new(get_blocks_with_limit));
    registry.register("getFirstAvailableBlock", Box::new(get_first_available_block));
    registry.register("getGenesisHash", Box::new(get_genesis_hash));
    registry.register("getSlotLeaders", Box::new(get_slot_leaders));
    registry.register("getSlotLeader", Box::new(|ctx, _p| Ok(json!(ctx.identity.to_string()))));
    registry.register("getBlockProduction", Box::new(get_block_production));
}
