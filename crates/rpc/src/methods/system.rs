//! System/supply/performance family: `minimumLedgerSlot`, `getHighestSnapshotSlot`,
//! `getRecentPerformanceSamples`, `getRecentPrioritizationFees`, `getSupply`,
//! `getTransactionCount`, `requestAirdrop`, `getStakeMinimumDelegation`.

use serde_json::{json, Value};

use crate::context::RpcContext;
use crate::dispatcher::{HandlerError, HandlerResult, MethodRegistry};

fn minimum_ledger_slot(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!(ctx.ledger.get_block_by_slot(0).map(|b| b.slot).unwrap_or(0)))
}

fn get_highest_snapshot_slot(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let slot = ctx.core.read().unwrap().get_current_slot();
    Ok(json!({ "full": slot, "incremental": Value::Null }))
}

fn get_recent_performance_samples(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let limit = params.get(0).and_then(Value::as_u64).unwrap_or(1).max(1) as usize;
    let slot = ctx.core.read().unwrap().get_current_slot();
    let sample = json!({
        "slot": slot,
        "numTransactions": ctx.ledger.get_transactions_by_slot(slot).len(),
        "numSlots": 1,
        "samplePeriodSecs": 60,
    });
    Ok(json!(vec![sample; limit.min(720)]))
}

fn get_recent_prioritization_fees(_ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!(Vec::<Value>::new()))
}

fn get_supply(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let slot = ctx.core.read().unwrap().get_current_slot();
    let total: u64 = ctx.accounts.get_all_accounts().iter().map(|a| a.lamports).sum();
    let value = json!({
        "total": total,
        "circulating": total,
        "nonCirculating": 0,
        "nonCirculatingAccounts": Vec::<String>::new(),
    });
    Ok(json!({ "context": { "slot": slot }, "value": value }))
}

fn get_transaction_count(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let slot = ctx.core.read().unwrap().get_current_slot();
    let hashes = ctx.ledger.get_block_chain(&ctx.ledger.get_latest_block_hash(), usize::MAX);
    let count: usize = hashes
        .into_iter()
        .filter_map(|h| ctx.ledger.get_block(&h))
        .map(|b| b.transactions.len())
        .sum();
    log::debug!("getTransactionCount at slot {} counted {} transactions", slot, count);
    Ok(json!(count))
}

/// This core has no faucet program; airdrops are refused rather than silently
/// minting lamports out of thin air.
fn request_airdrop(_ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Err(HandlerError::InvalidParams("airdrop is not supported by this core".into()))
}

fn get_stake_minimum_delegation(_ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!(1_000_000_000u64))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register("minimumLedgerSlot", Box::new(minimum_ledger_slot));
    registry.register("getHighestSnapshotSlot", Box::new(get_highest_snapshot_slot));
    registry.register("getSnapshotSlot", Box::new(get_highest_snapshot_slot));
    registry.register("getRecentPerformanceSamples", Box::new(get_recent_performance_samples));
    registry.register("getRecentPrioritizationFees", Box::new(get_recent_prioritization_fees));
    registry.register("getSupply", Box::new(get_supply));
    registry.register("getTransactionCount", Box::new(get_transaction_count));
    registry.register("requestAirdrop", Box::new(request_airdrop));
    registry.register("getStakeMinimumDelegation", Box::new(get_stake_minimum_delegation));
}
