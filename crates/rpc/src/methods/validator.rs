//! Validator/consensus family: `getVoteAccounts`, `getLeaderSchedule`,
//! `getEpochInfo`, `getEpochSchedule`.

use serde_json::{json, Value};
use validator_runtime::svm::RentConfig;

use crate::context::RpcContext;
use crate::dispatcher::{HandlerResult, MethodRegistry};

/// This core tracks stake for lookup purposes only, not reward/APR math;
/// there is no validator-set discovery service, so `getVoteAccounts` reports this
/// node's own entry rather than a cluster-wide view.
fn get_vote_accounts(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let core = ctx.core.read().unwrap();
    let identity = core.validator_identity();
    let info = core.stake_view().validator_stake_info(&identity);
    let entry = json!({
        "votePubkey": identity.to_string(),
        "nodePubkey": identity.to_string(),
        "activatedStake": info.map(|i| i.total_stake).unwrap_or(0),
        "epochVoteAccount": true,
        "commission": info.map(|i| i.commission_rate_bps / 100).unwrap_or(0),
    });
    Ok(json!({ "current": [entry], "delinquent": [] }))
}

fn get_leader_schedule(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let identity = ctx.core.read().unwrap().validator_identity().to_string();
    Ok(json!({ identity: [0u64] }))
}

fn get_epoch_info(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let slot = ctx.core.read().unwrap().get_current_slot();
    let slots_per_epoch = RentConfig::default().slots_per_epoch;
    Ok(json!({
        "epoch": slot / slots_per_epoch,
        "slotIndex": slot % slots_per_epoch,
        "slotsInEpoch": slots_per_epoch,
        "absoluteSlot": slot,
        "blockHeight": slot,
    }))
}

fn get_epoch_schedule(_ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let slots_per_epoch = RentConfig::default().slots_per_epoch;
    Ok(json!({
        "slotsPerEpoch": slots_per_epoch,
        "leaderScheduleSlotOffset": slots_per_epoch,
        "warmup": false,
        "firstNormalEpoch": 0,
        "firstNormalSlot": 0,
    }))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register("getVoteAccounts", Box::new(get_vote_accounts));
    registry.register("getLeaderSchedule", Box::new(get_leader_schedule));
    registry.register("getEpochInfo", Box::new(get_epoch_info));
    registry.register("getEpochSchedule", Box::new(get_epoch_schedule));
}
