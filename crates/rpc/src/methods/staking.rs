//! Staking/inflation family: `getStakeActivation`, `getInflationGovernor`,
//! `getInflationRate`, `getInflationReward`.
//!
//! Inflation curves and reward distribution are explicitly out of scope; these
//! handlers report the fixed, zero-inflation defaults a core with no reward engine
//! honestly has, rather than fabricating a schedule.

use serde_json::{json, Value};

use crate::context::RpcContext;
use crate::dispatcher::{HandlerError, HandlerResult, MethodRegistry};
use crate::methods::accounts::parse_pubkey;

fn get_stake_activation(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let validator = parse_pubkey(params)?;
    let core = ctx.core.read().unwrap();
    match core.stake_view().stake_of(&validator) {
        Some(stake) => Ok(json!({ "state": "active", "active": stake, "inactive": 0 })),
        None => Err(HandlerError::InvalidParams("unknown stake account".into())),
    }
}

fn get_inflation_governor(_ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!({
        "initial": 0.0,
        "terminal": 0.0,
        "taper": 0.0,
        "foundation": 0.0,
        "foundationTerm": 0.0,
    }))
}

fn get_inflation_rate(_ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!({ "total": 0.0, "validator": 0.0, "foundation": 0.0, "epoch": 0 }))
}

fn get_inflation_reward(_ctx: &RpcContext, params: &Value) -> HandlerResult {
    let addresses = params.get(0).and_then(Value::as_array).map(|a| a.len()).unwrap_or(0);
    Ok(json!(vec![Value::Null; addresses]))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register("getStakeActivation", Box::new(get_stake_activation));
    registry.register("getInflationGovernor", Box::new(get_inflation_governor));
    registry.register("getInflationRate", Box::new(get_inflation_rate));
    registry.register("getInflationReward", Box::new(get_inflation_reward));
}
