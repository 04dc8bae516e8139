//! Network family: `getClusterNodes`, `getVersion`, `getHealth`, `getIdentity`.

use serde_json::{json, Value};

use crate::context::RpcContext;
use crate::dispatcher::{HandlerResult, MethodRegistry};

fn get_cluster_nodes(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!([{ "pubkey": ctx.identity.to_string(), "version": env!("CARGO_PKG_VERSION") }]))
}

fn get_version(_ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!({ "solana-core": env!("CARGO_PKG_VERSION") }))
}

fn get_health(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let running = ctx.core.read().unwrap().is_running();
    if running {
        Ok(json!("ok"))
    } else {
        Ok(json!("behind"))
    }
}

fn get_identity(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    Ok(json!({ "identity": ctx.identity.to_string() }))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register("getClusterNodes", Box::new(get_cluster_nodes));
    registry.register("getVersion", Box::new(get_version));
    registry.register("getHealth", Box::new(get_health));
    registry.register("getIdentity", Box::new(get_identity));
}
