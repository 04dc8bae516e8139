//! Token family: `getTokenAccountsByOwner`, `getTokenSupply`,
//! `getTokenAccountBalance`, `getTokenAccountsByDelegate`, `getTokenLargestAccounts`,
//! `getTokenAccountsByMint`.
//!
//! This core executes no SPL-token-equivalent program — full BPF program
//! execution is out of scope — so token accounts are ordinary accounts under whatever
//! owner the caller names; these handlers answer from the generic account store
//! rather than parsing a token-specific account layout that nothing here produces.

use serde_json::{json, Value};

use crate::context::RpcContext;
use crate::dispatcher::{with_slot_context, HandlerError, HandlerResult, MethodRegistry};
use crate::methods::accounts::parse_pubkey;

fn get_token_accounts_by_owner(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let owner = parse_pubkey(params)?;
    let slot = ctx.core.read().unwrap().get_current_slot();
    let accounts = ctx.accounts.get_accounts_by_owner(&owner);
    let value: Vec<Value> = accounts
        .iter()
        .map(|a| json!({ "pubkey": a.address.to_string(), "account": { "lamports": a.lamports, "owner": a.owner.to_string() } }))
        .collect();
    Ok(with_slot_context(slot, json!(value)))
}

fn get_token_supply(_ctx: &RpcContext, params: &Value) -> HandlerResult {
    let _mint = parse_pubkey(params)?;
    Ok(json!({ "amount": "0", "decimals": 0, "uiAmount": 0.0 }))
}

fn get_token_account_balance(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let address = parse_pubkey(params)?;
    let lamports = ctx.accounts.get_account(&address).map(|a| a.lamports).unwrap_or(0);
    Ok(json!({ "amount": lamports.to_string(), "decimals": 0, "uiAmount": lamports as f64 }))
}

fn get_token_accounts_by_delegate(_ctx: &RpcContext, params: &Value) -> HandlerResult {
    let _delegate = parse_pubkey(params)?;
    Ok(json!(Vec::<Value>::new()))
}

fn get_token_largest_accounts(_ctx: &RpcContext, params: &Value) -> HandlerResult {
    let _mint = parse_pubkey(params)?;
    Ok(json!(Vec::<Value>::new()))
}

fn get_token_accounts_by_mint(_ctx: &RpcContext, params: &Value) -> HandlerResult {
    let _mint = parse_pubkey(params)?;
    Err(HandlerError::InvalidParams("no token program is tracked by this core".into()))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register("getTokenAccountsByOwner", Box::new(get_token_accounts_by_owner));
    registry.register("getTokenSupply", Box::new(get_token_supply));
    registry.register("getTokenAccountBalance", Box::new(get_token_account_balance));
    registry.register("getTokenAccountsByDelegate", Box::new(get_token_accounts_by_delegate));
    registry.register("getTokenLargestAccounts", Box::new(get_token_largest_accounts));
    registry.register("getTokenAccountsByMint", Box::new(get_token_accounts_by_mint));
}
