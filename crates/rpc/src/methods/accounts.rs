//! Account family: `getAccountInfo`, `getBalance`, `getProgramAccounts`,
//! `getMultipleAccounts`, `getLargestAccounts`, `getMinimumBalanceForRentExemption`,
//! plus the `*AndContext` variants and `getAccountOwner`. Grounded on
//! `original_source/include/network/rpc_server.h`'s method list.

use serde_json::{json, Value};
use validator_runtime::svm::RentCalculator;
use validator_sdk::{Account, PublicKey};

use crate::context::RpcContext;
use crate::dispatcher::{with_slot_context, HandlerError, HandlerResult, MethodRegistry};

fn account_to_json(account: &Account) -> Value {
    json!({
        "lamports": account.lamports,
        "owner": account.owner.to_string(),
        "executable": account.executable,
        "rentEpoch": account.rent_epoch,
        "data": account.data,
    })
}

pub(crate) fn parse_pubkey(params: &Value) -> Result<PublicKey, HandlerError> {
    params
        .get(0)
        .and_then(Value::as_str)
        .ok_or_else(|| HandlerError::InvalidParams("expected a base58 pubkey as the first parameter".into()))?
        .parse()
        .map_err(|e| HandlerError::InvalidParams(format!("invalid pubkey: {}", e)))
}

fn get_account_info(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let address = parse_pubkey(params)?;
    let slot = ctx.core.read().unwrap().get_current_slot();
    let value = ctx.accounts.get_account(&address).map(|a| account_to_json(&a)).unwrap_or(Value::Null);
    Ok(with_slot_context(slot, value))
}

fn get_balance(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let address = parse_pubkey(params)?;
    let slot = ctx.core.read().unwrap().get_current_slot();
    let lamports = ctx.accounts.get_account(&address).map(|a| a.lamports).unwrap_or(0);
    Ok(with_slot_context(slot, json!(lamports)))
}

fn get_program_accounts(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let program = parse_pubkey(params)?;
    let accounts = ctx.accounts.get_program_accounts(&program);
    let value: Vec<Value> = accounts
        .iter()
        .map(|a| json!({ "pubkey": a.address.to_string(), "account": account_to_json(a) }))
        .collect();
    Ok(json!(value))
}

fn get_multiple_accounts(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let addresses = params
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| HandlerError::InvalidParams("expected an array of pubkeys".into()))?;
    let slot = ctx.core.read().unwrap().get_current_slot();
    let mut values = Vec::with_capacity(addresses.len());
    for entry in addresses {
        let key: PublicKey = entry
            .as_str()
            .ok_or_else(|| HandlerError::InvalidParams("pubkey must be a string".into()))?
            .parse()
            .map_err(|e| HandlerError::InvalidParams(format!("invalid pubkey: {}", e)))?;
        values.push(ctx.accounts.get_account(&key).map(|a| account_to_json(&a)).unwrap_or(Value::Null));
    }
    Ok(with_slot_context(slot, json!(values)))
}

fn get_largest_accounts(ctx: &RpcContext, _params: &Value) -> HandlerResult {
    let slot = ctx.core.read().unwrap().get_current_slot();
    let mut accounts = ctx.accounts.get_all_accounts();
    accounts.sort_by(|a, b| b.lamports.cmp(&a.lamports));
    let value: Vec<Value> = accounts
        .into_iter()
        .take(20)
        .map(|a| json!({ "address": a.address.to_string(), "lamports": a.lamports }))
        .collect();
    Ok(with_slot_context(slot, json!(value)))
}

fn get_minimum_balance_for_rent_exemption(_ctx: &RpcContext, params: &Value) -> HandlerResult {
    let data_len = params
        .get(0)
        .and_then(Value::as_u64)
        .ok_or_else(|| HandlerError::InvalidParams("expected a data length".into()))? as usize;
    let calculator = RentCalculator::default();
    Ok(json!(calculator.minimum_balance(data_len)))
}

fn get_account_owner(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let address = parse_pubkey(params)?;
    Ok(ctx
        .accounts
        .get_account(&address)
        .map(|a| json!(a.owner.to_string()))
        .unwrap_or(Value::Null))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register("getAccountInfo", Box::new(get_account_info));
    registry.register("getAccountInfoAndContext", Box::new(get_account_info));
    registry.register("getBalance", Box::new(get_balance));
    registry.register("getBalanceAndContext", Box::new(get_balance));
    registry.register("getProgramAccounts", Box::new(get_program_accounts));
    registry.register("getProgramAccountsAndContext", Box::new(get_program_accounts));
    registry.register("getMultipleAccounts", Box::new(get_multiple_accounts));
    registry.register("getMultipleAccountsAndContext", Box::new(get_multiple_accounts));
    registry.register("getLargestAccounts", Box::new(get_largest_accounts));
    registry.register(
        "getMinimumBalanceForRentExemption",
        Box::new(get_minimum_balance_for_rent_exemption),
    );
    registry.register("getAccountOwner", Box::new(get_account_owner));
}
