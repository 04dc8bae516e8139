//! Transaction family: `getTransaction`, `sendTransaction`, `simulateTransaction`,
//! `getSignatureStatuses`, `getSignaturesForAddress`.
//!
//! `sendTransaction`/`simulateTransaction` decode and structurally validate the
//! transaction but do not execute it inline: execution only happens as part of a
//! committed block via `ValidatorCore::process_block`. A bare RPC submission
//! has nowhere authoritative to run the SVM pipeline against the *next* block, so
//! these handlers report acceptance/validity without mutating state, consistent with
//! the core's read-mostly RPC discipline.

use base64::Engine;
use serde_json::{json, Value};
use validator_sdk::{Signature, Transaction};

use crate::context::RpcContext;
use crate::dispatcher::{HandlerError, HandlerResult, MethodRegistry};
use crate::methods::accounts;

fn decode_transaction(params: &Value) -> Result<Transaction, HandlerError> {
    let encoded = params
        .get(0)
        .and_then(Value::as_str)
        .ok_or_else(|| HandlerError::InvalidParams("expected a base64-encoded transaction".into()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| HandlerError::InvalidParams(format!("invalid base64: {}", e)))?;
    Transaction::deserialize(&bytes).map_err(|e| HandlerError::InvalidParams(format!("invalid transaction: {}", e)))
}

fn parse_signature(params: &Value, index: usize) -> Result<Signature, HandlerError> {
    params
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| HandlerError::InvalidParams("expected a base58 signature".into()))?
        .parse()
        .map_err(|e| HandlerError::InvalidParams(format!("invalid signature: {}", e)))
}

/// Transactions are indexed by `tx.hash` in the ledger store, not by signature; this
/// walks the canonical chain looking for a matching first signature. Bounded by the
/// chain length the ledger keeps reachable from the head.
fn find_by_signature(ctx: &RpcContext, signature: &Signature) -> Option<Transaction> {
    let hashes = ctx.ledger.get_block_chain(&ctx.ledger.get_latest_block_hash(), usize::MAX);
    for block_hash in hashes {
        if let Some(block) = ctx.ledger.get_block(&block_hash) {
            if let Some(tx) = block.transactions.into_iter().find(|tx| tx.signatures.first() == Some(signature)) {
                return Some(tx);
            }
        }
    }
    None
}

fn get_transaction(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let signature = parse_signature(params, 0)?;
    Ok(match find_by_signature(ctx, &signature) {
        Some(tx) => json!({
            "signatures": tx.signatures.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            "hash": tx.hash.to_string(),
        }),
        None => Value::Null,
    })
}

fn send_transaction(_ctx: &RpcContext, params: &Value) -> HandlerResult {
    let tx = decode_transaction(params)?;
    if !tx.is_valid() {
        return Err(HandlerError::InvalidParams("transaction signature count does not match message header".into()));
    }
    Ok(json!(tx.hash.to_string()))
}

fn simulate_transaction(_ctx: &RpcContext, params: &Value) -> HandlerResult {
    let tx = decode_transaction(params)?;
    Ok(json!({
        "err": if tx.is_valid() { Value::Null } else { json!("InvalidSignature") },
        "logs": Value::Array(vec![]),
    }))
}

fn get_signature_statuses(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let signatures = params
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| HandlerError::InvalidParams("expected an array of signatures".into()))?;
    let slot = ctx.core.read().unwrap().get_current_slot();
    let mut statuses = Vec::with_capacity(signatures.len());
    for entry in signatures {
        let signature: Result<Signature, _> = entry
            .as_str()
            .ok_or_else(|| HandlerError::InvalidParams("signature must be a string".into()))?
            .parse();
        let found = signature.ok().and_then(|s| find_by_signature(ctx, &s));
        statuses.push(match found {
            Some(_) => json!({ "slot": slot, "confirmations": null, "err": null }),
            None => Value::Null,
        });
    }
    Ok(json!({ "context": { "slot": slot }, "value": statuses }))
}

fn get_signatures_for_address(ctx: &RpcContext, params: &Value) -> HandlerResult {
    let address = accounts::parse_pubkey(params)?;
    let limit = params.get(1).and_then(|v| v.get("limit")).and_then(Value::as_u64).unwrap_or(1000) as usize;

    // Addresses aren't indexed in the ledger store directly; this walks the visible
    // chain from the head, which is adequate for the bounded history this core keeps.
    let hashes = ctx.ledger.get_block_chain(&ctx.ledger.get_latest_block_hash(), usize::MAX);
    let mut results: Vec<Signature> = Vec::new();
    for block_hash in hashes {
        if let Some(block) = ctx.ledger.get_block(&block_hash) {
            for tx in block.transactions {
                if tx.message.account_keys.contains(&address) {
                    if let Some(sig) = tx.signatures.first() {
                        results.push(*sig);
                    }
                }
                if results.len() >= limit {
                    break;
                }
            }
        }
        if results.len() >= limit {
            break;
        }
    }
    let value: Vec<Value> = results.into_iter().map(|s| json!({ "signature": s.to_string() })).collect();
    Ok(json!(value))
}

pub fn register(registry: &mut MethodRegistry) {
    registry.register("getTransaction", Box::new(get_transaction));
    registry.register("getConfirmedTransaction", Box::new(get_transaction));
    registry.register("sendTransaction", Box::new(send_transaction));
    registry.register("simulateTransaction", Box::new(simulate_transaction));
    registry.register("getSignatureStatuses", Box::new(get_signature_statuses));
    registry.register("getSignaturesForAddress", Box::new(get_signatures_for_address));
    registry.register("getConfirmedSignaturesForAddress2", Box::new(get_signatures_for_address));
}
