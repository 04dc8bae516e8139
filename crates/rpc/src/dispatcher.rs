//! The request dispatcher itself: parsing, id preservation, method lookup and
//! invocation, and error envelope formatting. Deliberately independent of the HTTP
//! transport in `server.rs` so it can be exercised directly in tests.
//!
//! Mirrors `original_source/include/network/rpc_server.h`'s `RpcRequest`/`RpcResponse`
//! `id_is_number` bookkeeping with an explicit `RequestId` enum instead of a boolean
//! flag plus a separately-stored string.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::context::RpcContext;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

impl RequestId {
    fn to_value(&self) -> Value {
        match self {
            RequestId::Number(n) => json!(n),
            RequestId::String(s) => json!(s),
            RequestId::Null => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RequestId::Number),
            Value::String(s) => Some(RequestId::String(s.clone())),
            Value::Null => Some(RequestId::Null),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("{0}")]
    Internal(String),
}

pub type HandlerResult = Result<Value, HandlerError>;
pub type Handler = Box<dyn Fn(&RpcContext, &Value) -> HandlerResult + Send + Sync>;

#[derive(Default)]
pub struct MethodRegistry {
    handlers: HashMap<String, Handler>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, handler: Handler) {
        self.handlers.insert(name.to_string(), handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

fn error_response(id: &RequestId, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "error": { "code": code, "message": message },
        "id": id.to_value(),
    })
}

fn success_response(id: &RequestId, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": id.to_value(),
    })
}

/// Parses, dispatches, and re-wraps a raw JSON-RPC request. Never panics: any handler
/// panic is caught by the caller's thread boundary, not here — RPC handler failures
/// are always ordinary `Result`s, unlike SVM's abort-the-transaction discipline.
pub fn handle_request_json(registry: &MethodRegistry, ctx: &RpcContext, raw: &str) -> String {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("rpc parse error: {}", e);
            return error_response(&RequestId::Null, PARSE_ERROR, "Parse error").to_string();
        }
    };

    let id = match parsed.get("id") {
        Some(v) => match RequestId::from_value(v) {
            Some(id) => id,
            None => return error_response(&RequestId::Null, INVALID_REQUEST, "Invalid Request").to_string(),
        },
        None => return error_response(&RequestId::Null, INVALID_REQUEST, "Invalid Request").to_string(),
    };

    let method = match parsed.get("method").and_then(Value::as_str) {
        Some(m) if !m.is_empty() => m,
        _ => return error_response(&id, INVALID_REQUEST, "Invalid Request").to_string(),
    };

    let handler = match registry.handlers.get(method) {
        Some(h) => h,
        None => return error_response(&id, METHOD_NOT_FOUND, "Method not found").to_string(),
    };

    let params = parsed.get("params").cloned().unwrap_or(Value::Null);
    log::debug!("dispatching rpc method {}", method);

    match handler(ctx, &params) {
        Ok(result) => success_response(&id, result).to_string(),
        Err(HandlerError::InvalidParams(msg)) => {
            error_response(&id, INVALID_PARAMS, &msg).to_string()
        }
        Err(HandlerError::Internal(msg)) => {
            log::error!("rpc handler for {} failed: {}", method, msg);
            error_response(&id, INTERNAL_ERROR, "Internal error").to_string()
        }
    }
}

/// Wraps a single value in the `{context:{slot:N}, value:...}` envelope required
/// for the account/balance/multi-account/program-account/supply/token families.
pub fn with_slot_context(slot: validator_sdk::Slot, value: Value) -> Value {
    json!({ "context": { "slot": slot }, "value": value })
}

pub fn registry_arc(registry: MethodRegistry) -> Arc<MethodRegistry> {
    Arc::new(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::build_registry;
    use crate::test_support::test_context;

    #[test]
    fn malformed_json_yields_parse_error_with_null_id() {
        let registry = build_registry();
        let ctx = test_context();
        let response: Value = serde_json::from_str(&handle_request_json(&registry, &ctx, "{not json")).unwrap();
        assert_eq!(response["error"]["code"], PARSE_ERROR);
        assert_eq!(response["id"], Value::Null);
    }

    #[test]
    fn missing_method_yields_invalid_request() {
        let registry = build_registry();
        let ctx = test_context();
        let request = json!({"jsonrpc": "2.0", "id": 1}).to_string();
        let response: Value = serde_json::from_str(&handle_request_json(&registry, &ctx, &request)).unwrap();
        assert_eq!(response["error"]["code"], INVALID_REQUEST);
    }

    #[test]
    fn unknown_method_yields_method_not_found_and_preserves_numeric_id() {
        let registry = build_registry();
        let ctx = test_context();
        let request = json!({"jsonrpc": "2.0", "method": "notAMethod", "id": 42}).to_string();
        let response: Value = serde_json::from_str(&handle_request_json(&registry, &ctx, &request)).unwrap();
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(response["id"], 42);
    }

    #[test]
    fn string_id_round_trips_through_a_successful_call() {
        let registry = build_registry();
        let ctx = test_context();
        let request = json!({"jsonrpc": "2.0", "method": "getSlot", "id": "abc"}).to_string();
        let response: Value = serde_json::from_str(&handle_request_json(&registry, &ctx, &request)).unwrap();
        assert_eq!(response["id"], "abc");
        assert!(response.get("result").is_some());
    }
}
