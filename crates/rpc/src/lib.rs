//! JSON-RPC 2.0 request dispatcher: method registry, result formatting, and
//! in-process handler implementations against the ledger store, account store, and
//! fork choice.

pub mod context;
pub mod dispatcher;
pub mod methods;
pub mod server;

#[cfg(test)]
mod test_support;

pub use context::RpcContext;
pub use dispatcher::{handle_request_json, HandlerError, MethodRegistry, RequestId};
pub use methods::build_registry;
pub use server::serve;
