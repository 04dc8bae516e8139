//! HTTP POST transport for the dispatcher: JSON-RPC 2.0 over HTTP POST,
//! content-type application/json, CORS permissive. `jsonrpc-http-server` owns the
//! listener and connection handling; every request body is handed to
//! `dispatcher::handle_request_json` unchanged, bypassing `IoHandler`'s own
//! per-method dispatch entirely — our `RequestId` needs exact number/string/null
//! handling that `add_method`-style dispatch doesn't give us, so the dispatcher is
//! hand-rolled directly on `serde_json::Value` instead. `jsonrpc-core` is not a
//! direct dependency of this crate: the one `IoHandler` `ServerBuilder::new`
//! requires is reached through `jsonrpc-http-server`'s own re-export.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use jsonrpc_http_server::hyper::{Body, Request, Response};
use jsonrpc_http_server::jsonrpc_core::IoHandler;
use jsonrpc_http_server::{DomainsValidation, RequestMiddleware, RequestMiddlewareAction, Server, ServerBuilder};

use crate::context::RpcContext;
use crate::dispatcher::{handle_request_json, MethodRegistry};

struct DispatchMiddleware {
    registry: Arc<MethodRegistry>,
    ctx: Arc<RpcContext>,
}

impl RequestMiddleware for DispatchMiddleware {
    fn on_request(&self, request: Request<Body>) -> RequestMiddlewareAction {
        let registry = self.registry.clone();
        let ctx = self.ctx.clone();
        let future: Pin<Box<dyn Future<Output = Result<Response<Body>, jsonrpc_http_server::hyper::Error>> + Send>> =
            Box::pin(async move {
                let body_bytes = jsonrpc_http_server::hyper::body::to_bytes(request.into_body()).await?;
                let body_text = String::from_utf8_lossy(&body_bytes).into_owned();
                let response_text = handle_request_json(&registry, &ctx, &body_text);
                let response = Response::builder()
                    .header("content-type", "application/json")
                    .header("access-control-allow-origin", "*")
                    .body(Body::from(response_text))
                    .expect("response built from a well-formed body is always valid");
                Ok(response)
            });
        RequestMiddlewareAction::Respond {
            should_validate_hosts: false,
            response: future,
        }
    }
}

/// Binds and starts the HTTP JSON-RPC server. Blocks the calling thread's event loop
/// setup only; the returned `Server` runs its own worker threads until dropped or
/// `close()` is called.
pub fn serve(registry: MethodRegistry, ctx: RpcContext, addr: SocketAddr) -> Server {
    // `ServerBuilder::new` requires an `IoHandler`, but `request_middleware` below
    // answers every request itself via `RequestMiddlewareAction::Respond`, which
    // short-circuits the handler before it ever dispatches — this empty one is
    // never consulted.
    let io = IoHandler::new();
    ServerBuilder::new(io)
        .cors(DomainsValidation::Disabled)
        .request_middleware(DispatchMiddleware {
            registry: Arc::new(registry),
            ctx: Arc::new(ctx),
        })
        .start_http(&addr)
        .expect("rpc server failed to bind")
}
