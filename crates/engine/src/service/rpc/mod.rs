use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use jsonrpsee::server::{Server, ServerHandle};
use relay_primitives::context::GlobalContext;
use relay_rpc::{rpc_api, RpcContext};
use tracing::info;

use crate::cli::rpc::RpcParams;

/// Serves the relay JSON-RPC api over HTTP.
pub struct RpcService {
    config: RpcParams,
    global_ctx: Arc<GlobalContext>,
}

impl RpcService {
    pub fn new(config: RpcParams, global_ctx: Arc<GlobalContext>) -> Self {
        Self { config, global_ctx }
    }

    /// Binds the listener and starts serving. The returned handle stops the server.
    pub async fn start(&self) -> anyhow::Result<(SocketAddr, ServerHandle)> {
        let methods = rpc_api(&RpcContext::new(self.global_ctx.clone()))?;
        let middleware = tower::ServiceBuilder::new().layer(self.config.cors()?);

        let server = Server::builder()
            .max_connections(self.config.rpc_max_connections)
            .max_request_body_size(self.config.max_request_body_size())
            .max_response_body_size(self.config.max_response_body_size())
            .set_http_middleware(middleware)
            .build(self.config.addr())
            .await
            .with_context(|| format!("Failed to bind JSON-RPC server on {}", self.config.addr()))?;

        let addr = server
            .local_addr()
            .context("Failed to read JSON-RPC server address")?;
        let handle = server.start(methods);
        info!(
            addr = %addr,
            max_connections = self.config.rpc_max_connections,
            "JSON-RPC server started"
        );
        Ok((addr, handle))
    }
}
