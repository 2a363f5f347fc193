use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use clap::Args;
use hyper::{header, http::HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Parameters used to config the JSON-RPC server.
#[derive(Debug, Clone, Args)]
pub struct RpcParams {
    /// Port the JSON-RPC server listens on.
    #[arg(env = "FABRIC_RELAY_RPC_PORT", long, default_value_t = 4000)]
    pub rpc_port: u16,

    /// Listen on all interfaces instead of localhost only.
    #[arg(env = "FABRIC_RELAY_RPC_EXTERNAL", long, default_value_t = false)]
    pub rpc_external: bool,

    /// Origins allowed to call the server. Any origin is accepted when empty.
    #[arg(env = "FABRIC_RELAY_RPC_CORS", long, value_delimiter = ',')]
    pub rpc_cors: Vec<String>,

    /// Maximum number of concurrent connections.
    #[arg(env = "FABRIC_RELAY_RPC_MAX_CONNECTIONS", long, default_value_t = 100)]
    pub rpc_max_connections: u32,

    /// Maximum request body size, in MiB.
    #[arg(env = "FABRIC_RELAY_RPC_MAX_REQUEST_SIZE", long, default_value_t = 15)]
    pub rpc_max_request_size: u32,

    /// Maximum response body size, in MiB.
    #[arg(env = "FABRIC_RELAY_RPC_MAX_RESPONSE_SIZE", long, default_value_t = 15)]
    pub rpc_max_response_size: u32,
}

const MEGABYTE: u32 = 1024 * 1024;

impl RpcParams {
    pub fn addr(&self) -> SocketAddr {
        let ip = if self.rpc_external {
            Ipv4Addr::UNSPECIFIED
        } else {
            Ipv4Addr::LOCALHOST
        };
        SocketAddr::new(ip.into(), self.rpc_port)
    }

    pub fn max_request_body_size(&self) -> u32 {
        self.rpc_max_request_size.saturating_mul(MEGABYTE)
    }

    pub fn max_response_body_size(&self) -> u32 {
        self.rpc_max_response_size.saturating_mul(MEGABYTE)
    }

    pub fn cors(&self) -> anyhow::Result<CorsLayer> {
        let cors = CorsLayer::new()
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);
        if self.rpc_cors.is_empty() {
            return Ok(cors.allow_origin(Any));
        }
        let origins = self
            .rpc_cors
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin {}", origin))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(cors.allow_origin(AllowOrigin::list(origins)))
    }
}
