mod cli;
mod service;

use std::sync::Arc;

use crate::cli::CliArgs;
use clap::Parser;
use relay_handlers_fabric::{FileSystemIdentityResolver, HttpGatewayClient};
use relay_primitives::context::{GlobalContext, InvokerConfig};
use relay_telemetery::Telemetery;
use service::rpc::RpcService;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let mut telemetery = Telemetery::new(
        args.telemetry.telemetry_service_name,
        args.telemetry.telemetry_collection_endpoint,
    )?;
    telemetery.setup()?;
    info!("Starting Fabric Relay");

    // Create the global context
    let mut identity_resolver = FileSystemIdentityResolver::new(
        args.fabric.profiles_dir.clone(),
        args.fabric.wallets_dir.clone(),
    );
    match args.fabric.registrar_url.clone() {
        Some(url) => {
            identity_resolver =
                identity_resolver.with_registrar(url, args.fabric.request_timeout())?
        }
        None => warn!("No registrar configured, unknown identities cannot be registered"),
    }
    let network_client =
        HttpGatewayClient::new(args.fabric.gateway_url.clone(), args.fabric.request_timeout())?;
    let global_ctx = Arc::new(GlobalContext::new(
        Arc::new(identity_resolver),
        Arc::new(network_client),
        InvokerConfig {
            discovery: args.fabric.discovery(),
        },
    ));

    let (_, server_handle) = RpcService::new(args.rpc, global_ctx).start().await?;

    // Wait for interrupt signal
    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal, initiating graceful shutdown");

    if server_handle.stop().is_ok() {
        server_handle.stopped().await;
    }
    info!("JSON-RPC server stopped");
    telemetery.shutdown();

    Ok(())
}
