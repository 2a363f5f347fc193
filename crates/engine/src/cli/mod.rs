use clap::Parser;

pub mod fabric;
pub mod rpc;
mod telemetery;
use fabric::FabricParams;
use rpc::RpcParams;
use telemetery::TelemetryParams;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    #[command(flatten)]
    pub telemetry: TelemetryParams,
    #[command(flatten)]
    pub rpc: RpcParams,
    #[command(flatten)]
    pub fabric: FabricParams,
}
