use std::sync::Arc;

use jsonrpsee::RpcModule;
use relay_primitives::context::GlobalContext;

pub mod relay;

/// JSON-RPC front of the relay
#[derive(Clone)]
pub struct RpcContext {
    global_ctx: Arc<GlobalContext>,
}

impl RpcContext {
    pub fn new(global_ctx: Arc<GlobalContext>) -> Self {
        Self { global_ctx }
    }
}

/// Returns the RpcModule merged with all the supported RPC versions.
pub fn rpc_api(rpc_ctx: &RpcContext) -> anyhow::Result<RpcModule<()>> {
    let mut rpc_api = RpcModule::new(());

    rpc_api.merge(relay::v0_1_0::RelayReadRpcApiServer::into_rpc(
        rpc_ctx.clone(),
    ))?;
    rpc_api.merge(relay::v0_1_0::RelayWriteRpcApiServer::into_rpc(
        rpc_ctx.clone(),
    ))?;

    Ok(rpc_api)
}
