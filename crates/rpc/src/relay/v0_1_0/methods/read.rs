use crate::{relay::v0_1_0::RelayReadRpcApiServer, RpcContext};
use jsonrpsee::core::{async_trait, RpcResult};
use relay_primitives::rpc::GetSupportedFunctionsResult;

#[async_trait]
impl RelayReadRpcApiServer for RpcContext {
    async fn get_supported_functions(&self) -> RpcResult<GetSupportedFunctionsResult> {
        Ok(relay_handlers_common::supported_functions::get_supported_functions())
    }
}
