use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;
use relay_primitives::rpc::{
    GetSupportedFunctionsResult, InvokeTransactionParams, InvokeTransactionResult,
};

#[rpc(server, namespace = "relay")]
pub trait RelayWriteRpcApi {
    /// Submit a chaincode function on behalf of a wallet identity
    #[method(name = "invokeTransaction")]
    async fn invoke_transaction(
        &self,
        invoke_transaction: InvokeTransactionParams,
    ) -> RpcResult<InvokeTransactionResult>;
}

#[rpc(server, namespace = "relay")]
pub trait RelayReadRpcApi {
    /// List the chaincode functions the relay can dispatch
    #[method(name = "getSupportedFunctions")]
    async fn get_supported_functions(&self) -> RpcResult<GetSupportedFunctionsResult>;
}
