use crate::{
    relay::{errors::RelayRpcApiError, v0_1_0::RelayWriteRpcApiServer},
    RpcContext,
};
use jsonrpsee::core::{async_trait, RpcResult};
use relay_primitives::rpc::{InvokeTransactionParams, InvokeTransactionResult};

#[async_trait]
impl RelayWriteRpcApiServer for RpcContext {
    async fn invoke_transaction(
        &self,
        invoke_transaction: InvokeTransactionParams,
    ) -> RpcResult<InvokeTransactionResult> {
        let result = relay_handlers_common::invoke_transaction::invoke_transaction(
            self.global_ctx.clone(),
            invoke_transaction,
        )
        .await
        .map_err(RelayRpcApiError::from)?;
        Ok(result)
    }
}
