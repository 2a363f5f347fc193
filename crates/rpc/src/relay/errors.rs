use relay_handlers_common::functions::SubmissionError;
use relay_handlers_common::invoke_transaction::InvokeTransactionError;
use serde_json::json;

#[cfg_attr(test, derive(PartialEq, Eq))]
#[derive(thiserror::Error, Debug)]
pub enum RelayRpcApiError {
    #[error(transparent)]
    InvokeTransaction(#[from] InvokeTransactionError),
}

pub const UNSUPPORTED_OPERATION: i32 = 10;
pub const INVALID_ARGUMENTS: i32 = 11;
pub const INVALID_TRANSIENT_DATA: i32 = 12;
pub const IDENTITY_RESOLVER_ERROR: i32 = 20;
pub const NETWORK_CLIENT_ERROR: i32 = 30;

impl From<&RelayRpcApiError> for i32 {
    fn from(err: &RelayRpcApiError) -> Self {
        match err {
            RelayRpcApiError::InvokeTransaction(err) => match err {
                InvokeTransactionError::UnsupportedOperation(_) => UNSUPPORTED_OPERATION,
                InvokeTransactionError::InvalidSubmission(
                    SubmissionError::InvalidTransientPayload(_),
                ) => INVALID_TRANSIENT_DATA,
                InvokeTransactionError::InvalidSubmission(_) => INVALID_ARGUMENTS,
                InvokeTransactionError::IdentityResolverError(_) => IDENTITY_RESOLVER_ERROR,
                InvokeTransactionError::NetworkClientError(_) => NETWORK_CLIENT_ERROR,
            },
        }
    }
}

impl RelayRpcApiError {
    pub fn data(&self) -> Option<serde_json::Value> {
        match self {
            RelayRpcApiError::InvokeTransaction(data) => Some(json!(data)),
        }
    }
}

impl From<RelayRpcApiError> for jsonrpsee::types::ErrorObjectOwned {
    fn from(err: RelayRpcApiError) -> Self {
        jsonrpsee::types::ErrorObjectOwned::owned((&err).into(), err.to_string(), err.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_handlers_common::transient::TransientPayloadError;
    use relay_primitives::context::{IdentityResolverError, NetworkClientError};
    use rstest::rstest;

    #[rstest]
    #[case(InvokeTransactionError::UnsupportedOperation("Foo".to_string()), UNSUPPORTED_OPERATION)]
    #[case(
        InvokeTransactionError::InvalidSubmission(SubmissionError::MissingArguments {
            function: "CreateCar".to_string(),
            expected: 1,
            provided: 0,
        }),
        INVALID_ARGUMENTS
    )]
    #[case(
        InvokeTransactionError::InvalidSubmission(SubmissionError::InvalidTransientPayload(
            TransientPayloadError::Missing
        )),
        INVALID_TRANSIENT_DATA
    )]
    #[case(
        InvokeTransactionError::IdentityResolverError(
            IdentityResolverError::ConnectionProfileNotFound("Org1".to_string())
        ),
        IDENTITY_RESOLVER_ERROR
    )]
    #[case(
        InvokeTransactionError::NetworkClientError(NetworkClientError::Disconnected),
        NETWORK_CLIENT_ERROR
    )]
    fn test_error_codes(#[case] err: InvokeTransactionError, #[case] code: i32) {
        let message = err.to_string();
        let object = jsonrpsee::types::ErrorObjectOwned::from(RelayRpcApiError::from(err));
        assert_eq!(object.code(), code);
        assert_eq!(object.message(), message);
        assert!(object.data().is_some());
    }
}
