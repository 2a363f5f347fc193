use std::sync::Arc;

use relay_primitives::context::{
    Contract, GatewayConnection, GlobalContext, IdentityResolverError, NetworkClientError,
};
use relay_primitives::rpc::{InvokeTransactionParams, InvokeTransactionResult, SubmittedTransaction};
use relay_primitives::types::ConnectOptions;
use serde::Serialize;
use tracing::{debug, info, warn, Instrument};

use crate::functions::{self, Submission, SubmissionError};

#[derive(Debug, thiserror::Error, Serialize, PartialEq, Eq)]
pub enum InvokeTransactionError {
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error(transparent)]
    InvalidSubmission(#[from] SubmissionError),
    #[error("Identity resolver error: {0}")]
    IdentityResolverError(#[from] IdentityResolverError),
    #[error("Network client error: {0}")]
    NetworkClientError(#[from] NetworkClientError),
}

/// Submit one chaincode function call on behalf of a wallet identity.
///
/// The request is validated against the function registry before anything
/// else. A missing identity triggers its registration and returns
/// [`InvocationOutcome::NeedsRegistration`](relay_primitives::rpc::InvocationOutcome)
/// without connecting. Otherwise exactly one gateway connection is opened, and
/// it is closed again whatever the submission outcome.
pub async fn invoke_transaction(
    global_ctx: Arc<GlobalContext>,
    params: InvokeTransactionParams,
) -> Result<InvokeTransactionResult, InvokeTransactionError> {
    let span = tracing::info_span!(
        "invoke_transaction",
        invocation_id = %uuid::Uuid::new_v4(),
        channel = %params.channel,
        chaincode = %params.chaincode,
        function = %params.function,
        identity = %params.identity,
        organization = %params.organization,
    );
    invoke(global_ctx, params).instrument(span).await
}

async fn invoke(
    global_ctx: Arc<GlobalContext>,
    params: InvokeTransactionParams,
) -> Result<InvokeTransactionResult, InvokeTransactionError> {
    let function = functions::lookup(&params.function)
        .ok_or_else(|| InvokeTransactionError::UnsupportedOperation(params.function.clone()))?;
    let submission = function.prepare(&params.args, params.transient_data.as_deref())?;

    let resolver = global_ctx.identity_resolver();
    let profile = resolver
        .resolve_connection_profile(&params.organization)
        .await?;
    let store = resolver
        .resolve_credential_store(&params.organization)
        .await?;
    debug!(store = %store.location, "Resolved credential store");

    if resolver
        .lookup_identity(&store, &params.identity)
        .await?
        .is_none()
    {
        info!("Identity not found in wallet, triggering registration");
        resolver
            .register_identity(&params.identity, &params.organization)
            .await?;
        return Ok(InvokeTransactionResult::needs_registration(
            &params.identity,
            &params.organization,
        ));
    }

    let connection = global_ctx
        .network_client()
        .connect(
            &profile,
            ConnectOptions {
                store,
                identity: params.identity.clone(),
                discovery: global_ctx.config().discovery,
            },
        )
        .await?;

    let submitted = submit(
        connection.as_ref(),
        &params.channel,
        &params.chaincode,
        submission,
    )
    .await;
    let disconnected = connection.disconnect().await;

    let raw = match (submitted, disconnected) {
        (Ok(raw), Ok(())) => raw,
        (Ok(raw), Err(e)) => {
            warn!(error = %e, "Failed to disconnect after a successful submission");
            raw
        }
        (Err(e), Ok(())) => return Err(e.into()),
        (Err(e), Err(disconnect_err)) => {
            warn!(error = %disconnect_err, "Failed to disconnect after a failed submission");
            return Err(e.into());
        }
    };

    let transaction = SubmittedTransaction::from_raw(&raw);
    info!(transaction_id = %transaction.transaction_id, "Transaction submitted");
    Ok(InvokeTransactionResult::submitted(transaction))
}

async fn submit(
    connection: &dyn GatewayConnection,
    channel: &str,
    chaincode: &str,
    submission: Submission,
) -> Result<Vec<u8>, NetworkClientError> {
    let network = connection.get_network(channel).await?;
    let contract = network.get_contract(chaincode)?;
    dispatch(contract.as_ref(), submission).await
}

async fn dispatch(
    contract: &dyn Contract,
    submission: Submission,
) -> Result<Vec<u8>, NetworkClientError> {
    debug!(function = submission.function(), "Submitting transaction");
    match submission {
        Submission::Plain { function, args } => contract.submit(&function, args).await,
        Submission::WithTransient {
            function,
            transient,
            args,
        } => {
            contract
                .submit_with_transient(&function, transient, args)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use relay_primitives::rpc::InvocationOutcome;
    use relay_primitives::types::{DiscoveryOptions, TransientMap};
    use relay_tests_utils::mocks::{
        global_context, MockIdentityResolver, MockNetworkClient, SubmitCall,
    };
    use rstest::*;
    use tracing_test::traced_test;

    use crate::transient::TransientPayloadError;

    fn params(function: &str, args: &[&str], transient_data: Option<&str>) -> InvokeTransactionParams {
        InvokeTransactionParams {
            channel: "mychannel".to_string(),
            chaincode: "mycc".to_string(),
            function: function.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            identity: "user1".to_string(),
            organization: "Org1".to_string(),
            transient_data: transient_data.map(str::to_string),
        }
    }

    #[fixture]
    fn resolver() -> Arc<MockIdentityResolver> {
        Arc::new(MockIdentityResolver::with_identities(&["user1"]))
    }

    #[fixture]
    fn client() -> Arc<MockNetworkClient> {
        Arc::new(MockNetworkClient::returning(b"txid-0001"))
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_car_submits_positional_arg(
        resolver: Arc<MockIdentityResolver>,
        client: Arc<MockNetworkClient>,
    ) {
        let ctx = global_context(resolver.clone(), client.clone());

        let result = invoke_transaction(ctx, params("CreateCar", &["CAR1"], None))
            .await
            .unwrap();

        assert_eq!(
            result.outcome,
            InvocationOutcome::Submitted(SubmittedTransaction {
                transaction_id: "txid-0001".to_string()
            })
        );
        assert_eq!(result.message, None);
        assert_eq!(
            client.submissions(),
            vec![SubmitCall {
                channel: "mychannel".to_string(),
                chaincode: "mycc".to_string(),
                function: "SmartContract:CreateCar".to_string(),
                args: vec!["CAR1".to_string()],
                transient: None,
            }]
        );
        assert_eq!(client.connects(), 1);
        assert_eq!(client.disconnects(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_document_uses_document_contract(
        resolver: Arc<MockIdentityResolver>,
        client: Arc<MockNetworkClient>,
    ) {
        let ctx = global_context(resolver, client.clone());

        invoke_transaction(ctx, params("CreateDocument", &["{\"id\":\"D1\"}"], None))
            .await
            .unwrap();

        let submissions = client.submissions();
        assert_eq!(submissions[0].function, "DocumentContract:CreateDocument");
        assert_eq!(submissions[0].args, vec!["{\"id\":\"D1\"}".to_string()]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_private_car_carries_transient_document(
        resolver: Arc<MockIdentityResolver>,
        client: Arc<MockNetworkClient>,
    ) {
        let ctx = global_context(resolver, client.clone());

        invoke_transaction(
            ctx,
            params("CreatePrivateCar", &[], Some(r#"{"car":{"make":"Toyota"}}"#)),
        )
        .await
        .unwrap();

        assert_eq!(
            client.submissions(),
            vec![SubmitCall {
                channel: "mychannel".to_string(),
                chaincode: "mycc".to_string(),
                function: "SmartContract:CreatePrivateCar".to_string(),
                args: vec![],
                transient: Some(TransientMap::from([(
                    "car".to_string(),
                    br#"{"make":"Toyota"}"#.to_vec()
                )])),
            }]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_set_private_transaction_forwards_args_as_json(
        resolver: Arc<MockIdentityResolver>,
        client: Arc<MockNetworkClient>,
    ) {
        let ctx = global_context(resolver, client.clone());

        invoke_transaction(
            ctx,
            params(
                "SetPrivateTransaction",
                &["T1", "BankA"],
                Some(r#"{"transaction":{"amount":"10"}}"#),
            ),
        )
        .await
        .unwrap();

        let submissions = client.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].args, vec![r#"["T1","BankA"]"#.to_string()]);
        assert_eq!(
            submissions[0].transient,
            Some(TransientMap::from([(
                "transaction".to_string(),
                br#"{"amount":"10"}"#.to_vec()
            )]))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_missing_identity_triggers_registration(client: Arc<MockNetworkClient>) {
        let resolver = Arc::new(MockIdentityResolver::with_identities(&[]));
        let ctx = global_context(resolver.clone(), client.clone());

        let result = invoke_transaction(ctx, params("CreateCar", &["CAR1"], None))
            .await
            .unwrap();

        assert_eq!(
            result.outcome,
            InvocationOutcome::NeedsRegistration {
                identity: "user1".to_string(),
                organization: "Org1".to_string(),
            }
        );
        assert!(result.message.is_some());
        assert_eq!(
            resolver.registrations(),
            vec![("user1".to_string(), "Org1".to_string())]
        );
        assert_eq!(client.connects(), 0);
        assert!(client.submissions().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_registration_failure_is_reported(client: Arc<MockNetworkClient>) {
        let resolver = Arc::new(MockIdentityResolver::with_identities(&[]).failing_registration());
        let ctx = global_context(resolver.clone(), client.clone());

        let result = invoke_transaction(ctx, params("CreateCar", &["CAR1"], None)).await;

        assert_matches!(
            result,
            Err(InvokeTransactionError::IdentityResolverError(
                IdentityResolverError::RegistrationFailed(_)
            ))
        );
        assert_eq!(resolver.registrations().len(), 1);
        assert_eq!(client.connects(), 0);
        assert!(client.submissions().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_unsupported_function_touches_nothing(
        resolver: Arc<MockIdentityResolver>,
        client: Arc<MockNetworkClient>,
    ) {
        let ctx = global_context(resolver.clone(), client.clone());

        let err = invoke_transaction(ctx, params("DeleteCarById", &["CAR1"], None))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            InvokeTransactionError::UnsupportedOperation("DeleteCarById".to_string())
        );
        assert_eq!(resolver.lookups(), 0);
        assert_eq!(client.connects(), 0);
        assert!(client.submissions().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_malformed_transient_payload_fails_before_connecting(
        resolver: Arc<MockIdentityResolver>,
        client: Arc<MockNetworkClient>,
    ) {
        let ctx = global_context(resolver.clone(), client.clone());

        let err = invoke_transaction(ctx, params("CreatePrivateCar", &[], Some("{")))
            .await
            .unwrap_err();

        assert_matches!(
            err,
            InvokeTransactionError::InvalidSubmission(SubmissionError::InvalidTransientPayload(
                TransientPayloadError::InvalidJson(_)
            ))
        );
        assert_eq!(resolver.lookups(), 0);
        assert_eq!(client.connects(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_submission_failure_still_disconnects(resolver: Arc<MockIdentityResolver>) {
        let client = Arc::new(MockNetworkClient::failing(NetworkClientError::Submission(
            "endorsement policy failure".to_string(),
        )));
        let ctx = global_context(resolver, client.clone());

        let err = invoke_transaction(ctx, params("CreateCar", &["CAR1"], None))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Network client error: Submission failed: endorsement policy failure"
        );
        assert_eq!(client.connects(), 1);
        assert_eq!(client.disconnects(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_unknown_channel_still_disconnects(resolver: Arc<MockIdentityResolver>) {
        let client = Arc::new(MockNetworkClient::returning(b"txid").with_channels(&["other"]));
        let ctx = global_context(resolver, client.clone());

        let err = invoke_transaction(ctx, params("CreateCar", &["CAR1"], None))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            InvokeTransactionError::NetworkClientError(NetworkClientError::ChannelNotFound(
                "mychannel".to_string()
            ))
        );
        assert_eq!(client.disconnects(), 1);
        assert!(client.submissions().is_empty());
    }

    #[rstest]
    #[tokio::test]
    #[traced_test]
    async fn test_disconnect_failure_keeps_transaction_id(resolver: Arc<MockIdentityResolver>) {
        let client = Arc::new(MockNetworkClient::returning(b"txid-0002").failing_disconnect());
        let ctx = global_context(resolver, client.clone());

        let result = invoke_transaction(ctx, params("SetTransaction", &["{}"], None))
            .await
            .unwrap();

        assert_eq!(result.transaction_id(), Some("txid-0002"));
        assert_eq!(client.disconnects(), 1);
        assert!(logs_contain("Failed to disconnect after a successful submission"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_connect_failure_is_reported(resolver: Arc<MockIdentityResolver>) {
        let client = Arc::new(MockNetworkClient::refusing_connections());
        let ctx = global_context(resolver, client.clone());

        let err = invoke_transaction(ctx, params("CreateCar", &["CAR1"], None))
            .await
            .unwrap_err();

        assert_matches!(
            err,
            InvokeTransactionError::NetworkClientError(NetworkClientError::Connection(_))
        );
        assert_eq!(client.disconnects(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_resolver_failure_is_reported(client: Arc<MockNetworkClient>) {
        let resolver = Arc::new(MockIdentityResolver::without_profile());
        let ctx = global_context(resolver, client.clone());

        let err = invoke_transaction(ctx, params("CreateCar", &["CAR1"], None))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            InvokeTransactionError::IdentityResolverError(
                IdentityResolverError::ConnectionProfileNotFound("Org1".to_string())
            )
        );
        assert_eq!(client.connects(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_connect_options_come_from_config(
        resolver: Arc<MockIdentityResolver>,
        client: Arc<MockNetworkClient>,
    ) {
        let ctx = global_context(resolver, client.clone());

        invoke_transaction(ctx, params("CreateCar", &["CAR1"], None))
            .await
            .unwrap();

        let options = client.connect_options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].identity, "user1");
        assert_eq!(options[0].store.organization, "Org1");
        assert_eq!(options[0].discovery, DiscoveryOptions::default());
    }

    #[rstest]
    #[tokio::test]
    async fn test_concurrent_invocations_use_own_connections(
        resolver: Arc<MockIdentityResolver>,
        client: Arc<MockNetworkClient>,
    ) {
        let ctx = global_context(resolver, client.clone());

        let results = futures::future::join_all((0..4).map(|i| {
            invoke_transaction(
                ctx.clone(),
                params("CreateCar", &[format!("CAR{}", i).as_str()], None),
            )
        }))
        .await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(client.connects(), 4);
        assert_eq!(client.disconnects(), 4);
        assert_eq!(client.submissions().len(), 4);
    }
}
