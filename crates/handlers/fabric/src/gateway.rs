use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use relay_primitives::context::{
    Contract, GatewayConnection, Network, NetworkClient, NetworkClientError,
};
use relay_primitives::types::{ConnectOptions, ConnectionProfile, DiscoveryOptions, TransientMap};
use relay_utils::url::join_segments;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::wallet::FileSystemWallet;

/// Network client for a REST gateway fronting the peers.
///
/// Every submission is a `POST <gateway>/channels/<channel>/chaincodes/<chaincode>/transactions`
/// carrying the submitter's certificate. The gateway endorses, orders and
/// waits for commit, then answers with the raw chaincode result.
pub struct HttpGatewayClient {
    http: reqwest::Client,
    gateway_url: Url,
}

impl HttpGatewayClient {
    pub fn new(gateway_url: Url, request_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build gateway HTTP client")?;
        Ok(Self { http, gateway_url })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Submitter {
    msp_id: String,
    certificate: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    function: &'a str,
    args: Vec<String>,
    /// Hex encoded transient values
    transient: BTreeMap<String, String>,
    submitter: &'a Submitter,
    discovery: DiscoveryOptions,
}

struct Session {
    http: reqwest::Client,
    gateway_url: Url,
    submitter: Submitter,
    discovery: DiscoveryOptions,
    closed: AtomicBool,
}

impl Session {
    fn ensure_open(&self) -> Result<(), NetworkClientError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(NetworkClientError::Disconnected);
        }
        Ok(())
    }

    async fn submit(
        &self,
        channel: &str,
        chaincode: &str,
        function: &str,
        transient: TransientMap,
        args: Vec<String>,
    ) -> Result<Vec<u8>, NetworkClientError> {
        self.ensure_open()?;
        let url = join_segments(
            &self.gateway_url,
            &["channels", channel, "chaincodes", chaincode, "transactions"],
        )
        .map_err(|e| NetworkClientError::Connection(e.to_string()))?;

        let request = SubmitRequest {
            function,
            args,
            transient: transient
                .into_iter()
                .map(|(key, value)| (key, hex::encode(value)))
                .collect(),
            submitter: &self.submitter,
            discovery: self.discovery,
        };

        debug!(%url, function, "Posting transaction to gateway");
        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NetworkClientError::Connection(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(NetworkClientError::ChaincodeNotFound(format!(
                "{}/{}",
                channel, chaincode
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkClientError::Submission(format!(
                "gateway answered {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NetworkClientError::Connection(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl NetworkClient for HttpGatewayClient {
    async fn connect(
        &self,
        profile: &ConnectionProfile,
        options: ConnectOptions,
    ) -> Result<Box<dyn GatewayConnection>, NetworkClientError> {
        if let Some(client_org) = profile.client_organization() {
            if client_org != profile.organization {
                return Err(NetworkClientError::Connection(format!(
                    "profile belongs to {}, not {}",
                    client_org, profile.organization
                )));
            }
        }

        let identity = FileSystemWallet::new(&options.store.location)
            .get(&options.identity)
            .await
            .map_err(|e| NetworkClientError::Connection(e.to_string()))?
            .ok_or_else(|| NetworkClientError::IdentityNotFound(options.identity.clone()))?;

        debug!(
            gateway = %self.gateway_url,
            identity = %identity.label,
            msp_id = %identity.msp_id,
            "Opened gateway session"
        );
        Ok(Box::new(HttpGatewayConnection {
            session: Arc::new(Session {
                http: self.http.clone(),
                gateway_url: self.gateway_url.clone(),
                submitter: Submitter {
                    msp_id: identity.msp_id,
                    certificate: identity.credentials.certificate,
                },
                discovery: options.discovery,
                closed: AtomicBool::new(false),
            }),
        }))
    }
}

pub struct HttpGatewayConnection {
    session: Arc<Session>,
}

#[async_trait]
impl GatewayConnection for HttpGatewayConnection {
    async fn get_network(&self, channel: &str) -> Result<Box<dyn Network>, NetworkClientError> {
        self.session.ensure_open()?;
        if channel.is_empty() {
            return Err(NetworkClientError::ChannelNotFound(channel.to_string()));
        }
        Ok(Box::new(HttpNetwork {
            session: self.session.clone(),
            channel: channel.to_string(),
        }))
    }

    async fn disconnect(&self) -> Result<(), NetworkClientError> {
        if self.session.closed.swap(true, Ordering::SeqCst) {
            return Err(NetworkClientError::Disconnected);
        }
        debug!("Closed gateway session");
        Ok(())
    }
}

struct HttpNetwork {
    session: Arc<Session>,
    channel: String,
}

impl Network for HttpNetwork {
    fn get_contract(&self, chaincode: &str) -> Result<Box<dyn Contract>, NetworkClientError> {
        if chaincode.is_empty() {
            return Err(NetworkClientError::ChaincodeNotFound(chaincode.to_string()));
        }
        Ok(Box::new(HttpContract {
            session: self.session.clone(),
            channel: self.channel.clone(),
            chaincode: chaincode.to_string(),
        }))
    }
}

struct HttpContract {
    session: Arc<Session>,
    channel: String,
    chaincode: String,
}

#[async_trait]
impl Contract for HttpContract {
    async fn submit(
        &self,
        function: &str,
        args: Vec<String>,
    ) -> Result<Vec<u8>, NetworkClientError> {
        self.session
            .submit(
                &self.channel,
                &self.chaincode,
                function,
                TransientMap::new(),
                args,
            )
            .await
    }

    async fn submit_with_transient(
        &self,
        function: &str,
        transient: TransientMap,
        args: Vec<String>,
    ) -> Result<Vec<u8>, NetworkClientError> {
        self.session
            .submit(&self.channel, &self.chaincode, function, transient, args)
            .await
    }
}
