use std::sync::Arc;

use serde::Serialize;

use crate::types::{
    ConnectOptions, ConnectionProfile, CredentialStore, DiscoveryOptions, Identity, TransientMap,
};

#[derive(Debug, thiserror::Error, Serialize, PartialEq, Eq, Clone)]
pub enum IdentityResolverError {
    #[error("Connection profile not found for organization {0}")]
    ConnectionProfileNotFound(String),
    #[error("Invalid connection profile: {0}")]
    InvalidConnectionProfile(String),
    #[error("Credential store error: {0}")]
    CredentialStore(String),
    #[error("Invalid identity {label}: {reason}")]
    InvalidIdentity { label: String, reason: String },
    #[error("Registration failed: {0}")]
    RegistrationFailed(String),
}

#[derive(Debug, thiserror::Error, Serialize, PartialEq, Eq, Clone)]
pub enum NetworkClientError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Identity {0} not found in credential store")]
    IdentityNotFound(String),
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),
    #[error("Chaincode not found: {0}")]
    ChaincodeNotFound(String),
    #[error("Submission failed: {0}")]
    Submission(String),
    #[error("Connection already closed")]
    Disconnected,
}

/// Resolves everything the relay needs to know about a wallet identity.
///
/// Profiles and stores are looked up per organization, identities per
/// (store, username). Registration is a side effect: the relay triggers it and
/// returns, the caller retries once it has completed.
#[async_trait::async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Connection profile for the organization's clients
    async fn resolve_connection_profile(
        &self,
        organization: &str,
    ) -> Result<ConnectionProfile, IdentityResolverError>;

    /// Credential storage of the organization
    async fn resolve_credential_store(
        &self,
        organization: &str,
    ) -> Result<CredentialStore, IdentityResolverError>;

    /// Look up an identity, `None` if the store does not hold it
    async fn lookup_identity(
        &self,
        store: &CredentialStore,
        username: &str,
    ) -> Result<Option<Identity>, IdentityResolverError>;

    /// Start registering a new identity for the organization
    async fn register_identity(
        &self,
        username: &str,
        organization: &str,
    ) -> Result<(), IdentityResolverError>;
}

/// Entry point of the peer network client.
#[async_trait::async_trait]
pub trait NetworkClient: Send + Sync {
    async fn connect(
        &self,
        profile: &ConnectionProfile,
        options: ConnectOptions,
    ) -> Result<Box<dyn GatewayConnection>, NetworkClientError>;
}

/// An open gateway connection. Must be disconnected by whoever opened it.
#[async_trait::async_trait]
pub trait GatewayConnection: Send + Sync {
    /// View of a channel through this connection
    async fn get_network(&self, channel: &str) -> Result<Box<dyn Network>, NetworkClientError>;

    /// Release the connection
    async fn disconnect(&self) -> Result<(), NetworkClientError>;
}

pub trait Network: Send + Sync {
    fn get_contract(&self, chaincode: &str) -> Result<Box<dyn Contract>, NetworkClientError>;
}

#[async_trait::async_trait]
pub trait Contract: Send + Sync {
    /// Submit a transaction and return the raw bytes the chaincode produced
    async fn submit(
        &self,
        function: &str,
        args: Vec<String>,
    ) -> Result<Vec<u8>, NetworkClientError>;

    /// Submit a transaction carrying private data alongside its arguments
    async fn submit_with_transient(
        &self,
        function: &str,
        transient: TransientMap,
        args: Vec<String>,
    ) -> Result<Vec<u8>, NetworkClientError>;
}

/// Settings applied to every invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvokerConfig {
    pub discovery: DiscoveryOptions,
}

pub struct GlobalContext {
    identity_resolver: Arc<dyn IdentityResolver>,
    network_client: Arc<dyn NetworkClient>,
    config: InvokerConfig,
}

impl GlobalContext {
    pub fn new(
        identity_resolver: Arc<dyn IdentityResolver>,
        network_client: Arc<dyn NetworkClient>,
        config: InvokerConfig,
    ) -> Self {
        Self {
            identity_resolver,
            network_client,
            config,
        }
    }

    pub fn identity_resolver(&self) -> Arc<dyn IdentityResolver> {
        self.identity_resolver.clone()
    }

    pub fn network_client(&self) -> Arc<dyn NetworkClient> {
        self.network_client.clone()
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }
}
