//! Recording stand-ins for the identity resolver and the network client.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relay_primitives::context::{
    Contract, GatewayConnection, GlobalContext, IdentityResolver, IdentityResolverError,
    InvokerConfig, Network, NetworkClient, NetworkClientError,
};
use relay_primitives::types::{
    ConnectOptions, ConnectionProfile, CredentialStore, Credentials, Identity, TransientMap,
};

pub fn global_context(
    resolver: Arc<MockIdentityResolver>,
    client: Arc<MockNetworkClient>,
) -> Arc<GlobalContext> {
    Arc::new(GlobalContext::new(
        resolver,
        client,
        InvokerConfig::default(),
    ))
}

pub struct MockIdentityResolver {
    identities: HashSet<String>,
    has_profile: bool,
    registration_fails: bool,
    lookups: AtomicUsize,
    registrations: Mutex<Vec<(String, String)>>,
}

impl MockIdentityResolver {
    pub fn with_identities(identities: &[&str]) -> Self {
        Self {
            identities: identities.iter().map(|i| i.to_string()).collect(),
            has_profile: true,
            registration_fails: false,
            lookups: AtomicUsize::new(0),
            registrations: Mutex::new(vec![]),
        }
    }

    /// Resolver that knows no organization at all
    pub fn without_profile() -> Self {
        Self {
            has_profile: false,
            ..Self::with_identities(&[])
        }
    }

    /// Every registration request is recorded, then rejected
    pub fn failing_registration(mut self) -> Self {
        self.registration_fails = true;
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn registrations(&self) -> Vec<(String, String)> {
        self.registrations.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityResolver for MockIdentityResolver {
    async fn resolve_connection_profile(
        &self,
        organization: &str,
    ) -> Result<ConnectionProfile, IdentityResolverError> {
        if !self.has_profile {
            return Err(IdentityResolverError::ConnectionProfileNotFound(
                organization.to_string(),
            ));
        }
        Ok(ConnectionProfile::new(
            organization,
            serde_json::json!({ "client": { "organization": organization } }),
        ))
    }

    async fn resolve_credential_store(
        &self,
        organization: &str,
    ) -> Result<CredentialStore, IdentityResolverError> {
        Ok(CredentialStore::new(
            organization,
            format!("memory://{}", organization.to_lowercase()),
        ))
    }

    async fn lookup_identity(
        &self,
        store: &CredentialStore,
        username: &str,
    ) -> Result<Option<Identity>, IdentityResolverError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if !self.identities.contains(username) {
            return Ok(None);
        }
        Ok(Some(Identity {
            label: username.to_string(),
            msp_id: format!("{}MSP", store.organization),
            kind: "X.509".to_string(),
            credentials: Credentials {
                certificate: "certificate".to_string(),
                private_key: "private-key".to_string(),
            },
        }))
    }

    async fn register_identity(
        &self,
        username: &str,
        organization: &str,
    ) -> Result<(), IdentityResolverError> {
        self.registrations
            .lock()
            .unwrap()
            .push((username.to_string(), organization.to_string()));
        if self.registration_fails {
            return Err(IdentityResolverError::RegistrationFailed(format!(
                "{} is not known to the {} certificate authority",
                username, organization
            )));
        }
        Ok(())
    }
}

/// A submission as seen by a [`MockNetworkClient`] contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCall {
    pub channel: String,
    pub chaincode: String,
    pub function: String,
    pub args: Vec<String>,
    pub transient: Option<TransientMap>,
}

#[derive(Default)]
struct Recorder {
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    options: Mutex<Vec<ConnectOptions>>,
    submissions: Mutex<Vec<SubmitCall>>,
}

#[derive(Clone)]
struct Behaviour {
    response: Result<Vec<u8>, NetworkClientError>,
    channels: Option<Vec<String>>,
    refuse_connections: bool,
    fail_disconnect: bool,
}

pub struct MockNetworkClient {
    behaviour: Behaviour,
    recorder: Arc<Recorder>,
}

impl MockNetworkClient {
    /// Every submission succeeds with `response` as raw result
    pub fn returning(response: &[u8]) -> Self {
        Self::with_response(Ok(response.to_vec()))
    }

    /// Every submission fails with `error`
    pub fn failing(error: NetworkClientError) -> Self {
        Self::with_response(Err(error))
    }

    pub fn refusing_connections() -> Self {
        let mut client = Self::returning(b"");
        client.behaviour.refuse_connections = true;
        client
    }

    /// Only the given channels exist
    pub fn with_channels(mut self, channels: &[&str]) -> Self {
        self.behaviour.channels = Some(channels.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn failing_disconnect(mut self) -> Self {
        self.behaviour.fail_disconnect = true;
        self
    }

    fn with_response(response: Result<Vec<u8>, NetworkClientError>) -> Self {
        Self {
            behaviour: Behaviour {
                response,
                channels: None,
                refuse_connections: false,
                fail_disconnect: false,
            },
            recorder: Arc::new(Recorder::default()),
        }
    }

    pub fn connects(&self) -> usize {
        self.recorder.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.recorder.disconnects.load(Ordering::SeqCst)
    }

    pub fn connect_options(&self) -> Vec<ConnectOptions> {
        self.recorder.options.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<SubmitCall> {
        self.recorder.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkClient for MockNetworkClient {
    async fn connect(
        &self,
        _profile: &ConnectionProfile,
        options: ConnectOptions,
    ) -> Result<Box<dyn GatewayConnection>, NetworkClientError> {
        if self.behaviour.refuse_connections {
            return Err(NetworkClientError::Connection(
                "connection refused".to_string(),
            ));
        }
        self.recorder.connects.fetch_add(1, Ordering::SeqCst);
        self.recorder.options.lock().unwrap().push(options);
        Ok(Box::new(MockConnection {
            id: uuid::Uuid::new_v4(),
            behaviour: self.behaviour.clone(),
            recorder: self.recorder.clone(),
        }))
    }
}

struct MockConnection {
    id: uuid::Uuid,
    behaviour: Behaviour,
    recorder: Arc<Recorder>,
}

#[async_trait]
impl GatewayConnection for MockConnection {
    async fn get_network(&self, channel: &str) -> Result<Box<dyn Network>, NetworkClientError> {
        if let Some(channels) = &self.behaviour.channels {
            if !channels.iter().any(|c| c == channel) {
                return Err(NetworkClientError::ChannelNotFound(channel.to_string()));
            }
        }
        Ok(Box::new(MockNetwork {
            channel: channel.to_string(),
            behaviour: self.behaviour.clone(),
            recorder: self.recorder.clone(),
        }))
    }

    async fn disconnect(&self) -> Result<(), NetworkClientError> {
        self.recorder.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.behaviour.fail_disconnect {
            return Err(NetworkClientError::Connection(format!(
                "connection {} did not close cleanly",
                self.id
            )));
        }
        Ok(())
    }
}

struct MockNetwork {
    channel: String,
    behaviour: Behaviour,
    recorder: Arc<Recorder>,
}

impl Network for MockNetwork {
    fn get_contract(&self, chaincode: &str) -> Result<Box<dyn Contract>, NetworkClientError> {
        Ok(Box::new(MockContract {
            channel: self.channel.clone(),
            chaincode: chaincode.to_string(),
            behaviour: self.behaviour.clone(),
            recorder: self.recorder.clone(),
        }))
    }
}

struct MockContract {
    channel: String,
    chaincode: String,
    behaviour: Behaviour,
    recorder: Arc<Recorder>,
}

impl MockContract {
    fn record(
        &self,
        function: &str,
        args: Vec<String>,
        transient: Option<TransientMap>,
    ) -> Result<Vec<u8>, NetworkClientError> {
        self.recorder.submissions.lock().unwrap().push(SubmitCall {
            channel: self.channel.clone(),
            chaincode: self.chaincode.clone(),
            function: function.to_string(),
            args,
            transient,
        });
        self.behaviour.response.clone()
    }
}

#[async_trait]
impl Contract for MockContract {
    async fn submit(
        &self,
        function: &str,
        args: Vec<String>,
    ) -> Result<Vec<u8>, NetworkClientError> {
        self.record(function, args, None)
    }

    async fn submit_with_transient(
        &self,
        function: &str,
        transient: TransientMap,
        args: Vec<String>,
    ) -> Result<Vec<u8>, NetworkClientError> {
        self.record(function, args, Some(transient))
    }
}
