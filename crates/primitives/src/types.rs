use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Private data attached to a submission. Keys are document names, values are
/// the serialized documents.
pub type TransientMap = BTreeMap<String, Vec<u8>>;

/// Client connection profile of an organization.
///
/// The relay never looks inside the document, it only hands it back to the
/// network client that resolved it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub organization: String,
    pub document: serde_json::Value,
}

impl ConnectionProfile {
    pub fn new(organization: impl Into<String>, document: serde_json::Value) -> Self {
        Self {
            organization: organization.into(),
            document,
        }
    }

    /// Name declared by the profile, if any.
    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(|name| name.as_str())
    }

    /// Organization the profile declares its client belongs to, if any.
    pub fn client_organization(&self) -> Option<&str> {
        self.document
            .get("client")
            .and_then(|client| client.get("organization"))
            .and_then(|org| org.as_str())
    }
}

/// Handle on the credential storage of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStore {
    pub organization: String,
    pub location: String,
}

impl CredentialStore {
    pub fn new(organization: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            location: location.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub certificate: String,
    pub private_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("certificate", &self.certificate)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// A wallet entry. Only read by the relay, never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(skip)]
    pub label: String,
    pub msp_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryOptions {
    pub enabled: bool,
    pub as_localhost: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            as_localhost: true,
        }
    }
}

/// Options for opening a gateway connection on behalf of a wallet identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub store: CredentialStore,
    pub identity: String,
    pub discovery: DiscoveryOptions,
}
