use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use relay_primitives::context::{IdentityResolver, IdentityResolverError};
use relay_primitives::types::{ConnectionProfile, CredentialStore, Identity};
use relay_utils::organization::{connection_profile_file, is_valid_organization, wallet_dir};
use relay_utils::url::join_segments;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::wallet::FileSystemWallet;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationRequest<'a> {
    username: &'a str,
    org_name: &'a str,
}

/// Resolves profiles and identities from the directories a fabric client
/// application keeps on disk.
///
/// * profiles: `<profiles_dir>/connection-<org>.json`
/// * wallets: `<wallets_dir>/<org>-wallet/<label>.id`
///
/// Registration is delegated to an HTTP registrar (`POST <registrar>/users`).
pub struct FileSystemIdentityResolver {
    profiles_dir: PathBuf,
    wallets_dir: PathBuf,
    registrar: Option<Registrar>,
}

struct Registrar {
    http: reqwest::Client,
    url: Url,
}

impl FileSystemIdentityResolver {
    pub fn new(profiles_dir: impl Into<PathBuf>, wallets_dir: impl Into<PathBuf>) -> Self {
        Self {
            profiles_dir: profiles_dir.into(),
            wallets_dir: wallets_dir.into(),
            registrar: None,
        }
    }

    pub fn with_registrar(mut self, url: Url, request_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build registrar HTTP client")?;
        let url = join_segments(&url, &["users"]).context("Invalid registrar URL")?;
        self.registrar = Some(Registrar { http, url });
        Ok(self)
    }

    fn check_organization(organization: &str) -> Result<(), IdentityResolverError> {
        if !is_valid_organization(organization) {
            return Err(IdentityResolverError::ConnectionProfileNotFound(
                organization.to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for FileSystemIdentityResolver {
    async fn resolve_connection_profile(
        &self,
        organization: &str,
    ) -> Result<ConnectionProfile, IdentityResolverError> {
        Self::check_organization(organization)?;
        let path = self
            .profiles_dir
            .join(connection_profile_file(organization));
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IdentityResolverError::ConnectionProfileNotFound(
                    organization.to_string(),
                ))
            }
            Err(e) => {
                return Err(IdentityResolverError::InvalidConnectionProfile(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let document: serde_json::Value = serde_json::from_slice(&contents).map_err(|e| {
            IdentityResolverError::InvalidConnectionProfile(format!("{}: {}", path.display(), e))
        })?;
        debug!(profile = %path.display(), "Loaded connection profile");
        Ok(ConnectionProfile::new(organization, document))
    }

    async fn resolve_credential_store(
        &self,
        organization: &str,
    ) -> Result<CredentialStore, IdentityResolverError> {
        Self::check_organization(organization)?;
        let path = self.wallets_dir.join(wallet_dir(organization));
        Ok(CredentialStore::new(
            organization,
            path.to_string_lossy().into_owned(),
        ))
    }

    async fn lookup_identity(
        &self,
        store: &CredentialStore,
        username: &str,
    ) -> Result<Option<Identity>, IdentityResolverError> {
        FileSystemWallet::new(&store.location).get(username).await
    }

    async fn register_identity(
        &self,
        username: &str,
        organization: &str,
    ) -> Result<(), IdentityResolverError> {
        let registrar = self.registrar.as_ref().ok_or_else(|| {
            IdentityResolverError::RegistrationFailed(
                "no registrar endpoint configured".to_string(),
            )
        })?;

        let response = registrar
            .http
            .post(registrar.url.clone())
            .json(&RegistrationRequest {
                username,
                org_name: organization,
            })
            .send()
            .await
            .map_err(|e| IdentityResolverError::RegistrationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityResolverError::RegistrationFailed(format!(
                "registrar answered {}: {}",
                status, body
            )));
        }

        info!(username, organization, "Registration requested");
        Ok(())
    }
}
