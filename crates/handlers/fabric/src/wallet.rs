use std::io::ErrorKind;
use std::path::PathBuf;

use relay_primitives::context::IdentityResolverError;
use relay_primitives::types::Identity;
use tracing::debug;

const IDENTITY_FILE_EXTENSION: &str = "id";

/// Read-only view on a directory of `<label>.id` wallet entries.
#[derive(Debug, Clone)]
pub struct FileSystemWallet {
    path: PathBuf,
}

impl FileSystemWallet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn get(&self, label: &str) -> Result<Option<Identity>, IdentityResolverError> {
        if !is_valid_label(label) {
            return Err(IdentityResolverError::InvalidIdentity {
                label: label.to_string(),
                reason: "label must not be empty or contain path separators".to_string(),
            });
        }

        let file = self
            .path
            .join(format!("{}.{}", label, IDENTITY_FILE_EXTENSION));
        let contents = match tokio::fs::read(&file).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(label, wallet = %self.path.display(), "Identity not in wallet");
                return Ok(None);
            }
            Err(e) => return Err(IdentityResolverError::CredentialStore(e.to_string())),
        };

        let mut identity: Identity =
            serde_json::from_slice(&contents).map_err(|e| IdentityResolverError::InvalidIdentity {
                label: label.to_string(),
                reason: e.to_string(),
            })?;
        identity.label = label.to_string();
        Ok(Some(identity))
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label != "."
        && label != ".."
        && !label.contains(['/', '\\'])
}
