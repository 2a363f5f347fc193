//! File naming conventions of per-organization artifacts.

/// Lowercased organization name as used in file names, e.g. `Org1` -> `org1`
pub fn org_slug(organization: &str) -> String {
    organization.trim().to_lowercase()
}

pub fn connection_profile_file(organization: &str) -> String {
    format!("connection-{}.json", org_slug(organization))
}

pub fn wallet_dir(organization: &str) -> String {
    format!("{}-wallet", org_slug(organization))
}

/// Organization names end up in file paths, so only a conservative charset
/// is accepted.
pub fn is_valid_organization(organization: &str) -> bool {
    !organization.is_empty()
        && organization
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
