use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args};
use relay_primitives::types::DiscoveryOptions;
use relay_utils::url::parse_url;
use url::Url;

/// Parameters used to reach the fabric network.
#[derive(Debug, Clone, Args)]
pub struct FabricParams {
    /// Directory holding the `connection-<org>.json` profiles.
    #[arg(env = "FABRIC_RELAY_PROFILES_DIR", long, default_value = "config")]
    pub profiles_dir: PathBuf,

    /// Directory holding one `<org>-wallet` directory per organization.
    #[arg(env = "FABRIC_RELAY_WALLETS_DIR", long, default_value = ".")]
    pub wallets_dir: PathBuf,

    /// Base URL of the REST gateway in front of the peers.
    #[arg(env = "FABRIC_RELAY_GATEWAY_URL", long, value_parser = parse_url)]
    pub gateway_url: Url,

    /// Base URL of the registrar that enrolls missing identities.
    #[arg(env = "FABRIC_RELAY_REGISTRAR_URL", long, value_parser = parse_url, default_value = None)]
    pub registrar_url: Option<Url>,

    /// Timeout of gateway and registrar requests, in seconds.
    #[arg(env = "FABRIC_RELAY_REQUEST_TIMEOUT", long, default_value_t = 30)]
    pub request_timeout: u64,

    /// Let the gateway discover endorsing peers.
    #[arg(env = "FABRIC_RELAY_DISCOVERY_ENABLED", long, default_value_t = true, action = ArgAction::Set)]
    pub discovery_enabled: bool,

    /// Map discovered peer addresses to localhost.
    #[arg(env = "FABRIC_RELAY_DISCOVERY_AS_LOCALHOST", long, default_value_t = true, action = ArgAction::Set)]
    pub discovery_as_localhost: bool,
}

impl FabricParams {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn discovery(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            enabled: self.discovery_enabled,
            as_localhost: self.discovery_as_localhost,
        }
    }
}
