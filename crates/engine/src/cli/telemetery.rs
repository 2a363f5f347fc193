use clap::Args;
use relay_utils::url::parse_url;
use url::Url;

/// Parameters used to config telemetry.
#[derive(Debug, Clone, Args)]
pub struct TelemetryParams {
    /// Name of the service.
    #[arg(
        env = "FABRIC_RELAY_ANALYTICS_SERVICE_NAME",
        long,
        alias = "analytics",
        default_value = "fabric_relay"
    )]
    pub telemetry_service_name: String,

    /// Endpoint of the OTLP collector. Spans are only exported when set.
    #[arg(env = "OTEL_EXPORTER_OTLP_ENDPOINT", long, value_parser = parse_url, default_value = None)]
    pub telemetry_collection_endpoint: Option<Url>,
}
