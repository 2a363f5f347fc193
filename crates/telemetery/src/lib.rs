use anyhow::Context;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace::TracerProvider, Resource};
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global tracing subscriber.
///
/// Logs always go to stdout through a fmt layer filtered by `RUST_LOG`. When a
/// collection endpoint is given, spans are also exported over OTLP.
pub struct Telemetery {
    service_name: String,
    collection_endpoint: Option<Url>,
    tracer_provider: Option<TracerProvider>,
}

impl Telemetery {
    pub fn new(service_name: String, collection_endpoint: Option<Url>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !service_name.trim().is_empty(),
            "Telemetry service name must not be empty"
        );
        Ok(Self {
            service_name,
            collection_endpoint,
            tracer_provider: None,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn setup(&mut self) -> anyhow::Result<()> {
        let registry = tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().with_target(true));

        match self.collection_endpoint.clone() {
            Some(endpoint) => {
                let provider = self.tracer_provider(&endpoint)?;
                let tracer = provider.tracer(self.service_name.clone());
                registry
                    .with(tracing_opentelemetry::layer().with_tracer(tracer))
                    .try_init()
                    .context("Failed to install tracing subscriber")?;
                self.tracer_provider = Some(provider);
                tracing::info!(
                    service = %self.service_name,
                    otlp_endpoint = %endpoint,
                    "OTLP trace export enabled"
                );
            }
            None => registry
                .try_init()
                .context("Failed to install tracing subscriber")?,
        }
        Ok(())
    }

    /// Flush and stop span export
    pub fn shutdown(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Failed to shut down tracer provider");
            }
        }
    }

    fn tracer_provider(&self, endpoint: &Url) -> anyhow::Result<TracerProvider> {
        opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(endpoint.as_str()),
            )
            .with_trace_config(
                opentelemetry_sdk::trace::Config::default().with_resource(Resource::new(vec![
                    KeyValue::new(SERVICE_NAME, self.service_name.clone()),
                ])),
            )
            .install_batch(runtime::Tokio)
            .context("Failed to install OTLP tracer")
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_service_name() {
        assert!(Telemetery::new("  ".to_string(), None).is_err());
    }

    #[test]
    fn test_setup_without_collector() {
        let mut telemetery = Telemetery::new("fabric_relay".to_string(), None).unwrap();
        assert_eq!(telemetery.service_name(), "fabric_relay");
        telemetery.setup().unwrap();
        tracing::info!("subscriber installed");
        telemetery.shutdown();
    }
}
