//! # P2P Exchange Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize tracing (optionally exported over OTLP)
//! - Initialize the repository adapter and the rate provider
//! - Create the exchange service
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::{CachedRates, ExchangeRateApi, StaticRates};
use p2p_hex::{ExchangeService, inbound::HttpServer};
use p2p_repo::build_repo;
use p2p_types::RateProvider;

use config::Config;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking).
    // The endpoint is read from OTEL_EXPORTER_OTLP_ENDPOINT by the exporter.
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("p2p-exchange"), provider))
}

fn build_rate_provider(config: &Config) -> Arc<dyn RateProvider> {
    match &config.exchange_rate_api_key {
        Some(key) => {
            tracing::info!(
                url = %config.exchange_rate_api_url,
                ttl_secs = config.rate_cache_ttl.as_secs(),
                "Using live exchange rates"
            );
            let api = ExchangeRateApi::with_base_url(&config.exchange_rate_api_url, key);
            Arc::new(CachedRates::new(api, config.rate_cache_ttl))
        }
        None => {
            tracing::warn!("EXCHANGE_RATE_API_KEY not set; using built-in reference rates");
            Arc::new(StaticRates::builtin())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize OpenTelemetry tracing only when a collector is configured
    let otel = match &config.otel_endpoint {
        Some(_) => Some(init_tracer()?),
        None => None,
    };
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,p2p_app=debug,p2p_hex=debug".into()),
        )
        .with(config.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.log_json).then(|| tracing_subscriber::fmt::layer()))
        .with(telemetry)
        .init();

    tracing::info!("Starting exchange server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_display());

    // Build repository; the database is reached in the background
    let repo = build_repo(&config.database_url, &config.pool).await?;

    // Create the exchange service
    let service = ExchangeService::new(repo, build_rate_provider(&config));

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(service, config.rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}
