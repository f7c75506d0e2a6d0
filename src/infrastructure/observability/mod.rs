use crate::config::Config;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace as sdktrace, Resource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "shelter_walks=debug,tower_http=debug,sqlx=warn";

/// Flushes pending spans on drop when the OTLP exporter is running
pub struct ObservabilityGuard {
    otlp_enabled: bool,
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        if self.otlp_enabled {
            global::shutdown_tracer_provider();
        }
    }
}

pub fn init(config: &Config) -> Result<ObservabilityGuard, Box<dyn std::error::Error>> {
    let otlp_enabled = init_tracing(config)?;
    init_metrics(config.metrics_port)?;
    Ok(ObservabilityGuard { otlp_enabled })
}

fn init_tracing(config: &Config) -> Result<bool, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_target(true);

    let otel_layer = match &config.otel_exporter_endpoint {
        Some(endpoint) => Some(
            tracing_opentelemetry::layer().with_tracer(otlp_tracer(endpoint, &config.service_name)?),
        ),
        None => None,
    };
    let otlp_enabled = otel_layer.is_some();

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    if let Some(endpoint) = &config.otel_exporter_endpoint {
        tracing::info!("Exporting spans to {}", endpoint);
    }
    Ok(otlp_enabled)
}

fn otlp_tracer(
    endpoint: &str,
    service_name: &str,
) -> Result<sdktrace::Tracer, opentelemetry::trace::TraceError> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio)
}

fn init_metrics(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;

    metrics::describe_counter!("bookings_created_total", "Bookings admitted, by approval state");
    metrics::describe_counter!("bookings_rejected_total", "Booking requests refused, by reason");
    metrics::describe_counter!("bookings_cancelled_total", "Bookings cancelled, by trigger");
    metrics::describe_counter!("booking_reviews_total", "Approval decisions, by outcome");
    metrics::describe_counter!("holiday_fetches_total", "External holiday fetches, by outcome");
    metrics::describe_counter!("notifications_sent_total", "Walker notifications, by outcome");

    tracing::info!("Prometheus metrics on port {}", port);
    Ok(())
}
