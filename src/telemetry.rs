//! Telemetry and logging infrastructure
//!
//! Wires the tracing subscriber stack:
//! - Console logging (human-readable)
//! - JSON file logging (for analysis)
//! - OpenTelemetry export (Jaeger, Honeycomb, etc.), when an endpoint is set

use chrono::{DateTime, Utc};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Identity of one telemetry session
#[derive(Debug, Clone)]
pub struct TelemetrySession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl TelemetrySession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

impl Default for TelemetrySession {
    fn default() -> Self {
        Self::new()
    }
}

/// Main telemetry handler. Holds the appender and exporter guards for the
/// lifetime of the process.
pub struct Telemetry {
    session: TelemetrySession,
    log_dir: PathBuf,
    _file_guard: WorkerGuard,
    _otel_provider: Option<SdkTracerProvider>,
}

impl Telemetry {
    /// Initialize the observability stack.
    ///
    /// Installs the global subscriber; later calls keep the first one, so
    /// this is safe to call from tests and embedding applications alike.
    pub fn init(
        log_dir: PathBuf,
        verbose: bool,
        otel_endpoint: Option<&str>,
    ) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&log_dir)?;

        let session = TelemetrySession::new();

        // JSON file logs, one file per day
        let file_appender = tracing_appender::rolling::daily(&log_dir, "magpie.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if verbose {
                EnvFilter::new("debug,hyper=info,reqwest=info,h2=info,rustls=info")
            } else {
                EnvFilter::new("info,hyper=warn,reqwest=warn,h2=warn,rustls=warn")
            }
        });

        let otel_provider = if let Some(endpoint) = otel_endpoint {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .with_endpoint(endpoint)
                .with_protocol(opentelemetry_otlp::Protocol::HttpBinary)
                .build()?;

            let provider = SdkTracerProvider::builder()
                .with_batch_exporter(exporter)
                .with_resource(Resource::builder().with_service_name("magpie").build())
                .build();

            let tracer = provider.tracer("magpie");
            let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(false).compact())
                .with(fmt::layer().json().with_writer(non_blocking))
                .with(otel_layer)
                .try_init()
                .ok();
            Some(provider)
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(false).compact())
                .with(fmt::layer().json().with_writer(non_blocking))
                .try_init()
                .ok();
            None
        };

        tracing::info!(
            session_id = %session.id,
            log_dir = %log_dir.display(),
            otel_enabled = otel_endpoint.is_some(),
            "Telemetry initialized"
        );

        Ok(Self {
            session,
            log_dir,
            _file_guard: file_guard,
            _otel_provider: otel_provider,
        })
    }

    /// Get the current session ID
    pub fn session_id(&self) -> Uuid {
        self.session.id
    }

    /// When this session started
    pub fn started_at(&self) -> DateTime<Utc> {
        self.session.started_at
    }

    /// Directory the JSON log files land in
    pub fn log_dir(&self) -> &PathBuf {
        &self.log_dir
    }
}
