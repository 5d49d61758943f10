//! Tracing setup and per-tick spans.
//!
//! The combinators log through the `tracing` facade: a `trace!` event per
//! node tick, `debug!` for random picks and resumption, `warn!` when a repeat
//! decorator sees `ERROR`. A node marked with [`Node::traced`][crate::Node::traced]
//! additionally opens a `bt.tick` span around each tick, carrying the node
//! label and the resulting outcome; with an OTLP endpoint configured those
//! spans are exported as one trace per root tick.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | OTLP/HTTP collector base URL. Enables span export when set. |
//! | `RUST_LOG` | Log filter (default `"info"`). |
//! | `LAMBDABT_LOG_FORMAT=json` | Newline-delimited JSON instead of compact text. |
//!
//! # Example
//!
//! ```rust,no_run
//! use lambdabt_runtime::{Node, Outcome};
//!
//! // Hold the guard for the entire lifetime of the process.
//! let _guard = lambdabt_runtime::telemetry::init_tracing("lambdabt");
//!
//! let root = Node::leaf("patrol", || Outcome::Success).traced();
//! root.tick(); // emits a `bt.tick` span with node="patrol", outcome=SUCCESS
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing::{Span, Subscriber, field};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use lambdabt_types::Outcome;

/// Name of the span opened around each tick of a traced node.
pub const TICK_SPAN: &str = "bt.tick";

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Console output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects [`LogFormat::Json`]; anything else is compact.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Everything [`init_with`] needs, resolved up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySettings {
    pub filter: String,
    pub format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

impl TelemetrySettings {
    /// Resolve settings through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            format: LogFormat::parse(lookup("LAMBDABT_LOG_FORMAT").as_deref()),
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT")
                .filter(|e| !e.trim().is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Initialisation
// ─────────────────────────────────────────────────────────────────────────────

/// Install the global subscriber from the process environment.
///
/// The returned [`TracerProviderGuard`] **must** be held for the lifetime of
/// the process; dropping it flushes pending spans.
pub fn init_tracing(service_name: &str) -> TracerProviderGuard {
    init_with(service_name, &TelemetrySettings::from_env())
}

/// Install the global subscriber from explicit `settings`.
///
/// A second installation in the same process is reported on stderr and
/// otherwise ignored.
pub fn init_with(service_name: &str, settings: &TelemetrySettings) -> TracerProviderGuard {
    let env_filter =
        EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let provider = settings
        .otlp_endpoint
        .as_deref()
        .and_then(|endpoint| build_provider(service_name, endpoint));
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer("lambdabt")));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(settings.format, std::io::stdout))
        .with(otel_layer)
        .try_init();
    if let Err(e) = installed {
        eprintln!("[lambdabt] tracing subscriber already installed: {e}");
    }

    TracerProviderGuard(provider)
}

/// Console layer for `format`, writing to `writer`.
fn fmt_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(writer)
            .boxed(),
    }
}

/// OTLP/HTTP provider for `endpoint`, or `None` if the exporter cannot be
/// built (reported on stderr; console logging still works).
fn build_provider(service_name: &str, endpoint: &str) -> Option<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| eprintln!("[lambdabt] OTLP exporter init failed: {e}"))
        .ok()?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            // Ticks are synchronous; no async runtime drives a batch exporter.
            .with_simple_exporter(exporter)
            .build(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tick spans
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn tick_span(node: &str) -> Span {
    tracing::info_span!("bt.tick", node, outcome = field::Empty)
}

pub(crate) fn record_outcome(span: &Span, outcome: Outcome) {
    span.record("outcome", field::display(outcome));
}

// ─────────────────────────────────────────────────────────────────────────────
// RAII guard
// ─────────────────────────────────────────────────────────────────────────────

/// Shuts down the OTel [`SdkTracerProvider`] on drop, flushing pending spans.
pub struct TracerProviderGuard(Option<SdkTracerProvider>);

impl Drop for TracerProviderGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.0.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("[lambdabt] OpenTelemetry provider shutdown error: {e}");
        }
    }
}
