use tracing::Level;
use tracing_subscriber::{fmt, fmt::format::FmtSpan, EnvFilter};

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "BULKER_LOG";

/// Installs the global subscriber writing diagnostics to stderr.
///
/// `BULKER_LOG` wins over `RUST_LOG`; without either the level is `warn`,
/// or `debug` when `verbose` is set. Rendered results go to stdout and never
/// pass through here.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(format!("bulker={default_level}")));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .without_time()
        .finish();

    // A subscriber may already be installed when embedded (tests)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
