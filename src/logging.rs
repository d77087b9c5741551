use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_DIRECTIVE: &str = "rx_projections=info";

/// Initializes logging to stderr.
///
/// `RUST_LOG` overrides the default `rx_projections=info` filter. With `json`
/// set, events are emitted as JSON lines instead of human-readable text.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let registry = tracing_subscriber::registry().with(filter);
    // try_init fails when a subscriber is already installed, e.g. in tests.
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .ok();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}
