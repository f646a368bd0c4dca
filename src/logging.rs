use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter: warnings only, or debug output for this crate with --verbose
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "patient_risk=debug,warn"
    } else {
        "warn"
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the default filter.
/// Calling this more than once is harmless.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init()
        .ok();
}
