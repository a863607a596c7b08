use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Diagnostics go to stderr so stdout only carries the report location.
/// Verbosity comes from `RUST_LOG`, defaulting to warnings.
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}
