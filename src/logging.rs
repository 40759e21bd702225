use std::io::IsTerminal;

use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Call once, from the binary.
pub fn init_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .with_ansi(std::io::stderr().is_terminal());

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();

    tracing::debug!(filter = default_filter, "tracing initialized");
}
