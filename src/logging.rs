use crate::error::{ImbError, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` directives are honoured; `level` is the floor added on top of them. Output goes to
/// stderr so that results written to stdout stay machine-readable.
pub fn init_logging(level: Level) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ImbError::Config(format!("failed to install logger: {e}")))
}
