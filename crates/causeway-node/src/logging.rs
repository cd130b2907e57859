//! Process-wide `tracing` subscriber setup.

use std::sync::Once;

use causeway_types::constants;
use tracing_subscriber::EnvFilter;

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber.
///
/// Filtering follows `RUST_LOG`, falling back to `causeway=info`. Only the
/// first call has any effect; a subscriber installed elsewhere beforehand
/// is left in place.
pub fn init(format: LogFormat) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(constants::DEFAULT_LOG_FILTER));
        let installed = match format {
            LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init(),
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already set");
        }
    });
}
