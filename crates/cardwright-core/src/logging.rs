//! Tracing subscriber bootstrap for binaries and test harnesses embedding the
//! library.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Installs a global `tracing` subscriber with a reloadable filter, then
/// applies the level from `config`.
///
/// An invalid level directive keeps the `info` default and logs a warning.
///
/// ## Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> CoreResult<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true).with_line_number(true))
        .try_init()
        .map_err(|e| CoreError::TracingInit(e.to_string()))?;

    if let Ok(filter) = EnvFilter::try_new(config.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.level, "Invalid log level in config, keeping info");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialization_fails() {
        let config = LoggingConfig {
            level: "not a [valid directive".to_string(),
        };

        // Another test may already own the global subscriber.
        let _first = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(CoreError::TracingInit(_))
        ));
    }
}
