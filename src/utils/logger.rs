use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Installs the global fmt subscriber once per process.
///
/// The level comes from `LOGLEVEL` (`DEBUG`, `INFO`, `WARN`, `ERROR`, `TRACE`), defaulting
/// to `INFO`. `RUST_LOG` directives, when set, take precedence.
pub fn setup_logger() {
    INIT.call_once(|| {
        let level = match env::var("LOGLEVEL")
            .unwrap_or_else(|_| "INFO".to_string())
            .to_uppercase()
            .as_str()
        {
            "DEBUG" => Level::DEBUG,
            "ERROR" => Level::ERROR,
            "WARN" => Level::WARN,
            "TRACE" => Level::TRACE,
            _ => Level::INFO,
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .finish();

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            tracing::debug!("global subscriber already installed");
        }
    });
}

#[cfg(test)]
mod tests_setup_logger {
    use super::*;
    use tracing::info;

    #[test]
    fn test_setup_logger_is_idempotent() {
        setup_logger();
        setup_logger();
        info!("logger installed");
    }
}
