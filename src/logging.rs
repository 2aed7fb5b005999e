use std::{any::Any, backtrace::Backtrace};

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

const FALLBACK_DIRECTIVE: &str = "info";

/// Installs the Fyyur subscriber and routes panics from request handlers into
/// the same log stream.
pub fn init_tracing(cfg: &LoggingConfig) {
    fmt()
        .with_env_filter(filter_for(&cfg.rust_log))
        .with_target(false)
        .init();
    std::panic::set_hook(Box::new(|info| {
        let message = panic_message(info.payload());
        let backtrace = Backtrace::capture();
        match info.location() {
            Some(location) => tracing::error!(
                panic = %message,
                location = %location,
                backtrace = %backtrace,
                "handler panicked"
            ),
            None => tracing::error!(panic = %message, backtrace = %backtrace, "handler panicked"),
        }
    }));
}

/// `RUST_LOG` beats `APP_LOGGING__RUST_LOG`; a directive that does not parse
/// drops to `info` rather than silencing everything.
fn filter_for(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
