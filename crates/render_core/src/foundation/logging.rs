//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with an explicit filter
///
/// `RUST_LOG` still takes precedence when it is set, so a filter coming from
/// [`EngineConfig::log_filter`](crate::core::EngineConfig) acts as the default.
/// Repeated initialization is ignored.
pub fn init_with_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized; keeping the existing one");
    }
}
