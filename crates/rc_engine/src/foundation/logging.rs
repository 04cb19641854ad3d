//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize the logging system at `info` unless `RUST_LOG` says otherwise
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// Initialize the logging system with a default level
///
/// `RUST_LOG` still takes precedence when it is set. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_with_level(level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.to_string());
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Parse a level name such as `"debug"` or `"warn"` (case-insensitive)
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse().ok()
}
