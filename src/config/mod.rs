/// Engine settings loaded from config.toml
pub mod engine;

/// File locations and the caller session from environment variables
pub mod environment;

/// Tracing subscriber setup
pub mod logging;
