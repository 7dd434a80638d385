//! Logging setup and timing helpers.

pub mod logging;
mod timing;

pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use timing::SpanTimer;
