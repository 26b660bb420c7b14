//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Retry policy for external calls
//! - CSV corpus loading

pub mod config;
pub mod corpus;
pub mod logging;
pub mod retry;
