//! Error handling for connector operations.
//!
//! This module provides the error types used across the crate:
//! - A single top-level [`ConnectorError`] wrapping the specific kinds
//! - Structured error information extraction from MongoDB driver errors,
//!   formatted as JSON for the dispatcher to turn into failure responses
//!
//! The command layer never catches or retries: request decoding failures,
//! driver errors, and database-handle resolution failures all propagate
//! unchanged through the handler adapter to the dispatcher.

pub mod kinds;
pub mod mongo;

// Re-export commonly used types
pub use kinds::{ConfigError, ConnectionError, ConnectorError, RequestError, Result};
pub use mongo::{ErrorInfo, extract_error_info};
