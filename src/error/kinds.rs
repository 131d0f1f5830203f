use std::{fmt, io};

use crate::error::mongo::format_mongodb_error;

/// Crate-wide `Result` type using [`ConnectorError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Top-level error type for connector operations.
///
/// Wraps the more specific error kinds so every layer of the crate can use
/// a single error type. Nothing is caught or retried in the command layer;
/// errors travel unchanged to the dispatcher, which maps them to a
/// protocol-level failure response.
#[derive(Debug)]
pub enum ConnectorError {
    /// Connection-related errors.
    Connection(ConnectionError),

    /// Request parameter decoding errors.
    Request(RequestError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// MongoDB driver errors, forwarded as-is.
    MongoDb(mongodb::error::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Connection timeout.
    Timeout,

    /// Invalid connection URI.
    InvalidUri(String),

    /// Not currently connected to MongoDB.
    NotConnected,

    /// Ping command failed.
    PingFailed(String),
}

/// Errors decoding parameters out of a dispatcher request.
#[derive(Debug)]
pub enum RequestError {
    /// A parameter the command reads is not present in the request.
    Missing(String),

    /// A parameter expected to be plain text carries a structured value.
    NotText(String),

    /// A document-like parameter failed to parse as JSON.
    Json { name: String, message: String },

    /// A document-like parameter parsed, but not to a JSON object.
    NotDocument { name: String, found: &'static str },
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorError::Connection(e) => write!(f, "Connection error: {e}"),
            ConnectorError::Request(e) => write!(f, "Request error: {e}"),
            ConnectorError::Config(e) => write!(f, "Configuration error: {e}"),
            ConnectorError::Io(e) => write!(f, "I/O error: {e}"),
            ConnectorError::MongoDb(e) => format_mongodb_error(f, e),
            ConnectorError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::Timeout => write!(f, "Connection timeout"),
            ConnectionError::InvalidUri(uri) => write!(f, "Invalid connection URI: {uri}"),
            ConnectionError::NotConnected => write!(f, "Not connected to MongoDB"),
            ConnectionError::PingFailed(msg) => write!(f, "Ping failed: {msg}"),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Missing(name) => write!(f, "missing required parameter '{name}'"),
            RequestError::NotText(name) => {
                write!(f, "parameter '{name}' is not a plain string")
            }
            RequestError::Json { name, message } => {
                write!(f, "parameter '{name}' is not valid JSON: {message}")
            }
            RequestError::NotDocument { name, found } => {
                write!(f, "parameter '{name}' must be a JSON object, found {found}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for ConnectorError {}
impl std::error::Error for ConnectionError {}
impl std::error::Error for RequestError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to ConnectorError ========================= */

impl From<io::Error> for ConnectorError {
    fn from(err: io::Error) -> Self {
        ConnectorError::Io(err)
    }
}

impl From<mongodb::error::Error> for ConnectorError {
    fn from(err: mongodb::error::Error) -> Self {
        ConnectorError::MongoDb(err)
    }
}

impl From<ConnectionError> for ConnectorError {
    fn from(err: ConnectionError) -> Self {
        ConnectorError::Connection(err)
    }
}

impl From<RequestError> for ConnectorError {
    fn from(err: RequestError) -> Self {
        ConnectorError::Request(err)
    }
}

impl From<ConfigError> for ConnectorError {
    fn from(err: ConfigError) -> Self {
        ConnectorError::Config(err)
    }
}

impl From<String> for ConnectorError {
    fn from(msg: String) -> Self {
        ConnectorError::Generic(msg)
    }
}

impl From<&str> for ConnectorError {
    fn from(msg: &str) -> Self {
        ConnectorError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display() {
        let err = RequestError::Missing("collectionName".to_string());
        assert_eq!(err.to_string(), "missing required parameter 'collectionName'");

        let err = RequestError::Json {
            name: "doc".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("'doc'"));
        assert!(err.to_string().contains("not valid JSON"));

        let err = RequestError::NotDocument {
            name: "query".to_string(),
            found: "array",
        };
        assert_eq!(
            err.to_string(),
            "parameter 'query' must be a JSON object, found array"
        );
    }

    #[test]
    fn test_connection_error_display() {
        assert_eq!(
            ConnectionError::NotConnected.to_string(),
            "Not connected to MongoDB"
        );
        assert_eq!(
            ConnectionError::InvalidUri("foo://bar".to_string()).to_string(),
            "Invalid connection URI: foo://bar"
        );
    }

    #[test]
    fn test_conversions_preserve_kind() {
        let err: ConnectorError = RequestError::Missing("doc".to_string()).into();
        assert!(matches!(err, ConnectorError::Request(_)));

        let err: ConnectorError = ConnectionError::Timeout.into();
        assert!(matches!(err, ConnectorError::Connection(_)));

        let err: ConnectorError = "boom".into();
        assert!(matches!(err, ConnectorError::Generic(msg) if msg == "boom"));
    }
}
