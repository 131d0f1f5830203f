use std::fmt;

use serde::Serialize;

/// Structured error information extracted from MongoDB driver errors.
///
/// Serialized to JSON and handed to the dispatcher, which turns it into a
/// protocol-level failure response.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ErrorInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

impl ErrorInfo {
    /// Convert error info to pretty-printed JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Format MongoDB error messages as pretty JSON wrapped in an `error` field.
///
/// Used by the parent module's `Display` implementation for
/// `ConnectorError::MongoDb`.
pub fn format_mongodb_error(
    f: &mut fmt::Formatter<'_>,
    error: &mongodb::error::Error,
) -> fmt::Result {
    let info = extract_error_info(error);
    let wrapper = serde_json::json!({ "error": info });
    let json_output = serde_json::to_string_pretty(&wrapper).map_err(|_| fmt::Error)?;
    write!(f, "\n{json_output}")
}

/// Extract structured information from a MongoDB error using the driver API.
///
/// Uses the driver's typed error structures directly instead of parsing
/// message strings.
pub fn extract_error_info(error: &mongodb::error::Error) -> ErrorInfo {
    use mongodb::error::{ErrorKind, WriteFailure};

    let mut info = ErrorInfo::default();

    match error.kind.as_ref() {
        ErrorKind::Write(write_failure) => {
            info.error_type = Some("mongo.write_error".to_string());

            match write_failure {
                WriteFailure::WriteError(write_error) => {
                    info.code = Some(write_error.code);
                    info.message = Some(write_error.message.clone());
                    info.name = get_error_name(write_error.code);
                }
                WriteFailure::WriteConcernError(wc_error) => {
                    info.code = Some(wc_error.code);
                    info.message = Some(wc_error.message.clone());
                    info.name = get_error_name(wc_error.code);
                }
                _ => {}
            }
        }
        ErrorKind::Command(command_error) => {
            info.error_type = Some("mongo.command_error".to_string());
            info.code = Some(command_error.code);
            info.message = Some(command_error.message.clone());
            info.name = get_error_name(command_error.code);
        }
        ErrorKind::Authentication { message, .. } => {
            info.error_type = Some("mongo.authentication_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::ServerSelection { message, .. } => {
            info.error_type = Some("mongo.server_selection_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::Io(io_error) => {
            info.error_type = Some("mongo.io_error".to_string());
            info.message = Some(io_error.to_string());
        }
        ErrorKind::InvalidArgument { message, .. } => {
            info.error_type = Some("mongo.invalid_argument".to_string());
            info.message = Some(message.clone());
        }
        other => {
            info.error_type = Some("mongo.error".to_string());
            info.message = Some(format!("{other:?}"));
        }
    }

    info
}

/// Map well-known MongoDB error codes to their symbolic names.
fn get_error_name(code: i32) -> Option<String> {
    let name = match code {
        11000 => "DuplicateKey",
        13 => "Unauthorized",
        18 => "AuthenticationFailed",
        26 => "NamespaceNotFound",
        48 => "NamespaceExists",
        50 => "MaxTimeMSExpired",
        59 => "CommandNotFound",
        73 => "InvalidNamespace",
        _ => return None,
    };
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_error_name_known_codes() {
        assert_eq!(get_error_name(11000), Some("DuplicateKey".to_string()));
        assert_eq!(get_error_name(26), Some("NamespaceNotFound".to_string()));
        assert_eq!(get_error_name(48), Some("NamespaceExists".to_string()));
    }

    #[test]
    fn test_get_error_name_unknown_code() {
        assert_eq!(get_error_name(-1), None);
        assert_eq!(get_error_name(424242), None);
    }

    #[test]
    fn test_error_info_serialization_skips_empty_fields() {
        let info = ErrorInfo {
            error_type: Some("mongo.command_error".to_string()),
            code: Some(26),
            name: Some("NamespaceNotFound".to_string()),
            message: None,
        };
        let json = info.to_json().unwrap();
        assert!(json.contains("\"type\""));
        assert!(json.contains("NamespaceNotFound"));
        assert!(!json.contains("message"));
    }
}
