//! Pipeline configuration.

use crate::context::DEFAULT_POOL_CAPACITY;
use crate::errors::ChainError;
use crate::observability::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Terminal codes written when a handler does not supply its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCodes {
    /// Code filled into a response that finished without one.
    #[serde(default = "default_success_code")]
    pub success_code: String,
    /// Message filled into a response that finished without one.
    #[serde(default = "default_success_message")]
    pub success_message: String,
    /// Code used when a handler fails or panics.
    #[serde(default = "default_system_error_code")]
    pub system_error_code: String,
    /// Message used when a handler fails or panics.
    #[serde(default = "default_system_error_message")]
    pub system_error_message: String,
}

fn default_success_code() -> String {
    "000000".to_string()
}

fn default_success_message() -> String {
    "Success".to_string()
}

fn default_system_error_code() -> String {
    "999999".to_string()
}

fn default_system_error_message() -> String {
    "System error".to_string()
}

impl Default for ResponseCodes {
    fn default() -> Self {
        Self {
            success_code: default_success_code(),
            success_message: default_success_message(),
            system_error_code: default_system_error_code(),
            system_error_message: default_system_error_message(),
        }
    }
}

impl ResponseCodes {
    /// Sets the success code and message.
    #[must_use]
    pub fn with_success(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.success_code = code.into();
        self.success_message = message.into();
        self
    }

    /// Sets the system-error code and message.
    #[must_use]
    pub fn with_system_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.system_error_code = code.into();
        self.system_error_message = message.into();
        self
    }

    /// Validates the codes.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Config` if a code or message is blank, or if the
    /// success and system-error codes are the same.
    pub fn validate(&self) -> Result<(), ChainError> {
        let fields = [
            ("success_code", &self.success_code),
            ("success_message", &self.success_message),
            ("system_error_code", &self.system_error_code),
            ("system_error_message", &self.system_error_message),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ChainError::Config(format!("{field} must not be empty")));
            }
        }

        if self.success_code == self.system_error_code {
            return Err(ChainError::Config(format!(
                "success_code and system_error_code are both '{}'",
                self.success_code
            )));
        }

        Ok(())
    }
}

/// Configuration of a pipeline and its logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Terminal codes.
    #[serde(default)]
    pub codes: ResponseCodes,
    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Maximum number of idle execution contexts kept for reuse.
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,
}

fn default_pool_capacity() -> usize {
    DEFAULT_POOL_CAPACITY
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            codes: ResponseCodes::default(),
            logging: LoggingConfig::default(),
            pool_capacity: default_pool_capacity(),
        }
    }
}

impl ChainConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Serialization` for malformed JSON and
    /// `ChainError::Config` if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ChainError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Io` if the file can't be read, otherwise the
    /// errors of [`from_json_str`](Self::from_json_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Config` if the codes are invalid.
    pub fn validate(&self) -> Result<(), ChainError> {
        self.codes.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::LogFormat;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_codes() {
        let codes = ResponseCodes::default();
        assert_eq!(codes.success_code, "000000");
        assert_eq!(codes.success_message, "Success");
        assert_eq!(codes.system_error_code, "999999");
        assert_eq!(codes.system_error_message, "System error");
        assert!(codes.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ChainConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ChainConfig::default());
        assert_eq!(config.pool_capacity, DEFAULT_POOL_CAPACITY);
    }

    #[test]
    fn test_partial_codes() {
        let config = ChainConfig::from_json_str(
            r#"{"codes": {"system_error_code": "500000"}, "pool_capacity": 4}"#,
        )
        .unwrap();

        assert_eq!(config.codes.system_error_code, "500000");
        assert_eq!(config.codes.system_error_message, "System error");
        assert_eq!(config.codes.success_code, "000000");
        assert_eq!(config.pool_capacity, 4);
    }

    #[test]
    fn test_blank_code_rejected() {
        let err = ChainConfig::from_json_str(r#"{"codes": {"success_code": " "}}"#).unwrap_err();
        assert!(matches!(err, ChainError::Config(msg) if msg.contains("success_code")));
    }

    #[test]
    fn test_same_codes_rejected() {
        let codes = ResponseCodes::default().with_system_error("000000", "Boom");
        assert!(matches!(codes.validate(), Err(ChainError::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        let err = ChainConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ChainError::Serialization(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"codes": {{"success_message": "OK"}}, "logging": {{"level": "debug", "format": "json"}}}}"#
        )
        .unwrap();

        let config = ChainConfig::from_file(file.path()).unwrap();
        assert_eq!(config.codes.success_message, "OK");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChainConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ChainError::Io(_)));
    }
}
