//! Error types for the labor entitlements engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading configuration or
//! computing a settlement or payslip.

use thiserror::Error;

/// The main error type for the labor entitlements engine.
///
/// All engine operations return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use chile_labor_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/indicators.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/indicators.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The economic configuration is missing a value or holds an invalid one.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfig {
        /// The configuration field that was rejected.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A calculation input was invalid or inconsistent.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was rejected.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidConfig`].
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while refreshing economic indicators.
///
/// None of these are fatal: the refresh falls back to the cached values and
/// then to the configuration already in place.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// The HTTP request failed.
    #[error("Indicator request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Indicator provider returned status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The provider did not answer in time.
    #[error("Indicator request timed out after {seconds}s")]
    Timeout {
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// An indicator was missing from the response.
    #[error("Indicator '{indicator}' missing from response")]
    Missing {
        /// The indicator name.
        indicator: String,
    },

    /// An indicator was present but not a positive number.
    #[error("Invalid value for '{indicator}': {value}")]
    InvalidValue {
        /// The indicator name.
        indicator: String,
        /// The rejected value, as received.
        value: String,
    },

    /// The local cache could not be read or written.
    #[error("Indicator cache error at '{path}': {message}")]
    Cache {
        /// The cache file path.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_field_and_message() {
        let error = EngineError::invalid_config("uf", "must be greater than zero");
        assert_eq!(
            error.to_string(),
            "Invalid configuration 'uf': must be greater than zero"
        );
    }

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("end_date", "precedes start_date");
        assert_eq!(
            error.to_string(),
            "Invalid input 'end_date': precedes start_date"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
        assert_error::<IndicatorError>();
    }

    #[test]
    fn test_indicator_error_displays_value() {
        let error = IndicatorError::InvalidValue {
            indicator: "uf".to_string(),
            value: "-1".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid value for 'uf': -1");
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_config() -> EngineResult<()> {
            Err(EngineError::invalid_config("tax_brackets", "empty"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_config()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
