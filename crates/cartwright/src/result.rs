//! Result and error types for Cartwright.

use thiserror::Error;

use crate::money::MoneyParseError;

/// Result type for Cartwright operations
pub type CartwrightResult<T> = Result<T, CartwrightError>;

/// Errors that can occur while driving a storefront
#[derive(Debug, Error)]
pub enum CartwrightError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set browser.chromium_path")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Driver-level failure (transport, evaluation, protocol)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A mutator targeted a locator that resolved to nothing
    #[error("No element matches {selector}")]
    ElementNotFound {
        /// Rendered selector description
        selector: String,
    },

    /// A named product could not be located in a listing
    #[error("Product \"{name}\" not found in cart")]
    ProductNotFound {
        /// The name that was searched for
        name: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the awaited condition
        waited_for: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Currency text could not be parsed
    #[error(transparent)]
    Money(#[from] MoneyParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl CartwrightError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_not_found_carries_name() {
        let err = CartwrightError::ProductNotFound {
            name: "DoesNotExist".to_string(),
        };
        assert_eq!(err.to_string(), "Product \"DoesNotExist\" not found in cart");
    }

    #[test]
    fn test_timeout_message() {
        let err = CartwrightError::Timeout {
            ms: 250,
            waited_for: "#cart_info visible".to_string(),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("250ms"));
        assert!(err.to_string().contains("#cart_info visible"));
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(
            CartwrightError::driver("boom"),
            CartwrightError::Driver { .. }
        ));
        assert!(!CartwrightError::config("bad").is_timeout());
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CartwrightError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
