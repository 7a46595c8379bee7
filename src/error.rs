use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decimal parsing errors
    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Check if error was caused by invalid input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::InvalidDecimal(_)
        )
    }
}

impl From<rust_decimal::Error> for AppError {
    fn from(err: rust_decimal::Error) -> Self {
        AppError::InvalidDecimal(err.to_string())
    }
}

/// Convenience function to convert Option<T> to Result<T, AppError>
pub fn option_to_result<T>(opt: Option<T>, error_msg: &str) -> AppResult<T> {
    opt.ok_or_else(|| AppError::NotFound(error_msg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(AppError::NotFound("payment".into()).is_not_found());
        assert!(AppError::Validation("bad".into()).is_validation());
        assert!(!AppError::Config("bad".into()).is_validation());
    }

    #[test]
    fn test_option_to_result() {
        let missing: Option<u32> = None;
        let err = option_to_result(missing, "Payment not found").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Resource not found: Payment not found");
        assert_eq!(option_to_result(Some(3), "unused").unwrap(), 3);
    }

    #[test]
    fn test_decimal_error_conversion() {
        use std::str::FromStr;
        let err: AppError = rust_decimal::Decimal::from_str("12.3.4").unwrap_err().into();
        assert!(err.is_validation());
    }
}
