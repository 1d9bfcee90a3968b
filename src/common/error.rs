//! Error handling for ncdist

use thiserror::Error;

/// Main error type for NCD operations
#[derive(Error, Debug)]
pub enum NcdError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for NCD operations
pub type NcdResult<T> = std::result::Result<T, NcdError>;

/// Macro for creating invalid-input errors
#[macro_export]
macro_rules! invalid_input_err {
    ($msg:expr) => {
        $crate::common::error::NcdError::InvalidInput($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::NcdError::InvalidInput(format!($fmt, $($arg)*))
    };
}
