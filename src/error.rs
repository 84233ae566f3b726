use std::fmt;

/// Result type for Metis operations
pub type Result<T> = std::result::Result<T, MetisError>;

/// Main error type for the Metis library
#[derive(Debug, Clone)]
pub enum MetisError {
    /// Rejected configuration value
    Configuration {
        name: String,
        reason: String,
    },

    /// Tensor shape disagrees with the configured dimensions
    ShapeMismatch {
        expected: String,
        actual: String,
    },

    /// Batch request larger than the stored experience
    InsufficientData {
        requested: usize,
        available: usize,
    },

    /// Training diverged to non-finite values
    NumericalInstability(String),

    /// IO errors (file operations)
    Io(String),

    /// Serialization/deserialization errors
    Serialization(String),
}

impl fmt::Display for MetisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetisError::Configuration { name, reason } => {
                write!(f, "Invalid configuration '{}': {}", name, reason)
            }
            MetisError::ShapeMismatch { expected, actual } => {
                write!(f, "Shape mismatch: expected {}, got {}", expected, actual)
            }
            MetisError::InsufficientData { requested, available } => {
                write!(
                    f,
                    "Insufficient data: requested a batch of {}, only {} stored",
                    requested, available
                )
            }
            MetisError::NumericalInstability(msg) => {
                write!(f, "Numerical instability: {}", msg)
            }
            MetisError::Io(msg) => write!(f, "IO error: {}", msg),
            MetisError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for MetisError {}

// Conversion from std::io::Error
impl From<std::io::Error> for MetisError {
    fn from(err: std::io::Error) -> Self {
        MetisError::Io(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for MetisError {
    fn from(err: bincode::Error) -> Self {
        MetisError::Serialization(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MetisError {
    fn from(err: serde_json::Error) -> Self {
        MetisError::Serialization(err.to_string())
    }
}

// Helper functions for common error patterns
impl MetisError {
    pub fn configuration<S: Into<String>>(name: S, reason: S) -> Self {
        MetisError::Configuration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn shape_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        MetisError::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
