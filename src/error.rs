use std::fmt;

/// Result type for signal-rl operations
pub type Result<T> = std::result::Result<T, SignalRlError>;

/// Main error type for the signal-rl library
#[derive(Debug, Clone)]
pub enum SignalRlError {
    /// The sample store holds no mesh points at all
    NoData,

    /// A fetched sample is missing a required field
    InvalidSample {
        field: String,
    },

    /// Approximator fit step failed (numerical instability, shape mismatch)
    TrainingError(String),

    /// IO errors (weight persistence)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for SignalRlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalRlError::NoData => write!(f, "No data available in the sample store"),
            SignalRlError::InvalidSample { field } => {
                write!(f, "Invalid sample: missing required field '{}'", field)
            }
            SignalRlError::TrainingError(msg) => write!(f, "Training error: {}", msg),
            SignalRlError::IoError(msg) => write!(f, "IO error: {}", msg),
            SignalRlError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for SignalRlError {}

// Conversion from std::io::Error
impl From<std::io::Error> for SignalRlError {
    fn from(err: std::io::Error) -> Self {
        SignalRlError::IoError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for SignalRlError {
    fn from(err: bincode::Error) -> Self {
        SignalRlError::SerializationError(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SignalRlError {
    fn from(err: serde_json::Error) -> Self {
        SignalRlError::SerializationError(err.to_string())
    }
}

impl SignalRlError {
    pub fn invalid_sample<S: Into<String>>(field: S) -> Self {
        SignalRlError::InvalidSample {
            field: field.into(),
        }
    }
}
