use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse scenario JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write regulation results: {0}")]
    CsvError(#[from] csv::Error),

    /// A default rate or the default separation is not strictly positive.
    #[error("Invalid default capacity: {0}")]
    InvalidCapacity(String),

    #[error("Invalid capacity event '{id}': {reason}")]
    InvalidCapacityEvent { id: String, reason: String },

    #[error("Invalid compliance configuration: {0}")]
    InvalidCompliance(String),

    #[error("Invalid allocator option: {0}")]
    InvalidOption(String),

    #[error("Invalid airport profile: {0}")]
    InvalidAirport(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Failures while mapping configuration strings onto domain enums.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unknown allocation policy: '{0}'")]
    UnknownPolicy(String),

    #[error("Unknown capacity mode: '{0}'")]
    UnknownCapacityMode(String),

    #[error("Unknown separation scope: '{0}'")]
    UnknownSeparationScope(String),

    #[error("Unknown flight class: '{0}'")]
    UnknownFlightClass(String),
}

pub type Result<T> = std::result::Result<T, Error>;
