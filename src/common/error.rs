use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Capacity
    #[error("Data too long")]
    DataTooLong,
    #[error("Capacity overflow: bits left over after placing data")]
    CapacityOverflow,

    // Configuration
    #[error("Invalid version")]
    InvalidVersion,
    #[error("Invalid error correction level")]
    InvalidECLevel,
    #[error("Invalid masking pattern")]
    InvalidMaskingPattern,
}

pub type QRResult<T> = Result<T, QRError>;

#[cfg(test)]
mod error_tests {
    use super::QRError;

    #[test]
    fn test_display() {
        assert_eq!(QRError::DataTooLong.to_string(), "Data too long");
        assert_eq!(QRError::InvalidECLevel.to_string(), "Invalid error correction level");
    }
}
