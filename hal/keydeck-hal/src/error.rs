//! HID error type

use thiserror::Error;

/// Errors from HID enumeration and report I/O
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HidError {
    /// The backend library reported a failure
    #[error("hid backend: {0}")]
    Backend(String),
    /// The device accepted fewer bytes than the report holds
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            HidError::Backend("open failed".into()).to_string(),
            "hid backend: open failed"
        );
        assert_eq!(
            HidError::ShortWrite {
                written: 3,
                expected: 32
            }
            .to_string(),
            "short write: 3 of 32 bytes"
        );
    }
}
