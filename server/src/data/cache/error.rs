//! Cache error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error_display() {
        let err = CacheError::Serialization("expected value".to_string());
        assert_eq!(err.to_string(), "Serialization error: expected value");
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: CacheError = json_err.into();
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
