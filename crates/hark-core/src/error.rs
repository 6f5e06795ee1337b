use thiserror::Error;

/// Top-level error type for the Hark system.
///
/// The first five variants form the command-surface taxonomy: every command
/// returns one of them when it fails, and callers can match on the variant
/// without parsing messages. The remaining variants cover ambient concerns
/// (lifecycle invariants, I/O, serialization).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarkError {
    /// Decoder construction failed (missing or corrupt model files).
    #[error("Recognizer init failed: {0}")]
    Init(String),

    /// Search registration was rejected by the recognizer.
    #[error("Search configuration rejected: {0}")]
    Config(String),

    /// A command other than init/query was issued before a successful init.
    #[error("Recognizer not initialized")]
    RecognizerUnavailable,

    /// A command was issued while another command is still in flight.
    #[error("Another command is in flight")]
    Busy,

    /// Opaque failure surfaced by the recognizer's own error callback.
    #[error("Engine error: {0}")]
    Engine(String),

    /// A session lifecycle invariant was violated.
    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for HarkError {
    fn from(err: toml::de::Error) -> Self {
        HarkError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for HarkError {
    fn from(err: toml::ser::Error) -> Self {
        HarkError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for HarkError {
    fn from(err: serde_json::Error) -> Self {
        HarkError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Hark operations.
pub type Result<T> = std::result::Result<T, HarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HarkError::Init("missing en-us-ptm".to_string());
        assert_eq!(err.to_string(), "Recognizer init failed: missing en-us-ptm");

        let err = HarkError::Config("unknown search".to_string());
        assert_eq!(err.to_string(), "Search configuration rejected: unknown search");

        assert_eq!(
            HarkError::RecognizerUnavailable.to_string(),
            "Recognizer not initialized"
        );
        assert_eq!(HarkError::Busy.to_string(), "Another command is in flight");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HarkError = io_err.into();
        assert!(matches!(err, HarkError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        let err: HarkError = parsed.unwrap_err().into();
        assert!(matches!(err, HarkError::Serialization(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let bad_json = "{ invalid json }";
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        let err: HarkError = parsed.unwrap_err().into();
        assert!(matches!(err, HarkError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }
}
