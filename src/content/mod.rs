//! Media types and JSON de/serialization of bodies.
use std::error;
use std::fmt;
use std::io;

#[cfg(feature = "json")]
pub mod json;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

/// A response payload could not be serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializationError {
    message: String,
}

impl SerializationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(&self.message)
    }
}

impl error::Error for SerializationError {}

/// A request body could not be decoded.
#[derive(Debug)]
pub enum DecodeError {
    /// Reading the body failed.
    Io(io::Error),
    /// The body is not a JSON document of the expected shape.
    Syntax(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::Io(e) => write!(f, "{}", e),
            Self::Syntax(s) => f.write_str(s),
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Syntax(_) => None,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SerializationError::new("key must be a string").to_string(),
            "key must be a string"
        );
        let err = DecodeError::from(io::Error::new(io::ErrorKind::Other, "reset"));
        assert_eq!(err.to_string(), "reset");
        assert!(error::Error::source(&err).is_some());
    }
}
