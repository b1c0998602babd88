//! JSON request decoding and response encoding with [`serde_json`](serde_json).
//!
//! Any type implementing [`serde::Deserialize`](serde::Deserialize) can be
//! decoded from a request body. Unknown fields are ignored; fields missing
//! from the body need `#[serde(default)]` on the target.
//!
//! ```
//! use apiutil::content::json;
//! use apiutil::Request;
//!
//! #[derive(serde::Deserialize)]
//! struct Person {
//!     name: String,
//!     #[serde(default)]
//!     age: u16,
//! }
//!
//! let mut request = Request::default().with_body(br#"{"name":"Bob","x":1}"#.to_vec());
//! let person: Person = json::decode(&mut request).unwrap();
//! assert_eq!(person.name, "Bob");
//! assert_eq!(person.age, 0);
//! assert!(request.body.is_released());
//! ```
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::content::{DecodeError, SerializationError};
use crate::request::Request;

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::Syntax(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::new(&err.to_string())
    }
}

/// Decode the request body as one JSON document. The body is released
/// when this returns, whatever the outcome; bytes after the document are
/// not inspected.
pub fn decode<T>(request: &mut Request) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    let mut body = request.body.take();
    let mut deserializer = serde_json::Deserializer::from_reader(&mut body);
    let value = T::deserialize(&mut deserializer)?;
    Ok(value)
}

/// Decode the request body into `target`. `target` is left untouched on
/// failure.
pub fn decode_into<T>(request: &mut Request, target: &mut T) -> Result<(), DecodeError>
where
    T: DeserializeOwned,
{
    *target = decode(request)?;
    Ok(())
}

/// Serialize a value to JSON bytes.
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>, SerializationError>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_vec(value)?)
}
