use std::fmt;
use std::io;
use std::io::prelude::*;

/// A request body: a byte stream that can be consumed once.
///
/// Taking the body with [`take`](Body::take) hands the stream over and
/// leaves this body released; the stream itself is released when the
/// taken value is dropped.
pub struct Body {
    inner: Option<Box<dyn Read + Send>>,
}

impl Body {
    /// A body with no bytes.
    pub fn empty() -> Self {
        Self::from_reader(io::empty())
    }
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::from_reader(io::Cursor::new(bytes))
    }
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            inner: Some(Box::new(reader)),
        }
    }
    /// Move the stream out, leaving this body released.
    pub fn take(&mut self) -> Body {
        Body {
            inner: self.inner.take(),
        }
    }
    /// Drop the stream now.
    pub fn release(&mut self) {
        self.inner = None;
    }
    pub fn is_released(&self) -> bool {
        self.inner.is_none()
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_released() {
            f.write_str("Body(released)")
        } else {
            f.write_str("Body(..)")
        }
    }
}

/// A released body reads as empty.
impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}
