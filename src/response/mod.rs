//! HTTP response writer, status codes and canonical responses.
use std::fmt;
use std::io;
use std::io::prelude::*;

use log::{trace, warn};

use crate::request::Header;

pub mod error;
pub mod status;
pub mod success;

pub use error::{
    bad_request, forbidden, internal_error, method_not_allowed, not_found, unauthorized,
};
#[cfg(feature = "json")]
pub use success::json_ok;
pub use success::{empty_ok, text_ok};

/// Body bytes held back before the response is committed to the stream.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Write-once sink for one HTTP response.
///
/// The status is decided once, either by [`write_header`](ResponseWriter::write_header)
/// or implicitly as 200 by the first body write. From then on headers are
/// frozen. Body bytes are buffered; if the buffer fills up the status line
/// and headers are committed to the stream and the rest of the body is
/// streamed (the connection is then delimited by close, not
/// *Content-Length*). Whatever has been committed cannot be taken back.
///
/// # Example
/// ```
/// use std::io::Write;
/// use apiutil::response::ResponseWriter;
///
/// let mut out = vec![];
/// let mut response = ResponseWriter::new(&mut out);
/// response.set_header("Content-Type", "text/plain");
/// response.write_all(b"Hello!").unwrap();
/// response.finish().unwrap();
///
/// assert_eq!(
///     std::str::from_utf8(&out).unwrap(),
///     "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 6\r\n\r\nHello!"
/// );
/// ```
pub struct ResponseWriter<'a> {
    stream: &'a mut dyn Write,
    headers: Vec<(Header, String)>,
    status_code: Option<u16>,
    buffer: Vec<u8>,
    buffer_size: usize,
    committed: bool,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(stream: &'a mut dyn Write) -> Self {
        Self::with_buffer_size(stream, DEFAULT_BUFFER_SIZE)
    }
    /// Create a writer that commits once more than `buffer_size` body
    /// bytes have been written. 0 commits on the first body write.
    pub fn with_buffer_size(stream: &'a mut dyn Write, buffer_size: usize) -> Self {
        Self {
            stream,
            headers: vec![],
            status_code: None,
            buffer: vec![],
            buffer_size,
            committed: false,
        }
    }
    /// Set a header, replacing any previous value. Ignored once the status
    /// has been decided.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if self.wrote_header() {
            trace!("headers frozen, ignoring {}: {}", name, value);
            return;
        }
        let name = Header::new(name);
        match self.headers.iter_mut().find(|(h, _)| h == &name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.headers.push((name, value.to_string())),
        }
    }
    /// Remove a header. Ignored once the status has been decided.
    pub fn remove_header(&mut self, name: &str) {
        if self.wrote_header() {
            return;
        }
        let name = Header::new(name);
        self.headers.retain(|(h, _)| h != &name);
    }
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = Header::new(name);
        self.headers
            .iter()
            .find(|(h, _)| h == &name)
            .map(|(_, v)| &v[..])
    }
    /// Decide the status code. Only the first call has an effect.
    pub fn write_header(&mut self, status_code: u16) {
        if let Some(current) = self.status_code {
            warn!(
                "superfluous write_header({}), status is already {}",
                status_code, current
            );
            return;
        }
        self.status_code = Some(status_code);
    }
    /// Status code, if decided.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }
    /// Whether the status has been decided (and headers frozen).
    pub fn wrote_header(&self) -> bool {
        self.status_code.is_some()
    }
    /// Whether the status line has been sent to the stream.
    pub fn is_committed(&self) -> bool {
        self.committed
    }
    fn head(&self, content_length: Option<usize>) -> Vec<u8> {
        let status_code = self.status_code.unwrap_or(status::OK);
        let mut bytes: Vec<u8> = vec![];

        let status_line = format!(
            "HTTP/1.1 {} {}\r\n",
            status_code,
            status::reason_phrase(status_code)
        );
        bytes.extend(status_line.into_bytes());

        for (header, value) in &self.headers {
            if content_length.is_none() && header == &Header::new("Connection") {
                continue;
            }
            let header_line = format!("{}: {}\r\n", header, value);
            bytes.extend(header_line.into_bytes());
        }
        match content_length {
            Some(n) => bytes.extend(format!("Content-Length: {}\r\n", n).into_bytes()),
            None => bytes.extend(b"Connection: close\r\n"),
        }

        bytes.extend(b"\r\n");
        bytes
    }
    /// Send head and buffered body; the body length is not known yet.
    fn commit(&mut self) -> io::Result<()> {
        self.committed = true;
        self.remove_content_length();
        let mut bytes = self.head(None);
        bytes.append(&mut self.buffer);
        self.stream.write_all(&bytes)
    }
    fn remove_content_length(&mut self) {
        let name = Header::new("Content-Length");
        self.headers.retain(|(h, _)| h != &name);
    }
    /// Complete the response: default the status to 200, send whatever has
    /// not been sent yet and flush the stream.
    pub fn finish(mut self) -> io::Result<()> {
        if !self.wrote_header() {
            self.write_header(status::OK);
        }
        if !self.committed {
            self.committed = true;
            self.remove_content_length();
            let mut bytes = self.head(Some(self.buffer.len()));
            bytes.append(&mut self.buffer);
            self.stream.write_all(&bytes)?;
        }
        self.stream.flush()
    }
}

impl Write for ResponseWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.wrote_header() {
            self.write_header(status::OK);
        }
        if self.committed {
            return self.stream.write(buf);
        }
        self.buffer.extend_from_slice(buf);
        if self.buffer.len() > self.buffer_size {
            self.commit()?;
        }
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        if self.committed {
            self.stream.flush()
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for ResponseWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseWriter")
            .field("status_code", &self.status_code)
            .field("headers", &self.headers)
            .field("buffered", &self.buffer.len())
            .field("committed", &self.committed)
            .finish()
    }
}
