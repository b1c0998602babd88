//! Helpers for testing handlers without a network.
//!
//! ```
//! use apiutil::prelude::*;
//! use apiutil::testing::call;
//!
//! fn hello(_req: &mut Request, w: &mut ResponseWriter) {
//!     text_ok(w, "Hello!");
//! }
//!
//! let recorded = call(hello, b"GET / HTTP/1.1\r\n\r\n").unwrap();
//! assert_eq!(recorded.status_code, 200);
//! assert_eq!(recorded.text(), "Hello!");
//! ```
use std::io;
use std::str;

use crate::handler::Handler;
use crate::io::ReadWriteAdapter;
use crate::request::Header;
use crate::server::{Server, StreamServer};

/// An HTTP response as it was written on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub status_code: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

impl Recorded {
    /// Parse the first response in `bytes`.
    pub fn parse(bytes: &[u8]) -> io::Result<Recorded> {
        Self::parse_next(bytes).map(|(recorded, _)| recorded)
    }

    /// Parse every response in `bytes`, such as the output of a keep-alive
    /// connection. A response without *Content-Length* runs to the end.
    pub fn parse_all(mut bytes: &[u8]) -> io::Result<Vec<Recorded>> {
        let mut all = vec![];
        while !bytes.is_empty() {
            let (recorded, used) = Self::parse_next(bytes)?;
            all.push(recorded);
            bytes = &bytes[used..];
        }
        Ok(all)
    }

    fn parse_next(bytes: &[u8]) -> io::Result<(Recorded, usize)> {
        let head_end = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .ok_or_else(|| invalid("incomplete response head"))?;
        let head = str::from_utf8(&bytes[..head_end]).map_err(|e| invalid(&e.to_string()))?;
        let mut lines = head.split("\r\n");

        let status_line = lines.next().unwrap_or("");
        let mut parts = status_line.splitn(3, ' ');
        match parts.next() {
            Some(version) if version.starts_with("HTTP/") => (),
            _ => return Err(invalid("bad status line")),
        }
        let status_code = parts
            .next()
            .and_then(|code| code.parse::<u16>().ok())
            .ok_or_else(|| invalid("bad status code"))?;
        let reason = parts.next().unwrap_or("").to_string();

        let mut headers = vec![];
        for line in lines {
            let mut split = line.splitn(2, ':');
            let name = split.next().unwrap_or("").trim();
            let value = split
                .next()
                .ok_or_else(|| invalid("bad header line"))?
                .trim();
            headers.push((name.to_string(), value.to_string()));
        }

        let body_start = head_end + 4;
        let mut recorded = Recorded {
            status_code,
            reason,
            headers,
            body: vec![],
        };
        let body_end = match recorded.header("Content-Length") {
            Some(n) => {
                let n: usize = n.parse().map_err(|_| invalid("bad content length"))?;
                if bytes.len() < body_start + n {
                    return Err(invalid("truncated body"));
                }
                body_start + n
            }
            None => bytes.len(),
        };
        recorded.body = bytes[body_start..body_end].to_vec();
        Ok((recorded, body_end))
    }

    /// Header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = Header::new(name);
        self.headers
            .iter()
            .find(|(h, _)| Header::new(h) == name)
            .map(|(_, v)| &v[..])
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Serve one raw request with `handler` and record the response.
pub fn call<H: Handler>(handler: H, raw: &[u8]) -> io::Result<Recorded> {
    let mut out: Vec<u8> = vec![];
    {
        let stream = ReadWriteAdapter::new(raw, &mut out);
        let mut server = StreamServer::new(stream, handler);
        server
            .serve_one()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    }
    Recorded::parse(&out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::request::Request;
    use crate::response::{not_found, ResponseWriter};

    #[test]
    fn test_parse() {
        let bytes = b"HTTP/1.1 404 Not Found\r\ncontent-type: text/plain\r\nContent-Length: 4\r\n\r\nnope";
        let recorded = Recorded::parse(bytes).unwrap();
        assert_eq!(recorded.status_code, 404);
        assert_eq!(recorded.reason, "Not Found");
        assert_eq!(recorded.header("Content-Type"), Some("text/plain"));
        assert_eq!(recorded.text(), "nope");
    }

    #[test]
    fn test_parse_all() {
        let bytes = b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\naHTTP/1.1 200 OK\r\nConnection: close\r\n\r\nrest of it";
        let all = Recorded::parse_all(bytes).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].text(), "a");
        assert_eq!(all[1].text(), "rest of it");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Recorded::parse(b"not http").is_err());
        assert!(Recorded::parse(b"HTTP/1.1 abc OK\r\n\r\n").is_err());
        assert!(Recorded::parse(b"HTTP/1.1 200 OK\r\nContent-Length: 9\r\n\r\nshort").is_err());
    }

    fn missing(_request: &mut Request, response: &mut ResponseWriter<'_>) {
        not_found(response, None)
    }

    #[test]
    fn test_call() {
        let recorded = call(missing, b"GET /x HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(recorded.status_code, 404);
        assert_eq!(recorded.text(), "Not Found\n");
    }

    #[test]
    fn test_call_without_request() {
        assert!(call(missing, b"").is_err());
    }
}
