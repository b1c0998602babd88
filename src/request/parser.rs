use std::collections::HashMap;
use std::error;
use std::fmt;
use std::io::prelude::*;
use std::str::FromStr;
use std::str::Utf8Error;

use crate::request::{Body, Header, Method, Request};

impl FromStr for Method {
    type Err = RequestParserError;
    fn from_str(s: &str) -> Result<Method> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            "CONNECT" => Ok(Method::CONNECT),
            "OPTIONS" => Ok(Method::OPTIONS),
            "TRACE" => Ok(Method::TRACE),
            _ => Err(RequestParserError::new(0, "invalid HTTP method")),
        }
    }
}

/// A small HTTP/1.x request parser.
///
/// Bytes are only consumed from the buffered stream as the parser needs
/// them, and the body (if any, per *Content-Length*) is read in full
/// before [`parse`](RequestParser::parse) returns, so the stream is
/// positioned at the start of the next request afterwards.
pub struct RequestParser<T: BufRead> {
    peek: Option<u8>,
    stream_position: usize,
    eof: bool,
    stream: T,
}

const WHITESPACE: [u8; 2] = *b" \t";
/// RFC 3986 pchar outside ALPHA / DIGIT: unreserved marks, sub-delims,
/// ':' and '@', and '%' of pct-encoded octets (kept encoded).
const PCHAR: &[u8] = b"-._~!$&'()*+,;=:@%";

fn one_of(chars: &'static [u8]) -> impl Fn(u8) -> bool {
    move |c: u8| chars.contains(&c)
}

fn whitespace() -> impl Fn(u8) -> bool {
    one_of(&WHITESPACE[..])
}

fn in_range(min: u8, max: u8) -> impl Fn(u8) -> bool {
    move |c: u8| c >= min && c <= max
}

fn pchar(c: u8) -> bool {
    c.is_ascii_alphanumeric() || PCHAR.contains(&c)
}

fn path_char(c: u8) -> bool {
    pchar(c) || c == b'/'
}

/// Query and fragment share the same characters.
fn query_char(c: u8) -> bool {
    pchar(c) || c == b'/' || c == b'?'
}

impl<R: BufRead> RequestParser<R> {
    pub fn new(stream: R) -> Self {
        Self {
            peek: None,
            stream,
            stream_position: 0,
            eof: false,
        }
    }
    fn error(&self, reason: &str) -> RequestParserError {
        RequestParserError::new(self.stream_position, reason)
    }
    /// Get next byte from the stream and advance peek. Fills the stream
    /// buffer as needed. Caller is responsible for setting `eof` to true
    /// before calling `next` if the end of stream is expected, otherwise it
    /// will hang on `fill_buf`.
    fn next(&mut self) -> Result<Option<u8>> {
        let curr = self.peek;
        if self.eof {
            self.peek = None;
            return Ok(curr);
        }
        let peek = self.stream.fill_buf()?.first().copied();
        if peek.is_some() {
            self.stream.consume(1);
            self.stream_position += 1;
        }
        self.peek = peek;
        Ok(curr)
    }
    /// Consume the peeked byte, which the caller knows is present.
    fn advance(&mut self) -> Result<u8> {
        self.next()?
            .ok_or_else(|| self.error("unexpected end of input"))
    }
    fn expect(&mut self, b: u8) -> Result<()> {
        let next = self.next()?;
        if next == Some(b) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", b as char)))
        }
    }
    fn expects(&mut self, bs: &[u8]) -> Result<()> {
        for b in bs {
            self.expect(*b)?;
        }
        Ok(())
    }
    fn one<F>(&mut self, predicate: &F) -> Result<Vec<u8>>
    where
        F: Fn(u8) -> bool,
    {
        match self.peek {
            Some(peek) if predicate(peek) => Ok(vec![self.advance()?]),
            _ => Err(self.error("unexpected character")),
        }
    }
    fn star<F>(&mut self, predicate: &F) -> Result<Vec<u8>>
    where
        F: Fn(u8) -> bool,
    {
        let mut out = vec![];
        while let Some(peek) = self.peek {
            if !predicate(peek) {
                break;
            }
            out.push(self.advance()?);
        }
        Ok(out)
    }
    fn plus<F>(&mut self, predicate: &F) -> Result<Vec<u8>>
    where
        F: Fn(u8) -> bool,
    {
        let mut out = self.one(predicate)?;
        out.append(&mut self.star(predicate)?);
        Ok(out)
    }
    fn crlf(&mut self) -> Result<()> {
        self.expects(b"\r\n")
    }
    fn until(&mut self, b: u8) -> Result<Vec<u8>> {
        let mut word: Vec<u8> = vec![];
        while self.peek != Some(b) {
            word.push(self.advance()?)
        }
        Ok(word)
    }
    fn method(&mut self) -> Result<Method> {
        let method = self.plus(&in_range(b'A', b'Z'))?;
        let method = std::str::from_utf8(&method)?;
        Ok(Method::from_str(method)?)
    }
    fn path(&mut self) -> Result<String> {
        if self.peek != Some(b'/') {
            return Err(self.error("expected path starting with /"));
        }
        let path = self.plus(&path_char)?;
        Ok(std::str::from_utf8(&path)?.to_string())
    }
    fn query(&mut self) -> Result<String> {
        if self.peek == Some(b'?') {
            self.expect(b'?')?;
            let query = self.star(&query_char)?;
            Ok(std::str::from_utf8(&query)?.to_string())
        } else {
            Ok("".to_string())
        }
    }
    fn fragment(&mut self) -> Result<String> {
        if self.peek == Some(b'#') {
            self.expect(b'#')?;
            let fragment = self.star(&query_char)?;
            Ok(std::str::from_utf8(&fragment)?.to_string())
        } else {
            Ok("".to_string())
        }
    }
    fn uri(&mut self) -> Result<(String, String, String)> {
        Ok((self.path()?, self.query()?, self.fragment()?))
    }
    fn header(&mut self) -> Result<(Header, String)> {
        let header = self.until(b':')?;
        self.expects(b":")?;
        self.star(&whitespace())?;
        let value = self.until(b'\r')?;
        self.crlf()?;
        Ok((
            Header::new(std::str::from_utf8(&header)?.trim_end()),
            std::str::from_utf8(&value)?.trim_end().to_string(),
        ))
    }
    fn headers(&mut self) -> Result<Vec<(Header, String)>> {
        let mut headers = vec![];
        while self.peek != Some(b'\r') {
            headers.push(self.header()?);
        }
        Ok(headers)
    }
    fn body(&mut self, content_length: usize) -> Result<Vec<u8>> {
        let mut buf = vec![];
        for i in 0..content_length {
            if i == content_length - 1 {
                self.eof = true;
            }
            if let Some(b) = self.next()? {
                buf.push(b);
            } else {
                return Err(self.error(&format!("expected {} more bytes", content_length - i)));
            }
        }
        Ok(buf)
    }
    /// Size line of one chunk; extensions are skipped.
    fn chunk_size(&mut self) -> Result<usize> {
        let digits = self.plus(&|c: u8| c.is_ascii_hexdigit())?;
        let digits = std::str::from_utf8(&digits)?;
        let size = usize::from_str_radix(digits, 16)
            .map_err(|_| self.error("invalid chunk size"))?;
        self.until(b'\r')?;
        self.crlf()?;
        Ok(size)
    }
    /// Chunked body up to and including the blank line after the trailers,
    /// which are discarded.
    fn chunked_body(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![];
        loop {
            let size = self.chunk_size()?;
            if size == 0 {
                break;
            }
            for _ in 0..size {
                buf.push(self.advance()?);
            }
            self.crlf()?;
        }
        while self.peek != Some(b'\r') {
            self.header()?;
        }
        self.expect(b'\r')?;
        self.eof = true;
        self.expect(b'\n')?;
        Ok(buf)
    }
    /// Parse next HTTP request in stream.
    pub fn parse(&mut self) -> Result<Request> {
        self.next()?;
        if self.peek.is_none() {
            return Err(RequestParserError::end_of_stream(self.stream_position));
        }
        let method = self.method()?;
        self.plus(&whitespace())?;
        let (path, query, fragment) = self.uri()?;
        self.plus(&whitespace())?;
        self.expects(b"HTTP/1.")?;
        self.one(&one_of(&b"01"[..]))?;
        self.crlf()?;
        let headers: HashMap<Header, String> = self.headers()?.into_iter().collect();

        let chunked = match headers.get(&Header::new("transfer-encoding")) {
            Some(te) if te.eq_ignore_ascii_case("chunked") => true,
            Some(te) => {
                return Err(self.error(&format!("unsupported transfer-encoding {:?}", te)))
            }
            None => false,
        };
        let content_length = match headers.get(&Header::new("content-length")) {
            Some(cl_str) if !chunked => match str::parse::<usize>(cl_str) {
                Ok(cl) => cl,
                Err(_) => return Err(self.error("invalid content-length")),
            },
            _ => 0,
        };
        let body;
        let content_length = if chunked {
            self.crlf()?;
            let bytes = self.chunked_body()?;
            let len = bytes.len();
            body = Body::from_bytes(bytes);
            len
        } else if content_length == 0 {
            self.expect(b'\r')?;
            self.eof = true;
            self.expect(b'\n')?;
            body = Body::empty();
            0
        } else {
            self.crlf()?;
            body = Body::from_bytes(self.body(content_length)?);
            content_length
        };
        Ok(Request {
            method,
            path,
            query,
            fragment,
            headers,
            content_length,
            body,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestParserError {
    position: usize,
    reason: String,
    end_of_stream: bool,
}

impl RequestParserError {
    pub fn new(position: usize, reason: &str) -> Self {
        Self {
            position,
            reason: reason.to_string(),
            end_of_stream: false,
        }
    }
    /// The stream ended before the first byte of a request.
    pub fn end_of_stream(position: usize) -> Self {
        Self {
            position,
            reason: "end of stream".to_string(),
            end_of_stream: true,
        }
    }
    pub fn is_end_of_stream(&self) -> bool {
        self.end_of_stream
    }
}

impl fmt::Display for RequestParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Error parsing request at position {}: {}",
            self.position, self.reason
        )
    }
}

impl error::Error for RequestParserError {}

impl From<std::io::Error> for RequestParserError {
    fn from(err: std::io::Error) -> Self {
        RequestParserError::new(0, &err.to_string())
    }
}

impl From<Utf8Error> for RequestParserError {
    fn from(err: Utf8Error) -> Self {
        RequestParserError::new(0, &err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RequestParserError>;
