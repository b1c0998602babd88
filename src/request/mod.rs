//! HTTP request and parser.
use std::collections::HashMap;

pub use body::Body;
pub use header::Header;

pub mod body;
pub mod header;
pub mod parser;

/// An HTTP Request.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub fragment: String,
    pub headers: HashMap<Header, String>,
    pub content_length: usize,
    pub body: Body,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query: "".to_string(),
            fragment: "".to_string(),
            headers: vec![("Host".to_string().into(), "localhost".to_string())]
                .into_iter()
                .collect(),
            content_length: 0,
            body: Body::empty(),
        }
    }
}

impl Request {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(Header::new(name), value.to_string());
        self
    }
    /// Set an in-memory body and its Content-Length.
    pub fn with_body(mut self, bytes: Vec<u8>) -> Self {
        self.content_length = bytes.len();
        self.body = Body::from_bytes(bytes);
        self
    }
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&Header::new(name)).map(|v| &v[..])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    PATCH,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
}
