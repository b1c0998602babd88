//! Small helpers for JSON-over-HTTP APIs.
//! * [Request body decoding](crate::content::json) with [`serde_json`](serde_json)
//! * Canonical [success](crate::response::success) and plain-text
//!   [error](crate::response::error) responses
//! * A [server starter](crate::server::start()) that listens on `PORT` or a default
//! * Single or multi-threaded [TCP server](crate::server::TcpServer)
//!
//! # Example
//! ```
//! use apiutil::prelude::*;
//! use apiutil::testing::call;
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! fn increment(req: &mut Request, w: &mut ResponseWriter) {
//!     match decode::<Counter>(req) {
//!         Ok(mut counter) => {
//!             counter.count += 1;
//!             json_ok(w, &counter);
//!         }
//!         Err(e) => internal_error(w, Some(&e)),
//!     }
//! }
//!
//! let request = b"POST /count HTTP/1.1\r\nContent-Length: 11\r\n\r\n{\"count\":1}";
//! let recorded = call(increment, request).unwrap();
//! assert_eq!(recorded.status_code, 200);
//! assert_eq!(recorded.header("Content-Type"), Some("application/json"));
//! assert_eq!(recorded.text(), r#"{"count":2}"#);
//! ```
pub mod config;
pub mod content;
pub mod handler;
pub mod io;
pub mod prelude;
pub mod request;
pub mod response;
pub mod runner;
pub mod server;
pub mod testing;

pub use config::ServerConfig;
#[cfg(feature = "json")]
pub use content::json::decode;
pub use handler::Handler;
pub use request::{Body, Header, Method, Request};
#[cfg(feature = "json")]
pub use response::json_ok;
pub use response::{
    bad_request, empty_ok, forbidden, internal_error, method_not_allowed, not_found, text_ok,
    unauthorized, ResponseWriter,
};
pub use server::{resolve_port, start, Server};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
