//! Plain-text error responses.
//!
//! Every helper writes `<Reason Phrase>\n`, or `<Reason Phrase> <detail>\n`
//! when an error detail is given, with `Content-Type: text/plain; charset=utf-8`.
//!
//! ```
//! use apiutil::response::{not_found, ResponseWriter};
//!
//! let mut out = vec![];
//! let mut response = ResponseWriter::new(&mut out);
//! not_found(&mut response, Some(&"no such person"));
//! response.finish().unwrap();
//!
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
//! assert!(text.ends_with("\r\n\r\nNot Found no such person\n"));
//! ```
use std::fmt::Display;
use std::io::prelude::*;

use log::{debug, warn};

use crate::content::TEXT_PLAIN_UTF8;
use crate::response::{status, ResponseWriter};

const NOSNIFF: &str = "nosniff";

/// Write `status_code` with a plain-text body. A no-op if the status of
/// `response` has already been decided.
pub(crate) fn error_response(
    response: &mut ResponseWriter<'_>,
    status_code: u16,
    err: Option<&dyn Display>,
) {
    let mut message = status::reason_phrase(status_code).to_string();
    if let Some(err) = err {
        message = format!("{} {}", message, err);
    }
    if response.wrote_header() {
        warn!(
            "cannot send {} ({}), response status is already {:?}",
            status_code,
            message,
            response.status_code()
        );
        return;
    }
    response.remove_header("Content-Length");
    response.set_header("Content-Type", TEXT_PLAIN_UTF8);
    response.set_header("X-Content-Type-Options", NOSNIFF);
    response.write_header(status_code);
    if let Err(e) = writeln!(response, "{}", message) {
        debug!("failed to write error body: {}", e);
    }
}

/// 400 Bad Request.
pub fn bad_request(response: &mut ResponseWriter<'_>, err: Option<&dyn Display>) {
    error_response(response, status::BAD_REQUEST, err)
}

/// 401 Unauthorized.
pub fn unauthorized(response: &mut ResponseWriter<'_>, err: Option<&dyn Display>) {
    error_response(response, status::UNAUTHORIZED, err)
}

/// 403 Forbidden.
pub fn forbidden(response: &mut ResponseWriter<'_>, err: Option<&dyn Display>) {
    error_response(response, status::FORBIDDEN, err)
}

/// 404 Not Found.
pub fn not_found(response: &mut ResponseWriter<'_>, err: Option<&dyn Display>) {
    error_response(response, status::NOT_FOUND, err)
}

/// 405 Method Not Allowed.
pub fn method_not_allowed(response: &mut ResponseWriter<'_>, err: Option<&dyn Display>) {
    error_response(response, status::METHOD_NOT_ALLOWED, err)
}

/// 500 Internal Server Error.
pub fn internal_error(response: &mut ResponseWriter<'_>, err: Option<&dyn Display>) {
    error_response(response, status::INTERNAL_SERVER_ERROR, err)
}
