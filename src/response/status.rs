//! HTTP status codes and their reason phrases.

pub const OK: u16 = 200;
pub const BAD_REQUEST: u16 = 400;
pub const UNAUTHORIZED: u16 = 401;
pub const FORBIDDEN: u16 = 403;
pub const NOT_FOUND: u16 = 404;
pub const METHOD_NOT_ALLOWED: u16 = 405;
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Canonical reason phrase for a status code, or `""` if the code is unknown.
///
/// ```
/// use apiutil::response::status;
///
/// assert_eq!(status::reason_phrase(404), "Not Found");
/// assert_eq!(status::reason_phrase(799), "");
/// ```
pub fn reason_phrase(status_code: u16) -> &'static str {
    match status_code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Request Entity Too Large",
        414 => "Request URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",
        _ => "",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_reason_phrases() {
        assert_eq!(reason_phrase(BAD_REQUEST), "Bad Request");
        assert_eq!(reason_phrase(UNAUTHORIZED), "Unauthorized");
        assert_eq!(reason_phrase(FORBIDDEN), "Forbidden");
        assert_eq!(reason_phrase(NOT_FOUND), "Not Found");
        assert_eq!(reason_phrase(METHOD_NOT_ALLOWED), "Method Not Allowed");
        assert_eq!(reason_phrase(INTERNAL_SERVER_ERROR), "Internal Server Error");
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(reason_phrase(OK), "OK");
        assert_eq!(reason_phrase(0), "");
        assert_eq!(reason_phrase(299), "");
    }
}
