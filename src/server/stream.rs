//! Generic IO Stream HTTP server.
use std::io::prelude::*;
use std::io::BufReader;

use log::{debug, trace};

use crate::{
    handler::Handler,
    request::parser::RequestParser,
    response::{bad_request, ResponseWriter},
    server::{Server, ServerError},
    VERSION,
};

/// Serve HTTP requests over a generic stream. The stream is not closed,
/// multiple requests can be served; [`serve_one`](Server::serve_one)
/// fails once the stream has ended, or after a response that was streamed
/// without *Content-Length* (its end is the end of the connection).
///
/// # Example
/// ```
/// use apiutil::prelude::*;
/// use apiutil::io::ReadWriteAdapter;
/// use apiutil::server::StreamServer;
///
/// fn handle_hello(_req: &mut Request, w: &mut ResponseWriter) {
///     text_ok(w, "Hello!");
/// }
///
/// let read_buf = b"GET / HTTP/1.1\r\nHost:localhost\r\n\r\n";
/// let mut write_buf = vec![];
/// let stream = ReadWriteAdapter::new(&read_buf[..], &mut write_buf);
/// let mut server = StreamServer::new(stream, handle_hello);
/// server.serve_one().unwrap();
/// drop(server);
///
/// assert_eq!(
///     std::str::from_utf8(&write_buf[..]).unwrap(),
///     &format!(
///       "HTTP/1.1 200 OK\r\n\
///        Server: apiutil/{}\r\n\
///        Connection: keep-alive\r\n\
///        Content-Type: text/plain\r\n\
///        Content-Length: 6\r\n\
///        \r\n\
///        Hello!", apiutil::VERSION
///     )
/// );
/// ```
pub struct StreamServer<H, S> {
    handler: H,
    stream: BufReader<S>,
    closed: bool,
}

impl<H, S: Read> StreamServer<H, S> {
    pub fn new(stream: S, handler: H) -> Self {
        Self {
            handler,
            stream: BufReader::new(stream),
            closed: false,
        }
    }
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }
}

impl<H, S> Server for StreamServer<H, S>
where
    H: Handler,
    S: Read + Write,
{
    fn serve_one(&mut self) -> Result<(), ServerError> {
        if self.closed {
            return Err(ServerError::new("stream closed"));
        }
        let parsed = RequestParser::new(&mut self.stream).parse();
        let mut response = ResponseWriter::new(self.stream.get_mut());
        response.set_header("Server", &format!("apiutil/{}", VERSION));
        response.set_header("Connection", "keep-alive");
        match parsed {
            Ok(mut request) => {
                trace!("REQUEST {:?}", &request);
                self.handler.handle(&mut request, &mut response);
                request.body.release();
            }
            Err(e) if e.is_end_of_stream() => {
                debug!("stream closed");
                return Err(ServerError::new("stream closed"));
            }
            Err(e) => {
                debug!("{}", e);
                bad_request(&mut response, Some(&e));
            }
        }
        if response.is_committed() {
            debug!("response streamed without content-length, closing");
            self.closed = true;
        }
        response.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::ReadWriteAdapter;
    use crate::request::Request;
    use crate::response::{internal_error, not_found, text_ok};
    use crate::testing::Recorded;

    fn echo_path(request: &mut Request, response: &mut ResponseWriter<'_>) {
        match &request.path[..] {
            "/missing" => not_found(response, None),
            "/boom" => internal_error(response, Some(&"boom")),
            path => text_ok(response, path),
        }
    }

    #[test]
    fn test_keep_alive() {
        let read_buf = b"GET /one HTTP/1.1\r\n\r\nGET /missing HTTP/1.1\r\n\r\nGET /boom HTTP/1.1\r\n\r\n";
        let mut write_buf = vec![];
        let stream = ReadWriteAdapter::new(&read_buf[..], &mut write_buf);
        let mut server = StreamServer::new(stream, echo_path);
        let err = server.serve_forever();
        assert_eq!(err.to_string(), "server error: stream closed");
        drop(server);

        let responses = Recorded::parse_all(&write_buf).unwrap();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].status_code, 200);
        assert_eq!(responses[0].text(), "/one");
        assert_eq!(responses[1].status_code, 404);
        assert_eq!(responses[1].text(), "Not Found\n");
        assert_eq!(responses[2].status_code, 500);
        assert_eq!(responses[2].text(), "Internal Server Error boom\n");
        assert_eq!(responses[2].header("Connection"), Some("keep-alive"));
    }

    #[test]
    fn test_bad_request() {
        let read_buf = b"BREW /pot HTTP/1.1\r\n\r\n";
        let mut write_buf = vec![];
        let stream = ReadWriteAdapter::new(&read_buf[..], &mut write_buf);
        let mut server = StreamServer::new(stream, echo_path);
        server.serve_one().unwrap();
        drop(server);

        let recorded = Recorded::parse(&write_buf).unwrap();
        assert_eq!(recorded.status_code, 400);
        assert_eq!(
            recorded.text(),
            "Bad Request Error parsing request at position 0: invalid HTTP method\n"
        );
    }

    fn big(_request: &mut Request, response: &mut ResponseWriter<'_>) {
        response.write_all(&[b'x'; 5000]).unwrap();
    }

    fn echo_body(request: &mut Request, response: &mut ResponseWriter<'_>) {
        let mut body = String::new();
        request.body.read_to_string(&mut body).unwrap();
        text_ok(response, &body);
    }

    #[test]
    fn test_streamed_response_ends_stream() {
        let read_buf = b"GET /one HTTP/1.1\r\n\r\nGET /two HTTP/1.1\r\n\r\n";
        let mut write_buf = vec![];
        let stream = ReadWriteAdapter::new(&read_buf[..], &mut write_buf);
        let mut server = StreamServer::new(stream, big);
        let err = server.serve_forever();
        assert_eq!(err.to_string(), "server error: stream closed");
        drop(server);

        let responses = Recorded::parse_all(&write_buf).unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].header("Connection"), Some("close"));
        assert_eq!(responses[0].header("Content-Length"), None);
        assert_eq!(responses[0].body.len(), 5000);
    }

    #[test]
    fn test_chunked_request_body() {
        let read_buf = b"POST /x HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n\
                         7\r\n{\"n\":5}\r\n0\r\n\r\n\
                         GET /after HTTP/1.1\r\n\r\n";
        let mut write_buf = vec![];
        let stream = ReadWriteAdapter::new(&read_buf[..], &mut write_buf);
        let mut server = StreamServer::new(stream, echo_body);
        server.serve_one().unwrap();
        server.serve_one().unwrap();
        drop(server);

        let responses = Recorded::parse_all(&write_buf).unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].status_code, 200);
        assert_eq!(responses[0].text(), r#"{"n":5}"#);
        assert_eq!(responses[1].status_code, 200);
    }

    #[test]
    fn test_unsupported_transfer_encoding() {
        let read_buf = b"POST /x HTTP/1.1\r\nTransfer-Encoding: gzip\r\n\r\n";
        let mut write_buf = vec![];
        let stream = ReadWriteAdapter::new(&read_buf[..], &mut write_buf);
        let mut server = StreamServer::new(stream, echo_path);
        server.serve_one().unwrap();
        drop(server);

        let recorded = Recorded::parse(&write_buf).unwrap();
        assert_eq!(recorded.status_code, 400);
        assert!(recorded.text().contains("unsupported transfer-encoding"));
    }
}
