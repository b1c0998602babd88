//! Base for all request handlers.
use crate::request::Request;
use crate::response::ResponseWriter;

/// A Handler implements an HTTP endpoint: it takes the request and writes
/// the response through the [`ResponseWriter`]. Handlers are called once per
/// request by Server implementations, possibly from several threads at once.
///
/// Any `Fn(&mut Request, &mut ResponseWriter)` closure or function is a
/// Handler.
///
/// ```
/// use apiutil::prelude::*;
///
/// fn hello(_req: &mut Request, w: &mut ResponseWriter) {
///     text_ok(w, "Hello!");
/// }
///
/// let mut out = vec![];
/// let mut w = ResponseWriter::new(&mut out);
/// hello.handle(&mut Request::default(), &mut w);
/// w.finish().unwrap();
/// assert!(out.ends_with(b"Hello!"));
/// ```
pub trait Handler: Sync + Send {
    fn handle(&self, request: &mut Request, response: &mut ResponseWriter<'_>);
}

impl<F> Handler for F
where
    F: Fn(&mut Request, &mut ResponseWriter<'_>) + Send + Sync,
{
    fn handle(&self, request: &mut Request, response: &mut ResponseWriter<'_>) {
        (self)(request, response)
    }
}
