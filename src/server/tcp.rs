//! TCP HTTP server.
use std::io;
use std::io::BufReader;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::*;

use crate::{
    handler::Handler,
    request::parser::RequestParser,
    response::{bad_request, ResponseWriter},
    runner::Runner,
    server::{Server, ServerError},
    VERSION,
};

/// A single or multi-threaded TCP server. Each connection carries one
/// request and is closed after the response.
pub struct TcpServer<H> {
    listener: TcpListener,
    runner: Runner,
    handler: Arc<H>,
    timeout: Option<Duration>,
}

impl<H> TcpServer<H> {
    /// Create a new TCP server
    ///
    /// # Arguments
    /// * `bind_addr`: Address to listen on, such as "0.0.0.0:8080"
    /// * `n_threads`: Number of threads.
    ///   - 0: create a new thread for each connection
    ///   - 1: single-threaded
    ///   - 2+: threadpool with n threads
    /// * `timeout`: network socket timeout
    /// * `handler`: request handler
    pub fn new<A: ToSocketAddrs>(
        bind_addr: A,
        n_threads: usize,
        timeout: Option<Duration>,
        handler: H,
    ) -> Result<Self, io::Error> {
        Ok(Self::from_listener(
            TcpListener::bind(bind_addr)?,
            n_threads,
            timeout,
            handler,
        ))
    }
    pub fn from_listener(
        listener: TcpListener,
        n_threads: usize,
        timeout: Option<Duration>,
        handler: H,
    ) -> Self {
        Self {
            listener,
            runner: Runner::new(n_threads),
            timeout,
            handler: Arc::new(handler),
        }
    }
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

fn handle_connection<H: Handler>(handler: &H, stream: TcpStream, addr: SocketAddr) {
    let start = Instant::now();
    debug!("parsing request");
    let parsed = RequestParser::new(BufReader::new(&stream)).parse();
    let mut out = &stream;
    let mut response = ResponseWriter::new(&mut out);
    response.set_header("Server", &format!("apiutil/{}", VERSION));
    response.set_header("Connection", "close");
    let (method, path) = match parsed {
        Ok(mut request) => {
            debug!("done parsing request");
            trace!("REQUEST {:?}", &request);
            let method = format!("{:?}", request.method);
            let path = request.path.clone();
            debug!("running request handler");
            handler.handle(&mut request, &mut response);
            request.body.release();
            (method, path)
        }
        Err(e) if e.is_end_of_stream() => {
            debug!("{} closed the connection without a request", addr);
            return;
        }
        Err(e) => {
            error!("{}", e);
            bad_request(&mut response, Some(&e));
            ("<none>".to_string(), "<none>".to_string())
        }
    };
    let status_code = response.status_code();
    debug!("writing response");
    if let Err(e) = response.finish() {
        warn!("IO error writing response to {}: {}", addr, e);
    }
    debug!(
        "{:?} - {}ms - {} {} {} -> {}",
        std::thread::current().id(),
        start.elapsed().as_millis(),
        addr,
        method,
        path,
        status_code.unwrap_or(200),
    );
}

impl<H> Server for TcpServer<H>
where
    H: 'static + Handler,
{
    /// Accept one connection and hand it to the runner.
    fn serve_one(&mut self) -> Result<(), ServerError> {
        let (stream, addr) = self.listener.accept()?;
        debug!("accepted connection from {:?}", addr);
        if let Err(e) = stream
            .set_read_timeout(self.timeout)
            .and_then(|_| stream.set_write_timeout(self.timeout))
        {
            error!("cannot set timeout for {}: {}", addr, e);
            return Ok(());
        }
        let handler = self.handler.clone();
        self.runner
            .run(move || handle_connection(handler.as_ref(), stream, addr));
        Ok(())
    }
}
