//! HTTP Server components.
use std::error;
use std::fmt;
use std::io;
use std::thread;
use std::time::Duration;

use log::error;

pub mod port;
pub mod start;
pub mod stream;
pub mod tcp;

pub use port::{resolve_port, Environment, PortParseError, ProcessEnv};
pub use start::{bind, start, start_with_config, StartError};
pub use stream::StreamServer;
pub use tcp::TcpServer;

const MIN_RETRY_DELAY: Duration = Duration::from_millis(5);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(1);

// Out of file descriptors, per process and system wide.
#[cfg(unix)]
const EMFILE: i32 = 24;
#[cfg(unix)]
const ENFILE: i32 = 23;

#[derive(Debug)]
pub struct ServerError {
    message: String,
    kind: Option<io::ErrorKind>,
    os_error: Option<i32>,
}

impl ServerError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: None,
            os_error: None,
        }
    }
    /// The underlying IO error kind, if the error came from IO.
    pub fn kind(&self) -> Option<io::ErrorKind> {
        self.kind
    }
    /// Errors worth retrying after a pause, such as a connection aborted
    /// before it could be accepted or running out of file descriptors.
    pub fn is_transient(&self) -> bool {
        #[cfg(unix)]
        {
            if matches!(self.os_error, Some(EMFILE) | Some(ENFILE)) {
                return true;
            }
        }
        matches!(
            self.kind,
            Some(io::ErrorKind::ConnectionAborted)
                | Some(io::ErrorKind::ConnectionReset)
                | Some(io::ErrorKind::Interrupted)
                | Some(io::ErrorKind::WouldBlock)
                | Some(io::ErrorKind::TimedOut)
        )
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "server error: {}", &self.message)
    }
}

impl error::Error for ServerError {}

impl From<io::Error> for ServerError {
    fn from(err: io::Error) -> Self {
        Self {
            message: format!("IOError({})", err),
            kind: Some(err.kind()),
            os_error: err.raw_os_error(),
        }
    }
}

pub trait Server {
    /// Serve one request (or accept one connection), must be implemented.
    fn serve_one(&mut self) -> Result<(), ServerError>;
    /// Serve until a non-transient error occurs, and return it. Transient
    /// errors are logged and retried with a delay doubling from 5ms to 1s.
    fn serve_forever(&mut self) -> ServerError {
        let mut delay: Option<Duration> = None;
        loop {
            match self.serve_one() {
                Ok(()) => delay = None,
                Err(e) if e.is_transient() => {
                    let d = match delay {
                        None => MIN_RETRY_DELAY,
                        Some(d) => (d * 2).min(MAX_RETRY_DELAY),
                    };
                    error!("{}; retrying in {:?}", e, d);
                    thread::sleep(d);
                    delay = Some(d);
                }
                Err(e) => return e,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Scripted(Vec<Result<(), ServerError>>);

    impl Server for Scripted {
        fn serve_one(&mut self) -> Result<(), ServerError> {
            self.0.remove(0)
        }
    }

    fn io_error(kind: io::ErrorKind) -> ServerError {
        io::Error::new(kind, "test").into()
    }

    #[test]
    fn test_serve_forever_retries_transient() {
        let mut server = Scripted(vec![
            Ok(()),
            Err(io_error(io::ErrorKind::ConnectionAborted)),
            Err(io_error(io::ErrorKind::Interrupted)),
            Ok(()),
            Err(io_error(io::ErrorKind::AddrInUse)),
            Ok(()),
        ]);
        let err = server.serve_forever();
        assert_eq!(err.kind(), Some(io::ErrorKind::AddrInUse));
        assert_eq!(server.0.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_serve_forever_retries_fd_exhaustion() {
        let mut server = Scripted(vec![
            Err(io::Error::from_raw_os_error(EMFILE).into()),
            Err(io::Error::from_raw_os_error(ENFILE).into()),
            Ok(()),
            Err(ServerError::new("listener closed")),
            Ok(()),
        ]);
        let err = server.serve_forever();
        assert_eq!(err.to_string(), "server error: listener closed");
        assert_eq!(server.0.len(), 1);
    }

    #[test]
    fn test_server_error_display() {
        assert_eq!(ServerError::new("closed").to_string(), "server error: closed");
        assert!(!ServerError::new("closed").is_transient());
        assert!(io_error(io::ErrorKind::TimedOut).is_transient());
    }
}
