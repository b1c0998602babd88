//! Start a TCP server on the port from `PORT` or a default.
use std::error;
use std::fmt;
use std::io;

use log::info;

use crate::config::ServerConfig;
use crate::handler::Handler;
use crate::server::port::{resolve_port, Environment, PortParseError, ProcessEnv};
use crate::server::{Server, ServerError, TcpServer};

#[derive(Debug)]
pub enum StartError {
    /// The resolved port is not a 32-bit integer; nothing was bound.
    Port(PortParseError),
    /// The listener could not be bound.
    Bind(io::Error),
    /// Serving stopped.
    Serve(ServerError),
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Port(e) => write!(f, "{}", e),
            Self::Bind(e) => write!(f, "{}", e),
            Self::Serve(e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for StartError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Port(e) => Some(e),
            Self::Bind(e) => Some(e),
            Self::Serve(e) => Some(e),
        }
    }
}

impl From<PortParseError> for StartError {
    fn from(err: PortParseError) -> Self {
        Self::Port(err)
    }
}

impl From<ServerError> for StartError {
    fn from(err: ServerError) -> Self {
        Self::Serve(err)
    }
}

/// Listening address on all interfaces for `port`.
fn bind_address(port: i32) -> String {
    format!("0.0.0.0:{}", port)
}

/// Resolve the port from `env` and `config`, and bind a server for
/// `handler` on all interfaces. Port range is checked by binding.
pub fn bind<H, E>(config: &ServerConfig, handler: H, env: &E) -> Result<TcpServer<H>, StartError>
where
    H: 'static + Handler,
    E: Environment + ?Sized,
{
    let port = resolve_port(env, config.default_port)?;
    let addr = bind_address(port);
    let server = TcpServer::new(&addr[..], config.threads, config.timeout, handler)
        .map_err(StartError::Bind)?;
    info!("listening on {}", &addr);
    Ok(server)
}

/// Serve `handler` on `PORT`, or `default_port` if `PORT` is unset or empty.
/// Blocks while serving, and returns the error that stopped it.
///
/// ```no_run
/// use apiutil::prelude::*;
///
/// fn hello(_req: &mut Request, w: &mut ResponseWriter) {
///     text_ok(w, "Hello!");
/// }
///
/// let err = apiutil::server::start(8080, hello);
/// eprintln!("{}", err);
/// ```
pub fn start<H>(default_port: i32, handler: H) -> StartError
where
    H: 'static + Handler,
{
    start_with_config(&ServerConfig::new(default_port), handler)
}

/// Like [`start`], with threads, timeout and default port from `config`.
pub fn start_with_config<H>(config: &ServerConfig, handler: H) -> StartError
where
    H: 'static + Handler,
{
    match bind(config, handler, &ProcessEnv) {
        Ok(mut server) => server.serve_forever().into(),
        Err(e) => e,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    use crate::request::Request;
    use crate::response::{empty_ok, ResponseWriter};

    fn ok(_request: &mut Request, response: &mut ResponseWriter<'_>) {
        empty_ok(response)
    }

    fn env(port: &str) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("PORT".to_string(), port.to_string());
        env
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(bind_address(18080), "0.0.0.0:18080");
        assert_eq!(bind_address(9000), "0.0.0.0:9000");
    }

    #[test]
    fn test_bind_port_from_env() {
        let free = std::net::TcpListener::bind("0.0.0.0:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let server = bind(&ServerConfig::new(9000), ok, &env(&free.to_string())).unwrap();
        let addr = server.local_addr().unwrap();
        assert!(addr.ip().is_unspecified());
        assert_eq!(addr.port(), free);
    }

    #[test]
    fn test_bind_invalid_port() {
        match bind(&ServerConfig::new(9000), ok, &env("abc")) {
            Err(StartError::Port(e)) => assert_eq!(e.port(), "abc"),
            Err(e) => panic!("expected port error, got {}", e),
            Ok(_) => panic!("expected port error"),
        }
    }

    #[test]
    fn test_bind_out_of_range() {
        match bind(&ServerConfig::new(9000), ok, &env("70000")) {
            Err(StartError::Bind(_)) => (),
            Err(e) => panic!("expected bind error, got {}", e),
            Ok(_) => panic!("expected bind error"),
        }
    }

    #[test]
    fn test_bind_port_in_use() {
        let first = bind(&ServerConfig::new(9000), ok, &env("0")).unwrap();
        let port = first.local_addr().unwrap().port().to_string();
        match bind(&ServerConfig::new(9000), ok, &env(&port)) {
            Err(StartError::Bind(e)) => assert_eq!(e.kind(), io::ErrorKind::AddrInUse),
            Err(e) => panic!("expected bind error, got {}", e),
            Ok(_) => panic!("expected bind error"),
        }
    }

    #[test]
    fn test_start_invalid_port_default() {
        // A default that is not a port fails at bind, not at parse.
        let config = ServerConfig::new(-1);
        match bind(&config, ok, &HashMap::<String, String>::new()) {
            Err(StartError::Bind(_)) => (),
            Err(e) => panic!("expected bind error, got {}", e),
            Ok(_) => panic!("expected bind error"),
        }
    }
}
