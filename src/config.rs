//! Server configuration.
use std::time::Duration;

/// Port used when neither the caller nor `PORT` says otherwise.
pub const DEFAULT_PORT: i32 = 8080;

/// How a server started with [`start_with_config`](crate::server::start_with_config)
/// listens and runs handlers. The `PORT` environment variable, when set,
/// takes precedence over `default_port`.
///
/// ```
/// use std::time::Duration;
/// use apiutil::config::ServerConfig;
///
/// let config = ServerConfig::new(9000)
///     .with_threads(8)
///     .with_timeout(Some(Duration::from_secs(30)));
/// assert_eq!(config.default_port, 9000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub default_port: i32,
    /// Runner threads: 0 spawns a thread per connection, 1 serves inline,
    /// n uses a pool of n workers.
    pub threads: usize,
    /// Socket read and write timeout. None waits forever.
    pub timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn new(default_port: i32) -> Self {
        Self {
            default_port,
            threads: 0,
            timeout: None,
        }
    }
    pub fn with_default_port(mut self, default_port: i32) -> Self {
        self.default_port = default_port;
        self
    }
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}
