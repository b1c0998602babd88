//! Listening port selection.
use std::collections::HashMap;
use std::env;
use std::error;
use std::fmt;
use std::num::ParseIntError;

/// Environment variable that overrides the default port.
pub const PORT_VAR: &str = "PORT";

/// Source of environment variables.
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl Environment for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortParseError {
    port: String,
    source: ParseIntError,
}

impl PortParseError {
    /// The rejected port string.
    pub fn port(&self) -> &str {
        &self.port
    }
}

impl fmt::Display for PortParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port {:?}: {}", self.port, self.source)
    }
}

impl error::Error for PortParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Choose the listening port: a non-empty `PORT` from `env`, else
/// `default`. The choice must be a 32-bit signed integer; whether it is a
/// usable TCP port is left to binding.
///
/// ```
/// use std::collections::HashMap;
/// use apiutil::server::resolve_port;
///
/// let mut env: HashMap<&str, &str> = HashMap::new();
/// assert_eq!(resolve_port(&env, 9000), Ok(9000));
/// env.insert("PORT", "18080");
/// assert_eq!(resolve_port(&env, 9000), Ok(18080));
/// ```
pub fn resolve_port<E>(env: &E, default: i32) -> Result<i32, PortParseError>
where
    E: Environment + ?Sized,
{
    let port = match env.var(PORT_VAR) {
        Some(port) if !port.is_empty() => port,
        _ => default.to_string(),
    };
    match port.parse::<i32>() {
        Ok(n) => Ok(n),
        Err(source) => Err(PortParseError { port, source }),
    }
}
