pub use crate::config::ServerConfig;
#[cfg(feature = "json")]
pub use crate::content::json::decode;
pub use crate::content::DecodeError;
pub use crate::handler::Handler;
#[cfg(feature = "json")]
pub use crate::response::json_ok;
pub use crate::response::{
    bad_request, empty_ok, forbidden, internal_error, method_not_allowed, not_found, text_ok,
    unauthorized, ResponseWriter,
};
pub use crate::request::{Header, Method, Request};
pub use crate::server::Server;
