// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod identity;

pub use http::ReqwestTransport;
pub use identity::{ConfiguredIdentity, EnvIdentity, StaticIdentity, DEFAULT_EMAIL_ENV};
