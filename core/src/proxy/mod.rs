//! Proxy module - stateless HTTP proxy over OpenRouter and DeepL

pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod handlers;
pub mod mappers;
pub mod server;
pub mod upstream;

pub use config::ProxyConfig;
pub use credentials::CredentialSource;
pub use endpoint::{dispatch, ProxyHandler};
pub use error::{ProxyError, ProxyResult};
pub use server::ProxyServer;
