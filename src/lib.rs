//! CRM submission validation service.
//!
//! Entity submissions (clients, communications, deals) are validated against
//! declarative rule tables and answered either with a structured 422 payload
//! or with a redirect back to the form carrying errors and prior input.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod validation;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
