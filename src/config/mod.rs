//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!
//! process environment
//!     → links.rs (social links, env override or literal default)
//!     → SocialLinks (resolved once, immutable)
//!
//! both shared via Arc to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod links;
pub mod loader;
pub mod schema;
pub mod validation;

pub use links::{LinkEntry, SocialLinks, LINKS};
pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, ListenerConfig, LogFormat, ObservabilityConfig, SessionConfig};
