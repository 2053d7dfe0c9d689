//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware)
//!     → input.rs (JSON or form body → field map)
//!     → validation (RequestValidator)
//!     → negotiate.rs (continue | 422 JSON | redirect back)
//!     → session.rs (flash errors + old input for the redirect)
//!     → handlers.rs (final response)
//! ```

pub mod handlers;
pub mod input;
pub mod negotiate;
pub mod server;
pub mod session;

pub use negotiate::{present, Negotiated, RequestContext, ValidationErrorBody};
pub use server::{build_router, AppState, HttpServer};
pub use session::{Flash, FlashStore};
