//! Request validation subsystem.
//!
//! # Data Flow
//! ```text
//! submitted field map
//!     → entities.rs (rule table + labels for the entity kind)
//!     → validator.rs (ordered rule evaluation, normalization)
//!         → lookup.rs (existence checks, injected)
//!     → ValidationOutcome (Accepted | Rejected)
//!     → http::negotiate decides how a rejection is presented
//! ```
//!
//! # Design Decisions
//! - Rule tables are plain data; one evaluation routine serves every entity
//! - Every field is checked, but only its first violation is kept
//! - The validator never decides presentation

pub mod entities;
pub mod lookup;
pub mod rules;
pub mod validator;
pub mod violation;

pub use entities::EntityKind;
pub use lookup::{ExistenceLookup, InMemoryRecords};
pub use rules::{AttributeLabelMap, FieldRule, RuleSet, RuleSetError, ValueKind};
pub use validator::{FieldViolation, RequestValidator, ValidationOutcome};
pub use violation::{Bound, Violation};
