//! Violation taxonomy for rejected submissions.
//!
//! Every variant is recoverable by the caller. The `Display` output is the
//! user-facing message that ends up in the error bag.

use thiserror::Error;

use crate::validation::rules::ValueKind;

/// A numeric or length bound that a value failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Min(f64),
    Max(f64),
    MaxLength(usize),
}

impl Bound {
    fn describe(&self) -> String {
        match self {
            Bound::Min(min) => format!("must be at least {}", format_number(*min)),
            Bound::Max(max) => format!("may not be greater than {}", format_number(*max)),
            Bound::MaxLength(max) => format!("may not be greater than {} characters", max),
        }
    }
}

/// A single rule failure for one field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("The {label} field is required.")]
    MissingRequiredField { label: String },

    #[error("The {label} {}.", .expected.expectation())]
    TypeOrFormatMismatch { label: String, expected: ValueKind },

    #[error("The selected {label} is invalid. Allowed values: {}.", .allowed.join(", "))]
    ValueNotInEnumeratedSet {
        label: String,
        allowed: &'static [&'static str],
    },

    #[error("The {label} {}.", .bound.describe())]
    BoundViolation { label: String, bound: Bound },

    #[error("The referenced {label} record was not found.")]
    ReferenceNotFound { label: String },
}

impl Violation {
    /// Stable identifier used for metrics labels and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::MissingRequiredField { .. } => "missing_required_field",
            Violation::TypeOrFormatMismatch { .. } => "type_or_format_mismatch",
            Violation::ValueNotInEnumeratedSet { .. } => "value_not_in_enumerated_set",
            Violation::BoundViolation { .. } => "bound_violation",
            Violation::ReferenceNotFound { .. } => "reference_not_found",
        }
    }
}

/// Whole numbers print without a fractional part ("0", not "0.0").
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
