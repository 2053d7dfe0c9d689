//! Rule evaluation.
//!
//! # Responsibilities
//! - Walk an entity's rule table in declared order
//! - Normalize accepted values (trimmed strings, numeric coercion)
//! - Collect the first violation per field, for every field
//!
//! # Design Decisions
//! - Rejection is a return value, never an error
//! - The only collaborator is the injected existence lookup
//! - Same input and lookup state always yield the same outcome

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Number, Value};

use crate::validation::entities::EntityKind;
use crate::validation::lookup::ExistenceLookup;
use crate::validation::rules::{
    AttributeLabelMap, Constraint, FieldRule, RuleSet, RuleSetError, ValueKind,
};
use crate::validation::violation::{Bound, Violation};

/// A violation attributed to one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub violation: Violation,
}

impl FieldViolation {
    pub fn message(&self) -> String {
        self.violation.to_string()
    }
}

/// Result of one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Normalized values for the fields the rule table names.
    Accepted(Map<String, Value>),
    /// Violations in rule declaration order, at most one per field.
    Rejected(Vec<FieldViolation>),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ValidationOutcome::Accepted(_) => &[],
            ValidationOutcome::Rejected(violations) => violations,
        }
    }

    /// `{field: [message, ...]}` in field order. Empty when accepted.
    pub fn error_bag(&self) -> Map<String, Value> {
        let mut bag = Map::new();
        for v in self.violations() {
            let messages = bag
                .entry(v.field.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = messages {
                list.push(Value::String(v.message()));
            }
        }
        bag
    }
}

struct EntityTable {
    rules: RuleSet,
    labels: AttributeLabelMap,
}

impl EntityTable {
    fn build(kind: EntityKind) -> Result<Self, RuleSetError> {
        Ok(Self {
            rules: kind.rule_set()?,
            labels: kind.labels(),
        })
    }
}

/// Validates submissions for every entity kind.
pub struct RequestValidator {
    client: EntityTable,
    communication: EntityTable,
    deal: EntityTable,
    lookup: Arc<dyn ExistenceLookup>,
}

impl RequestValidator {
    /// Build the validator with the built-in rule tables.
    pub fn new(lookup: Arc<dyn ExistenceLookup>) -> Result<Self, RuleSetError> {
        Ok(Self {
            client: EntityTable::build(EntityKind::Client)?,
            communication: EntityTable::build(EntityKind::Communication)?,
            deal: EntityTable::build(EntityKind::Deal)?,
            lookup,
        })
    }

    fn table(&self, kind: EntityKind) -> &EntityTable {
        match kind {
            EntityKind::Client => &self.client,
            EntityKind::Communication => &self.communication,
            EntityKind::Deal => &self.deal,
        }
    }

    pub fn rules(&self, kind: EntityKind) -> &RuleSet {
        &self.table(kind).rules
    }

    pub fn validate(&self, kind: EntityKind, input: &Map<String, Value>) -> ValidationOutcome {
        let table = self.table(kind);

        let mut accepted = Map::new();
        let mut violations = Vec::new();

        for rule in table.rules.iter() {
            let label = table.labels.label(rule.field);
            match self.check_field(rule, input.get(rule.field), label) {
                Ok(Some(value)) => {
                    accepted.insert(rule.field.to_string(), value);
                }
                Ok(None) => {}
                Err(violation) => violations.push(FieldViolation {
                    field: rule.field.to_string(),
                    violation,
                }),
            }
        }

        if violations.is_empty() {
            tracing::debug!(entity = %kind, fields = accepted.len(), "Submission accepted");
            ValidationOutcome::Accepted(accepted)
        } else {
            tracing::debug!(
                entity = %kind,
                violations = violations.len(),
                "Submission rejected"
            );
            ValidationOutcome::Rejected(violations)
        }
    }

    /// `Ok(None)` means the field was absent and optional.
    fn check_field(
        &self,
        rule: &FieldRule,
        raw: Option<&Value>,
        label: &str,
    ) -> Result<Option<Value>, Violation> {
        let value = raw.map(normalize);

        if value.as_ref().map_or(true, is_empty) {
            if rule.required {
                return Err(Violation::MissingRequiredField {
                    label: label.to_string(),
                });
            }
            return Ok(raw.map(|_| Value::Null));
        }

        let mut value = value.unwrap_or(Value::Null);
        for constraint in &rule.constraints {
            value = self.apply(constraint, value, label)?;
        }
        Ok(Some(value))
    }

    fn apply(
        &self,
        constraint: &Constraint,
        value: Value,
        label: &str,
    ) -> Result<Value, Violation> {
        match constraint {
            Constraint::Kind(kind) => coerce(*kind, value).ok_or_else(|| {
                Violation::TypeOrFormatMismatch {
                    label: label.to_string(),
                    expected: *kind,
                }
            }),
            Constraint::OneOf(allowed) => {
                let member = match &value {
                    Value::String(s) => allowed.contains(&s.as_str()),
                    _ => false,
                };
                if member {
                    Ok(value)
                } else {
                    Err(Violation::ValueNotInEnumeratedSet {
                        label: label.to_string(),
                        allowed: *allowed,
                    })
                }
            }
            Constraint::Min(min) => {
                check_bound(&value, label, Bound::Min(*min), |size| size >= *min)?;
                Ok(value)
            }
            Constraint::Max(max) => {
                check_bound(&value, label, Bound::Max(*max), |size| size <= *max)?;
                Ok(value)
            }
            Constraint::MaxLength(max) => {
                let within = match &value {
                    Value::String(s) => s.chars().count() <= *max,
                    _ => true,
                };
                if within {
                    Ok(value)
                } else {
                    Err(Violation::BoundViolation {
                        label: label.to_string(),
                        bound: Bound::MaxLength(*max),
                    })
                }
            }
            Constraint::Exists(reference) => {
                if self.lookup.exists(reference.collection, reference.key, &value) {
                    Ok(value)
                } else {
                    tracing::debug!(
                        collection = reference.collection,
                        key = reference.key,
                        "Referenced record not found"
                    );
                    Err(Violation::ReferenceNotFound {
                        label: label.to_string(),
                    })
                }
            }
        }
    }
}

/// Numbers compare by value, strings by character count.
fn check_bound(
    value: &Value,
    label: &str,
    bound: Bound,
    within: impl Fn(f64) -> bool,
) -> Result<(), Violation> {
    let size = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.chars().count() as f64),
        _ => None,
    };
    match size {
        Some(size) if !within(size) => Err(Violation::BoundViolation {
            label: label.to_string(),
            bound,
        }),
        _ => Ok(()),
    }
}

/// Trim strings and turn blank strings into null.
fn normalize(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::String(trimmed.to_string())
            }
        }
        other => other.clone(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Returns the value converted to `kind`, or `None` if it does not fit.
fn coerce(kind: ValueKind, value: Value) -> Option<Value> {
    match kind {
        ValueKind::String => match value {
            Value::String(_) => Some(value),
            _ => None,
        },
        ValueKind::Number => match value {
            Value::Number(_) => Some(value),
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .and_then(number_value),
            _ => None,
        },
        ValueKind::Integer => match value {
            Value::Number(ref n) if n.is_i64() || n.is_u64() => Some(value),
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| Value::from(f as i64)),
            Value::String(s) => s.parse::<i64>().ok().map(Value::from),
            _ => None,
        },
        ValueKind::Date => match value {
            Value::String(ref s) if is_calendar_date(s) => Some(value),
            _ => None,
        },
    }
}

const LOCAL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A calendar date, a local date-time, or an RFC 3339 timestamp.
fn is_calendar_date(input: &str) -> bool {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").is_ok()
        || LOCAL_DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(input, format).is_ok())
        || DateTime::parse_from_rfc3339(input).is_ok()
}

/// Whole numbers become integers so `"10"` and `10` normalize alike.
fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}
