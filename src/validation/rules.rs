//! Declarative field rules.
//!
//! A [`RuleSet`] is an ordered table of [`FieldRule`]s for one entity kind.
//! Each rule carries a presence flag and a list of constraints that are
//! evaluated in declaration order.

use std::collections::HashSet;

use thiserror::Error;

/// The type a present value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
    Integer,
    Date,
}

impl ValueKind {
    /// Message fragment used when a value does not have this kind.
    pub fn expectation(&self) -> &'static str {
        match self {
            ValueKind::String => "must be a string",
            ValueKind::Number => "must be a number",
            ValueKind::Integer => "must be an integer",
            ValueKind::Date => "is not a valid date",
        }
    }
}

/// A rule that requires a matching record in an external collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceReference {
    pub collection: &'static str,
    pub key: &'static str,
}

/// One constraint applied to a present value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Kind(ValueKind),
    OneOf(&'static [&'static str]),
    Min(f64),
    Max(f64),
    MaxLength(usize),
    Exists(ExistenceReference),
}

/// Validation rule for a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    pub constraints: Vec<Constraint>,
}

impl FieldRule {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            required: true,
            constraints: Vec::new(),
        }
    }

    /// Optional fields skip every constraint when their value is empty.
    pub fn optional(field: &'static str) -> Self {
        Self {
            field,
            required: false,
            constraints: Vec::new(),
        }
    }

    pub fn string(self) -> Self {
        self.with(Constraint::Kind(ValueKind::String))
    }

    pub fn number(self) -> Self {
        self.with(Constraint::Kind(ValueKind::Number))
    }

    pub fn integer(self) -> Self {
        self.with(Constraint::Kind(ValueKind::Integer))
    }

    pub fn date(self) -> Self {
        self.with(Constraint::Kind(ValueKind::Date))
    }

    pub fn one_of(self, allowed: &'static [&'static str]) -> Self {
        self.with(Constraint::OneOf(allowed))
    }

    pub fn min(self, min: f64) -> Self {
        self.with(Constraint::Min(min))
    }

    pub fn max(self, max: f64) -> Self {
        self.with(Constraint::Max(max))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.with(Constraint::MaxLength(max))
    }

    pub fn exists(self, collection: &'static str, key: &'static str) -> Self {
        self.with(Constraint::Exists(ExistenceReference { collection, key }))
    }

    fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// The declared value kind, if any.
    pub fn kind(&self) -> Option<ValueKind> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Kind(kind) => Some(*kind),
            _ => None,
        })
    }
}

/// Errors raised while building a rule table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("duplicate rule for field '{0}'")]
    DuplicateField(&'static str),
}

/// Ordered rules for one entity kind. Field names are unique.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<FieldRule>) -> Result<Self, RuleSetError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.field) {
                return Err(RuleSetError::DuplicateField(rule.field));
            }
        }
        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter()
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Human-readable labels for error messages, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct AttributeLabelMap {
    labels: Vec<(&'static str, &'static str)>,
}

impl AttributeLabelMap {
    pub fn new(labels: &[(&'static str, &'static str)]) -> Self {
        Self {
            labels: labels.to_vec(),
        }
    }

    /// Label for `field`, falling back to the raw field name.
    pub fn label<'a>(&'a self, field: &'a str) -> &'a str {
        self.labels
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, label)| *label)
            .unwrap_or(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_constraints_in_order() {
        let rule = FieldRule::required("title").string().max_length(255);
        assert!(rule.required);
        assert_eq!(
            rule.constraints,
            vec![
                Constraint::Kind(ValueKind::String),
                Constraint::MaxLength(255)
            ]
        );
        assert_eq!(rule.kind(), Some(ValueKind::String));
    }

    #[test]
    fn test_duplicate_fields_rejected() {
        let err = RuleSet::new(vec![
            FieldRule::required("title").string(),
            FieldRule::optional("title").string(),
        ])
        .unwrap_err();
        assert_eq!(err, RuleSetError::DuplicateField("title"));
    }

    #[test]
    fn test_label_fallback() {
        let labels = AttributeLabelMap::new(&[("client_id", "client")]);
        assert_eq!(labels.label("client_id"), "client");
        assert_eq!(labels.label("subject"), "subject");
    }
}
