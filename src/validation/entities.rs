//! Rule tables and labels for the CRM entity kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::rules::{AttributeLabelMap, FieldRule, RuleSet, RuleSetError};

pub const CLIENT_STATUSES: &[&str] = &["active", "inactive", "prospect"];
pub const COMMUNICATION_CHANNELS: &[&str] = &["email", "phone", "meeting", "video"];
pub const COMMUNICATION_DIRECTIONS: &[&str] = &["inbound", "outbound"];
pub const DEAL_STAGES: &[&str] = &[
    "prospect",
    "qualified",
    "proposal",
    "negotiation",
    "closed_won",
    "closed_lost",
];

/// An entity kind that accepts submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Communication,
    Deal,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Client,
        EntityKind::Communication,
        EntityKind::Deal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Communication => "communication",
            EntityKind::Deal => "deal",
        }
    }

    /// Plural collection name, also the URL segment.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Client => "clients",
            EntityKind::Communication => "communications",
            EntityKind::Deal => "deals",
        }
    }

    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.collection() == collection)
    }

    /// Path of the form that submits this entity.
    pub fn create_path(&self) -> String {
        format!("/{}/create", self.collection())
    }

    pub fn rule_set(&self) -> Result<RuleSet, RuleSetError> {
        match self {
            EntityKind::Client => RuleSet::new(vec![
                FieldRule::required("contact_id")
                    .integer()
                    .exists("contacts", "id"),
                FieldRule::required("client_since").date(),
                FieldRule::required("status").one_of(CLIENT_STATUSES),
                FieldRule::optional("lifetime_value").number().min(0.0),
                FieldRule::optional("notes").string(),
            ]),
            EntityKind::Communication => RuleSet::new(vec![
                FieldRule::required("client_id")
                    .integer()
                    .exists("clients", "id"),
                FieldRule::required("channel").one_of(COMMUNICATION_CHANNELS),
                FieldRule::required("direction").one_of(COMMUNICATION_DIRECTIONS),
                FieldRule::optional("subject").string().max_length(255),
                FieldRule::required("content").string(),
                FieldRule::optional("communicated_at").date(),
            ]),
            EntityKind::Deal => RuleSet::new(vec![
                FieldRule::required("title").string().max_length(255),
                FieldRule::required("value").number().min(0.0),
                FieldRule::required("stage").one_of(DEAL_STAGES),
                FieldRule::required("client_id")
                    .integer()
                    .exists("clients", "id"),
                FieldRule::optional("expected_close_date").date(),
                FieldRule::optional("description").string(),
            ]),
        }
    }

    pub fn labels(&self) -> AttributeLabelMap {
        match self {
            EntityKind::Client => AttributeLabelMap::new(&[
                ("contact_id", "contact"),
                ("client_since", "client since date"),
                ("status", "status"),
                ("lifetime_value", "lifetime value"),
            ]),
            EntityKind::Communication => AttributeLabelMap::new(&[
                ("client_id", "client"),
                ("channel", "channel"),
                ("direction", "direction"),
                ("subject", "subject"),
                ("content", "content"),
                ("communicated_at", "communication date"),
            ]),
            EntityKind::Deal => AttributeLabelMap::new(&[
                ("title", "title"),
                ("value", "deal value"),
                ("stage", "stage"),
                ("client_id", "client"),
                ("expected_close_date", "expected close date"),
            ]),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
