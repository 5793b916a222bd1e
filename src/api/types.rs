use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflow::{ActionFlags, WorkflowStatus};

/// Kinds of records that move through the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Course,
    Program,
}

impl EntityType {
    /// Path segment used by the history endpoint.
    pub fn as_path(self) -> &'static str {
        match self {
            EntityType::Course => "course",
            EntityType::Program => "program",
        }
    }

    /// Collection used by the detail endpoints.
    pub fn collection(self) -> &'static str {
        match self {
            EntityType::Course => "courses",
            EntityType::Program => "programs",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// A course or program identified by its backend id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityType,
    pub id: String,
}

impl EntityRef {
    pub fn new(kind: EntityType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn course(id: impl Into<String>) -> Self {
        Self::new(EntityType::Course, id)
    }

    pub fn program(id: impl Into<String>) -> Self {
        Self::new(EntityType::Program, id)
    }

    /// Unencoded path segments of the history endpoint. The id stays a
    /// single segment no matter which characters it contains.
    pub fn history_segments(&self) -> [&str; 3] {
        ["workflow-history", self.kind.as_path(), &self.id]
    }

    pub fn detail_segments(&self) -> [&str; 2] {
        [self.kind.collection(), &self.id]
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryActor {
    pub full_name: String,
    pub role: String,
}

/// One recorded status transition. Produced by the backend, never edited here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowHistoryItem {
    pub id: String,
    pub from_status: WorkflowStatus,
    pub to_status: WorkflowStatus,
    #[serde(default)]
    pub user: Option<HistoryActor>,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The parts of a course or program detail response this crate reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub status: WorkflowStatus,
    #[serde(default)]
    pub actions: ActionFlags,
}
