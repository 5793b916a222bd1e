//! Workflow status vocabulary for Course Outlines of Record and programs.
//!
//! This module is the only place that knows the order of the approval
//! states and how each one is labelled. Badges, the progress bar and the
//! history panel all read from here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the five approval states, in workflow order.
///
/// The wire representation is the variant name (`"DeptReview"`, ...).
/// Deserializing any other value fails instead of falling back to `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Draft,
    DeptReview,
    CurriculumCommittee,
    ArticulationReview,
    Approved,
}

/// Raw status value outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown workflow status '{0}'")]
pub struct UnknownStatus(pub String);

/// Visual classification of a step relative to the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

/// Badge colour family used wherever a status is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Gray,
    Blue,
    Purple,
    Amber,
    Green,
}

struct StatusEntry {
    status: WorkflowStatus,
    wire: &'static str,
    label: &'static str,
    tone: StatusTone,
}

// Indexed by ordinal position.
static STATUS_TABLE: [StatusEntry; 5] = [
    StatusEntry {
        status: WorkflowStatus::Draft,
        wire: "Draft",
        label: "Draft",
        tone: StatusTone::Gray,
    },
    StatusEntry {
        status: WorkflowStatus::DeptReview,
        wire: "DeptReview",
        label: "Department Review",
        tone: StatusTone::Blue,
    },
    StatusEntry {
        status: WorkflowStatus::CurriculumCommittee,
        wire: "CurriculumCommittee",
        label: "Curriculum Committee",
        tone: StatusTone::Purple,
    },
    StatusEntry {
        status: WorkflowStatus::ArticulationReview,
        wire: "ArticulationReview",
        label: "Articulation Review",
        tone: StatusTone::Amber,
    },
    StatusEntry {
        status: WorkflowStatus::Approved,
        wire: "Approved",
        label: "Approved",
        tone: StatusTone::Green,
    },
];

impl WorkflowStatus {
    /// All statuses in workflow order.
    pub const ALL: [WorkflowStatus; 5] = [
        WorkflowStatus::Draft,
        WorkflowStatus::DeptReview,
        WorkflowStatus::CurriculumCommittee,
        WorkflowStatus::ArticulationReview,
        WorkflowStatus::Approved,
    ];

    /// Number of canonical steps.
    pub const COUNT: usize = 5;

    /// Ordinal position, `0..=4`.
    pub fn index(self) -> usize {
        match self {
            WorkflowStatus::Draft => 0,
            WorkflowStatus::DeptReview => 1,
            WorkflowStatus::CurriculumCommittee => 2,
            WorkflowStatus::ArticulationReview => 3,
            WorkflowStatus::Approved => 4,
        }
    }

    fn entry(self) -> &'static StatusEntry {
        &STATUS_TABLE[self.index()]
    }

    pub fn wire_name(self) -> &'static str {
        self.entry().wire
    }

    /// Human label shown on badges, steps and history rows.
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn tone(self) -> StatusTone {
        self.entry().tone
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for WorkflowStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATUS_TABLE
            .iter()
            .find(|entry| entry.wire == s)
            .map(|entry| entry.status)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl StatusTone {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusTone::Gray => "gray",
            StatusTone::Blue => "blue",
            StatusTone::Purple => "purple",
            StatusTone::Amber => "amber",
            StatusTone::Green => "green",
        }
    }
}

impl StepState {
    pub fn as_str(self) -> &'static str {
        match self {
            StepState::Completed => "completed",
            StepState::Current => "current",
            StepState::Upcoming => "upcoming",
        }
    }
}

/// Ordinal position of a raw status value.
pub fn index_of(raw: &str) -> Result<usize, UnknownStatus> {
    raw.parse::<WorkflowStatus>().map(WorkflowStatus::index)
}

/// Classify step `step_index` against the current status.
pub fn step_state(step_index: usize, current: WorkflowStatus) -> StepState {
    let current_index = current.index();
    if step_index < current_index {
        StepState::Completed
    } else if step_index == current_index {
        StepState::Current
    } else {
        StepState::Upcoming
    }
}

/// Whether the connector between step `i` and `i + 1` is filled.
pub fn connector_filled(connector_index: usize, current: WorkflowStatus) -> bool {
    connector_index < current.index()
}
