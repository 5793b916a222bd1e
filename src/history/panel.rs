//! Load lifecycle of the workflow history panel.
//!
//! Each fetch is tagged with a generation. Only the result carrying the
//! current generation may change what the panel shows; anything older, or
//! anything arriving after unmount, is dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use statig::prelude::*;

use super::render::HistoryRow;
use crate::api::{ApiError, EntityRef, WorkflowHistoryItem};
use crate::observability::api_metrics;

pub const RETRY_LABEL: &str = "Try again";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    Fetch {
        generation: u64,
        entity: EntityRef,
    },
    Resolved {
        generation: u64,
        items: Vec<WorkflowHistoryItem>,
    },
    Rejected {
        generation: u64,
        message: String,
    },
    Unmount,
}

/// Identifies one outbound history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub entity: EntityRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelPhase {
    Idle,
    Loading,
    Loaded,
    Empty,
    Failed,
    Unmounted,
}

/// What the panel shows right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PanelView {
    Idle,
    Loading,
    Empty,
    Error {
        message: String,
        retry_label: &'static str,
    },
    Rows(Vec<HistoryRow>),
    Unmounted,
}

impl PanelView {
    pub fn render_text(&self) -> String {
        match self {
            PanelView::Idle | PanelView::Unmounted => String::new(),
            PanelView::Loading => "Loading workflow history...".to_string(),
            PanelView::Empty => "No workflow history yet.".to_string(),
            PanelView::Error {
                message,
                retry_label,
            } => format!("Failed to load workflow history: {message}\n[{retry_label}]"),
            PanelView::Rows(rows) => rows
                .iter()
                .map(HistoryRow::render_text)
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

#[derive(Debug, Default)]
pub struct PanelMachine {
    generation: u64,
    entity: Option<EntityRef>,
    items: Vec<WorkflowHistoryItem>,
    error: Option<String>,
}

impl PanelMachine {
    fn start_fetch(&mut self, generation: u64, entity: &EntityRef) -> Outcome<State> {
        self.generation = generation;
        self.entity = Some(entity.clone());
        self.items.clear();
        self.error = None;
        tracing::debug!(entity = %entity, generation, "History fetch started");
        Transition(State::loading())
    }

    fn discard(&self, generation: u64) -> Outcome<State> {
        api_metrics().record_stale_response();
        tracing::debug!(
            generation,
            current_generation = self.generation,
            "Discarding stale history response"
        );
        Handled
    }
}

#[state_machine(initial = "State::idle()")]
impl PanelMachine {
    #[state]
    fn idle(&mut self, event: &PanelEvent) -> Outcome<State> {
        match event {
            PanelEvent::Fetch { generation, entity } => self.start_fetch(*generation, entity),
            PanelEvent::Unmount => Transition(State::unmounted()),
            PanelEvent::Resolved { generation, .. } | PanelEvent::Rejected { generation, .. } => {
                self.discard(*generation)
            }
        }
    }

    #[state]
    fn loading(&mut self, event: &PanelEvent) -> Outcome<State> {
        match event {
            PanelEvent::Fetch { generation, entity } => self.start_fetch(*generation, entity),
            PanelEvent::Resolved { generation, items } if *generation == self.generation => {
                self.items = items.clone();
                tracing::debug!(generation, count = items.len(), "History loaded");
                if self.items.is_empty() {
                    Transition(State::empty())
                } else {
                    Transition(State::loaded())
                }
            }
            PanelEvent::Rejected { generation, message } if *generation == self.generation => {
                self.error = Some(message.clone());
                tracing::debug!(generation, error = %message, "History fetch failed");
                Transition(State::failed())
            }
            PanelEvent::Resolved { generation, .. } | PanelEvent::Rejected { generation, .. } => {
                self.discard(*generation)
            }
            PanelEvent::Unmount => Transition(State::unmounted()),
        }
    }

    #[state]
    fn loaded(&mut self, event: &PanelEvent) -> Outcome<State> {
        self.settled(event)
    }

    #[state]
    fn empty(&mut self, event: &PanelEvent) -> Outcome<State> {
        self.settled(event)
    }

    #[state]
    fn failed(&mut self, event: &PanelEvent) -> Outcome<State> {
        self.settled(event)
    }

    #[state]
    fn unmounted(&mut self, event: &PanelEvent) -> Outcome<State> {
        match event {
            PanelEvent::Resolved { generation, .. } | PanelEvent::Rejected { generation, .. } => {
                self.discard(*generation)
            }
            PanelEvent::Fetch { .. } | PanelEvent::Unmount => Handled,
        }
    }
}

impl PanelMachine {
    // Shared by every state that has finished a load.
    fn settled(&mut self, event: &PanelEvent) -> Outcome<State> {
        match event {
            PanelEvent::Fetch { generation, entity } => self.start_fetch(*generation, entity),
            PanelEvent::Resolved { generation, .. } | PanelEvent::Rejected { generation, .. } => {
                self.discard(*generation)
            }
            PanelEvent::Unmount => Transition(State::unmounted()),
        }
    }
}

/// Workflow history panel for one course or program.
pub struct HistoryPanel {
    machine: StateMachine<PanelMachine>,
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryPanel {
    pub fn new() -> Self {
        Self {
            machine: PanelMachine::default().state_machine(),
        }
    }

    pub fn phase(&self) -> PanelPhase {
        match self.machine.state() {
            State::Idle { .. } => PanelPhase::Idle,
            State::Loading { .. } => PanelPhase::Loading,
            State::Loaded { .. } => PanelPhase::Loaded,
            State::Empty { .. } => PanelPhase::Empty,
            State::Failed { .. } => PanelPhase::Failed,
            State::Unmounted { .. } => PanelPhase::Unmounted,
        }
    }

    pub fn entity(&self) -> Option<&EntityRef> {
        self.machine.inner().entity.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.machine.inner().generation
    }

    pub fn items(&self) -> &[WorkflowHistoryItem] {
        &self.machine.inner().items
    }

    /// Start loading `entity` (mount or entity change). Returns `None` once
    /// the panel has been unmounted.
    pub fn begin_fetch(&mut self, entity: EntityRef) -> Option<FetchTicket> {
        if self.phase() == PanelPhase::Unmounted {
            return None;
        }
        let generation = self.generation() + 1;
        self.machine.handle(&PanelEvent::Fetch {
            generation,
            entity: entity.clone(),
        });
        Some(FetchTicket { generation, entity })
    }

    /// Re-issue the last fetch. Only available while the error state is shown.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if self.phase() != PanelPhase::Failed {
            return None;
        }
        let entity = self.entity()?.clone();
        self.begin_fetch(entity)
    }

    /// Apply the outcome of a fetch. Returns whether it changed the panel.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<WorkflowHistoryItem>, ApiError>,
    ) -> bool {
        let applies = self.phase() == PanelPhase::Loading && ticket.generation == self.generation();

        let event = match result {
            Ok(items) => PanelEvent::Resolved {
                generation: ticket.generation,
                items,
            },
            Err(e) => PanelEvent::Rejected {
                generation: ticket.generation,
                message: e.user_message(),
            },
        };
        self.machine.handle(&event);
        applies
    }

    pub fn unmount(&mut self) {
        self.machine.handle(&PanelEvent::Unmount);
    }

    pub fn view(&self, now: DateTime<Utc>) -> PanelView {
        let context = self.machine.inner();
        match self.phase() {
            PanelPhase::Idle => PanelView::Idle,
            PanelPhase::Loading => PanelView::Loading,
            PanelPhase::Empty => PanelView::Empty,
            PanelPhase::Failed => PanelView::Error {
                message: context.error.clone().unwrap_or_default(),
                retry_label: RETRY_LABEL,
            },
            PanelPhase::Loaded => PanelView::Rows(
                context
                    .items
                    .iter()
                    .map(|item| HistoryRow::from_item(item, now))
                    .collect(),
            ),
            PanelPhase::Unmounted => PanelView::Unmounted,
        }
    }
}

impl std::fmt::Debug for HistoryPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryPanel")
            .field("phase", &self.phase())
            .field("generation", &self.generation())
            .field("entity", &self.entity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::WorkflowStatus;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn item(id: &str, hours_ago: i64, from: WorkflowStatus, to: WorkflowStatus) -> WorkflowHistoryItem {
        WorkflowHistoryItem {
            id: id.to_string(),
            from_status: from,
            to_status: to,
            user: None,
            comment: None,
            created_at: now() - Duration::hours(hours_ago),
        }
    }

    #[test]
    fn test_starts_idle() {
        let panel = HistoryPanel::new();
        assert_eq!(panel.phase(), PanelPhase::Idle);
        assert_eq!(panel.view(now()), PanelView::Idle);
    }

    #[test]
    fn test_rows_keep_server_order() {
        let mut panel = HistoryPanel::new();
        let ticket = panel.begin_fetch(EntityRef::course("c-1")).unwrap();
        assert_eq!(panel.view(now()), PanelView::Loading);

        // Deliberately not chronological: the panel must not sort.
        let items = vec![
            item("newest", 1, WorkflowStatus::DeptReview, WorkflowStatus::CurriculumCommittee),
            item("middle", 48, WorkflowStatus::Draft, WorkflowStatus::DeptReview),
            item("oldest", 2, WorkflowStatus::DeptReview, WorkflowStatus::Draft),
        ];
        assert!(panel.complete(&ticket, Ok(items)));

        match panel.view(now()) {
            PanelView::Rows(rows) => {
                let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
                assert_eq!(ids, vec!["newest", "middle", "oldest"]);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_is_not_error() {
        let mut panel = HistoryPanel::new();
        let ticket = panel.begin_fetch(EntityRef::program("p-1")).unwrap();
        panel.complete(&ticket, Ok(vec![]));

        assert_eq!(panel.phase(), PanelPhase::Empty);
        assert_eq!(panel.view(now()), PanelView::Empty);
        assert_eq!(panel.retry(), None);
    }

    #[test]
    fn test_failure_shows_error_with_retry() {
        let mut panel = HistoryPanel::new();
        let ticket = panel.begin_fetch(EntityRef::course("c-1")).unwrap();
        panel.complete(&ticket, Err(ApiError::status(500, "database unavailable")));

        assert_eq!(
            panel.view(now()),
            PanelView::Error {
                message: "database unavailable".to_string(),
                retry_label: RETRY_LABEL,
            }
        );

        let retry = panel.retry().unwrap();
        assert_eq!(retry.generation, ticket.generation + 1);
        assert_eq!(retry.entity, EntityRef::course("c-1"));
        assert_eq!(panel.phase(), PanelPhase::Loading);

        // A second retry while loading issues nothing.
        assert_eq!(panel.retry(), None);
    }

    #[test]
    fn test_stale_result_after_entity_change_is_discarded() {
        let mut panel = HistoryPanel::new();
        let first = panel.begin_fetch(EntityRef::course("c-1")).unwrap();
        let second = panel.begin_fetch(EntityRef::course("c-2")).unwrap();

        let stale = vec![item("from-c1", 1, WorkflowStatus::Draft, WorkflowStatus::DeptReview)];
        assert!(!panel.complete(&first, Ok(stale)));
        assert_eq!(panel.phase(), PanelPhase::Loading);

        assert!(panel.complete(&second, Ok(vec![])));
        assert_eq!(panel.phase(), PanelPhase::Empty);
        assert_eq!(panel.entity(), Some(&EntityRef::course("c-2")));
    }

    #[test]
    fn test_result_after_unmount_is_discarded() {
        let mut panel = HistoryPanel::new();
        let ticket = panel.begin_fetch(EntityRef::course("c-1")).unwrap();
        panel.unmount();

        let items = vec![item("late", 1, WorkflowStatus::Draft, WorkflowStatus::DeptReview)];
        assert!(!panel.complete(&ticket, Ok(items)));
        assert_eq!(panel.view(now()), PanelView::Unmounted);
        assert!(panel.items().is_empty());
        assert_eq!(panel.begin_fetch(EntityRef::course("c-1")), None);
    }

    #[test]
    fn test_render_text_for_states() {
        assert_eq!(PanelView::Empty.render_text(), "No workflow history yet.");
        assert_eq!(
            PanelView::Error {
                message: "Could not reach the server.".to_string(),
                retry_label: RETRY_LABEL,
            }
            .render_text(),
            "Failed to load workflow history: Could not reach the server.\n[Try again]"
        );
    }
}
