//! Course and program detail page.
//!
//! The page is made of independent widgets. The summary (status, progress
//! bar, approval buttons) and the history panel load concurrently, and a
//! failure in one leaves the other intact.

use serde::Serialize;
use std::sync::Arc;

use crate::api::{EntityRef, EntitySummary, WorkflowApi};
use crate::history::{HistoryPanelController, PanelView};
use crate::session::{Notification, Notifier};
use crate::workflow::{ApprovalActions, ProgressBar, ProgressOptions, ProgressView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WidgetState<T> {
    Ready(T),
    Failed { message: String },
}

impl<T> WidgetState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            WidgetState::Ready(value) => Some(value),
            WidgetState::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, WidgetState::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailPage {
    pub entity: EntityRef,
    pub summary: WidgetState<EntitySummary>,
    /// Present when the summary loaded.
    pub progress: Option<ProgressView>,
    pub actions: Option<ApprovalActions>,
    pub history: PanelView,
}

impl DetailPage {
    pub async fn load(
        api: Arc<dyn WorkflowApi>,
        notifier: Arc<dyn Notifier>,
        entity: EntityRef,
        options: ProgressOptions,
    ) -> Self {
        let history_panel = HistoryPanelController::new(Arc::clone(&api), Arc::clone(&notifier));

        let (summary, history) = tokio::join!(
            api.fetch_entity(&entity),
            history_panel.load(entity.clone())
        );

        let summary = match summary {
            Ok(summary) => WidgetState::Ready(summary),
            Err(e) => {
                tracing::warn!(entity = %entity, error = %e, "Failed to load entity summary");
                let message = e.user_message();
                notifier.notify(Notification::error(
                    format!("Could not load {}", entity.kind),
                    message.clone(),
                ));
                WidgetState::Failed { message }
            }
        };

        let progress = summary
            .ready()
            .map(|summary| ProgressBar::view(summary.status, options));
        let actions = summary
            .ready()
            .map(|summary| ApprovalActions::from_flags(summary.actions));

        Self {
            entity,
            summary,
            progress,
            actions,
            history,
        }
    }

    pub fn render_text(&self) -> String {
        let mut sections = Vec::new();

        match &self.summary {
            WidgetState::Ready(summary) => {
                let title = summary.title.as_deref().unwrap_or(summary.id.as_str());
                sections.push(format!(
                    "{} {}: {}\nStatus: {}",
                    capitalize(self.entity.kind.as_path()),
                    summary.id,
                    title,
                    summary.status.label()
                ));
            }
            WidgetState::Failed { message } => {
                sections.push(format!("{}\nSummary unavailable: {message}", self.entity));
            }
        }

        if let Some(progress) = &self.progress {
            sections.push(progress.render_text());
        }
        if let Some(actions) = &self.actions {
            sections.push(actions.render_text());
        }

        let history = self.history.render_text();
        if !history.is_empty() {
            sections.push(format!("Workflow history\n{history}"));
        }

        sections.join("\n\n")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
