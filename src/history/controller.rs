use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::panel::{FetchTicket, HistoryPanel, PanelPhase, PanelView};
use crate::api::{EntityRef, WorkflowApi};
use crate::observability::create_workflow_span;
use crate::session::{Notification, Notifier};
use crate::telemetry::generate_correlation_id;

/// Drives a `HistoryPanel` against the backend.
///
/// `mount` and `retry` each issue exactly one request on a spawned task.
/// The task hands its result back through the panel, which ignores it if
/// the panel moved on (new entity, unmount) in the meantime.
pub struct HistoryPanelController {
    panel: Arc<Mutex<HistoryPanel>>,
    api: Arc<dyn WorkflowApi>,
    notifier: Arc<dyn Notifier>,
}

impl HistoryPanelController {
    pub fn new(api: Arc<dyn WorkflowApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            panel: Arc::new(Mutex::new(HistoryPanel::new())),
            api,
            notifier,
        }
    }

    /// Load history for `entity`. Also used when the entity changes.
    pub async fn mount(&self, entity: EntityRef) -> Option<JoinHandle<()>> {
        let ticket = self.panel.lock().await.begin_fetch(entity)?;
        Some(self.spawn_fetch(ticket))
    }

    /// Manual retry from the error state. Does nothing in any other state.
    pub async fn retry(&self) -> Option<JoinHandle<()>> {
        let ticket = self.panel.lock().await.retry()?;
        tracing::info!(entity = %ticket.entity, "Retrying workflow history fetch");
        Some(self.spawn_fetch(ticket))
    }

    /// Stop in-flight work from touching the panel.
    pub async fn unmount(&self) {
        self.panel.lock().await.unmount();
    }

    pub async fn phase(&self) -> PanelPhase {
        self.panel.lock().await.phase()
    }

    pub async fn view(&self, now: DateTime<Utc>) -> PanelView {
        self.panel.lock().await.view(now)
    }

    /// Mount and wait for the single request to settle.
    pub async fn load(&self, entity: EntityRef) -> PanelView {
        if let Some(handle) = self.mount(entity).await {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "History fetch task failed");
            }
        }
        self.view(Utc::now()).await
    }

    fn spawn_fetch(&self, ticket: FetchTicket) -> JoinHandle<()> {
        let panel = Arc::clone(&self.panel);
        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        let span = create_workflow_span(
            "history_panel",
            &ticket.entity.to_string(),
            &generate_correlation_id(),
        );

        tokio::spawn(
            async move {
                let result = api.fetch_history(&ticket.entity).await;
                let failure = result.as_ref().err().map(|e| e.user_message());

                let applied = panel.lock().await.complete(&ticket, result);
                if !applied {
                    return;
                }
                if let Some(message) = failure {
                    notifier.notify(Notification::error(
                        "Workflow history unavailable",
                        message,
                    ));
                }
            }
            .instrument(span),
        )
    }
}
