use anyhow::Result;
use std::sync::Arc;

use super::{emit, Command};
use crate::api::{EntityRef, WorkflowApi};
use crate::history::{HistoryPanelController, PanelView};
use crate::session::TracingNotifier;

pub struct HistoryCommand {
    pub entity: EntityRef,
    pub api: Arc<dyn WorkflowApi>,
    pub json: bool,
}

impl HistoryCommand {
    pub fn new(entity: EntityRef, api: Arc<dyn WorkflowApi>) -> Self {
        Self {
            entity,
            api,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for HistoryCommand {
    async fn execute(&self) -> Result<()> {
        let panel = HistoryPanelController::new(Arc::clone(&self.api), Arc::new(TracingNotifier));
        let view = panel.load(self.entity.clone()).await;

        emit(self.json, &view, PanelView::render_text)?;

        if let PanelView::Error { message, .. } = &view {
            anyhow::bail!("Workflow history for {} could not be loaded: {message}", self.entity);
        }
        Ok(())
    }
}
