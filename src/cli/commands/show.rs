use anyhow::Result;
use std::sync::Arc;

use super::{emit, Command};
use crate::api::{EntityRef, WorkflowApi};
use crate::history::PanelView;
use crate::pages::DetailPage;
use crate::session::TracingNotifier;
use crate::workflow::ProgressOptions;

pub struct ShowCommand {
    pub entity: EntityRef,
    pub api: Arc<dyn WorkflowApi>,
    pub options: ProgressOptions,
    pub json: bool,
}

impl ShowCommand {
    pub fn new(entity: EntityRef, api: Arc<dyn WorkflowApi>, options: ProgressOptions) -> Self {
        Self {
            entity,
            api,
            options,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for ShowCommand {
    async fn execute(&self) -> Result<()> {
        let page = DetailPage::load(
            Arc::clone(&self.api),
            Arc::new(TracingNotifier),
            self.entity.clone(),
            self.options,
        )
        .await;

        // Partial pages are still printed; only a page with nothing loaded fails.
        emit(self.json, &page, DetailPage::render_text)?;

        if page.summary.is_failed() && matches!(page.history, PanelView::Error { .. }) {
            anyhow::bail!("Nothing could be loaded for {}", self.entity);
        }
        Ok(())
    }
}
