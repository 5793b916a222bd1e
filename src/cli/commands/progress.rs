use anyhow::{Context, Result};

use super::{emit, Command};
use crate::workflow::{ProgressBar, ProgressOptions, ProgressView, WorkflowStatus};

pub struct ProgressCommand {
    pub status: String,
    pub options: ProgressOptions,
    pub json: bool,
}

impl ProgressCommand {
    pub fn new(status: impl Into<String>, options: ProgressOptions) -> Self {
        Self {
            status: status.into(),
            options,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Unknown statuses are rejected rather than drawn as Draft.
    pub fn build_view(&self) -> Result<ProgressView> {
        let status: WorkflowStatus = self
            .status
            .parse()
            .with_context(|| format!("Cannot render progress for '{}'", self.status))?;
        Ok(ProgressBar::view(status, self.options))
    }
}

impl Command for ProgressCommand {
    async fn execute(&self) -> Result<()> {
        let view = self.build_view()?;
        emit(self.json, &view, ProgressView::render_text)
    }
}
