use anyhow::Result;
use serde::Serialize;

use super::{emit, Command};
use crate::workflow::WorkflowStatus;

#[derive(Debug, Serialize)]
struct StatusRow {
    index: usize,
    status: WorkflowStatus,
    label: &'static str,
    tone: &'static str,
}

pub struct StatusesCommand {
    pub json: bool,
}

impl StatusesCommand {
    pub fn new() -> Self {
        Self { json: false }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for StatusesCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for StatusesCommand {
    async fn execute(&self) -> Result<()> {
        let rows: Vec<StatusRow> = WorkflowStatus::ALL
            .iter()
            .map(|status| StatusRow {
                index: status.index(),
                status: *status,
                label: status.label(),
                tone: status.tone().as_str(),
            })
            .collect();

        emit(self.json, &rows, |rows| {
            rows.iter()
                .map(|row| {
                    format!(
                        "{}  {:<20} {:<22} {}",
                        row.index, row.status.wire_name(), row.label, row.tone
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
    }
}
