//! Progress bar view model.
//!
//! `ProgressBar::view` is a pure function of the current status and the
//! display options; nothing here performs I/O or keeps state between calls.

use serde::Serialize;

use super::status::{connector_filled, step_state, StatusTone, StepState, WorkflowStatus};

const COMPACT_BAR_CELLS: usize = 10;

/// Display options for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressOptions {
    pub show_labels: bool,
    pub compact: bool,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            show_labels: true,
            compact: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub status: WorkflowStatus,
    pub label: Option<&'static str>,
    pub tone: StatusTone,
    pub state: StepState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectorView {
    pub filled: bool,
}

/// Everything needed to draw the bar for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    pub current: WorkflowStatus,
    pub steps: [StepView; WorkflowStatus::COUNT],
    pub connectors: [ConnectorView; WorkflowStatus::COUNT - 1],
    /// Only set in compact mode.
    pub progress_percent: Option<u8>,
}

pub struct ProgressBar;

impl ProgressBar {
    pub fn view(current: WorkflowStatus, options: ProgressOptions) -> ProgressView {
        let steps = WorkflowStatus::ALL.map(|status| StepView {
            status,
            label: options.show_labels.then(|| status.label()),
            tone: status.tone(),
            state: step_state(status.index(), current),
        });

        let mut connectors = [ConnectorView { filled: false }; WorkflowStatus::COUNT - 1];
        for (i, connector) in connectors.iter_mut().enumerate() {
            connector.filled = connector_filled(i, current);
        }

        let progress_percent = options.compact.then(|| progress_percent(current));

        ProgressView {
            current,
            steps,
            connectors,
            progress_percent,
        }
    }
}

/// `(index + 1) / 5 * 100`, always a whole number for five steps.
pub fn progress_percent(current: WorkflowStatus) -> u8 {
    ((current.index() + 1) * 100 / WorkflowStatus::COUNT) as u8
}

impl ProgressView {
    pub fn step(&self, status: WorkflowStatus) -> &StepView {
        &self.steps[status.index()]
    }

    pub fn render_text(&self) -> String {
        match self.progress_percent {
            Some(percent) => self.render_compact(percent),
            None => self.render_full(),
        }
    }

    fn render_full(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                out.push_str(if self.connectors[i - 1].filled {
                    " ━━ "
                } else {
                    " ── "
                });
            }
            let marker = match step.state {
                StepState::Completed => "[✓]",
                StepState::Current => "[●]",
                StepState::Upcoming => "[ ]",
            };
            out.push_str(marker);
            if let Some(label) = step.label {
                out.push(' ');
                out.push_str(label);
            }
        }
        out
    }

    fn render_compact(&self, percent: u8) -> String {
        let filled = usize::from(percent) * COMPACT_BAR_CELLS / 100;
        let bar: String = "█".repeat(filled) + &"░".repeat(COMPACT_BAR_CELLS - filled);
        let mut out = format!("[{bar}] {percent}%");
        if self.steps[self.current.index()].label.is_some() {
            out.push_str(&format!(
                " {} ({} of {})",
                self.current.label(),
                self.current.index() + 1,
                WorkflowStatus::COUNT
            ));
        }
        out
    }
}
