// Workflow vocabulary and the views derived from it.
// The backend owns transitions; everything here is a pure function of its data.

pub mod approval;
pub mod progress;
pub mod status;

pub use approval::{ActionButton, ActionFlags, ActionKind, ApprovalActions};
pub use progress::{ProgressBar, ProgressOptions, ProgressView};
pub use status::{connector_filled, index_of, step_state, StatusTone, StepState, UnknownStatus, WorkflowStatus};
