// Calricula workflow client library
// Workflow status model, progress and history views, and the typed API client they read from

pub mod api;
pub mod cli;
pub mod config;
pub mod history;
pub mod observability;
pub mod pages;
pub mod session;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use api::{ApiError, CalriculaApiClient, EntityRef, EntitySummary, EntityType, WorkflowApi, WorkflowHistoryItem};
pub use config::{config, init_config, CalriculaConfig};
pub use history::{HistoryPanel, HistoryPanelController, HistoryRow, PanelPhase, PanelView};
pub use observability::{api_metrics, ApiMetrics, OperationTimer};
pub use pages::{DetailPage, WidgetState};
pub use session::{AuthSession, Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use telemetry::{generate_correlation_id, init_telemetry};
pub use workflow::{
    step_state, ActionFlags, ApprovalActions, ProgressBar, ProgressOptions, ProgressView, StepState, WorkflowStatus,
};
