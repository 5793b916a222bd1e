// Workflow history panel: load lifecycle, async driver and row formatting.

pub mod controller;
pub mod panel;
pub mod render;

pub use controller::HistoryPanelController;
pub use panel::{FetchTicket, HistoryPanel, PanelPhase, PanelView, RETRY_LABEL};
pub use render::{format_exact, format_relative, HistoryRow, UNKNOWN_USER};
