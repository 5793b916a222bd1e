// Page composition over the workflow widgets.

pub mod detail;

pub use detail::{DetailPage, WidgetState};
