// Typed access to the Calricula backend. All workflow rules live server side.

pub mod client;
pub mod errors;
pub mod types;

pub use client::{CalriculaApiClient, WorkflowApi};
#[cfg(any(test, feature = "testing"))]
pub use client::MockWorkflowApi;
pub use errors::ApiError;
pub use types::{EntityRef, EntitySummary, EntityType, HistoryActor, WorkflowHistoryItem};
