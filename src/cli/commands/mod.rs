use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use crate::api::{CalriculaApiClient, WorkflowApi};
use crate::config::CalriculaConfig;
use crate::session::AuthSession;

pub mod history;
pub mod progress;
pub mod show;
pub mod statuses;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Build the backend client for commands that talk to the API.
pub fn api_client(config: &CalriculaConfig) -> Result<Arc<dyn WorkflowApi>> {
    let session = config.api.token.clone().map(AuthSession::new);
    if session.is_none() {
        tracing::warn!("No API token configured; requests are sent unauthenticated");
    }
    let client = CalriculaApiClient::new(&config.api, session)?;
    tracing::debug!(base_url = %client.base_url(), "API client ready");
    Ok(Arc::new(client))
}

/// Print either the JSON form of `value` or its text rendering.
pub fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}
