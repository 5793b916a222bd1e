use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::errors::ApiError;
use super::types::{EntityRef, EntitySummary, WorkflowHistoryItem};
use crate::config::ApiConfig;
use crate::observability::{api_metrics, OperationTimer};
use crate::session::AuthSession;
use crate::telemetry::generate_correlation_id;

/// Read operations the workflow views need from the backend.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Transition history for an entity, in server order (newest first).
    async fn fetch_history(&self, entity: &EntityRef) -> Result<Vec<WorkflowHistoryItem>, ApiError>;

    /// Current status and action flags for an entity.
    async fn fetch_entity(&self, entity: &EntityRef) -> Result<EntitySummary, ApiError>;
}

/// Rate-limited HTTP client for the Calricula REST API.
///
/// Every call performs exactly one HTTP attempt. Nothing is cached, so a
/// retry from the UI always reaches the server.
#[derive(Debug)]
pub struct CalriculaApiClient {
    http: Client,
    base_url: Url,
    session: Option<AuthSession>,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    timeout: Duration,
}

impl CalriculaApiClient {
    pub fn new(config: &ApiConfig, session: Option<AuthSession>) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;

        let per_second = NonZeroU32::new(config.requests_per_second)
            .ok_or_else(|| ApiError::Config("requests_per_second must be greater than zero".into()))?;
        let burst = NonZeroU32::new(config.burst_capacity.max(1)).unwrap_or(per_second);
        let quota = Quota::per_second(per_second).allow_burst(burst);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("calricula-workflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            session,
            rate_limiter,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    ///
    /// Empty, `.` and `..` segments are rejected; they would change which
    /// endpoint the request reaches.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ApiError::InvalidSegment(bad.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document below the base URL.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();

        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let correlation_id = generate_correlation_id();
        let timer = OperationTimer::new(&path);
        debug!(url = %url, correlation_id = %correlation_id, "GET");

        let mut request = self.http.get(url).header("x-request-id", &correlation_id);
        if let Some(session) = &self.session {
            request = request.bearer_auth(session.token());
        }

        api_metrics().record_request();
        let result = self.send(request, &path).await;
        timer.finish();

        if let Err(e) = &result {
            api_metrics().record_error();
            warn!(path = %path, correlation_id = %correlation_id, error = %e, "API request failed");
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| self.transport_error(e, path))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e, path))?;

        if !status.is_success() {
            return Err(ApiError::status(status.as_u16(), error_message(status, &body)));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn transport_error(&self, error: reqwest::Error, path: &str) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout {
                operation: format!("GET {path}"),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ApiError::Transport(error)
        }
    }
}

#[async_trait]
impl WorkflowApi for CalriculaApiClient {
    async fn fetch_history(&self, entity: &EntityRef) -> Result<Vec<WorkflowHistoryItem>, ApiError> {
        self.get_json(&entity.history_segments()).await
    }

    async fn fetch_entity(&self, entity: &EntityRef) -> Result<EntitySummary, ApiError> {
        self.get_json(&entity.detail_segments()).await
    }
}

/// Base URLs always end in `/` so endpoint segments extend the path.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|e| ApiError::Config(format!("invalid base URL '{raw}': {e}")))
}

/// Prefer the `detail` or `message` field of a JSON error body.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "message"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        });

    from_json.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("https://curriculum.example.edu/api").unwrap();
        assert_eq!(url.as_str(), "https://curriculum.example.edu/api/");
    }

    #[test]
    fn test_endpoint_keeps_id_in_one_segment() {
        let config = ApiConfig {
            base_url: "https://curriculum.example.edu/api".to_string(),
            ..ApiConfig::default()
        };
        let client = CalriculaApiClient::new(&config, None).unwrap();
        let url = |id: &str| {
            client
                .endpoint(&EntityRef::course(id).history_segments())
                .unwrap()
                .to_string()
        };

        assert_eq!(
            url("42"),
            "https://curriculum.example.edu/api/workflow-history/course/42"
        );
        assert_eq!(
            url("a/b?x"),
            "https://curriculum.example.edu/api/workflow-history/course/a%2Fb%3Fx"
        );
        assert_eq!(
            url("42#frag"),
            "https://curriculum.example.edu/api/workflow-history/course/42%23frag"
        );
        assert_eq!(
            url("../../courses/9"),
            "https://curriculum.example.edu/api/workflow-history/course/..%2F..%2Fcourses%2F9"
        );
    }

    #[test]
    fn test_endpoint_rejects_dot_and_empty_ids() {
        let client = CalriculaApiClient::new(&ApiConfig::default(), None).unwrap();
        for id in ["", ".", ".."] {
            let err = client
                .endpoint(&EntityRef::program(id).detail_segments())
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidSegment(ref s) if s == id), "got {err:?}");
        }
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(parse_base_url("not a url"), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_error_message_prefers_json_detail() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"detail": "Course is locked"}"#),
            "Course is locked"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"message": "upstream down"}"#),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_zero_rate_is_rejected() {
        let config = ApiConfig {
            requests_per_second: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(
            CalriculaApiClient::new(&config, None),
            Err(ApiError::Config(_))
        ));
    }
}
