//! Backend API mocking tests
//!
//! These tests run the real HTTP client against a wiremock server so that the
//! history panel and detail page are exercised end to end without a backend.

use calricula_workflow::api::{ApiError, CalriculaApiClient, EntityRef, WorkflowApi};
use calricula_workflow::config::ApiConfig;
use calricula_workflow::history::{HistoryPanelController, PanelPhase, PanelView};
use calricula_workflow::pages::DetailPage;
use calricula_workflow::session::{AuthSession, RecordingNotifier};
use calricula_workflow::workflow::{ProgressOptions, StepState, WorkflowStatus};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Backend mock server for deterministic testing
struct CalriculaApiMock {
    server: MockServer,
}

impl CalriculaApiMock {
    async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: format!("{}/api", self.server.uri()),
            timeout_ms: 2_000,
            ..ApiConfig::default()
        }
    }

    fn client(&self) -> CalriculaApiClient {
        CalriculaApiClient::new(&self.config(), Some(AuthSession::new("mock-token"))).unwrap()
    }

    /// Mock the history endpoint, expecting exactly `times` requests
    async fn mock_history(&self, entity: &EntityRef, status: u16, body: Value, times: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/api/workflow-history/{}/{}", entity.kind.as_path(), entity.id)))
            .and(header("authorization", "Bearer mock-token"))
            .and(header_exists("x-request-id"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .up_to_n_times(times)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    async fn mock_entity(&self, entity: &EntityRef, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/{}/{}", entity.kind.collection(), entity.id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

fn history_entry(id: &str, from: &str, to: &str, created_at: &str, user: Value) -> Value {
    json!({
        "id": id,
        "from_status": from,
        "to_status": to,
        "user": user,
        "comment": null,
        "created_at": created_at
    })
}

#[tokio::test]
async fn test_history_is_returned_in_server_order() {
    let mock = CalriculaApiMock::new().await;
    let course = EntityRef::course("c-101");
    let chair = json!({"full_name": "Maria Lopez", "role": "Chair"});
    mock.mock_history(
        &course,
        200,
        json!([
            history_entry("h3", "DeptReview", "CurriculumCommittee", "2026-10-10T09:00:00Z", chair),
            history_entry("h2", "Draft", "DeptReview", "2026-10-12T09:00:00Z", Value::Null),
            history_entry("h1", "DeptReview", "Draft", "2026-10-01T09:00:00Z", Value::Null),
        ]),
        1,
    )
    .await;

    let items = mock.client().fetch_history(&course).await.unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["h3", "h2", "h1"]);
    assert_eq!(items[0].to_status, WorkflowStatus::CurriculumCommittee);
    assert_eq!(items[1].user, None);
}

#[tokio::test]
async fn test_unknown_status_in_payload_is_a_decode_error() {
    let mock = CalriculaApiMock::new().await;
    let program = EntityRef::program("p-4");
    mock.mock_history(
        &program,
        200,
        json!([history_entry("h1", "Draft", "Archived", "2026-10-01T09:00:00Z", Value::Null)]),
        1,
    )
    .await;

    let err = mock.client().fetch_history(&program).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_error_status_carries_server_detail() {
    let mock = CalriculaApiMock::new().await;
    let course = EntityRef::course("missing");
    mock.mock_history(&course, 404, json!({"detail": "Course not found"}), 1)
        .await;

    match mock.client().fetch_history(&course).await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Course not found");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reserved_characters_in_id_stay_in_one_segment() {
    let mock = CalriculaApiMock::new().await;
    Mock::given(method("GET"))
        .and(path("/api/workflow-history/course/a%2Fb%3Fx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock.server)
        .await;

    let items = mock
        .client()
        .fetch_history(&EntityRef::course("a/b?x"))
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_dot_segment_id_never_reaches_the_server() {
    let mock = CalriculaApiMock::new().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock.server)
        .await;

    let err = mock
        .client()
        .fetch_history(&EntityRef::course(".."))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidSegment(_)), "got {err:?}");
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workflow-history/course/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ApiConfig {
        base_url: server.uri(),
        timeout_ms: 100,
        ..ApiConfig::default()
    };
    let client = CalriculaApiClient::new(&config, None).unwrap();

    let err = client
        .fetch_history(&EntityRef::course("slow"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ApiError::Timeout { duration_ms: 100, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_panel_failure_then_single_retry() {
    let mock = CalriculaApiMock::new().await;
    let course = EntityRef::course("c-7");

    // First request fails, the retry succeeds with an empty history.
    mock.mock_history(&course, 500, json!({"detail": "database unavailable"}), 1)
        .await;
    mock.mock_history(&course, 200, json!([]), 1).await;

    let notifier = Arc::new(RecordingNotifier::new());
    let panel = HistoryPanelController::new(Arc::new(mock.client()), notifier.clone());

    let view = panel.load(course.clone()).await;
    assert_eq!(
        view,
        PanelView::Error {
            message: "database unavailable".to_string(),
            retry_label: "Try again",
        }
    );

    panel
        .retry()
        .await
        .expect("retry from error state")
        .await
        .unwrap();
    assert_eq!(panel.phase().await, PanelPhase::Empty);
    assert_eq!(notifier.notifications().len(), 1);
    // Each mock expects exactly one request; verified when the server drops.
}

#[tokio::test]
async fn test_detail_page_widgets_fail_independently() {
    let mock = CalriculaApiMock::new().await;
    let program = EntityRef::program("p-20");

    mock.mock_entity(&program, 503, json!({"detail": "maintenance"}))
        .await;
    mock.mock_history(
        &program,
        200,
        json!([history_entry("h1", "Draft", "DeptReview", "2026-10-01T09:00:00Z", Value::Null)]),
        1,
    )
    .await;

    let page = DetailPage::load(
        Arc::new(mock.client()),
        Arc::new(RecordingNotifier::new()),
        program,
        ProgressOptions::default(),
    )
    .await;

    assert!(page.summary.is_failed());
    match &page.history {
        PanelView::Rows(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].actor_name, "Unknown User");
        }
        other => panic!("expected rows, got {other:?}"),
    }
}

#[tokio::test]
async fn test_detail_page_progress_from_entity_status() {
    let mock = CalriculaApiMock::new().await;
    let course = EntityRef::course("c-55");

    mock.mock_entity(
        &course,
        200,
        json!({
            "id": "c-55",
            "title": "Intro to Statistics",
            "status": "CurriculumCommittee",
            "actions": {"can_advance": false, "can_return": true}
        }),
    )
    .await;
    mock.mock_history(&course, 200, json!([]), 1).await;

    let page = DetailPage::load(
        Arc::new(mock.client()),
        Arc::new(RecordingNotifier::new()),
        course,
        ProgressOptions {
            show_labels: true,
            compact: true,
        },
    )
    .await;

    let progress = page.progress.expect("progress view");
    let states: Vec<StepState> = progress.steps.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![
            StepState::Completed,
            StepState::Completed,
            StepState::Current,
            StepState::Upcoming,
            StepState::Upcoming,
        ]
    );
    assert_eq!(progress.progress_percent, Some(60));
    assert_eq!(page.history, PanelView::Empty);
}
