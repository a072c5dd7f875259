//! Route-level tests for the local backend API.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use innerverse_protocol::{ChatHistory, ChatTurn, LessonRecord, LessonView, Role};
use innerverse_store::LessonStore;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let store = Arc::new(LessonStore::open_in_memory().expect("store"));
    for (id, episode) in [(10, 1), (11, 2)] {
        store
            .insert_lesson(&LessonRecord {
                id,
                title: format!("Episode {episode}"),
                season: 2,
                episode,
                video_url: Some("dQw4w9WgXcQ".to_string()),
                has_video: true,
                transcript_id: Some(format!("tx-{id}")),
            })
            .expect("seed");
    }
    innerverse_server::router(store)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn lesson_view_includes_navigation_and_season() {
    let response = app().oneshot(get("/api/lesson/10")).await.expect("respond");
    assert_eq!(response.status(), StatusCode::OK);

    let view: LessonView =
        serde_json::from_value(body_json(response).await).expect("lesson view");
    assert_eq!(view.lesson.id, 10);
    assert!(!view.navigation.has_prev);
    assert!(view.navigation.has_next);
    assert_eq!(view.navigation.next_lesson_id, Some(11));
    assert_eq!(view.season_lessons.len(), 2);
}

#[tokio::test]
async fn unknown_lesson_is_404() {
    let response = app().oneshot(get("/api/lesson/999")).await.expect("respond");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "lesson 999 not found");
}

#[tokio::test]
async fn chat_history_starts_empty() {
    let response = app()
        .oneshot(get("/api/lesson/10/chat"))
        .await
        .expect("respond");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"messages": []}));
}

#[tokio::test]
async fn posted_turn_reloads_identically() {
    let app = app();
    let turn = json!({
        "role": "user",
        "content": "test",
        "timestamp": "2025-11-14T10:00:00",
    });
    let response = app
        .clone()
        .oneshot(post_json("/api/lesson/10/chat", turn))
        .await
        .expect("respond");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"success": true}));

    let response = app
        .oneshot(get("/api/lesson/10/chat"))
        .await
        .expect("respond");
    let history: ChatHistory =
        serde_json::from_value(body_json(response).await).expect("history");
    assert_eq!(
        history.messages,
        vec![ChatTurn {
            role: Role::User,
            content: "test".to_string(),
            timestamp: "2025-11-14T10:00:00".to_string(),
        }]
    );
}

#[tokio::test]
async fn empty_chat_turn_is_rejected() {
    let turn = json!({"role": "user", "content": "   ", "timestamp": "2025-11-14T10:00:00"});
    let response = app()
        .oneshot(post_json("/api/lesson/10/chat", turn))
        .await
        .expect("respond");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn completion_marker_flips_progress() {
    let app = app();
    let response = app
        .clone()
        .oneshot(post_json("/api/lesson/11/complete", json!({})))
        .await
        .expect("respond");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "completed": true})
    );

    let response = app.oneshot(get("/api/lesson/11")).await.expect("respond");
    let view: LessonView =
        serde_json::from_value(body_json(response).await).expect("lesson view");
    assert!(view.progress.completed);
}
