//! HTTP surface for the InnerVerse local backend.
//!
//! Four JSON routes over the lesson store: lesson view, chat history read,
//! chat turn append, and completion marker. The page core is the only
//! intended consumer, but the routes hold on their own.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use innerverse_protocol::{Ack, ChatHistory, ChatTurn, CompleteAck, LessonId};
use innerverse_store::{LessonStore, StoreError};
use log::{debug, error, info};
use serde_json::json;
use std::sync::Arc;

/// Build the API router over the given store.
pub fn router(store: Arc<LessonStore>) -> Router {
    Router::new()
        .route("/api/lesson/{id}", get(get_lesson))
        .route("/api/lesson/{id}/chat", get(get_chat).post(post_chat))
        .route("/api/lesson/{id}/complete", post(post_complete))
        .with_state(store)
}

/// `GET /api/lesson/{id}`: full lesson view, bumping last access.
async fn get_lesson(State(store): State<Arc<LessonStore>>, Path(id): Path<LessonId>) -> Response {
    let view = match store.lesson_view(id) {
        Ok(view) => view,
        Err(err) => return internal_error("lesson view", err),
    };
    match view {
        Some(view) => {
            if let Err(err) = store.touch(id) {
                // Last-access is advisory; the view still succeeds.
                error!("failed to bump last access (lesson_id={}): {}", id, err);
            }
            debug!("served lesson view (lesson_id={})", id);
            Json(view).into_response()
        }
        None => not_found(id),
    }
}

/// `GET /api/lesson/{id}/chat`: stored history, empty array when none.
async fn get_chat(State(store): State<Arc<LessonStore>>, Path(id): Path<LessonId>) -> Response {
    match store.chat_history(id) {
        Ok(messages) => Json(ChatHistory { messages }).into_response(),
        Err(err) => internal_error("chat history", err),
    }
}

/// `POST /api/lesson/{id}/chat`: append one turn, upserting the row.
async fn post_chat(
    State(store): State<Arc<LessonStore>>,
    Path(id): Path<LessonId>,
    Json(turn): Json<ChatTurn>,
) -> Response {
    if turn.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "content cannot be empty"})),
        )
            .into_response();
    }
    match store.append_chat_turn(id, &turn) {
        Ok(()) => {
            info!(
                "stored chat turn (lesson_id={}, role={}, content_len={})",
                id,
                turn.role,
                turn.content.len()
            );
            Json(Ack { success: true }).into_response()
        }
        Err(err) => internal_error("chat append", err),
    }
}

/// `POST /api/lesson/{id}/complete`: upsert the completion marker.
async fn post_complete(
    State(store): State<Arc<LessonStore>>,
    Path(id): Path<LessonId>,
) -> Response {
    match store.mark_complete(id) {
        Ok(()) => Json(CompleteAck {
            success: true,
            completed: true,
        })
        .into_response(),
        Err(err) => internal_error("completion", err),
    }
}

fn not_found(id: LessonId) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("lesson {id} not found")})),
    )
        .into_response()
}

fn internal_error(operation: &str, err: StoreError) -> Response {
    error!("{operation} failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "internal error"})),
    )
        .into_response()
}
