//! Fire-and-forget persistence gateway.
//!
//! Writes are best-effort: a failure is logged and swallowed, in-memory
//! state is never rolled back, and nothing retries. The user re-triggers
//! the operation if they care.

use crate::backend::BackendClient;
use innerverse_protocol::{ChatTurn, LessonId};
use log::warn;

/// Persist a completed chat turn, dropping the write on failure.
pub async fn persist_turn(backend: &BackendClient, id: LessonId, turn: &ChatTurn) {
    if let Err(err) = backend.post_chat_turn(id, turn).await {
        warn!(
            "dropping chat turn write (lesson_id={}, role={}): {}",
            id, turn.role, err
        );
    }
}

/// Persist the completion marker, dropping the write on failure.
pub async fn persist_completion(backend: &BackendClient, id: LessonId) {
    if let Err(err) = backend.complete(id).await {
        warn!("dropping completion write (lesson_id={}): {}", id, err);
    }
}
