//! Page coordinator: drives load, summary, chat, and completion for one
//! lesson-page session.

use crate::backend::BackendClient;
use crate::error::CoreError;
use crate::gateway;
use crate::guard::{StreamClass, StreamGuards};
use crate::prompt;
use crate::session::SessionState;
use crate::stream::AiClient;
use innerverse_protocol::{ChatTurn, LessonId, LessonRecord, Role};
use log::{info, warn};

/// Static fallback shown when summary generation fails.
pub const SUMMARY_FALLBACK: &str =
    "Summary coming soon. Check back once this lesson has been processed.";

/// Synthetic assistant reply appended when a chat turn fails, so the
/// transcript stays coherent. Session-local, never persisted.
pub const CHAT_FAILURE_REPLY: &str =
    "Sorry, I couldn't answer that just now. Please try sending your question again.";

/// One lesson page: session state plus the clients that feed it.
pub struct LessonPage {
    session: SessionState,
    guards: StreamGuards,
    backend: BackendClient,
    ai: AiClient,
}

impl LessonPage {
    /// Create a page for the given lesson.
    pub fn new(lesson_id: LessonId, backend: BackendClient, ai: AiClient) -> Self {
        Self {
            session: SessionState::new(lesson_id),
            guards: StreamGuards::new(),
            backend,
            ai,
        }
    }

    /// Read access to the session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Mutable access to the session state (theme toggles and the like).
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// The page's stream guards.
    pub fn guards(&self) -> &StreamGuards {
        &self.guards
    }

    /// Populate the session: lesson view first, then stored chat history.
    ///
    /// An unknown lesson propagates [`CoreError::NotFound`] so the caller
    /// renders the full-page not-found message.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let view = self.backend.lesson(self.session.lesson_id).await?;
        info!(
            "loaded lesson (lesson_id={}, season={}, episode={})",
            view.lesson.id, view.lesson.season, view.lesson.episode
        );
        self.session.lesson = Some(view);
        self.session.turns = self.backend.chat_history(self.session.lesson_id).await?;
        self.session.transcript_loaded = true;
        Ok(())
    }

    /// Stream the lesson summary through `on_delta`.
    ///
    /// Returns `None` when the lesson is not loaded yet or a summary stream
    /// is already in flight (the call is a no-op). Any stream failure
    /// resolves to the static fallback text rather than an error.
    pub async fn generate_summary(&self, mut on_delta: impl FnMut(&str)) -> Option<String> {
        let lesson = self.loaded_lesson()?;
        let _permit = self.guards.begin(StreamClass::Summary)?;
        let request = prompt::summary_request(&lesson);
        match self.ai.stream_answer(&request, &mut on_delta).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!("summary generation failed (lesson_id={}): {}", lesson.id, err);
                Some(SUMMARY_FALLBACK.to_string())
            }
        }
    }

    /// Send one chat turn, streaming the answer through `on_delta`.
    ///
    /// Returns `false` without side effects when the question is blank, the
    /// lesson is not loaded, or a chat stream is already in flight. On a
    /// stream failure the synthetic apology turn is appended in memory so
    /// the transcript stays coherent; the input is free to retry because
    /// the permit is released on return.
    pub async fn send_chat(&mut self, question: &str, mut on_delta: impl FnMut(&str)) -> bool {
        let question = question.trim();
        if question.is_empty() {
            return false;
        }
        let Some(lesson) = self.loaded_lesson() else {
            return false;
        };
        let Some(_permit) = self.guards.begin(StreamClass::Chat) else {
            return false;
        };

        let user_turn = ChatTurn::now(Role::User, question);
        self.session.turns.push(user_turn.clone());
        gateway::persist_turn(&self.backend, lesson.id, &user_turn).await;

        let request = prompt::chat_request(&lesson, question);
        match self.ai.stream_answer(&request, &mut on_delta).await {
            Ok(answer) => {
                let assistant_turn = ChatTurn::now(Role::Assistant, answer);
                self.session.turns.push(assistant_turn.clone());
                gateway::persist_turn(&self.backend, lesson.id, &assistant_turn).await;
            }
            Err(err) => {
                warn!("chat generation failed (lesson_id={}): {}", lesson.id, err);
                self.session
                    .turns
                    .push(ChatTurn::now(Role::Assistant, CHAT_FAILURE_REPLY));
            }
        }
        true
    }

    /// Flip completion in memory and persist the marker best-effort.
    pub async fn mark_complete(&mut self) {
        self.session.mark_completed();
        gateway::persist_completion(&self.backend, self.session.lesson_id).await;
    }

    fn loaded_lesson(&self) -> Option<LessonRecord> {
        self.session.lesson.as_ref().map(|view| view.lesson.clone())
    }
}
