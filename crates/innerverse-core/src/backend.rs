//! Client for the InnerVerse local backend.

use crate::error::CoreError;
use innerverse_protocol::{Ack, ChatHistory, ChatTurn, CompleteAck, LessonId, LessonView};
use log::debug;
use reqwest::StatusCode;

/// Thin JSON client over the local backend's four routes.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{}", self.base_url, suffix)
    }

    /// Fetch the full lesson view.
    ///
    /// Maps a 404 to [`CoreError::NotFound`] so the page can render the
    /// full-page not-found message.
    pub async fn lesson(&self, id: LessonId) -> Result<LessonView, CoreError> {
        let response = self
            .http
            .get(self.url(&format!("/api/lesson/{id}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CoreError::NotFound(id));
        }
        if !response.status().is_success() {
            return Err(CoreError::Upstream(format!(
                "lesson fetch returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    /// Fetch the stored chat history, empty when none exists.
    pub async fn chat_history(&self, id: LessonId) -> Result<Vec<ChatTurn>, CoreError> {
        let response = self
            .http
            .get(self.url(&format!("/api/lesson/{id}/chat")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CoreError::Upstream(format!(
                "history fetch returned {}",
                response.status()
            )));
        }
        let history: ChatHistory = response.json().await?;
        debug!(
            "loaded chat history (lesson_id={}, turns={})",
            id,
            history.messages.len()
        );
        Ok(history.messages)
    }

    /// Persist one completed chat turn.
    ///
    /// All failures map to [`CoreError::PersistenceWrite`]; the gateway
    /// decides whether to surface or swallow them.
    pub async fn post_chat_turn(&self, id: LessonId, turn: &ChatTurn) -> Result<(), CoreError> {
        let response = self
            .http
            .post(self.url(&format!("/api/lesson/{id}/chat")))
            .json(turn)
            .send()
            .await
            .map_err(|err| CoreError::PersistenceWrite(err.to_string()))?;
        if !response.status().is_success() {
            return Err(CoreError::PersistenceWrite(format!(
                "chat write returned {}",
                response.status()
            )));
        }
        let ack: Ack = response
            .json()
            .await
            .map_err(|err| CoreError::PersistenceWrite(err.to_string()))?;
        if !ack.success {
            return Err(CoreError::PersistenceWrite("write not acknowledged".into()));
        }
        Ok(())
    }

    /// Persist the completion marker for a lesson.
    pub async fn complete(&self, id: LessonId) -> Result<bool, CoreError> {
        let response = self
            .http
            .post(self.url(&format!("/api/lesson/{id}/complete")))
            .send()
            .await
            .map_err(|err| CoreError::PersistenceWrite(err.to_string()))?;
        if !response.status().is_success() {
            return Err(CoreError::PersistenceWrite(format!(
                "completion write returned {}",
                response.status()
            )));
        }
        let ack: CompleteAck = response
            .json()
            .await
            .map_err(|err| CoreError::PersistenceWrite(err.to_string()))?;
        Ok(ack.completed)
    }
}
