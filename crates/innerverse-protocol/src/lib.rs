//! Wire types shared between the InnerVerse local backend, the page core,
//! and the render layer.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable numeric identifier for a lesson.
pub type LessonId = i64;

/// Timestamp format used on the wire for chat turns.
pub const TURN_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Speaker role for a chat turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User-authored turn.
    User,
    /// Assistant-authored turn.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a role from a lowercase string, defaulting unknown values to user.
    pub fn parse(value: &str) -> Self {
        if value == "assistant" {
            Role::Assistant
        } else {
            Role::User
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Role::parse(value))
    }
}

/// One message in a lesson's conversation history.
///
/// Turns are append-only: created by user input or by a completed stream,
/// never mutated or deleted afterwards. The timestamp stays the ISO-8601
/// string that travels on the wire so a persisted turn reloads byte-equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    /// Role that produced the turn.
    pub role: Role,
    /// Turn content.
    pub content: String,
    /// ISO-8601 timestamp string.
    pub timestamp: String,
}

impl ChatTurn {
    /// Build a turn with the given role and content, stamped now (UTC).
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().format(TURN_TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Derive an HH:MM display time from the wire timestamp.
    ///
    /// Accepts both the naive wire format and full RFC 3339; returns `None`
    /// when the timestamp does not parse as either.
    pub fn display_time(&self) -> Option<String> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.timestamp, TURN_TIMESTAMP_FORMAT) {
            return Some(naive.format("%H:%M").to_string());
        }
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|parsed| parsed.format("%H:%M").to_string())
    }
}

/// Lesson catalog metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonRecord {
    /// Stable numeric identifier.
    pub id: LessonId,
    /// Lesson title.
    pub title: String,
    /// Season the lesson belongs to.
    pub season: i64,
    /// Ordering key within the season.
    pub episode: i64,
    /// Optional video locator: a full URL or a bare video identifier.
    pub video_url: Option<String>,
    /// Whether the lesson has a playable video at all.
    pub has_video: bool,
    /// Optional external transcript identifier used as a retrieval tag.
    pub transcript_id: Option<String>,
}

/// Sidebar listing entry for one lesson in a season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonSummary {
    /// Lesson identifier.
    pub id: LessonId,
    /// Lesson title.
    pub title: String,
    /// Ordering key within the season.
    pub episode: i64,
    /// Whether the viewer has completed this lesson.
    pub completed: bool,
}

/// Per-lesson progress for the viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    /// Completion flag; monotonic, last write wins.
    pub completed: bool,
    /// ISO-8601 timestamp of the most recent view, if any.
    pub last_accessed: Option<String>,
}

/// Previous/next pointers for lesson navigation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Navigation {
    /// Identifier of the previous lesson in the season, if any.
    pub prev_lesson_id: Option<LessonId>,
    /// Identifier of the next lesson in the season, if any.
    pub next_lesson_id: Option<LessonId>,
    /// Whether a previous lesson exists.
    pub has_prev: bool,
    /// Whether a next lesson exists.
    pub has_next: bool,
}

/// Full response for `GET /api/lesson/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonView {
    /// Lesson metadata.
    pub lesson: LessonRecord,
    /// Viewer progress for the lesson.
    pub progress: Progress,
    /// Previous/next navigation.
    pub navigation: Navigation,
    /// All lessons in the same season, in episode order.
    pub season_lessons: Vec<LessonSummary>,
}

/// Response for `GET /api/lesson/{id}/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatHistory {
    /// Stored turns, oldest first. Empty when none exist.
    pub messages: Vec<ChatTurn>,
}

/// Request body for the external AI backend.
///
/// The `document_id` field is sent as the empty string per the backend's
/// wire contract; lesson identity travels in the question text and tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    /// Always empty for this deployment.
    pub document_id: String,
    /// Prompt text.
    pub question: String,
    /// Retrieval tags for backend-side filtering.
    pub tags: Vec<String>,
}

impl AskRequest {
    /// Build a request for the given question and tags.
    pub fn new(question: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            document_id: String::new(),
            question: question.into(),
            tags,
        }
    }
}

/// Generic success acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    /// Whether the write was accepted.
    pub success: bool,
}

/// Acknowledgement for a completion marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompleteAck {
    /// Whether the write was accepted.
    pub success: bool,
    /// Completion state after the write.
    pub completed: bool,
}
