//! Sqlite persistence for the InnerVerse local backend.
//!
//! Three tables back the HTTP surface: a lesson catalog, a chat-history
//! table holding one JSON array of turns per lesson, and a progress table
//! with a monotonic completion flag. Chat appends upsert the owning row, so
//! the first turn for a lesson creates it.

mod error;

pub use error::StoreError;

use chrono::Utc;
use innerverse_protocol::{
    ChatTurn, LessonId, LessonRecord, LessonSummary, LessonView, Navigation, Progress,
    TURN_TIMESTAMP_FORMAT,
};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS lessons (
    id            INTEGER PRIMARY KEY,
    title         TEXT NOT NULL,
    season        INTEGER NOT NULL,
    episode       INTEGER NOT NULL,
    video_url     TEXT,
    has_video     INTEGER NOT NULL DEFAULT 0,
    transcript_id TEXT
);
CREATE TABLE IF NOT EXISTS chat_history (
    lesson_id  INTEGER PRIMARY KEY,
    messages   TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS progress (
    lesson_id     INTEGER PRIMARY KEY,
    completed     INTEGER NOT NULL DEFAULT 0,
    last_accessed TEXT
);
";

/// Sqlite-backed store for lessons, chat history, and progress.
///
/// Other sessions may write the same rows concurrently; completion is a
/// monotonic boolean, so last write wins is acceptable everywhere.
pub struct LessonStore {
    conn: Mutex<Connection>,
}

impl LessonStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        info!("opened lesson store ({})", path.as_ref().display());
        Self::with_connection(conn)
    }

    /// Open an in-memory store. Used by tests and the demo server.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert or replace a catalog entry.
    pub fn insert_lesson(&self, record: &LessonRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO lessons
                 (id, title, season, episode, video_url, has_video, transcript_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.title,
                record.season,
                record.episode,
                record.video_url,
                record.has_video,
                record.transcript_id,
            ],
        )?;
        Ok(())
    }

    /// Fetch one lesson by id.
    pub fn lesson(&self, id: LessonId) -> Result<Option<LessonRecord>, StoreError> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                "SELECT id, title, season, episode, video_url, has_video, transcript_id
                 FROM lessons WHERE id = ?1",
                params![id],
                |row| {
                    Ok(LessonRecord {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        season: row.get(2)?,
                        episode: row.get(3)?,
                        video_url: row.get(4)?,
                        has_video: row.get(5)?,
                        transcript_id: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// List all lessons in a season in episode order, joined with progress.
    pub fn season_lessons(&self, season: i64) -> Result<Vec<LessonSummary>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT l.id, l.title, l.episode, COALESCE(p.completed, 0)
             FROM lessons l
             LEFT JOIN progress p ON p.lesson_id = l.id
             WHERE l.season = ?1
             ORDER BY l.episode",
        )?;
        let rows = stmt.query_map(params![season], |row| {
            Ok(LessonSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                episode: row.get(2)?,
                completed: row.get(3)?,
            })
        })?;
        let mut lessons = Vec::new();
        for row in rows {
            lessons.push(row?);
        }
        Ok(lessons)
    }

    /// Derive previous/next pointers from episode order within the season.
    pub fn navigation(&self, id: LessonId) -> Result<Option<Navigation>, StoreError> {
        let Some(lesson) = self.lesson(id)? else {
            return Ok(None);
        };
        let conn = self.conn.lock();
        let prev: Option<LessonId> = conn
            .query_row(
                "SELECT id FROM lessons WHERE season = ?1 AND episode < ?2
                 ORDER BY episode DESC LIMIT 1",
                params![lesson.season, lesson.episode],
                |row| row.get(0),
            )
            .optional()?;
        let next: Option<LessonId> = conn
            .query_row(
                "SELECT id FROM lessons WHERE season = ?1 AND episode > ?2
                 ORDER BY episode ASC LIMIT 1",
                params![lesson.season, lesson.episode],
                |row| row.get(0),
            )
            .optional()?;
        Ok(Some(Navigation {
            has_prev: prev.is_some(),
            has_next: next.is_some(),
            prev_lesson_id: prev,
            next_lesson_id: next,
        }))
    }

    /// Load the stored chat turns for a lesson, oldest first.
    ///
    /// A lesson with no history yields an empty vec, not an error.
    pub fn chat_history(&self, id: LessonId) -> Result<Vec<ChatTurn>, StoreError> {
        let conn = self.conn.lock();
        let raw: Option<String> = conn
            .query_row(
                "SELECT messages FROM chat_history WHERE lesson_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Append one turn to a lesson's history, creating the row if absent.
    ///
    /// The JSON array is rewritten inside a transaction so concurrent
    /// appends through this store never interleave partial arrays.
    pub fn append_chat_turn(&self, id: LessonId, turn: &ChatTurn) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let raw: Option<String> = tx
            .query_row(
                "SELECT messages FROM chat_history WHERE lesson_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let mut turns: Vec<ChatTurn> = match raw {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        turns.push(turn.clone());
        let encoded = serde_json::to_string(&turns)?;
        tx.execute(
            "INSERT INTO chat_history (lesson_id, messages, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(lesson_id) DO UPDATE SET
                 messages = excluded.messages,
                 updated_at = excluded.updated_at",
            params![id, encoded, now_timestamp()],
        )?;
        tx.commit()?;
        debug!(
            "appended chat turn (lesson_id={}, role={}, total={})",
            id,
            turn.role,
            turns.len()
        );
        Ok(())
    }

    /// Load viewer progress for a lesson, defaulting to not-completed.
    pub fn progress(&self, id: LessonId) -> Result<Progress, StoreError> {
        let conn = self.conn.lock();
        let progress = conn
            .query_row(
                "SELECT completed, last_accessed FROM progress WHERE lesson_id = ?1",
                params![id],
                |row| {
                    Ok(Progress {
                        completed: row.get(0)?,
                        last_accessed: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(progress.unwrap_or_default())
    }

    /// Mark a lesson completed, upserting the progress row.
    pub fn mark_complete(&self, id: LessonId) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO progress (lesson_id, completed, last_accessed)
             VALUES (?1, 1, ?2)
             ON CONFLICT(lesson_id) DO UPDATE SET
                 completed = 1,
                 last_accessed = excluded.last_accessed",
            params![id, now_timestamp()],
        )?;
        info!("marked lesson complete (lesson_id={})", id);
        Ok(())
    }

    /// Bump the last-access timestamp without touching completion.
    pub fn touch(&self, id: LessonId) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO progress (lesson_id, completed, last_accessed)
             VALUES (?1, 0, ?2)
             ON CONFLICT(lesson_id) DO UPDATE SET
                 last_accessed = excluded.last_accessed",
            params![id, now_timestamp()],
        )?;
        Ok(())
    }

    /// Assemble the full `GET /api/lesson/{id}` response.
    pub fn lesson_view(&self, id: LessonId) -> Result<Option<LessonView>, StoreError> {
        let Some(lesson) = self.lesson(id)? else {
            return Ok(None);
        };
        let progress = self.progress(id)?;
        let navigation = self.navigation(id)?.unwrap_or_default();
        let season_lessons = self.season_lessons(lesson.season)?;
        Ok(Some(LessonView {
            lesson,
            progress,
            navigation,
            season_lessons,
        }))
    }
}

fn now_timestamp() -> String {
    Utc::now().format(TURN_TIMESTAMP_FORMAT).to_string()
}
