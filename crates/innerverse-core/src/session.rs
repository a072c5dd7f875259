//! Per-page session state.

use crate::theme::Theme;
use innerverse_protocol::{ChatTurn, LessonId, LessonView};

/// Mutable state for one lesson-page session.
///
/// Created at page load, mutated by the loader and the stream consumers,
/// and discarded at navigation. Only its derived server-side writes
/// persist. Never shared across sessions.
#[derive(Debug)]
pub struct SessionState {
    /// Identifier of the lesson this page shows.
    pub lesson_id: LessonId,
    /// Loaded lesson view; `None` until the loader has run.
    pub lesson: Option<LessonView>,
    /// Conversation transcript, oldest first. Append-only.
    pub turns: Vec<ChatTurn>,
    /// Whether the stored history has been loaded into `turns`.
    pub transcript_loaded: bool,
    /// Current UI theme.
    pub theme: Theme,
}

impl SessionState {
    /// Fresh state for a page load.
    pub fn new(lesson_id: LessonId) -> Self {
        Self {
            lesson_id,
            lesson: None,
            turns: Vec::new(),
            transcript_loaded: false,
            theme: Theme::default(),
        }
    }

    /// Flip the in-memory completion flag for the loaded lesson.
    pub fn mark_completed(&mut self) {
        if let Some(view) = &mut self.lesson {
            view.progress.completed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState;
    use crate::theme::Theme;
    use innerverse_protocol::{
        LessonRecord, LessonView, Navigation, Progress,
    };

    fn view(id: i64) -> LessonView {
        LessonView {
            lesson: LessonRecord {
                id,
                title: "Lesson".to_string(),
                season: 1,
                episode: 1,
                video_url: None,
                has_video: false,
                transcript_id: None,
            },
            progress: Progress::default(),
            navigation: Navigation::default(),
            season_lessons: Vec::new(),
        }
    }

    #[test]
    fn starts_empty_with_light_theme() {
        let session = SessionState::new(3);
        assert_eq!(session.lesson_id, 3);
        assert!(session.lesson.is_none());
        assert!(session.turns.is_empty());
        assert!(!session.transcript_loaded);
        assert_eq!(session.theme, Theme::Light);
    }

    #[test]
    fn mark_completed_flips_loaded_progress() {
        let mut session = SessionState::new(3);
        session.mark_completed(); // nothing loaded yet, no-op
        session.lesson = Some(view(3));
        session.mark_completed();
        assert!(session.lesson.as_ref().expect("view").progress.completed);
    }
}
