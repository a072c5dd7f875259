//! Prompt construction for the AI backend.

use innerverse_protocol::{AskRequest, LessonRecord};

/// Retrieval tags for a lesson: the transcript identifier when present.
pub fn context_tags(lesson: &LessonRecord) -> Vec<String> {
    lesson.transcript_id.iter().cloned().collect()
}

/// Request for the lesson-summary stream.
pub fn summary_request(lesson: &LessonRecord) -> AskRequest {
    AskRequest::new(
        format!(
            "Summarize the lesson \"{}\" (lesson {}) for a student. \
             Cover the key ideas in a few short paragraphs of markdown.",
            lesson.title, lesson.id
        ),
        context_tags(lesson),
    )
}

/// Request for one chat turn.
pub fn chat_request(lesson: &LessonRecord, question: &str) -> AskRequest {
    AskRequest::new(
        format!(
            "In the context of the lesson \"{}\" (lesson {}), answer the \
             student's question:\n\n{}",
            lesson.title, lesson.id, question
        ),
        context_tags(lesson),
    )
}
