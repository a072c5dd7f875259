//! HTML fragments for the lesson page.

use crate::escape::escape_html;
use crate::markdown::render_markdown;
use crate::video::extract_video_id;
use innerverse_protocol::{ChatTurn, LessonId, LessonRecord, LessonSummary, Navigation, Role};
use std::fmt::Write;

/// Glyph for a completed lesson.
pub const COMPLETED_GLYPH: &str = "✓";
/// Glyph for the lesson currently open.
pub const CURRENT_GLYPH: &str = "▶";
/// Glyph for any other lesson.
pub const UPCOMING_GLYPH: &str = "○";

/// Breadcrumb trail for the lesson header.
pub fn breadcrumb(lesson: &LessonRecord) -> String {
    format!(
        "<nav class=\"breadcrumb\"><a href=\"/\">Home</a> / \
         <span>Season {}</span> / <span>{}</span></nav>",
        lesson.season,
        escape_html(&lesson.title)
    )
}

/// Video player, or the fallback panel when no playable video resolves.
///
/// The fallback is unconditional: a missing locator, a cleared has-video
/// flag, and an unparseable locator all land on the same panel.
pub fn video_panel(lesson: &LessonRecord) -> String {
    let video_id = lesson
        .video_url
        .as_deref()
        .filter(|_| lesson.has_video)
        .and_then(extract_video_id);
    match video_id {
        Some(id) => format!(
            "<div class=\"video-player\"><iframe src=\"https://www.youtube.com/embed/{id}\" \
             title=\"{}\" allowfullscreen></iframe></div>",
            escape_html(&lesson.title)
        ),
        None => format!(
            "<div class=\"video-fallback\"><p>Video coming soon for \
             <strong>{}</strong>.</p></div>",
            escape_html(&lesson.title)
        ),
    }
}

/// Season sidebar listing.
///
/// Glyph precedence is completed, then current, then upcoming: a completed
/// lesson keeps its checkmark even while it is the one open.
pub fn sidebar(lessons: &[LessonSummary], current_id: LessonId) -> String {
    let mut out = String::from("<ul class=\"season-list\">");
    for lesson in lessons {
        let is_current = lesson.id == current_id;
        let glyph = if lesson.completed {
            COMPLETED_GLYPH
        } else if is_current {
            CURRENT_GLYPH
        } else {
            UPCOMING_GLYPH
        };
        let class = if is_current {
            "season-item current"
        } else {
            "season-item"
        };
        let _ = write!(
            out,
            "<li class=\"{class}\" data-lesson-id=\"{}\">\
             <span class=\"status\">{glyph}</span> {}</li>",
            lesson.id,
            escape_html(&lesson.title)
        );
    }
    out.push_str("</ul>");
    out
}

/// Previous/next navigation buttons, disabled at the season edges.
pub fn nav_buttons(navigation: &Navigation) -> String {
    let prev_disabled = if navigation.has_prev { "" } else { " disabled" };
    let next_disabled = if navigation.has_next { "" } else { " disabled" };
    format!(
        "<div class=\"lesson-nav\">\
         <button class=\"nav-prev\"{prev_disabled}>Previous</button>\
         <button class=\"nav-next\"{next_disabled}>Next</button>\
         </div>"
    )
}

/// Chat transcript. Assistant turns pass through the markdown transform;
/// user turns render as escaped plain text.
pub fn transcript(turns: &[ChatTurn]) -> String {
    let mut out = String::from("<div class=\"chat-transcript\">");
    for turn in turns {
        let body = match turn.role {
            Role::Assistant => render_markdown(&turn.content),
            Role::User => format!("<p>{}</p>", escape_html(&turn.content)),
        };
        let time = turn
            .display_time()
            .map(|time| format!("<span class=\"time\">{time}</span>"))
            .unwrap_or_default();
        let _ = write!(
            out,
            "<div class=\"chat-message {}\">{body}{time}</div>",
            turn.role
        );
    }
    out.push_str("</div>");
    out
}

/// Full-page message for an unknown lesson identifier.
pub fn not_found_page(id: LessonId) -> String {
    format!(
        "<main class=\"not-found\"><h2>Lesson not found</h2>\
         <p>Lesson {id} doesn&#39;t exist or was removed.</p>\
         <p><a href=\"/\">Back home</a></p></main>"
    )
}

#[cfg(test)]
mod tests {
    use super::{COMPLETED_GLYPH, CURRENT_GLYPH, UPCOMING_GLYPH};
    use super::{breadcrumb, nav_buttons, not_found_page, sidebar, transcript, video_panel};
    use innerverse_protocol::{ChatTurn, LessonRecord, LessonSummary, Navigation, Role};
    use pretty_assertions::assert_eq;

    fn lesson(video_url: Option<&str>, has_video: bool) -> LessonRecord {
        LessonRecord {
            id: 5,
            title: "Waves & Fields".to_string(),
            season: 1,
            episode: 5,
            video_url: video_url.map(str::to_string),
            has_video,
            transcript_id: None,
        }
    }

    #[test]
    fn breadcrumb_escapes_the_title() {
        let html = breadcrumb(&lesson(None, false));
        assert!(html.contains("Waves &amp; Fields"));
        assert!(html.contains("Season 1"));
    }

    #[test]
    fn video_panel_prefers_player_when_id_resolves() {
        let html = video_panel(&lesson(Some("dQw4w9WgXcQ"), true));
        assert!(html.contains("youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn video_panel_falls_back_without_flag_or_id() {
        for candidate in [
            lesson(Some("dQw4w9WgXcQ"), false),
            lesson(Some("not a url"), true),
            lesson(None, true),
        ] {
            let html = video_panel(&candidate);
            assert!(html.contains("video-fallback"), "expected fallback: {html}");
        }
    }

    #[test]
    fn completed_glyph_wins_over_current() {
        let lessons = vec![
            LessonSummary {
                id: 1,
                title: "One".to_string(),
                episode: 1,
                completed: true,
            },
            LessonSummary {
                id: 2,
                title: "Two".to_string(),
                episode: 2,
                completed: false,
            },
        ];
        // Lesson 1 is both completed and current.
        let html = sidebar(&lessons, 1);
        let first = html.split("</li>").next().expect("first item");
        assert!(first.contains(COMPLETED_GLYPH));
        assert!(!first.contains(CURRENT_GLYPH));
        assert!(html.contains(UPCOMING_GLYPH));
    }

    #[test]
    fn current_glyph_marks_the_open_lesson() {
        let lessons = vec![LessonSummary {
            id: 2,
            title: "Two".to_string(),
            episode: 2,
            completed: false,
        }];
        let html = sidebar(&lessons, 2);
        assert!(html.contains(CURRENT_GLYPH));
        assert!(html.contains("season-item current"));
    }

    #[test]
    fn nav_buttons_disable_exactly_at_the_edges() {
        let first = Navigation {
            prev_lesson_id: None,
            next_lesson_id: Some(2),
            has_prev: false,
            has_next: true,
        };
        let html = nav_buttons(&first);
        assert!(html.contains("nav-prev\" disabled"));
        assert!(!html.contains("nav-next\" disabled"));

        let last = Navigation {
            prev_lesson_id: Some(2),
            next_lesson_id: None,
            has_prev: true,
            has_next: false,
        };
        let html = nav_buttons(&last);
        assert!(!html.contains("nav-prev\" disabled"));
        assert!(html.contains("nav-next\" disabled"));
    }

    #[test]
    fn transcript_renders_roles_differently() {
        let turns = vec![
            ChatTurn {
                role: Role::User,
                content: "what is **this**?".to_string(),
                timestamp: "2025-11-14T10:00:00".to_string(),
            },
            ChatTurn {
                role: Role::Assistant,
                content: "It is **bold**.".to_string(),
                timestamp: "2025-11-14T10:00:05".to_string(),
            },
        ];
        let html = transcript(&turns);
        // User text is escaped verbatim, assistant text goes through markdown.
        assert!(html.contains("what is **this**?"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("chat-message user"));
        assert!(html.contains("chat-message assistant"));
        assert!(html.contains("10:00"));
    }

    #[test]
    fn not_found_page_links_home() {
        let html = not_found_page(42);
        assert!(html.contains("Lesson 42"));
        assert!(html.contains("href=\"/\""));
    }

    #[test]
    fn transcript_of_no_turns_is_an_empty_container() {
        assert_eq!(transcript(&[]), "<div class=\"chat-transcript\"></div>");
    }
}
