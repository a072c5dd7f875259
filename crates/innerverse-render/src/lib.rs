//! Render layer: pure mappings from lesson-page state to HTML fragments.
//!
//! Every function returns a complete fragment for its target subtree; the
//! caller replaces the subtree wholesale rather than diffing. Nothing here
//! performs I/O.

mod escape;
mod fragments;
mod markdown;
mod video;

pub use escape::escape_html;
pub use fragments::{
    COMPLETED_GLYPH, CURRENT_GLYPH, UPCOMING_GLYPH, breadcrumb, nav_buttons, not_found_page,
    sidebar, transcript, video_panel,
};
pub use markdown::render_markdown;
pub use video::extract_video_id;
