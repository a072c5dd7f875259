//! Page-session core for InnerVerse lesson pages.
//!
//! Owns the per-page session state, the single-flight stream guards, the
//! chunked-response consumer for the AI backend, the local-backend client,
//! and the fire-and-forget persistence gateway. Rendering lives in
//! `innerverse-render`; this crate never produces markup.

mod backend;
mod error;
pub mod gateway;
mod guard;
mod page;
pub mod prompt;
mod session;
mod stream;
mod theme;

pub use backend::BackendClient;
pub use error::CoreError;
pub use guard::{StreamClass, StreamGuards, StreamPermit};
pub use page::{CHAT_FAILURE_REPLY, LessonPage, SUMMARY_FALLBACK};
pub use session::SessionState;
pub use stream::{AiClient, CHUNK_TIMEOUT, Utf8Accumulator, consume_text_stream};
pub use theme::{Theme, ThemeStore};
