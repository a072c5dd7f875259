//! Single-flight guards for the page's two stream classes.
//!
//! At most one summary stream and one chat stream may run at a time;
//! the two classes may overlap with each other. `begin` hands out an RAII
//! permit, so an errored or cancelled stream still releases its class.

use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The two logical stream operations a page session performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamClass {
    /// Lesson-summary generation.
    Summary,
    /// Chat-turn generation.
    Chat,
}

impl StreamClass {
    fn index(self) -> usize {
        match self {
            StreamClass::Summary => 0,
            StreamClass::Chat => 1,
        }
    }

    /// Lowercase label for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            StreamClass::Summary => "summary",
            StreamClass::Chat => "chat",
        }
    }
}

/// Per-class in-flight flags for one page session.
#[derive(Debug, Clone, Default)]
pub struct StreamGuards {
    flags: Arc<[AtomicBool; 2]>,
}

impl StreamGuards {
    /// Create guards with both classes idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start a stream of the given class.
    ///
    /// Returns `None` while a stream of that class is already in flight;
    /// the caller treats that as a no-op.
    pub fn begin(&self, class: StreamClass) -> Option<StreamPermit> {
        let flag = &self.flags[class.index()];
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(StreamPermit {
                flags: Arc::clone(&self.flags),
                class,
            })
        } else {
            debug!("{} stream already in flight, ignoring", class.as_str());
            None
        }
    }

    /// Whether a stream of the given class is currently in flight.
    pub fn in_flight(&self, class: StreamClass) -> bool {
        self.flags[class.index()].load(Ordering::Acquire)
    }
}

/// RAII permit for one in-flight stream; releases its class on drop.
#[derive(Debug)]
pub struct StreamPermit {
    flags: Arc<[AtomicBool; 2]>,
    class: StreamClass,
}

impl Drop for StreamPermit {
    fn drop(&mut self) {
        self.flags[self.class.index()].store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::{StreamClass, StreamGuards};

    #[test]
    fn second_begin_is_a_no_op_until_released() {
        let guards = StreamGuards::new();
        let permit = guards.begin(StreamClass::Chat).expect("first begin");
        assert!(guards.begin(StreamClass::Chat).is_none());
        assert!(guards.in_flight(StreamClass::Chat));

        drop(permit);
        assert!(!guards.in_flight(StreamClass::Chat));
        assert!(guards.begin(StreamClass::Chat).is_some());
    }

    #[test]
    fn classes_are_independent() {
        let guards = StreamGuards::new();
        let _summary = guards.begin(StreamClass::Summary).expect("summary");
        assert!(guards.begin(StreamClass::Chat).is_some());
    }

    #[test]
    fn permit_releases_even_when_the_operation_panics() {
        let guards = StreamGuards::new();
        let result = std::panic::catch_unwind({
            let guards = guards.clone();
            move || {
                let _permit = guards.begin(StreamClass::Summary).expect("begin");
                panic!("stream blew up");
            }
        });
        assert!(result.is_err());
        assert!(!guards.in_flight(StreamClass::Summary));
    }
}
