//! Click event model for asynchronous click counting.

/// A redirect that should bump a link's click counter.
///
/// Created in the redirect handler and sent over a bounded channel to
/// [`crate::domain::click_worker::run_click_worker`], so the redirect response
/// never waits on the counter write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub short_code: String,
}

impl ClickEvent {
    /// Creates a click event for the link with `link_id`.
    ///
    /// `short_code` is carried only for log context.
    pub fn new(link_id: i64, short_code: impl Into<String>) -> Self {
        Self {
            link_id,
            short_code: short_code.into(),
        }
    }
}
