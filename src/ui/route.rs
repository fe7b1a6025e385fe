//! # Route
//!
//! A cursor over a slash-delimited location. Selects consume segments
//! left to right; whatever is left when dispatch stops is the unmatched
//! suffix.
//!
//! ```text
//!  "#/modules/foo/2.0"
//!      ┌────────┬─────┬─────┐
//!      │modules │ foo │ 2.0 │
//!      └────────┴─────┴─────┘
//!                  ▲
//!                index (peek = "foo")
//! ```
//!
//! Routes also carry the notifications raised while they are dispatched
//! (progress, done, fail, suspended). The router drains them once the
//! dispatch returns.

use super::component::ComponentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEventKind {
    /// Dispatch started.
    Begin,
    /// A select consumed a segment and delegated further.
    Progress,
    /// Dispatch reached a terminal component.
    Done,
    /// No tab matched a segment and nothing could be installed for it.
    Fail,
    /// A branch is waiting on an asynchronous prerequisite.
    Suspended,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteEvent {
    pub kind: RouteEventKind,
    pub component: Option<ComponentId>,
    /// Full path of the route at the time of the event.
    pub path: String,
    pub unmatched: String,
    pub dispatch: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Route {
    segments: Vec<String>,
    index: usize,
    dispatch: u64,
    holder: Option<ComponentId>,
    events: Vec<RouteEvent>,
}

impl Route {
    /// Parse a location or fragment (`#/a/b`, `/a/b` and `a/b` are equivalent).
    ///
    /// Empty segments are kept; no tab is ever named "" so they fail to
    /// match rather than being skipped.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.strip_prefix('#').unwrap_or(location);
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let segments = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').map(str::to_string).collect()
        };
        Self::from_segments(segments)
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }

    pub fn with_dispatch(mut self, dispatch: u64) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// A copy at the same position with no recorded events, for parking a
    /// dispatch that will be continued later.
    pub fn fork(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            index: self.index,
            dispatch: self.dispatch,
            holder: self.holder,
            events: Vec::new(),
        }
    }

    /// Generation number of the navigation this route belongs to.
    pub fn dispatch(&self) -> u64 {
        self.dispatch
    }

    /// Append a segment. Selects use this to record the default tab they
    /// are about to pick so the canonical path is complete.
    pub fn add(&mut self, segment: impl Into<String>) -> &mut Self {
        self.segments.push(segment.into());
        self
    }

    /// Record which component currently holds the cursor.
    pub fn touch(&mut self, component: ComponentId) {
        self.holder = Some(component);
    }

    #[cfg(test)]
    pub(crate) fn holder(&self) -> Option<ComponentId> {
        self.holder
    }

    pub fn peek(&self) -> Option<&str> {
        self.segments.get(self.index).map(String::as_str)
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.segments.len()
    }

    /// Move past the current segment. A no-op at the end.
    pub fn advance(&mut self) {
        if !self.at_end() {
            self.index += 1;
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    #[cfg(test)]
    pub(crate) fn matched_path(&self) -> String {
        self.segments[..self.index].join("/")
    }

    pub fn unmatched_path(&self) -> String {
        self.segments[self.index..].join("/")
    }

    // ==========================================================================
    // Notifications
    // ==========================================================================

    pub fn begin(&mut self) {
        self.emit(RouteEventKind::Begin, None);
    }

    /// Consume the current segment on behalf of `component`.
    pub fn progress(&mut self, component: ComponentId) {
        self.advance();
        self.touch(component);
        self.emit(RouteEventKind::Progress, Some(component));
    }

    pub fn done(&mut self, component: ComponentId) {
        self.touch(component);
        self.emit(RouteEventKind::Done, Some(component));
    }

    pub fn fail(&mut self, component: ComponentId) {
        self.emit(RouteEventKind::Fail, Some(component));
    }

    pub fn suspend(&mut self, component: ComponentId) {
        self.emit(RouteEventKind::Suspended, Some(component));
    }

    pub fn events(&self) -> &[RouteEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<RouteEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, kind: RouteEventKind, component: Option<ComponentId>) {
        let event = RouteEvent {
            kind,
            component,
            path: self.path(),
            unmatched: self.unmatched_path(),
            dispatch: self.dispatch,
        };
        self.events.push(event);
    }
}
