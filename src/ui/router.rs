//! # Router
//!
//! Owns the location and its back/forward history, turns each location
//! change into a fresh [`Route`] and dispatches it into the root
//! component.
//!
//! ```text
//! navigate("#/modules/foo") ─▶ Route(dispatch=n) ─▶ root.go ─▶ events
//!                                                               │
//!                                 Done? replace history entry ◀─┘
//!                                 with the canonical path
//! ```
//!
//! Each navigation bumps the dispatch generation; work parked by an older
//! generation can tell it has been superseded.

use log::{debug, info};

use super::component::{Component, Env, UiError};
use super::route::{Route, RouteEvent, RouteEventKind};

#[derive(Debug)]
pub struct Router {
    history: Vec<String>,
    position: usize,
    dispatch: u64,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            history: vec![String::new()],
            position: 0,
            dispatch: 0,
        }
    }

    /// Current location, without the leading `#/`.
    pub fn location(&self) -> &str {
        &self.history[self.position]
    }

    pub fn current_dispatch(&self) -> u64 {
        self.dispatch
    }

    pub fn can_go_back(&self) -> bool {
        self.position > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.position + 1 < self.history.len()
    }

    /// Push a new location, dropping any forward history.
    pub fn navigate(&mut self, location: &str) -> Route {
        let location = normalize(location);
        if location != self.location() {
            self.history.truncate(self.position + 1);
            self.history.push(location);
            self.position = self.history.len() - 1;
        }
        self.fresh_route()
    }

    /// Navigate to a location given as segments.
    pub fn set_location<S: AsRef<str>>(&mut self, segments: &[S]) -> Route {
        let joined = segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("/");
        self.navigate(&joined)
    }

    pub fn back(&mut self) -> Option<Route> {
        if !self.can_go_back() {
            return None;
        }
        self.position -= 1;
        Some(self.fresh_route())
    }

    pub fn forward(&mut self) -> Option<Route> {
        if !self.can_go_forward() {
            return None;
        }
        self.position += 1;
        Some(self.fresh_route())
    }

    /// Replace the current entry without creating history (redirect).
    pub fn replace(&mut self, location: &str) {
        self.history[self.position] = normalize(location);
    }

    fn fresh_route(&mut self) -> Route {
        self.dispatch += 1;
        Route::parse(self.location()).with_dispatch(self.dispatch)
    }

    /// Run `route` through `root` and return the notifications it raised.
    pub fn dispatch(
        &mut self,
        root: &mut dyn Component,
        mut route: Route,
        env: &mut Env<'_>,
    ) -> Result<Vec<RouteEvent>, UiError> {
        debug!("dispatch #{}: /{}", route.dispatch(), route.path());
        route.begin();
        root.go(&mut route, env)?;
        let events = route.take_events();
        if events.iter().any(|e| e.kind == RouteEventKind::Done) {
            let canonical = route.path();
            if canonical != self.location() {
                info!("redirect: /{} -> /{}", self.location(), canonical);
            }
            self.replace(&canonical);
        }
        Ok(events)
    }
}

fn normalize(location: &str) -> String {
    let trimmed = location.strip_prefix('#').unwrap_or(location);
    trimmed.strip_prefix('/').unwrap_or(trimmed).to_string()
}
