//! # Registry Browser
//!
//! The concrete application on top of the navigation framework in
//! `crate::ui`. [`App`] owns everything one browser window would: the
//! router, the view tree, the preference store, the document element and
//! the search box.
//!
//! ```text
//! App
//! ├── router: Router                 // location, history, dispatch generation
//! ├── body: Body                     // root of the view tree
//! ├── prefs: Box<dyn PreferenceStore>
//! ├── document: Element              // <html>, carries data-color-mode etc.
//! ├── symbols: Option<Arc<Registry>> // decorated registry once the fetch settles
//! ├── not_found: Option<NotFound>    // set when the last dispatch failed
//! └── search: SearchState            // focus, query, index
//! ```
//!
//! Frontends drive it with `navigate`, `handle_key`, `activate` and
//! `symbols_loaded`, and read back a single element tree from `render`.

pub mod body;
pub mod docs;
pub mod format;
pub mod home;
pub mod maintainers;
pub mod modules;
pub mod search;
pub mod settings;
pub mod views;

use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::prefs::PreferenceStore;
use crate::registry::Registry;
use crate::ui::component::{
    Component, Env, Key, UiError, active_chain, deliver_key, deliver_toggle, enter,
};
use crate::ui::dom::Element;
use crate::ui::route::{Route, RouteEvent, RouteEventKind};
use crate::ui::router::Router;
use crate::ui::search::{SearchIndex, SearchTarget};
use crate::ui::treeview::TOGGLE_ATTR;

use body::{Body, not_found};
use search::module_search_provider;

/// How many hits the search box shows.
pub const SEARCH_LIMIT: usize = 10;

/// Where a failed dispatch stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct NotFound {
    pub location: String,
    pub unmatched: String,
}

#[derive(Debug, Default)]
pub struct SearchState {
    pub focused: bool,
    pub query: String,
    pub index: SearchIndex,
}

/// What activating an element asks the frontend to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    None,
    Navigated,
    /// A tree item flipped in place.
    Toggled,
    Copy(String),
    External(String),
}

pub struct App {
    registry: Arc<Registry>,
    symbols: Option<Arc<Registry>>,
    router: Router,
    body: Body,
    prefs: Box<dyn PreferenceStore>,
    document: Element,
    not_found: Option<NotFound>,
    suspended: bool,
    search: SearchState,
    kbd_enabled: bool,
}

impl App {
    pub fn new(registry: Arc<Registry>, prefs: Box<dyn PreferenceStore>) -> Self {
        let mut search = SearchState::default();
        search.index.rebuild([module_search_provider(&registry)]);
        Self {
            body: Body::new(registry.clone()),
            registry,
            symbols: None,
            router: Router::new(),
            prefs,
            document: Element::new("html"),
            not_found: None,
            suspended: false,
            search,
            kbd_enabled: true,
        }
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn symbols(&self) -> Option<&Arc<Registry>> {
        self.symbols.as_ref()
    }

    pub fn location(&self) -> &str {
        self.router.location()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn document(&self) -> &Element {
        &self.document
    }

    pub fn prefs(&self) -> &dyn PreferenceStore {
        self.prefs.as_ref()
    }

    pub fn not_found(&self) -> Option<&NotFound> {
        self.not_found.as_ref()
    }

    /// True while the current location waits on the symbols fetch.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn set_keyboard_shortcuts(&mut self, enabled: bool) {
        self.kbd_enabled = enabled;
    }

    // ==========================================================================
    // Navigation
    // ==========================================================================

    /// Enter the view tree and dispatch the initial location.
    pub fn start(&mut self, location: &str) -> Result<(), UiError> {
        let mut env = Env::new(self.prefs.as_mut(), &mut self.document, self.symbols.clone());
        enter(&mut self.body, &mut env)?;
        let route = self.router.navigate(location);
        self.dispatch(route)
    }

    pub fn navigate(&mut self, location: &str) -> Result<(), UiError> {
        let route = self.router.navigate(location);
        self.dispatch(route)
    }

    pub fn set_location<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<(), UiError> {
        let route = self.router.set_location(segments);
        self.dispatch(route)
    }

    /// Returns false when there is no history to go back to.
    pub fn back(&mut self) -> Result<bool, UiError> {
        match self.router.back() {
            Some(route) => self.dispatch(route).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn forward(&mut self) -> Result<bool, UiError> {
        match self.router.forward() {
            Some(route) => self.dispatch(route).map(|_| true),
            None => Ok(false),
        }
    }

    fn dispatch(&mut self, route: Route) -> Result<(), UiError> {
        let mut env = Env::new(self.prefs.as_mut(), &mut self.document, self.symbols.clone());
        let events = self.router.dispatch(&mut self.body, route, &mut env)?;
        for lc in env.take_lifecycle() {
            debug!("{:?} {} /{}", lc.kind, lc.component, lc.path);
        }
        self.apply_events(&events);
        Ok(())
    }

    /// The secondary fetch settled. Parked selections waiting on it are
    /// completed; a parked selection from a superseded navigation only
    /// installs its tab.
    pub fn symbols_loaded(&mut self, symbols: Arc<Registry>) -> Result<(), UiError> {
        info!("symbols settled, resuming deferred selections");
        self.symbols = Some(symbols);
        let current = self.router.current_dispatch();
        let mut env = Env::new(self.prefs.as_mut(), &mut self.document, self.symbols.clone());
        let events = self.body.resume(current, &mut env)?;
        let current_events: Vec<RouteEvent> =
            events.into_iter().filter(|e| e.dispatch == current).collect();
        if let Some(done) = current_events.iter().rev().find(|e| e.kind == RouteEventKind::Done) {
            self.router.replace(&done.path);
        }
        self.apply_events(&current_events);
        Ok(())
    }

    /// The last terminal event decides what the page shows.
    fn apply_events(&mut self, events: &[RouteEvent]) {
        let outcome = events.iter().rev().find(|e| {
            matches!(
                e.kind,
                RouteEventKind::Done | RouteEventKind::Fail | RouteEventKind::Suspended
            )
        });
        match outcome {
            Some(e) if e.kind == RouteEventKind::Done => {
                self.not_found = None;
                self.suspended = false;
            }
            Some(e) if e.kind == RouteEventKind::Fail => {
                warn!("not found: /{} (unmatched: {})", e.path, e.unmatched);
                self.not_found = Some(NotFound {
                    location: e.path.clone(),
                    unmatched: e.unmatched.clone(),
                });
                self.suspended = false;
            }
            Some(_) => {
                self.not_found = None;
                self.suspended = true;
            }
            None => {}
        }
        self.rebuild_search();
    }

    /// True while the active chain is the page on screen, i.e. the last
    /// dispatch neither failed nor is waiting on symbols.
    fn chain_is_shown(&self) -> bool {
        self.not_found.is_none() && !self.suspended
    }

    /// Module search is always present; active components add their own
    /// while they are on screen.
    fn rebuild_search(&mut self) {
        let mut providers = vec![module_search_provider(&self.registry)];
        if self.chain_is_shown() {
            providers.extend(active_chain(&self.body).into_iter().filter_map(|c| c.search_provider()));
        }
        self.search.index.rebuild(providers);
    }

    // ==========================================================================
    // Input
    // ==========================================================================

    /// Route a key through the search box or the active components.
    /// Returns true if anything consumed it.
    pub fn handle_key(&mut self, key: Key) -> Result<bool, UiError> {
        if self.search.focused {
            match key {
                Key::Esc => self.blur_search(),
                Key::Enter => {
                    let first = self.search_results().first().map(|t| t.route.clone());
                    self.blur_search();
                    if let Some(route) = first {
                        self.navigate(&route)?;
                    }
                }
                Key::Backspace => {
                    self.search.query.pop();
                }
                Key::Char(c) => self.search.query.push(c),
            }
            return Ok(true);
        }
        if self.kbd_enabled && key == Key::Char('/') {
            self.search.focused = true;
            return Ok(true);
        }
        if !self.kbd_enabled || !self.chain_is_shown() {
            return Ok(false);
        }
        let mut env = Env::new(self.prefs.as_mut(), &mut self.document, self.symbols.clone());
        deliver_key(&mut self.body, key, &mut env)
    }

    fn blur_search(&mut self) {
        self.search.focused = false;
        self.search.query.clear();
    }

    pub fn search_results(&self) -> Vec<&SearchTarget> {
        self.search.index.query(&self.search.query, SEARCH_LIMIT)
    }

    /// Click delegation: `data-route` navigates, `data-clippy` copies,
    /// `data-toggle` flips a tree item, an in-app `href` navigates and any
    /// other `href` is external.
    pub fn activate(&mut self, el: &Element) -> Result<Activation, UiError> {
        if let Some(route) = el.get_attr("data-route") {
            let segments: Vec<&str> = route.split('/').collect();
            self.set_location(&segments)?;
            return Ok(Activation::Navigated);
        }
        if let Some(text) = el.get_attr("data-clippy") {
            return Ok(Activation::Copy(text.to_string()));
        }
        if let Some(target) = el.get_attr(TOGGLE_ATTR) {
            if self.chain_is_shown() && deliver_toggle(&mut self.body, target)? {
                return Ok(Activation::Toggled);
            }
            return Ok(Activation::None);
        }
        if let Some(href) = el.get_attr("href") {
            if let Some(fragment) = href.strip_prefix("/#/").or_else(|| href.strip_prefix("#/")) {
                self.navigate(fragment)?;
                return Ok(Activation::Navigated);
            }
            return Ok(Activation::External(href.to_string()));
        }
        Ok(Activation::None)
    }

    // ==========================================================================
    // Rendering
    // ==========================================================================

    /// The whole page: the document element wrapping the search box (when
    /// focused) and the body, with the not-found view swapped in for the
    /// body content after a failed dispatch.
    pub fn render(&self) -> Result<Element, UiError> {
        let mut body = self.body.render()?;
        if let Some(nf) = &self.not_found
            && let Some(content) = body.find_by_class_mut("content")
        {
            content.children = vec![not_found(&nf.location, &nf.unmatched)];
        } else if self.suspended
            && let Some(content) = body.find_by_class_mut("content")
        {
            content.children = vec![Element::new("p").class("loading").text("Loading...")];
        }

        let mut page = self.document.clone();
        page.children.clear();
        if self.search.focused {
            page.append(self.render_search());
        }
        page.append(body);
        Ok(page)
    }

    fn render_search(&self) -> Element {
        let results = self.search_results().into_iter().map(|t| {
            let mut row = Element::new("li")
                .class("search-result")
                .child(Element::route_link(t.label.clone(), t.route.clone()));
            if !t.description.is_empty() {
                row.append(Element::new("span").class("description").text(t.description.clone()));
            }
            row
        });
        Element::new("div")
            .class("search-box")
            .child(
                Element::new("input")
                    .attr("type", "search")
                    .attr("value", self.search.query.clone()),
            )
            .child(Element::new("ul").class("search-results").children(results))
    }
}
