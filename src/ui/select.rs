//! # Select
//!
//! A named set of mutually exclusive tabs with at most one active. Selects
//! drive routing: each consumes one segment, activates the matching tab
//! and hands it the rest of the route.
//!
//! ```text
//!              go(route)
//!                 │
//!        at_end? ─┴─ no ──▶ select(peek)
//!          │                   │
//!         yes          tab exists? ── no ──▶ select_fail
//!          │                   │                 │
//!   add(default) ─▶ select    yes         lazy table, in order
//!                              │           ├─ Install  → add_tab, retry once
//!                     progress, activate   ├─ Defer    → park until resume
//!                     tab.go(route)        └─ (none)   → route.fail
//! ```
//!
//! A miss is never an error: it becomes a `Fail` route event.

use indexmap::IndexMap;
use log::{debug, warn};

use super::component::{Component, ComponentId, Env, UiError, enter, exit, hide, show};
use super::dom::Element;
use super::route::{Route, RouteEvent};

pub type Matcher = Box<dyn Fn(&str) -> bool>;
pub type Factory = Box<dyn FnMut(&str, &mut Env<'_>) -> LazyOutcome>;

/// Result of a lazy-tab factory.
pub enum LazyOutcome {
    /// Register this component under the given name, then retry.
    Install(String, Box<dyn Component>),
    /// A prerequisite is not ready yet; park the selection.
    Defer,
    /// Not mine after all; try the next entry.
    Decline,
}

struct LazyTab {
    label: &'static str,
    matches: Matcher,
    build: Factory,
}

/// Reported when the active tab changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub name: String,
    pub hidden: Option<ComponentId>,
    pub shown: ComponentId,
}

/// What a resume pass produced.
#[derive(Debug, Default)]
pub struct Resumed {
    pub transition: Option<Transition>,
    pub events: Vec<RouteEvent>,
}

struct Pending {
    name: String,
    route: Route,
}

enum Recovery {
    Install(String, Box<dyn Component>),
    Deferred,
    Unrecoverable,
}

pub struct Select {
    owner: ComponentId,
    path: String,
    tabs: IndexMap<String, Box<dyn Component>>,
    active: Option<String>,
    default_tab: Option<String>,
    lazy: Vec<LazyTab>,
    pending: Option<Pending>,
}

impl Select {
    pub fn new(owner: ComponentId) -> Self {
        Self {
            owner,
            path: String::new(),
            tabs: IndexMap::new(),
            active: None,
            default_tab: None,
            lazy: Vec::new(),
            pending: None,
        }
    }

    /// Tab to select when the route is exhausted here.
    pub fn with_default(mut self, name: &str) -> Self {
        self.default_tab = Some(name.to_string());
        self
    }

    pub fn default_tab(&self) -> Option<&str> {
        self.default_tab.as_deref()
    }

    /// Register a lazy factory for names accepted by `matches`. Entries are
    /// consulted in registration order.
    pub fn add_lazy(
        &mut self,
        label: &'static str,
        matches: impl Fn(&str) -> bool + 'static,
        build: impl FnMut(&str, &mut Env<'_>) -> LazyOutcome + 'static,
    ) {
        self.lazy.push(LazyTab {
            label,
            matches: Box::new(matches),
            build: Box::new(build),
        });
    }

    pub fn owner(&self) -> ComponentId {
        self.owner
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: String) {
        self.path = path;
    }

    /// Canonical path of the tab `name`.
    pub fn child_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path, name)
        }
    }

    // ==========================================================================
    // Tab registry
    // ==========================================================================

    /// Register a tab. The first registration of a name wins.
    pub fn add_tab(&mut self, name: &str, mut component: Box<dyn Component>) -> bool {
        if self.tabs.contains_key(name) {
            warn!("{}: tab '{}' already registered", self.owner, name);
            return false;
        }
        component.base_mut().set_path(self.child_path(name));
        self.tabs.insert(name.to_string(), component);
        true
    }

    #[cfg(test)]
    pub(crate) fn has_tab(&self, name: &str) -> bool {
        self.tabs.contains_key(name)
    }

    pub fn tab(&self, name: &str) -> Option<&dyn Component> {
        self.tabs.get(name).map(|c| c.as_ref())
    }

    #[cfg(test)]
    pub(crate) fn tab_names(&self) -> impl Iterator<Item = &str> {
        self.tabs.keys().map(String::as_str)
    }

    /// Name of the direct child with the given id.
    pub fn tab_name_by_id(&self, id: ComponentId) -> Option<&str> {
        self.tabs
            .iter()
            .find(|(_, c)| c.base().id() == id)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&dyn Component> {
        self.active.as_deref().and_then(|name| self.tab(name))
    }

    pub fn active_mut(&mut self) -> Option<&mut Box<dyn Component>> {
        let name = self.active.as_deref()?;
        self.tabs.get_mut(name)
    }

    pub fn tabs_iter(&self) -> impl Iterator<Item = (&str, &dyn Component)> {
        self.tabs.iter().map(|(n, c)| (n.as_str(), c.as_ref()))
    }

    #[cfg(test)]
    pub(crate) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    // ==========================================================================
    // Routing
    // ==========================================================================

    pub fn go(&mut self, route: &mut Route, env: &mut Env<'_>) -> Result<Option<Transition>, UiError> {
        route.touch(self.owner);
        if route.at_end() {
            return self.go_here(route, env);
        }
        let name = route.peek().unwrap_or_default().to_string();
        self.select(&name, route, env)
    }

    /// The route ended at this select: pick the default tab, recording it
    /// in the route so the canonical path is complete.
    fn go_here(&mut self, route: &mut Route, env: &mut Env<'_>) -> Result<Option<Transition>, UiError> {
        match self.default_tab.clone() {
            Some(name) => {
                route.add(name.as_str());
                self.select(&name, route, env)
            }
            None => {
                route.done(self.owner);
                Ok(None)
            }
        }
    }

    pub fn select(
        &mut self,
        name: &str,
        route: &mut Route,
        env: &mut Env<'_>,
    ) -> Result<Option<Transition>, UiError> {
        if self.tabs.contains_key(name) {
            self.select_existing(name, route, env)
        } else {
            self.select_fail(name, route, env)
        }
    }

    /// No tab named `name`: consult the lazy table. An installed tab gets
    /// exactly one retry; anything else ends in `Fail`.
    pub fn select_fail(
        &mut self,
        name: &str,
        route: &mut Route,
        env: &mut Env<'_>,
    ) -> Result<Option<Transition>, UiError> {
        if self.tabs.contains_key(name) {
            return self.select_existing(name, route, env);
        }
        match self.recover(name, env) {
            Recovery::Install(installed, component) => {
                debug!("{}: lazily installed tab '{}'", self.owner, installed);
                if installed != name {
                    warn!(
                        "{}: lazy tab for '{}' registered as '{}'",
                        self.owner, name, installed
                    );
                }
                self.add_tab(&installed, component);
                if self.tabs.contains_key(name) {
                    return self.select_existing(name, route, env);
                }
                self.not_found(name, route);
                Ok(None)
            }
            Recovery::Deferred => {
                debug!("{}: deferring tab '{}'", self.owner, name);
                route.suspend(self.owner);
                self.pending = Some(Pending {
                    name: name.to_string(),
                    route: route.fork(),
                });
                Ok(None)
            }
            Recovery::Unrecoverable => {
                self.not_found(name, route);
                Ok(None)
            }
        }
    }

    fn recover(&mut self, name: &str, env: &mut Env<'_>) -> Recovery {
        for lazy in &mut self.lazy {
            if !(lazy.matches)(name) {
                continue;
            }
            match (lazy.build)(name, env) {
                LazyOutcome::Install(installed, component) => {
                    return Recovery::Install(installed, component);
                }
                LazyOutcome::Defer => return Recovery::Deferred,
                LazyOutcome::Decline => {
                    debug!("{}: lazy '{}' declined '{}'", self.owner, lazy.label, name);
                }
            }
        }
        Recovery::Unrecoverable
    }

    fn not_found(&self, name: &str, route: &mut Route) {
        warn!(
            "{}: no tab '{}' (have: {:?})",
            self.owner,
            name,
            self.tabs.keys().collect::<Vec<_>>()
        );
        route.fail(self.owner);
    }

    fn select_existing(
        &mut self,
        name: &str,
        route: &mut Route,
        env: &mut Env<'_>,
    ) -> Result<Option<Transition>, UiError> {
        route.progress(self.owner);
        let transition = self.activate(name, env)?;
        if let Some(tab) = self.tabs.get_mut(name) {
            tab.go(route, env)?;
        }
        Ok(transition)
    }

    /// Make `name` the active tab: hide the outgoing tab first, then enter
    /// (first time only) and show the incoming one.
    fn activate(&mut self, name: &str, env: &mut Env<'_>) -> Result<Option<Transition>, UiError> {
        if self.active.as_deref() == Some(name) {
            return Ok(None);
        }
        let hidden = match self.active.take() {
            Some(prev) => match self.tabs.get_mut(&prev) {
                Some(tab) => {
                    hide(tab.as_mut(), env);
                    Some(tab.base().id())
                }
                None => None,
            },
            None => None,
        };
        let path = self.child_path(name);
        let Some(tab) = self.tabs.get_mut(name) else {
            return Ok(None);
        };
        tab.base_mut().set_path(path);
        enter(tab.as_mut(), env)?;
        show(tab.as_mut(), env);
        let shown = tab.base().id();
        self.active = Some(name.to_string());
        Ok(Some(Transition {
            name: name.to_string(),
            hidden,
            shown,
        }))
    }

    /// Retry a parked selection, then let every tab do the same.
    ///
    /// A selection parked by an older dispatch only installs its tab; it
    /// does not steal the active tab from the navigation that replaced it.
    pub fn resume(&mut self, current_dispatch: u64, env: &mut Env<'_>) -> Result<Resumed, UiError> {
        let mut out = Resumed::default();
        if let Some(Pending { name, mut route }) = self.pending.take() {
            if route.dispatch() == current_dispatch {
                out.transition = self.select_fail(&name, &mut route, env)?;
                out.events.extend(route.take_events());
            } else {
                debug!("{}: stale pending tab '{}'", self.owner, name);
                match self.recover(&name, env) {
                    Recovery::Install(installed, component) => {
                        self.add_tab(&installed, component);
                    }
                    Recovery::Deferred => {
                        self.pending = Some(Pending { name, route });
                    }
                    Recovery::Unrecoverable => {}
                }
            }
        }
        for tab in self.tabs.values_mut() {
            out.events.extend(tab.resume(current_dispatch, env)?);
        }
        Ok(out)
    }

    // ==========================================================================
    // Rendering and teardown
    // ==========================================================================

    /// Attach the active tab's subtree under the `content` node of `owner_el`.
    pub fn render_into(&self, owner_el: &mut Element) -> Result<(), UiError> {
        let Some(active) = self.active() else {
            return Ok(());
        };
        let rendered = active.render()?;
        let content = owner_el
            .find_by_class_mut("content")
            .ok_or_else(|| UiError::MissingElement {
                component: self.owner,
                class: "content".to_string(),
            })?;
        content.append(rendered);
        Ok(())
    }

    /// Exit every tab in registration order, depth first.
    pub fn teardown(&mut self) {
        self.pending = None;
        self.active = None;
        for (_, mut tab) in self.tabs.drain(..) {
            exit(tab.as_mut());
        }
    }
}

impl Drop for Select {
    fn drop(&mut self) {
        self.teardown();
    }
}
