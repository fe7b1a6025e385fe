//! # Components
//!
//! The view tree is built from [`Component`]s. Rather than a class
//! hierarchy, a component advertises capabilities:
//!
//! - it renders a subtree (`create_dom` / `render`)
//! - it may own named children (`tabs` returns its [`Select`])
//! - it handles a route (`go`)
//!
//! ```text
//! construct ──▶ enter (create_dom + enter_document) ──▶ show ⇄ hide ──▶ exit
//!                 once, on first activation                       once, on teardown
//! ```
//!
//! Lifecycle notifications go on the [`Env`] bus in the order they happen,
//! so observers can check that a hide always precedes the next show.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::prefs::PreferenceStore;
use crate::registry::Registry;

use super::dom::Element;
use super::route::{Route, RouteEvent};
use super::search::SearchProvider;
use super::select::Select;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ComponentId {
    pub fn next() -> Self {
        ComponentId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Contract violations between a component and its template. These are
/// bugs, not runtime conditions, and propagate as hard failures.
#[derive(Debug, Clone, PartialEq)]
pub enum UiError {
    /// A CSS-class anchor the component relies on is absent from its DOM.
    MissingElement { component: ComponentId, class: String },
    /// The component was asked for its DOM before it was entered.
    NotRendered(ComponentId),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::MissingElement { component, class } => {
                write!(f, "component {component} has no element with class '{class}'")
            }
            UiError::NotRendered(component) => {
                write!(f, "component {component} has not been rendered")
            }
        }
    }
}

impl std::error::Error for UiError {}

// ============================================================================
// Environment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    Enter,
    Show,
    Hide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lifecycle {
    pub kind: LifecycleKind,
    pub component: ComponentId,
    pub path: String,
}

/// Everything outside the tree a component may touch while routing.
pub struct Env<'a> {
    pub prefs: &'a mut dyn PreferenceStore,
    /// The document root (`<html>`); settings mirror preferences onto its
    /// attributes.
    pub document: &'a mut Element,
    /// The symbol-decorated registry, once it has arrived.
    pub symbols: Option<Arc<Registry>>,
    lifecycle: Vec<Lifecycle>,
}

impl<'a> Env<'a> {
    pub fn new(
        prefs: &'a mut dyn PreferenceStore,
        document: &'a mut Element,
        symbols: Option<Arc<Registry>>,
    ) -> Self {
        Self {
            prefs,
            document,
            symbols,
            lifecycle: Vec::new(),
        }
    }

    pub fn notify(&mut self, kind: LifecycleKind, component: &dyn Component) {
        self.lifecycle.push(Lifecycle {
            kind,
            component: component.base().id(),
            path: component.base().path().to_string(),
        });
    }

    pub fn lifecycle(&self) -> &[Lifecycle] {
        &self.lifecycle
    }

    pub fn take_lifecycle(&mut self) -> Vec<Lifecycle> {
        std::mem::take(&mut self.lifecycle)
    }
}

/// Keys a component may react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
}

// ============================================================================
// Base state
// ============================================================================

#[derive(Debug)]
pub struct ComponentBase {
    id: ComponentId,
    element: Option<Element>,
    path: String,
    entered: bool,
    visible: bool,
}

impl Default for ComponentBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentBase {
    pub fn new() -> Self {
        Self {
            id: ComponentId::next(),
            element: None,
            path: String::new(),
            entered: false,
            visible: false,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Canonical path of this component, e.g. `modules/foo/2.0`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: String) {
        self.path = path;
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    #[cfg(test)]
    pub(crate) fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    pub fn element_mut(&mut self) -> Result<&mut Element, UiError> {
        self.element.as_mut().ok_or(UiError::NotRendered(self.id))
    }

    /// The required descendant carrying `class`.
    pub fn css_element_mut(&mut self, class: &str) -> Result<&mut Element, UiError> {
        let id = self.id;
        self.element_mut()?
            .find_by_class_mut(class)
            .ok_or_else(|| UiError::MissingElement {
                component: id,
                class: class.to_string(),
            })
    }
}

// ============================================================================
// Component
// ============================================================================

pub trait Component {
    fn base(&self) -> &ComponentBase;
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Build this component's own root element (without children).
    fn create_dom(&self) -> Element;

    /// Runs once after the element exists. Eager tabs are added here.
    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        Ok(())
    }

    /// Runs once on teardown, after all children have exited.
    fn exit_document(&mut self) {}

    fn tabs(&self) -> Option<&Select> {
        None
    }

    fn tabs_mut(&mut self) -> Option<&mut Select> {
        None
    }

    /// Handle the rest of `route`. Leaves are terminal: an exhausted route
    /// is done, anything left over is a miss.
    fn go(&mut self, route: &mut Route, env: &mut Env<'_>) -> Result<(), UiError> {
        let id = self.base().id();
        route.touch(id);
        match self.tabs_mut() {
            Some(tabs) => tabs.go(route, env).map(|_| ()),
            None if route.at_end() => {
                route.done(id);
                Ok(())
            }
            None => {
                route.fail(id);
                Ok(())
            }
        }
    }

    /// Complete selections parked while waiting on symbols.
    fn resume(&mut self, current_dispatch: u64, env: &mut Env<'_>) -> Result<Vec<RouteEvent>, UiError> {
        match self.tabs_mut() {
            Some(tabs) => Ok(tabs.resume(current_dispatch, env)?.events),
            None => Ok(Vec::new()),
        }
    }

    /// The full subtree: own element with the active tab attached under
    /// its `content` node.
    fn render(&self) -> Result<Element, UiError> {
        let mut el = match self.base().element() {
            Some(el) => el.clone(),
            None => self.create_dom(),
        };
        if let Some(tabs) = self.tabs() {
            tabs.render_into(&mut el)?;
        }
        Ok(el)
    }

    /// Returns true if the key was consumed.
    fn handle_key(&mut self, _key: Key, _env: &mut Env<'_>) -> Result<bool, UiError> {
        Ok(false)
    }

    /// Flip the collapsible item `target` (a `data-toggle` value). Returns
    /// true if this component owns it.
    fn handle_toggle(&mut self, _target: &str) -> Result<bool, UiError> {
        Ok(false)
    }

    fn search_provider(&self) -> Option<SearchProvider> {
        None
    }
}

/// Create the DOM and run `enter_document`, once.
pub fn enter(component: &mut dyn Component, env: &mut Env<'_>) -> Result<(), UiError> {
    if component.base().is_entered() {
        return Ok(());
    }
    let element = component.create_dom();
    let path = component.base().path().to_string();
    {
        let base = component.base_mut();
        base.element = Some(element);
        base.entered = true;
    }
    if let Some(tabs) = component.tabs_mut() {
        tabs.set_path(path);
    }
    env.notify(LifecycleKind::Enter, component);
    component.enter_document(env)
}

pub fn show(component: &mut dyn Component, env: &mut Env<'_>) {
    component.base_mut().visible = true;
    env.notify(LifecycleKind::Show, component);
}

pub fn hide(component: &mut dyn Component, env: &mut Env<'_>) {
    component.base_mut().visible = false;
    env.notify(LifecycleKind::Hide, component);
}

/// Tear down children depth-first, then run `exit_document`, once.
pub fn exit(component: &mut dyn Component) {
    if !component.base().is_entered() {
        return;
    }
    if let Some(tabs) = component.tabs_mut() {
        tabs.teardown();
    }
    component.exit_document();
    let base = component.base_mut();
    base.entered = false;
    base.visible = false;
}

// ============================================================================
// Active chain
// ============================================================================

/// `root` followed by its active tab, that tab's active tab, and so on.
pub fn active_chain(root: &dyn Component) -> Vec<&dyn Component> {
    let mut chain = vec![root];
    let mut current = root;
    while let Some(next) = current.tabs().and_then(Select::active) {
        chain.push(next);
        current = next;
    }
    chain
}

/// Offer `key` to the deepest active component first, then to each
/// ancestor in turn. Returns true once someone consumes it.
pub fn deliver_key(component: &mut dyn Component, key: Key, env: &mut Env<'_>) -> Result<bool, UiError> {
    if let Some(active) = component.tabs_mut().and_then(Select::active_mut)
        && deliver_key(active.as_mut(), key, env)?
    {
        return Ok(true);
    }
    component.handle_key(key, env)
}

/// Hand a `data-toggle` activation down the active chain, deepest first.
pub fn deliver_toggle(component: &mut dyn Component, target: &str) -> Result<bool, UiError> {
    if let Some(active) = component.tabs_mut().and_then(Select::active_mut)
        && deliver_toggle(active.as_mut(), target)?
    {
        return Ok(true);
    }
    component.handle_toggle(target)
}
