//! # Body
//!
//! The root of the view tree. A [`TabBase`] whose menu lists the eager
//! tabs and picks up the lazy ones as they are installed.
//!
//! ```text
//! body                      Body (default: home)
//! ├── home                  HomeTab
//! ├── modules               ModulesTab
//! ├── settings              SettingsTab
//! ├── maintainers  (lazy)   MaintainersTab
//! ├── search       (lazy)   SearchTab
//! └── docs         (lazy)   DocsTab, deferred until symbols resolve
//! ```

use std::sync::Arc;

use chrono::Utc;
use log::debug;

use crate::registry::Registry;
use crate::ui::component::{Component, ComponentBase, Env, UiError};
use crate::ui::dom::Element;
use crate::ui::route::{Route, RouteEvent};
use crate::ui::select::{LazyOutcome, Select};
use crate::ui::tab_base::TabBase;

use super::docs::DocsTab;
use super::format::relative_past;
use super::home::HomeTab;
use super::maintainers::MaintainersTab;
use super::modules::ModulesTab;
use super::search::SearchTab;
use super::settings::SettingsTab;

pub const HOME: &str = "home";
pub const MODULES: &str = "modules";
pub const SETTINGS: &str = "settings";
pub const MAINTAINERS: &str = "maintainers";
pub const SEARCH: &str = "search";
pub const DOCS: &str = "docs";

pub struct Body {
    base: ComponentBase,
    nav: TabBase,
    registry: Arc<Registry>,
}

impl Body {
    pub fn new(registry: Arc<Registry>) -> Self {
        let base = ComponentBase::new();
        let mut select = Select::new(base.id()).with_default(HOME);

        let reg = registry.clone();
        select.add_lazy(
            MAINTAINERS,
            |name| name == MAINTAINERS,
            move |name, _| LazyOutcome::Install(name.to_string(), Box::new(MaintainersTab::new(reg.clone()))),
        );

        let reg = registry.clone();
        select.add_lazy(
            SEARCH,
            |name| name == SEARCH,
            move |name, _| LazyOutcome::Install(name.to_string(), Box::new(SearchTab::new(reg.clone()))),
        );

        // The docs tab is built from the decorated registry, so it waits
        // for the symbols fetch to settle.
        select.add_lazy(
            DOCS,
            |name| name == DOCS,
            |name, env| match env.symbols.clone() {
                Some(symbols) => LazyOutcome::Install(name.to_string(), Box::new(DocsTab::new(symbols))),
                None => {
                    debug!("docs requested before symbols resolved");
                    LazyOutcome::Defer
                }
            },
        );

        Self {
            base,
            nav: TabBase::new(select),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn nav(&self) -> &TabBase {
        &self.nav
    }
}

impl Component for Body {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let mut header = Element::new("header")
            .class("registry")
            .child(Element::new("h1").text("Bazel Central Registry"));
        if !self.registry.registry_url.is_empty() {
            header.append(
                Element::new("a")
                    .class("registry-url")
                    .attr("href", self.registry.registry_url.clone())
                    .text(self.registry.registry_url.clone()),
            );
        }
        if !self.registry.commit_date.is_empty() {
            header.append(Element::new("span").class("last-updated").text(format!(
                "Last updated {}",
                relative_past(&self.registry.commit_date, Utc::now())
            )));
        }
        Element::new("main")
            .class("body")
            .child(header)
            .child(Element::new("nav").class("menu"))
            .child(Element::new("div").class("content"))
    }

    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        self.nav
            .add_tab(&mut self.base, HOME, Box::new(HomeTab::new(self.registry.clone())))?;
        self.nav
            .add_tab(&mut self.base, MODULES, Box::new(ModulesTab::new(self.registry.clone())))?;
        self.nav
            .add_tab(&mut self.base, SETTINGS, Box::new(SettingsTab::new()))?;
        Ok(())
    }

    fn tabs(&self) -> Option<&Select> {
        Some(self.nav.select())
    }

    fn tabs_mut(&mut self) -> Option<&mut Select> {
        Some(self.nav.select_mut())
    }

    fn go(&mut self, route: &mut Route, env: &mut Env<'_>) -> Result<(), UiError> {
        route.touch(self.base.id());
        self.nav.go(&mut self.base, route, env)
    }

    fn resume(&mut self, current_dispatch: u64, env: &mut Env<'_>) -> Result<Vec<RouteEvent>, UiError> {
        self.nav.resume(&mut self.base, current_dispatch, env)
    }
}

/// Shown in place of the body content when the last dispatch failed.
pub fn not_found(location: &str, unmatched: &str) -> Element {
    let mut el = Element::new("section")
        .class("not-found")
        .child(Element::new("h2").text("Not found"))
        .child(Element::new("p").text(format!("Nothing lives at /{location}.")));
    if !unmatched.is_empty() && unmatched != location {
        el.append(
            Element::new("p")
                .class("unmatched")
                .text(format!("No match for: {unmatched}")),
        );
    }
    el.child(Element::route_link("Back to home", HOME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prefs::MemoryPreferences;
    use crate::test_support::sample_registry;
    use crate::ui::component::enter;
    use crate::ui::route::RouteEventKind;
    use crate::ui::tab_base::{MENU_ITEM_CLASS, SELECTED_CLASS};

    fn menu_labels(body: &Body) -> Vec<String> {
        body.base()
            .element()
            .unwrap()
            .find_all(&|e| e.has_class(MENU_ITEM_CLASS))
            .into_iter()
            .map(|e| e.text_content())
            .collect()
    }

    #[test]
    fn test_empty_route_lands_on_home() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        let mut body = Body::new(Arc::new(sample_registry()));
        enter(&mut body, &mut env).unwrap();

        let mut route = Route::parse("");
        body.go(&mut route, &mut env).unwrap();
        assert_eq!(route.path(), "home/moduleversions");
        assert_eq!(menu_labels(&body), vec!["Home", "Modules", "Settings"]);
    }

    #[test]
    fn test_lazy_maintainers_gets_menu_entry() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        let mut body = Body::new(Arc::new(sample_registry()));
        enter(&mut body, &mut env).unwrap();

        let mut route = Route::parse("maintainers");
        body.go(&mut route, &mut env).unwrap();
        assert_eq!(route.path(), "maintainers/list");
        assert!(menu_labels(&body).contains(&"Maintainers".to_string()));
        let selected = body
            .base()
            .element()
            .unwrap()
            .find_all(&|e| e.has_class(SELECTED_CLASS));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].text_content(), "Maintainers");
    }

    #[test]
    fn test_docs_defers_until_symbols() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let registry = Arc::new(sample_registry());
        let mut body = Body::new(registry.clone());
        {
            let mut env = Env::new(&mut prefs, &mut doc, None);
            enter(&mut body, &mut env).unwrap();
            let mut route = Route::parse("docs").with_dispatch(1);
            body.go(&mut route, &mut env).unwrap();
            assert!(route.events().iter().any(|e| e.kind == RouteEventKind::Suspended));
            assert!(!body.tabs().unwrap().has_tab(DOCS));
        }
        let mut env = Env::new(&mut prefs, &mut doc, Some(registry));
        let events = body.resume(1, &mut env).unwrap();
        assert!(events.iter().any(|e| e.kind == RouteEventKind::Done && e.path == "docs/list"));
        assert_eq!(body.tabs().unwrap().active_name(), Some(DOCS));
    }

    #[test]
    fn test_not_found_names_unmatched_path() {
        let el = not_found("modules/nope", "nope");
        assert!(el.text_content().contains("No match for: nope"));
        assert!(el.find(&|e| e.get_attr("data-route") == Some(HOME)).is_some());
    }
}
