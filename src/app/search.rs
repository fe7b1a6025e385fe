//! # Search pages
//!
//! The `search` tab offers two browsable indexes, modules and symbols. The
//! module provider defined here is also the one the app keeps in its
//! search index at all times.

use std::sync::Arc;

use crate::registry::Registry;
use crate::ui::component::{Component, ComponentBase, Env, UiError};
use crate::ui::dom::Element;
use crate::ui::route::{Route, RouteEvent};
use crate::ui::search::SearchProvider;
use crate::ui::select::Select;
use crate::ui::tab_base::TabBase;

use super::docs::documented_versions;
use super::views::tab_shell;

pub const MODULES: &str = "modules";
pub const SYMBOLS: &str = "symbols";

/// Every module, routed to its page and described by its repository.
pub fn module_search_provider(registry: &Registry) -> SearchProvider {
    let mut provider = SearchProvider::new("modules");
    for module in &registry.modules {
        let description = module
            .repository_metadata
            .as_ref()
            .map(|md| md.description.clone())
            .unwrap_or_default();
        provider.add(module.name.clone(), format!("modules/{}", module.name), description);
    }
    provider
}

/// Every documented symbol, routed to its module version's docs.
pub fn symbol_search_provider(registry: &Registry) -> SearchProvider {
    let mut provider = SearchProvider::new("symbols");
    for mv in documented_versions(registry) {
        let route = format!("docs/{}", mv.key());
        for file in mv.documentation().map(|d| d.files.as_slice()).unwrap_or_default() {
            for s in &file.symbols {
                provider.add(s.name.clone(), route.clone(), format!("{} in {}", s.kind().label(), file.label));
            }
        }
    }
    provider
}

pub struct SearchTab {
    base: ComponentBase,
    nav: TabBase,
    registry: Arc<Registry>,
}

impl SearchTab {
    pub fn new(registry: Arc<Registry>) -> Self {
        let base = ComponentBase::new();
        let nav = TabBase::new(Select::new(base.id()).with_default(MODULES));
        Self { base, nav, registry }
    }
}

impl Component for SearchTab {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        tab_shell("search", "Search")
    }

    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        self.nav.add_tab(
            &mut self.base,
            MODULES,
            Box::new(ModuleSearch::new(self.registry.clone())),
        )?;
        self.nav
            .add_tab(&mut self.base, SYMBOLS, Box::new(SymbolSearch::new()))?;
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

fn result_row(label: &str, route: &str, description: &str) -> Element {
    let mut row = Element::new("li")
        .class("search-result")
        .child(Element::route_link(label, route));
    if !description.is_empty() {
        row.append(Element::new("span").class("description").text(description));
    }
    row
}

pub struct ModuleSearch {
    base: ComponentBase,
    registry: Arc<Registry>,
}

impl ModuleSearch {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            base: ComponentBase::new(),
            registry,
        }
    }
}

impl Component for ModuleSearch {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let provider = module_search_provider(&self.registry);
        Element::new("ul").class("search-results").children(
            provider
                .targets()
                .iter()
                .map(|t| result_row(&t.label, &t.route, &t.description)),
        )
    }

    fn search_provider(&self) -> Option<SearchProvider> {
        Some(module_search_provider(&self.registry))
    }
}

/// Lists symbols once the decorated registry has arrived. Until then it
/// shows a loading notice and refreshes itself on resume.
pub struct SymbolSearch {
    base: ComponentBase,
    symbols: Option<Arc<Registry>>,
}

impl Default for SymbolSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolSearch {
    pub fn new() -> Self {
        Self {
            base: ComponentBase::new(),
            symbols: None,
        }
    }
}

impl Component for SymbolSearch {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let Some(registry) = &self.symbols else {
            return Element::new("p").class("loading").text("Loading symbols...");
        };
        let provider = symbol_search_provider(registry);
        if provider.is_empty() {
            return Element::new("p").class("empty").text("No symbols are available.");
        }
        Element::new("ul").class("search-results").children(
            provider
                .targets()
                .iter()
                .map(|t| result_row(&t.label, &t.route, &t.description)),
        )
    }

    fn enter_document(&mut self, env: &mut Env<'_>) -> Result<(), UiError> {
        if self.symbols.is_none() && env.symbols.is_some() {
            self.symbols = env.symbols.clone();
            let el = self.create_dom();
            *self.base.element_mut()? = el;
        }
        Ok(())
    }

    fn resume(&mut self, _current_dispatch: u64, env: &mut Env<'_>) -> Result<Vec<RouteEvent>, UiError> {
        if self.base.is_entered() {
            self.enter_document(env)?;
        }
        Ok(Vec::new())
    }

    fn search_provider(&self) -> Option<SearchProvider> {
        self.symbols.as_deref().map(symbol_search_provider)
    }
}
