//! # Documentation
//!
//! Browses the symbols joined onto module versions by the secondary fetch.
//! The body only installs this tab once that fetch has resolved (either
//! way), so the registry handed in here is the decorated one when symbols
//! were available.
//!
//! ```text
//! docs                       DocsTab           (default: list)
//! ├── list                   DocsList
//! └── <name>@<version>       ModuleVersionDocs (lazy)
//! ```

use std::sync::Arc;

use crate::registry::lookup::find_module_version;
use crate::registry::{ModuleVersion, ModuleVersionSymbols, Registry};
use crate::ui::component::{Component, ComponentBase, Env, UiError};
use crate::ui::dom::Element;
use crate::ui::search::SearchProvider;
use crate::ui::select::{LazyOutcome, Select};

use super::views::{clippy, select_shell};

pub const LIST: &str = "list";

/// Resolve a `name@version` key to a version that carries documentation.
pub fn documented_version<'a>(registry: &'a Registry, key: &str) -> Option<&'a ModuleVersion> {
    let (name, version) = key.split_once('@')?;
    find_module_version(registry, name, version).filter(|mv| mv.documentation().is_some())
}

/// Every documented version, in registry order.
pub fn documented_versions(registry: &Registry) -> Vec<&ModuleVersion> {
    registry
        .modules
        .iter()
        .flat_map(|m| m.versions.iter())
        .filter(|mv| mv.documentation().is_some())
        .collect()
}

pub struct DocsTab {
    base: ComponentBase,
    select: Select,
    registry: Arc<Registry>,
}

impl DocsTab {
    pub fn new(registry: Arc<Registry>) -> Self {
        let base = ComponentBase::new();
        let mut select = Select::new(base.id()).with_default(LIST);

        let reg = registry.clone();
        select.add_lazy(
            "module-version",
            |name| name.contains('@'),
            move |name, _| match documented_version(&reg, name).and_then(ModuleVersion::documentation) {
                Some(docs) => LazyOutcome::Install(
                    name.to_string(),
                    Box::new(ModuleVersionDocs::new(docs.clone())),
                ),
                None => LazyOutcome::Decline,
            },
        );

        Self {
            base,
            select,
            registry,
        }
    }
}

impl Component for DocsTab {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        select_shell("docs", "Documentation")
    }

    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        self.select
            .add_tab(LIST, Box::new(DocsList::new(self.registry.clone())));
        Ok(())
    }

    fn tabs(&self) -> Option<&Select> {
        Some(&self.select)
    }

    fn tabs_mut(&mut self) -> Option<&mut Select> {
        Some(&mut self.select)
    }

    fn search_provider(&self) -> Option<SearchProvider> {
        let mut provider = SearchProvider::new("docs");
        for mv in documented_versions(&self.registry) {
            provider.add(mv.key(), format!("docs/{}", mv.key()), "documentation");
        }
        Some(provider)
    }
}

pub struct DocsList {
    base: ComponentBase,
    registry: Arc<Registry>,
}

impl DocsList {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            base: ComponentBase::new(),
            registry,
        }
    }
}

impl Component for DocsList {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let versions = documented_versions(&self.registry);
        if versions.is_empty() {
            return Element::new("p")
                .class("empty")
                .text("No documentation is available.");
        }
        let items = versions.into_iter().map(|mv| {
            let files = mv.documentation().map(|d| d.files.len()).unwrap_or_default();
            Element::new("li")
                .child(Element::route_link(mv.key(), format!("docs/{}", mv.key())))
                .child(Element::new("span").class("count").text(format!("{files} files")))
        });
        Element::new("ul").class("docs-list").children(items)
    }
}

pub struct ModuleVersionDocs {
    base: ComponentBase,
    docs: ModuleVersionSymbols,
}

impl ModuleVersionDocs {
    pub fn new(docs: ModuleVersionSymbols) -> Self {
        Self {
            base: ComponentBase::new(),
            docs,
        }
    }
}

impl Component for ModuleVersionDocs {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let files = self.docs.files.iter().map(|file| {
            let symbols = file.symbols.iter().map(|s| {
                let mut row = Element::new("li")
                    .class("symbol")
                    .child(Element::new("code").text(s.name.clone()))
                    .child(Element::new("span").class("kind").text(s.kind().label()));
                if !s.description.is_empty() {
                    row.append(Element::new("p").text(s.description.clone()));
                }
                row
            });
            let mut section = Element::new("section")
                .class("file")
                .child(Element::new("h4").text(file.label.clone()))
                .child(clippy(format!("load(\"{}\", ...)", file.label)));
            if !file.description.is_empty() {
                section.append(Element::new("p").text(file.description.clone()));
            }
            section.child(Element::new("ul").children(symbols))
        });
        Element::new("article")
            .class("module-version-docs")
            .child(Element::new("h3").text(self.docs.key()))
            .children(files)
    }

    fn search_provider(&self) -> Option<SearchProvider> {
        let mut provider = SearchProvider::new("symbols");
        let route = format!("docs/{}", self.docs.key());
        for file in &self.docs.files {
            for s in &file.symbols {
                provider.add(s.name.clone(), route.clone(), s.kind().label());
            }
        }
        Some(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prefs::MemoryPreferences;
    use crate::registry::{FileSymbols, Symbol, SymbolKind};
    use crate::test_support::sample_registry;
    use crate::ui::component::enter;
    use crate::ui::route::{Route, RouteEventKind};

    fn documented_registry() -> Registry {
        let mut registry = sample_registry();
        registry.modules[0].versions[0]
            .source
            .as_mut()
            .unwrap()
            .documentation = Some(ModuleVersionSymbols {
            module_name: "foo".to_string(),
            version: "2.0".to_string(),
            files: vec![FileSymbols {
                label: "@foo//:defs.bzl".to_string(),
                description: String::new(),
                symbols: vec![Symbol {
                    name: "foo_library".to_string(),
                    kind: SymbolKind::Rule as i32,
                    description: "Builds foo.".to_string(),
                }],
            }],
        });
        registry
    }

    #[test]
    fn test_documented_version_requires_docs() {
        let registry = documented_registry();
        assert!(documented_version(&registry, "foo@2.0").is_some());
        assert!(documented_version(&registry, "foo@1.0").is_none());
        assert!(documented_version(&registry, "foo").is_none());
    }

    #[test]
    fn test_docs_page_lists_symbols() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        let mut tab = DocsTab::new(Arc::new(documented_registry()));
        enter(&mut tab, &mut env).unwrap();

        let mut route = Route::parse("foo@2.0");
        tab.go(&mut route, &mut env).unwrap();
        assert_eq!(route.events().last().unwrap().kind, RouteEventKind::Done);
        let rendered = tab.render().unwrap();
        let symbol = rendered.find_by_class("symbol").unwrap();
        assert!(symbol.text_content().contains("foo_library"));
        assert!(symbol.text_content().contains("rule"));

        let active = tab.tabs().unwrap().active().unwrap();
        let provider = active.search_provider().unwrap();
        assert_eq!(provider.targets()[0].route, "docs/foo@2.0");
    }

    #[test]
    fn test_undocumented_version_fails() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        let mut tab = DocsTab::new(Arc::new(documented_registry()));
        enter(&mut tab, &mut env).unwrap();
        let mut route = Route::parse("foo@1.0");
        tab.go(&mut route, &mut env).unwrap();
        assert_eq!(route.events().last().unwrap().kind, RouteEventKind::Fail);
    }
}
