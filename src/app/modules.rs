//! # Modules
//!
//! ```text
//! modules                    ModulesTab      (default: list)
//! ├── list                   ModuleList      (lazy)
//! └── <name>                 ModuleTab       (lazy, default: latest version)
//!     └── <version>          ModuleVersionTab (lazy, menu: overview | deps)
//!         ├── overview       ModuleVersionOverview
//!         └── deps           TreeView
//! ```
//!
//! Every level below `modules` is installed on first reference, so only
//! modules that were actually visited cost anything.

use std::sync::Arc;

use crate::registry::lookup::{
    dependency_tree, find_module, find_module_version, latest_module_versions, latest_version,
    maintainer_key,
};
use crate::registry::{Module, ModuleDependency, ModuleVersion, Registry};
use crate::ui::component::{Component, ComponentBase, Env, UiError};
use crate::ui::dom::Element;
use crate::ui::route::{Route, RouteEvent};
use crate::ui::search::SearchProvider;
use crate::ui::select::{LazyOutcome, Select};
use crate::ui::tab_base::TabBase;
use crate::ui::treeview::TreeView;

use super::views::{clippy, field, module_version_list, module_version_route, select_shell, tab_shell};

pub const LIST: &str = "list";
pub const OVERVIEW: &str = "overview";
pub const DEPS: &str = "deps";

// ============================================================================
// ModulesTab
// ============================================================================

pub struct ModulesTab {
    base: ComponentBase,
    select: Select,
}

impl ModulesTab {
    pub fn new(registry: Arc<Registry>) -> Self {
        let base = ComponentBase::new();
        let mut select = Select::new(base.id()).with_default(LIST);

        let reg = registry.clone();
        select.add_lazy(
            "list",
            |name| name == LIST,
            move |name, _| LazyOutcome::Install(name.to_string(), Box::new(ModuleList::new(reg.clone()))),
        );

        let reg = registry.clone();
        let lookup = registry;
        select.add_lazy(
            "module",
            move |name| find_module(&lookup, name).is_some(),
            move |name, _| match ModuleTab::new(reg.clone(), name) {
                Some(tab) => LazyOutcome::Install(name.to_string(), Box::new(tab)),
                None => LazyOutcome::Decline,
            },
        );

        Self { base, select }
    }
}

impl Component for ModulesTab {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        select_shell("modules", "Modules")
    }

    fn tabs(&self) -> Option<&Select> {
        Some(&self.select)
    }

    fn tabs_mut(&mut self) -> Option<&mut Select> {
        Some(&mut self.select)
    }
}

/// Latest version of every module.
pub struct ModuleList {
    base: ComponentBase,
    registry: Arc<Registry>,
}

impl ModuleList {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            base: ComponentBase::new(),
            registry,
        }
    }
}

impl Component for ModuleList {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        module_version_list(&latest_module_versions(&self.registry))
    }
}

// ============================================================================
// ModuleTab
// ============================================================================

pub struct ModuleTab {
    base: ComponentBase,
    select: Select,
    registry: Arc<Registry>,
    name: String,
}

impl ModuleTab {
    /// `None` if the registry has no module `name` or it has no versions.
    pub fn new(registry: Arc<Registry>, name: &str) -> Option<Self> {
        let module = find_module(&registry, name)?;
        let latest = latest_version(module)?.version.clone();
        let base = ComponentBase::new();
        let mut select = Select::new(base.id()).with_default(&latest);

        let reg = registry.clone();
        let module_name = name.to_string();
        select.add_lazy(
            "version",
            |_| true,
            move |version, _| match ModuleVersionTab::new(reg.clone(), &module_name, version) {
                Some(tab) => LazyOutcome::Install(version.to_string(), Box::new(tab)),
                None => LazyOutcome::Decline,
            },
        );

        Some(Self {
            base,
            select,
            registry,
            name: name.to_string(),
        })
    }

    fn module(&self) -> Option<&Module> {
        find_module(&self.registry, &self.name)
    }
}

impl Component for ModuleTab {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let mut el = Element::new("section")
            .class("module")
            .child(Element::new("h2").text(self.name.clone()));
        let Some(module) = self.module() else {
            return el.child(Element::new("div").class("content"));
        };
        if let Some(md) = &module.repository_metadata
            && !md.description.is_empty()
        {
            el.append(Element::new("p").class("description").text(md.description.clone()));
        }
        let yanked: &[String] = module
            .metadata
            .as_ref()
            .map(|m| m.yanked_versions.as_slice())
            .unwrap_or_default();
        let versions = module.versions.iter().map(|mv| {
            let mut link = Element::route_link(
                mv.version.clone(),
                module_version_route(&module.name, &mv.version),
            );
            if yanked.contains(&mv.version) {
                link.add_class("yanked");
            }
            Element::new("li").child(link)
        });
        el.append(Element::new("ul").class("versions").children(versions));
        el.child(Element::new("div").class("content"))
    }

    fn tabs(&self) -> Option<&Select> {
        Some(&self.select)
    }

    fn tabs_mut(&mut self) -> Option<&mut Select> {
        Some(&mut self.select)
    }

    fn search_provider(&self) -> Option<SearchProvider> {
        let module = self.module()?;
        let mut provider = SearchProvider::new("versions");
        for mv in &module.versions {
            provider.add(mv.key(), module_version_route(&mv.name, &mv.version), "version");
        }
        Some(provider)
    }
}

// ============================================================================
// ModuleVersionTab
// ============================================================================

pub struct ModuleVersionTab {
    base: ComponentBase,
    nav: TabBase,
    registry: Arc<Registry>,
    name: String,
    version: String,
}

impl ModuleVersionTab {
    pub fn new(registry: Arc<Registry>, name: &str, version: &str) -> Option<Self> {
        find_module_version(&registry, name, version)?;
        let base = ComponentBase::new();
        let nav = TabBase::new(Select::new(base.id()).with_default(OVERVIEW));
        Some(Self {
            base,
            nav,
            registry,
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    fn module_version(&self) -> Option<&ModuleVersion> {
        find_module_version(&self.registry, &self.name, &self.version)
    }
}

impl Component for ModuleVersionTab {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        tab_shell("module-version", format!("{}@{}", self.name, self.version))
    }

    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        let overview = ModuleVersionOverview::new(self.registry.clone(), &self.name, &self.version);
        self.nav.add_tab(&mut self.base, OVERVIEW, Box::new(overview))?;
        let tree = match self.module_version() {
            Some(mv) => dependency_tree(&self.registry, mv),
            None => Vec::new(),
        };
        self.nav
            .add_tab_labeled(&mut self.base, DEPS, "Dependencies", Box::new(TreeView::new(tree, false)))?;
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

// ============================================================================
// ModuleVersionOverview
// ============================================================================

pub struct ModuleVersionOverview {
    base: ComponentBase,
    registry: Arc<Registry>,
    name: String,
    version: String,
}

impl ModuleVersionOverview {
    pub fn new(registry: Arc<Registry>, name: &str, version: &str) -> Self {
        Self {
            base: ComponentBase::new(),
            registry,
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

/// The `MODULE.bazel` line a consumer would add for this dependency.
pub fn bazel_dep_snippet(name: &str, version: &str, dev: bool) -> String {
    if dev {
        format!("bazel_dep(name = \"{name}\", version = \"{version}\", dev_dependency = True)")
    } else {
        format!("bazel_dep(name = \"{name}\", version = \"{version}\")")
    }
}

fn dependency_list(class: &str, title: &str, deps: &[&ModuleDependency]) -> Element {
    let items = deps.iter().map(|d| {
        Element::new("li").child(Element::route_link(
            format!("{}@{}", d.name, d.version),
            module_version_route(&d.name, &d.version),
        ))
    });
    Element::new("div")
        .class(class)
        .child(Element::new("h3").text(format!("{title} ({})", deps.len())))
        .child(Element::new("ul").children(items))
}

impl Component for ModuleVersionOverview {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let mut el = Element::new("article").class("overview");
        let (Some(module), Some(mv)) = (
            find_module(&self.registry, &self.name),
            find_module_version(&self.registry, &self.name, &self.version),
        ) else {
            return el;
        };

        el.append(clippy(bazel_dep_snippet(&mv.name, &mv.version, false)));

        if let Some(md) = &module.metadata {
            if !md.deprecated.is_empty() {
                el.append(Element::new("p").class("deprecated").text(format!("Deprecated: {}", md.deprecated)));
            }
            if md.yanked_versions.contains(&mv.version) {
                el.append(Element::new("p").class("yanked").text("This version has been yanked"));
            }
            if !md.homepage.is_empty() {
                el.append(field("Homepage", md.homepage.clone()));
            }
            if !md.repository.is_empty() {
                el.append(field("Repository", md.repository.join(", ")));
            }
        }
        if let Some(rm) = &mv.repository_metadata {
            if !rm.description.is_empty() {
                el.append(field("Description", rm.description.clone()));
            }
            if rm.stargazers > 0 {
                el.append(field("Stars", rm.stargazers.to_string()));
            }
            if !rm.languages.is_empty() {
                el.append(field("Languages", rm.languages.join(", ")));
            }
        }
        el.append(field("Compatibility level", mv.compatibility_level.to_string()));
        if !mv.repo_name.is_empty() {
            el.append(field("Repo name", mv.repo_name.clone()));
        }
        if let Some(source) = &mv.source {
            if !source.url.is_empty() {
                el.append(field("Source", source.url.clone()));
            }
            if !source.integrity.is_empty() {
                el.append(field("Integrity", source.integrity.clone()));
            }
        }
        if let Some(commit) = &mv.commit {
            el.append(field("Commit", format!("{} {}", commit.sha, commit.message)));
            el.append(field("Published", commit.date.clone()));
        }

        if let Some(md) = &module.metadata
            && !md.maintainers.is_empty()
        {
            let items = md.maintainers.iter().filter_map(|m| {
                let key = maintainer_key(m)?;
                let label = if m.name.is_empty() { key.clone() } else { m.name.clone() };
                Some(Element::new("li").child(Element::route_link(label, format!("maintainers/{key}"))))
            });
            el.append(
                Element::new("div")
                    .class("maintainers")
                    .child(Element::new("h3").text("Maintainers"))
                    .child(Element::new("ul").children(items)),
            );
        }

        let deps: Vec<_> = mv.deps.iter().filter(|d| !d.dev).collect();
        let dev_deps: Vec<_> = mv.deps.iter().filter(|d| d.dev).collect();
        el.append(dependency_list("deps", "Dependencies", &deps));
        if !dev_deps.is_empty() {
            el.append(dependency_list("dev-deps", "Dev Dependencies", &dev_deps));
        }
        el.append(Element::route_link("Documentation", format!("docs/{}", mv.key())).class("docs-link"));
        el
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prefs::MemoryPreferences;
    use crate::test_support::sample_registry;
    use crate::ui::component::enter;
    use crate::ui::route::RouteEventKind;
    use crate::ui::tab_base::SELECTED_CLASS;

    fn with_env<R>(f: impl FnOnce(&mut Env<'_>) -> R) -> R {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        f(&mut env)
    }

    fn modules_tab() -> ModulesTab {
        let mut tab = ModulesTab::new(Arc::new(sample_registry()));
        tab.base_mut().set_path("modules".to_string());
        tab
    }

    #[test]
    fn test_module_name_defaults_to_latest_version_overview() {
        with_env(|env| {
            let mut tab = modules_tab();
            enter(&mut tab, env).unwrap();
            let mut route = Route::parse("foo");
            tab.go(&mut route, env).unwrap();
            assert_eq!(route.path(), "foo/2.0/overview");
            assert_eq!(route.events().last().unwrap().kind, RouteEventKind::Done);

            let module = tab.tabs().unwrap().active().unwrap();
            assert_eq!(module.base().path(), "modules/foo");
            let version = module.tabs().unwrap().active().unwrap();
            assert_eq!(version.base().path(), "modules/foo/2.0");
            assert_eq!(version.tabs().unwrap().active_name(), Some(OVERVIEW));
        });
    }

    #[test]
    fn test_empty_route_selects_list() {
        with_env(|env| {
            let mut tab = modules_tab();
            enter(&mut tab, env).unwrap();
            let mut route = Route::parse("");
            tab.go(&mut route, env).unwrap();
            assert_eq!(tab.tabs().unwrap().active_name(), Some(LIST));
            let rendered = tab.render().unwrap();
            assert_eq!(rendered.find_all(&|e| e.has_class("module-version")).len(), 2);
        });
    }

    #[test]
    fn test_unknown_module_and_version_fail() {
        with_env(|env| {
            let mut tab = modules_tab();
            enter(&mut tab, env).unwrap();
            let mut route = Route::parse("nope");
            tab.go(&mut route, env).unwrap();
            assert_eq!(route.events().last().unwrap().kind, RouteEventKind::Fail);

            let mut route = Route::parse("foo/9.9");
            tab.go(&mut route, env).unwrap();
            let last = route.events().last().unwrap();
            assert_eq!(last.kind, RouteEventKind::Fail);
            assert_eq!(last.unmatched, "9.9");
        });
    }

    #[test]
    fn test_deps_tab_renders_tree_and_moves_selection() {
        with_env(|env| {
            let mut tab = modules_tab();
            enter(&mut tab, env).unwrap();
            tab.go(&mut Route::parse("foo/2.0/deps"), env).unwrap();
            let rendered = tab.render().unwrap();
            let tree = rendered.find_by_class("treeview").unwrap();
            let routes: Vec<_> = tree
                .find_all(&|e| e.get_attr("data-route").is_some())
                .into_iter()
                .filter_map(|e| e.get_attr("data-route"))
                .collect();
            assert_eq!(routes, ["modules/bar/1.0"]);
            let selected = rendered.find_all(&|e| e.has_class(SELECTED_CLASS));
            assert_eq!(selected.len(), 1);
            assert_eq!(selected[0].text_content(), "Dependencies");
        });
    }

    #[test]
    fn test_overview_lists_deps_and_copy_snippet() {
        let overview = ModuleVersionOverview::new(Arc::new(sample_registry()), "foo", "2.0");
        let el = overview.create_dom();
        let clip = el.find(&|e| e.get_attr("data-clippy").is_some()).unwrap();
        assert_eq!(
            clip.get_attr("data-clippy"),
            Some("bazel_dep(name = \"foo\", version = \"2.0\")")
        );
        assert!(el.find_by_class("dev-deps").unwrap().text_content().contains("baz@0.1"));
        let maintainer = el
            .find(&|e| e.get_attr("data-route") == Some("maintainers/@octocat"))
            .unwrap();
        assert_eq!(maintainer.text_content(), "Octo Cat");
    }

    #[test]
    fn test_module_tab_search_provider_lists_versions() {
        let tab = ModuleTab::new(Arc::new(sample_registry()), "foo").unwrap();
        let provider = tab.search_provider().unwrap();
        assert_eq!(provider.len(), 2);
        assert!(ModuleTab::new(Arc::new(sample_registry()), "nope").is_none());
    }
}
