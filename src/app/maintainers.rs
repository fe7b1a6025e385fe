//! # Maintainers
//!
//! Installed lazily by the body on first reference. Maintainers are keyed
//! by `@<github>` when they have a handle, otherwise by email; each detail
//! page is itself installed on first reference.

use std::sync::Arc;

use indexmap::IndexMap;
use log::warn;

use crate::registry::lookup::{maintainer_module_versions, maintainers_map};
use crate::registry::{Maintainer, Registry};
use crate::ui::component::{Component, ComponentBase, Env, UiError};
use crate::ui::dom::Element;
use crate::ui::search::SearchProvider;
use crate::ui::select::{LazyOutcome, Select};

use super::views::{field, module_version_list, select_shell};

pub const LIST: &str = "list";

type MaintainersMap = Arc<IndexMap<String, Maintainer>>;

pub struct MaintainersTab {
    base: ComponentBase,
    select: Select,
    maintainers: MaintainersMap,
}

impl MaintainersTab {
    pub fn new(registry: Arc<Registry>) -> Self {
        let maintainers: MaintainersMap = Arc::new(maintainers_map(&registry));
        let base = ComponentBase::new();
        let mut select = Select::new(base.id()).with_default(LIST);

        let lookup = maintainers.clone();
        select.add_lazy(
            "maintainer",
            |name| name != LIST,
            move |name, _| match lookup.get(name) {
                Some(m) => LazyOutcome::Install(
                    name.to_string(),
                    Box::new(MaintainerTab::new(registry.clone(), name, m.clone())),
                ),
                None => {
                    warn!("failed to get maintainer for {name} ({} known)", lookup.len());
                    LazyOutcome::Decline
                }
            },
        );

        Self {
            base,
            select,
            maintainers,
        }
    }

    pub fn maintainers(&self) -> &IndexMap<String, Maintainer> {
        &self.maintainers
    }
}

impl Component for MaintainersTab {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        select_shell("maintainers", "Maintainers")
    }

    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        self.select
            .add_tab(LIST, Box::new(MaintainerList::new(self.maintainers.clone())));
        Ok(())
    }

    fn tabs(&self) -> Option<&Select> {
        Some(&self.select)
    }

    fn tabs_mut(&mut self) -> Option<&mut Select> {
        Some(&mut self.select)
    }

    fn search_provider(&self) -> Option<SearchProvider> {
        let mut provider = SearchProvider::new("maintainers");
        for (key, m) in self.maintainers.iter() {
            provider.add(key.clone(), format!("maintainers/{key}"), m.name.clone());
        }
        Some(provider)
    }
}

pub struct MaintainerList {
    base: ComponentBase,
    maintainers: MaintainersMap,
}

impl MaintainerList {
    pub fn new(maintainers: MaintainersMap) -> Self {
        Self {
            base: ComponentBase::new(),
            maintainers,
        }
    }
}

impl Component for MaintainerList {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let items = self.maintainers.iter().map(|(key, m)| {
            let label = if m.name.is_empty() {
                key.clone()
            } else {
                format!("{} ({key})", m.name)
            };
            Element::new("li").child(Element::route_link(label, format!("maintainers/{key}")))
        });
        Element::new("ul").class("maintainer-list").children(items)
    }
}

pub struct MaintainerTab {
    base: ComponentBase,
    registry: Arc<Registry>,
    key: String,
    maintainer: Maintainer,
}

impl MaintainerTab {
    pub fn new(registry: Arc<Registry>, key: &str, maintainer: Maintainer) -> Self {
        Self {
            base: ComponentBase::new(),
            registry,
            key: key.to_string(),
            maintainer,
        }
    }
}

impl Component for MaintainerTab {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let m = &self.maintainer;
        let mut el = Element::new("article")
            .class("maintainer")
            .child(Element::new("h3").text(self.key.clone()));
        if !m.name.is_empty() {
            el.append(field("Name", m.name.clone()));
        }
        if !m.github.is_empty() {
            el.append(field("GitHub", format!("https://github.com/{}", m.github)));
        }
        if !m.email.is_empty() {
            el.append(field("Email", m.email.clone()));
        }
        let versions = maintainer_module_versions(&self.registry, m);
        el.append(Element::new("h4").text(format!("Modules ({})", versions.len())));
        el.child(module_version_list(&versions))
    }
}
