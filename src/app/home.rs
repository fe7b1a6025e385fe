//! Landing tab: the most recently published module versions.

use std::sync::Arc;

use crate::registry::Registry;
use crate::registry::lookup::recent_module_versions;
use crate::ui::component::{Component, ComponentBase, Env, UiError};
use crate::ui::dom::Element;
use crate::ui::select::Select;

use super::views::{module_version_list, select_shell};

pub const MODULE_VERSIONS: &str = "moduleversions";

/// How many versions the landing list shows.
pub const RECENT_LIMIT: usize = 50;

pub struct HomeTab {
    base: ComponentBase,
    select: Select,
    registry: Arc<Registry>,
}

impl HomeTab {
    pub fn new(registry: Arc<Registry>) -> Self {
        let base = ComponentBase::new();
        let select = Select::new(base.id()).with_default(MODULE_VERSIONS);
        Self {
            base,
            select,
            registry,
        }
    }
}

impl Component for HomeTab {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        select_shell("home", "Recent module versions").child(
            Element::new("p")
                .class("summary")
                .text(format!("{} modules", self.registry.modules.len())),
        )
    }

    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        self.select.add_tab(
            MODULE_VERSIONS,
            Box::new(ModuleVersionList::new(self.registry.clone())),
        );
        Ok(())
    }

    fn tabs(&self) -> Option<&Select> {
        Some(&self.select)
    }

    fn tabs_mut(&mut self) -> Option<&mut Select> {
        Some(&mut self.select)
    }
}

pub struct ModuleVersionList {
    base: ComponentBase,
    registry: Arc<Registry>,
}

impl ModuleVersionList {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            base: ComponentBase::new(),
            registry,
        }
    }
}

impl Component for ModuleVersionList {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let recent = recent_module_versions(&self.registry, RECENT_LIMIT);
        module_version_list(&recent)
    }
}
