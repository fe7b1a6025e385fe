//! # TabBase
//!
//! A [`Select`] that also owns a navigation menu. Every tab gets an
//! `<a class="appnav-item">` in the owner's `menu` node, and the entry of
//! the shown tab carries the `selected` class.
//!
//! The menu is a projection of `Select::active_name`; TabBase keeps no
//! state of its own beyond the entries it appended.

use super::component::{ComponentBase, Env, UiError};
use super::dom::Element;
use super::route::{Route, RouteEvent};
use super::select::{Select, Transition};
use super::component::Component;

pub const MENU_CLASS: &str = "menu";
pub const MENU_ITEM_CLASS: &str = "appnav-item";
pub const SELECTED_CLASS: &str = "selected";

pub struct TabBase {
    select: Select,
}

impl TabBase {
    pub fn new(select: Select) -> Self {
        Self { select }
    }

    pub fn select(&self) -> &Select {
        &self.select
    }

    pub fn select_mut(&mut self) -> &mut Select {
        &mut self.select
    }

    /// Id of the menu entry for the child with id `child`.
    pub fn menu_entry_id(&self, child: impl std::fmt::Display) -> String {
        format!("{}.{}", self.select.owner(), child)
    }

    /// Register a tab and append its menu entry, labelled with the
    /// capitalized tab name.
    pub fn add_tab(
        &mut self,
        base: &mut ComponentBase,
        name: &str,
        component: Box<dyn Component>,
    ) -> Result<bool, UiError> {
        self.add_tab_labeled(base, name, &capitalize(name), component)
    }

    pub fn add_tab_labeled(
        &mut self,
        base: &mut ComponentBase,
        name: &str,
        label: &str,
        component: Box<dyn Component>,
    ) -> Result<bool, UiError> {
        let child = component.base().id();
        if !self.select.add_tab(name, component) {
            return Ok(false);
        }
        let item = create_menu_item(label, &self.select.child_path(name)).id(self.menu_entry_id(child));
        base.css_element_mut(MENU_CLASS)?.append(item);
        Ok(true)
    }

    /// Route through the select, then project the result onto the menu.
    pub fn go(
        &mut self,
        base: &mut ComponentBase,
        route: &mut Route,
        env: &mut Env<'_>,
    ) -> Result<(), UiError> {
        let transition = self.select.go(route, env)?;
        self.after(base, transition.as_ref())
    }

    pub fn resume(
        &mut self,
        base: &mut ComponentBase,
        current_dispatch: u64,
        env: &mut Env<'_>,
    ) -> Result<Vec<RouteEvent>, UiError> {
        let resumed = self.select.resume(current_dispatch, env)?;
        self.after(base, resumed.transition.as_ref())?;
        Ok(resumed.events)
    }

    fn after(&mut self, base: &mut ComponentBase, transition: Option<&Transition>) -> Result<(), UiError> {
        self.sync_entries(base)?;
        if let Some(t) = transition {
            self.handle_show_hide(base, t)?;
        }
        Ok(())
    }

    /// Tabs installed lazily by the select get their entry here.
    fn sync_entries(&mut self, base: &mut ComponentBase) -> Result<(), UiError> {
        let missing: Vec<(String, String, String)> = self
            .select
            .tabs_iter()
            .map(|(name, c)| (name.to_string(), self.menu_entry_id(c.base().id())))
            .filter(|(_, id)| {
                base.element()
                    .and_then(|el| el.find_by_id(id))
                    .is_none()
            })
            .map(|(name, id)| {
                let path = self.select.child_path(&name);
                (id, capitalize(&name), path)
            })
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        let menu = base.css_element_mut(MENU_CLASS)?;
        for (id, label, path) in missing {
            menu.append(create_menu_item(&label, &path).id(id));
        }
        Ok(())
    }

    /// Move the `selected` class to the entry of the shown child, if it is
    /// one of ours.
    pub fn handle_show_hide(&self, base: &mut ComponentBase, transition: &Transition) -> Result<(), UiError> {
        if self.select.tab_name_by_id(transition.shown).is_none() {
            return Ok(());
        }
        let entry_id = self.menu_entry_id(transition.shown);
        let menu = base.css_element_mut(MENU_CLASS)?;
        if menu.find_by_id(&entry_id).is_none() {
            return Ok(());
        }
        menu.for_each_mut(&|e| e.has_class(MENU_ITEM_CLASS), &mut |e| {
            e.remove_class(SELECTED_CLASS)
        });
        if let Some(item) = menu.find_by_id_mut(&entry_id) {
            item.add_class(SELECTED_CLASS);
        }
        Ok(())
    }
}

pub fn create_menu_item(label: &str, path: &str) -> Element {
    Element::new("a")
        .class(MENU_ITEM_CLASS)
        .attr("href", format!("/#/{path}"))
        .attr("data-name", label)
        .text(label)
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prefs::MemoryPreferences;
    use crate::test_support::{Leaf, Tabbed};
    use crate::ui::component::enter;
    use crate::ui::select::LazyOutcome;

    fn selected_entries(component: &Tabbed) -> Vec<String> {
        component
            .base()
            .element()
            .unwrap()
            .find_all(&|e| e.has_class(SELECTED_CLASS))
            .into_iter()
            .filter_map(|e| e.id.clone())
            .collect()
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("modules"), "Modules");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_add_tab_synthesizes_menu_entry() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        let mut tabbed = Tabbed::new(&["overview", "deps"]);
        tabbed.base_mut().set_path("modules/foo/2.0".to_string());
        enter(&mut tabbed, &mut env).unwrap();

        let el = tabbed.base().element().unwrap();
        let items = el.find_all(&|e| e.has_class(MENU_ITEM_CLASS));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get_attr("href"), Some("/#/modules/foo/2.0/overview"));
        assert_eq!(items[0].get_attr("data-name"), Some("Overview"));
    }

    #[test]
    fn test_exactly_one_selected_entry_tracks_active_tab() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        let mut tabbed = Tabbed::new(&["a", "b", "c"]);
        enter(&mut tabbed, &mut env).unwrap();
        assert!(selected_entries(&tabbed).is_empty());

        for path in ["b", "a", "c", "c", ""] {
            tabbed.go(&mut Route::parse(path), &mut env).unwrap();
            let selected = selected_entries(&tabbed);
            assert_eq!(selected.len(), 1);
            let active = tabbed.tabs().unwrap().active().unwrap().base().id();
            assert_eq!(selected[0], tabbed.nav().menu_entry_id(active));
        }
    }

    #[test]
    fn test_failed_select_leaves_selection_alone() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        let mut tabbed = Tabbed::new(&["a", "b"]);
        enter(&mut tabbed, &mut env).unwrap();
        tabbed.go(&mut Route::parse("b"), &mut env).unwrap();
        tabbed.go(&mut Route::parse("nope"), &mut env).unwrap();
        assert_eq!(selected_entries(&tabbed).len(), 1);
    }

    #[test]
    fn test_lazily_installed_tab_gets_entry_and_selection() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        let mut tabbed = Tabbed::new(&["a"]);
        enter(&mut tabbed, &mut env).unwrap();
        tabbed.nav_mut().select_mut().add_lazy(
            "extra",
            |n| n == "extra",
            |n, _| LazyOutcome::Install(n.to_string(), Box::new(Leaf::new(n))),
        );
        tabbed.go(&mut Route::parse("extra"), &mut env).unwrap();
        let el = tabbed.base().element().unwrap();
        assert_eq!(el.find_all(&|e| e.has_class(MENU_ITEM_CLASS)).len(), 2);
        let selected = selected_entries(&tabbed);
        assert_eq!(selected.len(), 1);
        let item = el.find_by_id(&selected[0]).unwrap();
        assert_eq!(item.get_attr("data-name"), Some("Extra"));
    }
}
