//! # Settings
//!
//! ```text
//! settings              SettingsTab (menu, default: appearance)
//! └── appearance        Appearance
//! ```
//!
//! Appearance owns the two preferences and mirrors them onto the document
//! as `data-color-mode` / `data-display-mode`, which is what styling keys
//! off. `t` cycles the color mode, `d` the display mode.

use log::info;

use crate::core::prefs::{
    COLOR_MODE, COLOR_MODES, DISPLAY_MODE, DISPLAY_MODES, default_value, next_value,
};
use crate::ui::component::{Component, ComponentBase, Env, Key, UiError};
use crate::ui::dom::Element;
use crate::ui::route::{Route, RouteEvent};
use crate::ui::select::Select;
use crate::ui::tab_base::TabBase;

use super::views::tab_shell;

pub const APPEARANCE: &str = "appearance";

pub const DOCUMENT_COLOR_MODE: &str = "data-color-mode";
pub const DOCUMENT_DISPLAY_MODE: &str = "data-display-mode";

pub struct SettingsTab {
    base: ComponentBase,
    nav: TabBase,
}

impl Default for SettingsTab {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsTab {
    pub fn new() -> Self {
        let base = ComponentBase::new();
        let nav = TabBase::new(Select::new(base.id()).with_default(APPEARANCE));
        Self { base, nav }
    }
}

impl Component for SettingsTab {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        tab_shell("settings", "Settings")
    }

    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        self.nav
            .add_tab(&mut self.base, APPEARANCE, Box::new(Appearance::new()))?;
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

pub struct Appearance {
    base: ComponentBase,
    color_mode: String,
    display_mode: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self::new()
    }
}

impl Appearance {
    pub fn new() -> Self {
        Self {
            base: ComponentBase::new(),
            color_mode: String::new(),
            display_mode: String::new(),
        }
    }

    pub fn color_mode(&self) -> &str {
        &self.color_mode
    }

    pub fn display_mode(&self) -> &str {
        &self.display_mode
    }

    fn enter_theme(&mut self, env: &mut Env<'_>) {
        let color_mode = match env.prefs.get(COLOR_MODE) {
            Some(stored) => stored,
            None => {
                let current = env
                    .document
                    .get_attr(DOCUMENT_COLOR_MODE)
                    .or(default_value(COLOR_MODE))
                    .unwrap_or("auto")
                    .to_string();
                env.prefs.set(COLOR_MODE, &current);
                current
            }
        };
        env.document.set_attr(DOCUMENT_COLOR_MODE, color_mode.clone());
        self.color_mode = color_mode;
    }

    fn enter_display(&mut self, env: &mut Env<'_>) {
        let display_mode = match env.prefs.get(DISPLAY_MODE) {
            Some(stored) => stored,
            None => {
                let initial = default_value(DISPLAY_MODE).unwrap_or("consumer").to_string();
                env.prefs.set(DISPLAY_MODE, &initial);
                initial
            }
        };
        env.document.set_attr(DOCUMENT_DISPLAY_MODE, display_mode.clone());
        self.display_mode = display_mode;
    }

    fn set_color_mode(&mut self, env: &mut Env<'_>, value: &str) {
        info!("color mode: {} -> {}", self.color_mode, value);
        env.document.set_attr(DOCUMENT_COLOR_MODE, value);
        env.prefs.set(COLOR_MODE, value);
        self.color_mode = value.to_string();
    }

    fn set_display_mode(&mut self, env: &mut Env<'_>, value: &str) {
        info!("display mode: {} -> {}", self.display_mode, value);
        env.document.set_attr(DOCUMENT_DISPLAY_MODE, value);
        env.prefs.set(DISPLAY_MODE, value);
        self.display_mode = value.to_string();
    }

    fn refresh(&mut self) -> Result<(), UiError> {
        let el = self.create_dom();
        *self.base.element_mut()? = el;
        Ok(())
    }
}

fn option_row(class: &str, label: &str, key: char, values: &[&str], current: &str) -> Element {
    let options = values.iter().map(|v| {
        let mut opt = Element::new("option").attr("value", *v).text(*v);
        if *v == current {
            opt.set_attr("selected", "true");
        }
        opt
    });
    Element::new("div")
        .class(class)
        .attr("data-key", key.to_string())
        .child(Element::new("label").text(format!("{label} ({key})")))
        .child(Element::new("select").attr("value", current).children(options))
}

impl Component for Appearance {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        Element::new("form")
            .class("appearance")
            .child(option_row("theme", "Theme", 't', COLOR_MODES, &self.color_mode))
            .child(option_row("display", "Display", 'd', DISPLAY_MODES, &self.display_mode))
    }

    fn enter_document(&mut self, env: &mut Env<'_>) -> Result<(), UiError> {
        self.enter_theme(env);
        self.enter_display(env);
        self.refresh()
    }

    fn handle_key(&mut self, key: Key, env: &mut Env<'_>) -> Result<bool, UiError> {
        match key {
            Key::Char('t') => {
                let next = next_value(COLOR_MODES, &self.color_mode);
                self.set_color_mode(env, next);
            }
            Key::Char('d') => {
                let next = next_value(DISPLAY_MODES, &self.display_mode);
                self.set_display_mode(env, next);
            }
            _ => return Ok(false),
        }
        self.refresh()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prefs::{MemoryPreferences, PreferenceStore};
    use crate::ui::component::enter;

    #[test]
    fn test_absent_preferences_are_persisted_with_defaults() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        {
            let mut env = Env::new(&mut prefs, &mut doc, None);
            let mut view = Appearance::new();
            enter(&mut view, &mut env).unwrap();
            assert_eq!(view.color_mode(), "auto");
            assert_eq!(view.display_mode(), "consumer");
        }
        assert_eq!(prefs.get(COLOR_MODE).as_deref(), Some("auto"));
        assert_eq!(prefs.get(DISPLAY_MODE).as_deref(), Some("consumer"));
        assert_eq!(doc.get_attr(DOCUMENT_DISPLAY_MODE), Some("consumer"));
    }

    #[test]
    fn test_document_color_mode_seeds_missing_preference() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html").attr(DOCUMENT_COLOR_MODE, "dark");
        {
            let mut env = Env::new(&mut prefs, &mut doc, None);
            enter(&mut Appearance::new(), &mut env).unwrap();
        }
        assert_eq!(prefs.get(COLOR_MODE).as_deref(), Some("dark"));
    }

    #[test]
    fn test_stored_preferences_win_and_are_mirrored() {
        let mut prefs = MemoryPreferences::new();
        prefs.set(COLOR_MODE, "light");
        prefs.set(DISPLAY_MODE, "maintainer");
        let mut doc = Element::new("html").attr(DOCUMENT_COLOR_MODE, "dark");
        {
            let mut env = Env::new(&mut prefs, &mut doc, None);
            enter(&mut Appearance::new(), &mut env).unwrap();
        }
        assert_eq!(doc.get_attr(DOCUMENT_COLOR_MODE), Some("light"));
        assert_eq!(doc.get_attr(DOCUMENT_DISPLAY_MODE), Some("maintainer"));
    }

    #[test]
    fn test_keys_cycle_and_persist() {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        {
            let mut env = Env::new(&mut prefs, &mut doc, None);
            let mut view = Appearance::new();
            enter(&mut view, &mut env).unwrap();
            assert!(view.handle_key(Key::Char('t'), &mut env).unwrap());
            assert!(view.handle_key(Key::Char('d'), &mut env).unwrap());
            assert!(!view.handle_key(Key::Char('x'), &mut env).unwrap());
            let theme = view.base().element().unwrap().find_by_class("theme").unwrap();
            let selected = theme.find(&|e| e.get_attr("selected").is_some()).unwrap();
            assert_eq!(selected.text_content(), "light");
        }
        assert_eq!(prefs.get(COLOR_MODE).as_deref(), Some("light"));
        assert_eq!(doc.get_attr(DOCUMENT_DISPLAY_MODE), Some("maintainer"));
    }
}
