//! # TreeView
//!
//! Renders a dependency tree as nested, collapsible items.
//!
//! ```text
//! li.treeview-item [aria-expanded]
//! ├── button.treeview-expand-button [aria-label=Expand|Collapse, data-toggle=<item id>]
//! │   └── span.treeview-chevron (+ treeview-chevron-expanded)
//! ├── a [data-route=modules/<name>/<version>]
//! └── ul.treeview-children (treeview-children-expanded|collapsed)
//!     └── li.treeview-item ...
//! ```
//!
//! Only items with children carry `aria-expanded`; leaves have no button.

use crate::registry::lookup::DependencyNode;

use super::component::{Component, ComponentBase, Env, Key, UiError};
use super::dom::Element;

pub const ITEM_CLASS: &str = "treeview-item";
pub const BUTTON_CLASS: &str = "treeview-expand-button";
pub const CHEVRON_CLASS: &str = "treeview-chevron";
pub const CHEVRON_EXPANDED_CLASS: &str = "treeview-chevron-expanded";
pub const CHILDREN_CLASS: &str = "treeview-children";
pub const CHILDREN_EXPANDED_CLASS: &str = "treeview-children-expanded";
pub const CHILDREN_COLLAPSED_CLASS: &str = "treeview-children-collapsed";
/// Set on each expand button; names the item it flips.
pub const TOGGLE_ATTR: &str = "data-toggle";

pub struct TreeView {
    base: ComponentBase,
    tree: Vec<DependencyNode>,
    expanded: bool,
}

impl TreeView {
    pub fn new(tree: Vec<DependencyNode>, expanded: bool) -> Self {
        Self {
            base: ComponentBase::new(),
            tree,
            expanded,
        }
    }

    /// Flip one item. Returns the new state, or `None` if `item_id` is not
    /// an expandable item.
    pub fn toggle(&mut self, item_id: &str) -> Result<Option<bool>, UiError> {
        let root = self.base.element_mut()?;
        let Some(item) = root.find_by_id_mut(item_id) else {
            return Ok(None);
        };
        let Some(current) = item.get_attr("aria-expanded") else {
            return Ok(None);
        };
        let next = current != "true";
        set_expanded(item, next);
        Ok(Some(next))
    }

    pub fn expand_all(&mut self) -> Result<(), UiError> {
        self.set_all(true)
    }

    pub fn collapse_all(&mut self) -> Result<(), UiError> {
        self.set_all(false)
    }

    fn set_all(&mut self, on: bool) -> Result<(), UiError> {
        self.base
            .element_mut()?
            .for_each_mut(&is_expandable, &mut |item| set_expanded(item, on));
        Ok(())
    }

    fn render_node(&self, node: &DependencyNode, counter: &mut usize) -> Element {
        *counter += 1;
        let id = format!("{}.tv{}", self.base.id(), counter);
        let label = if node.unresolved {
            Element::new("span").class("treeview-unresolved").text(node.key())
        } else {
            Element::route_link(node.key(), format!("modules/{}/{}", node.name, node.version))
        };
        let mut item = Element::new("li").class(ITEM_CLASS).id(id.clone());
        if node.dev {
            item.add_class("treeview-dev");
        }
        if node.repeated {
            item.add_class("treeview-repeated");
        }
        if node.children.is_empty() || node.repeated {
            return item.child(label);
        }
        let button = Element::new("button")
            .class(BUTTON_CLASS)
            .attr(TOGGLE_ATTR, id.clone())
            .child(Element::new("span").class(CHEVRON_CLASS));
        let children = Element::new("ul")
            .class(CHILDREN_CLASS)
            .children(node.children.iter().map(|c| self.render_node(c, counter)));
        let mut item = item.child(button).child(label).child(children);
        set_expanded(&mut item, self.expanded);
        item
    }
}

fn is_expandable(e: &Element) -> bool {
    e.has_class(ITEM_CLASS) && e.get_attr("aria-expanded").is_some()
}

/// Apply `on` to an item's own button, chevron and children container.
fn set_expanded(item: &mut Element, on: bool) {
    item.set_attr("aria-expanded", on.to_string());
    for child in &mut item.children {
        if child.has_class(BUTTON_CLASS) {
            child.set_attr("aria-label", if on { "Collapse" } else { "Expand" });
            if let Some(chevron) = child.find_by_class_mut(CHEVRON_CLASS) {
                chevron.toggle_class(CHEVRON_EXPANDED_CLASS, on);
            }
        } else if child.has_class(CHILDREN_CLASS) {
            child.toggle_class(CHILDREN_EXPANDED_CLASS, on);
            child.toggle_class(CHILDREN_COLLAPSED_CLASS, !on);
        }
    }
}

impl Component for TreeView {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        let mut counter = 0;
        let root = Element::new("ul").class("treeview");
        if self.tree.is_empty() {
            return root.child(Element::new("li").class("treeview-empty").text("No dependencies"));
        }
        root.children(self.tree.iter().map(|n| self.render_node(n, &mut counter)))
    }

    fn handle_key(&mut self, key: Key, _env: &mut Env<'_>) -> Result<bool, UiError> {
        match key {
            Key::Char('e') => self.expand_all()?,
            Key::Char('c') => self.collapse_all()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn handle_toggle(&mut self, target: &str) -> Result<bool, UiError> {
        Ok(self.toggle(target)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prefs::MemoryPreferences;
    use crate::ui::component::enter;

    fn node(name: &str, children: Vec<DependencyNode>) -> DependencyNode {
        DependencyNode {
            name: name.to_string(),
            version: "1.0".to_string(),
            dev: false,
            repeated: false,
            unresolved: false,
            children,
        }
    }

    fn entered_tree(expanded: bool) -> TreeView {
        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        let tree = vec![node("a", vec![node("b", vec![node("c", vec![])])]), node("d", vec![])];
        let mut view = TreeView::new(tree, expanded);
        enter(&mut view, &mut env).unwrap();
        view
    }

    fn expanded_states(view: &TreeView) -> Vec<Option<String>> {
        view.base()
            .element()
            .unwrap()
            .find_all(&|e| e.has_class(ITEM_CLASS))
            .into_iter()
            .map(|e| e.get_attr("aria-expanded").map(str::to_string))
            .collect()
    }

    #[test]
    fn test_only_parents_are_expandable() {
        let view = entered_tree(false);
        assert_eq!(
            expanded_states(&view),
            [
                Some("false".to_string()),
                Some("false".to_string()),
                None,
                None
            ]
        );
    }

    #[test]
    fn test_expand_all_twice_equals_once() {
        let mut view = entered_tree(false);
        view.expand_all().unwrap();
        let once = view.base().element().unwrap().clone();
        view.expand_all().unwrap();
        assert_eq!(view.base().element().unwrap(), &once);
        assert!(expanded_states(&view).iter().flatten().all(|s| s == "true"));
    }

    #[test]
    fn test_collapse_all_is_idempotent_and_updates_decorations() {
        let mut view = entered_tree(true);
        view.collapse_all().unwrap();
        let once = view.base().element().unwrap().clone();
        view.collapse_all().unwrap();
        let el = view.base().element().unwrap();
        assert_eq!(el, &once);
        assert!(el.find_by_class(CHEVRON_EXPANDED_CLASS).is_none());
        assert!(el.find_by_class(CHILDREN_EXPANDED_CLASS).is_none());
        let button = el.find_by_class(BUTTON_CLASS).unwrap();
        assert_eq!(button.get_attr("aria-label"), Some("Expand"));
    }

    #[test]
    fn test_toggle_flips_single_item() {
        let mut view = entered_tree(false);
        let first_id = view
            .base()
            .element()
            .unwrap()
            .find(&is_expandable)
            .and_then(|e| e.id.clone())
            .unwrap();
        assert_eq!(view.toggle(&first_id).unwrap(), Some(true));
        assert_eq!(
            expanded_states(&view)[..2],
            [Some("true".to_string()), Some("false".to_string())]
        );
        assert_eq!(view.toggle(&first_id).unwrap(), Some(false));
        assert_eq!(view.toggle("nope").unwrap(), None);
    }

    #[test]
    fn test_button_names_its_item_and_keys_propagate() {
        let mut view = entered_tree(false);
        let target = view
            .base()
            .element()
            .unwrap()
            .find_by_class(BUTTON_CLASS)
            .and_then(|b| b.get_attr(TOGGLE_ATTR))
            .unwrap()
            .to_string();
        assert!(view.handle_toggle(&target).unwrap());
        assert_eq!(expanded_states(&view)[0], Some("true".to_string()));
        assert!(!view.handle_toggle("elsewhere").unwrap());

        let mut prefs = MemoryPreferences::new();
        let mut doc = Element::new("html");
        let mut env = Env::new(&mut prefs, &mut doc, None);
        assert!(view.handle_key(Key::Char('c'), &mut env).unwrap());
        assert!(!view.handle_key(Key::Char('z'), &mut env).unwrap());

        let mut unrendered = TreeView::new(vec![], false);
        assert!(unrendered.handle_key(Key::Char('e'), &mut env).is_err());
    }

    #[test]
    fn test_labels_link_to_module_versions() {
        let view = entered_tree(false);
        let link = view
            .base()
            .element()
            .unwrap()
            .find(&|e| e.get_attr("data-route").is_some())
            .unwrap();
        assert_eq!(link.get_attr("data-route"), Some("modules/a/1.0"));
    }
}
