//! Element builders shared by the concrete tabs.

use chrono::Utc;

use crate::registry::{ModuleVersion, module_key};
use crate::ui::dom::Element;

use super::format::{relative_past, short_date};

/// Route to a module version page.
pub fn module_version_route(name: &str, version: &str) -> String {
    format!("modules/{name}/{version}")
}

/// A `<ul>` of module versions linking to their pages.
pub fn module_version_list(versions: &[&ModuleVersion]) -> Element {
    let now = Utc::now();
    let items = versions.iter().map(|mv| {
        let mut row = Element::new("li").class("module-version").child(Element::route_link(
            module_key(&mv.name, &mv.version),
            module_version_route(&mv.name, &mv.version),
        ));
        if let Some(md) = &mv.repository_metadata
            && !md.description.is_empty()
        {
            row.append(Element::new("span").class("description").text(md.description.clone()));
        }
        if let Some(commit) = &mv.commit
            && !commit.date.is_empty()
        {
            row.append(
                Element::new("time")
                    .attr("datetime", commit.date.clone())
                    .attr("title", short_date(&commit.date))
                    .text(relative_past(&commit.date, now)),
            );
        }
        row
    });
    Element::new("ul").class("module-version-list").children(items)
}

/// A `<dl>`-style key/value row, skipped by callers when `value` is empty.
pub fn field(label: &str, value: impl Into<String>) -> Element {
    Element::new("div")
        .class("field")
        .child(Element::new("dt").text(label))
        .child(Element::new("dd").text(value))
}

/// A copy-to-clipboard button carrying `text` in `data-clippy`.
pub fn clippy(text: impl Into<String>) -> Element {
    let text = text.into();
    Element::new("button")
        .class("clippy")
        .attr("data-clippy", text.clone())
        .attr("aria-label", "Copy")
        .child(Element::new("code").text(text))
}

/// Standard container for a select: heading, optional menu, content node.
pub fn select_shell(class: &str, heading: impl Into<String>) -> Element {
    Element::new("section")
        .class(class)
        .child(Element::new("h2").text(heading))
        .child(Element::new("div").class("content"))
}

/// Same as [`select_shell`] with a navigation menu above the content.
pub fn tab_shell(class: &str, heading: impl Into<String>) -> Element {
    Element::new("section")
        .class(class)
        .child(Element::new("h2").text(heading))
        .child(Element::new("nav").class("menu"))
        .child(Element::new("div").class("content"))
}
