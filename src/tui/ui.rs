//! # Element Projection
//!
//! Flattens the rendered element tree into styled terminal lines and
//! collects the activatable elements (links and copy buttons) in reading
//! order, so Tab / Enter can walk them.
//!
//! ```text
//! <section><h2>Modules</h2><ul><li><a data-route=..>foo</a></li></ul></section>
//!     │
//!     ▼
//! Modules                          (bold)
//!   • foo                          (underlined, link #0)
//! ```
//!
//! Block tags start a new line; everything else flows inline. Collapsed
//! tree-view children are not projected.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollbarVisibility};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::ui::dom::Element;
use crate::ui::tab_base::SELECTED_CLASS;
use crate::ui::treeview::{CHILDREN_CLASS, CHILDREN_COLLAPSED_CLASS, TOGGLE_ATTR};

use super::TuiState;

const BLOCK_TAGS: &[&str] = &[
    "html", "main", "section", "article", "header", "nav", "div", "form", "ul", "ol", "li", "p",
    "h1", "h2", "h3", "h4", "dl",
];

/// An activatable element and the projected line it sits on.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub element: Element,
    pub line: usize,
}

#[derive(Debug, Default)]
pub struct Projection {
    pub lines: Vec<Line<'static>>,
    pub links: Vec<Link>,
}

impl Projection {
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn is_activatable(el: &Element) -> bool {
    ["data-route", "data-clippy", TOGGLE_ATTR, "href"]
        .iter()
        .any(|name| el.get_attr(name).is_some())
}

/// Project `root`, highlighting link number `selected`.
pub fn project(root: &Element, selected: Option<usize>) -> Projection {
    let mut walker = Walker {
        selected,
        ..Default::default()
    };
    walker.walk(root, Style::default());
    walker.flush();
    Projection {
        lines: walker.lines,
        links: walker.links,
    }
}

#[derive(Default)]
struct Walker {
    selected: Option<usize>,
    lines: Vec<Line<'static>>,
    links: Vec<Link>,
    current: Vec<Span<'static>>,
    indent: usize,
}

impl Walker {
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut spans = vec![Span::raw("  ".repeat(self.indent))];
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn walk(&mut self, el: &Element, inherited: Style) {
        if el.has_class(CHILDREN_COLLAPSED_CLASS) {
            return;
        }
        let block = BLOCK_TAGS.contains(&el.tag.as_str());
        if block {
            self.flush();
        }
        let nests = matches!(el.tag.as_str(), "ul" | "ol") || el.has_class(CHILDREN_CLASS);
        if nests {
            self.indent += 1;
        }

        let mut style = inherited.patch(tag_style(&el.tag));
        if el.has_class(SELECTED_CLASS) {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        if el.tag == "li" {
            self.current.push(Span::raw("• "));
        }

        if is_activatable(el) {
            let index = self.links.len();
            self.links.push(Link {
                element: el.clone(),
                line: self.lines.len(),
            });
            style = style.add_modifier(Modifier::UNDERLINED);
            if self.selected == Some(index) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if el.get_attr("data-clippy").is_some() {
                self.current.push(Span::styled("⧉ ", style));
            }
            if el.get_attr(TOGGLE_ATTR).is_some() {
                let marker = if el.get_attr("aria-label") == Some("Collapse") { "[-]" } else { "[+]" };
                self.current.push(Span::styled(marker, style));
                self.current.push(Span::raw(" "));
            }
        }

        match el.tag.as_str() {
            "option" => {
                let label = el.text.clone().unwrap_or_default();
                let label = if el.get_attr("selected").is_some() {
                    format!("[{label}]")
                } else {
                    label
                };
                self.current.push(Span::styled(format!("{label} "), style));
                return;
            }
            "input" => {
                let value = el.get_attr("value").unwrap_or_default();
                self.current
                    .push(Span::styled(format!("/ {value}_"), style.fg(Color::Cyan)));
            }
            _ => {}
        }

        if let Some(text) = &el.text {
            self.current.push(Span::styled(text.clone(), style));
            if !block {
                self.current.push(Span::raw(" "));
            }
        }
        for child in &el.children {
            self.walk(child, style);
        }

        if nests {
            self.flush();
            self.indent -= 1;
        }
        if block {
            self.flush();
        }
    }
}

fn tag_style(tag: &str) -> Style {
    match tag {
        "h1" | "h2" => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        "h3" | "h4" | "dt" => Style::default().add_modifier(Modifier::BOLD),
        "code" => Style::default().fg(Color::Green),
        "time" | "label" => Style::default().add_modifier(Modifier::DIM),
        _ => Style::default(),
    }
}

/// Cut `text` to at most `max` display columns, ending in `…` when cut.
pub fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    if max > 0 {
        out.push('…');
    }
    out
}

// ============================================================================
// Drawing
// ============================================================================

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, footer_area] = layout.areas(frame.area());

    let symbols = if app.symbols().is_some() { "" } else { " | loading symbols" };
    let title = if tui.status.is_empty() {
        format!("bcr  /{}{}", app.location(), symbols)
    } else {
        format!("bcr  /{}{} | {}", app.location(), symbols, tui.status)
    };
    let title = fit_width(&title, title_area.width as usize);
    frame.render_widget(
        Span::styled(title, Style::default().add_modifier(Modifier::REVERSED)),
        title_area,
    );

    let content_width = main_area.width.saturating_sub(1);
    let height = tui.projection.lines.len() as u16;
    tui.viewport_height = main_area.height;
    let mut scroll_view = ScrollView::new(Size::new(content_width, height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
    scroll_view.render_widget(
        Paragraph::new(tui.projection.lines.clone()),
        ratatui::layout::Rect::new(0, 0, content_width, height),
    );
    frame.render_stateful_widget(scroll_view, main_area, &mut tui.scroll_state);

    let help = if app.search().focused {
        "type to search · Enter go · Esc close"
    } else {
        "Tab/Shift-Tab link · Enter open · ←/→ history · / search · q quit"
    };
    frame.render_widget(
        Span::styled(help, Style::default().add_modifier(Modifier::DIM)),
        footer_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::treeview::CHILDREN_EXPANDED_CLASS;

    fn page() -> Element {
        Element::new("section")
            .child(Element::new("h2").text("Modules"))
            .child(
                Element::new("ul")
                    .child(Element::new("li").child(Element::route_link("foo", "modules/foo")))
                    .child(Element::new("li").child(Element::route_link("bar", "modules/bar"))),
            )
            .child(Element::new("button").attr("data-clippy", "copy me").text("copy me"))
    }

    #[test]
    fn test_blocks_become_lines_and_links_are_collected() {
        let projection = project(&page(), None);
        let text = projection.plain_text();
        assert_eq!(text.lines().next(), Some("Modules"));
        assert!(text.contains("• foo"));
        assert_eq!(projection.links.len(), 3);
        assert_eq!(projection.links[1].element.get_attr("data-route"), Some("modules/bar"));
        assert_eq!(projection.links[0].line, 1);
        assert_eq!(projection.links[1].line, 2);
    }

    #[test]
    fn test_selected_link_is_reversed() {
        let projection = project(&page(), Some(0));
        let link_span = projection.lines[1]
            .spans
            .iter()
            .find(|s| s.content.as_ref() == "foo")
            .unwrap();
        assert!(link_span.style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_collapsed_children_are_skipped() {
        let tree = Element::new("div")
            .child(Element::new("div").class(CHILDREN_COLLAPSED_CLASS).child(Element::new("p").text("hidden")))
            .child(Element::new("div").class(CHILDREN_EXPANDED_CLASS).child(Element::new("p").text("shown")));
        let text = project(&tree, None).plain_text();
        assert!(!text.contains("hidden"));
        assert!(text.contains("shown"));
    }

    #[test]
    fn test_tree_buttons_are_links_with_state_marker() {
        let tree = Element::new("ul").child(
            Element::new("li")
                .child(
                    Element::new("button")
                        .attr(TOGGLE_ATTR, "c1.tv1")
                        .attr("aria-label", "Expand"),
                )
                .child(Element::route_link("bar@1.0", "modules/bar/1.0")),
        );
        let projection = project(&tree, None);
        assert_eq!(projection.links.len(), 2);
        assert_eq!(projection.links[0].element.get_attr(TOGGLE_ATTR), Some("c1.tv1"));
        assert!(projection.plain_text().contains("[+] bar@1.0"));
    }

    #[test]
    fn test_fit_width_counts_display_columns() {
        assert_eq!(fit_width("bcr /home", 20), "bcr /home");
        assert_eq!(fit_width("bcr /modules/rules_go", 8), "bcr /mo…");
        assert_eq!(fit_width("⧉⧉⧉", 3), "⧉⧉⧉");
        assert_eq!(fit_width("漢字漢字", 5), "漢字…");
        assert_eq!(fit_width("abc", 0), "");
    }

    #[test]
    fn test_select_marks_chosen_option() {
        let el = Element::new("div").child(
            Element::new("select")
                .child(Element::new("option").text("auto").attr("selected", "true"))
                .child(Element::new("option").text("light")),
        );
        assert!(project(&el, None).plain_text().contains("[auto] light"));
    }
}
