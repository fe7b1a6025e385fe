//! End-to-end navigation through the public `App` surface.

mod common;

use bcr::core::prefs::{COLOR_MODE, DISPLAY_MODE};
use bcr::ui::component::Key;

#[test]
fn test_module_resolves_to_latest_overview() {
    let mut app = common::app();
    app.start("modules/rules_cc").unwrap();
    assert_eq!(app.location(), "modules/rules_cc/0.2.0/overview");
    let page = app.render().unwrap();
    assert!(page.text_content().contains("rules_cc"));
}

#[test]
fn test_older_version_keeps_its_segment() {
    let mut app = common::app();
    app.start("modules/rules_cc/0.1.0").unwrap();
    assert_eq!(app.location(), "modules/rules_cc/0.1.0/overview");
}

#[test]
fn test_maintainer_by_handle() {
    let mut app = common::app();
    app.start("maintainers/@octocat").unwrap();
    assert_eq!(app.location(), "maintainers/@octocat");
    assert!(app.render().unwrap().text_content().contains("rules_cc"));
}

#[test]
fn test_unknown_module_is_reported() {
    let mut app = common::app();
    app.start("modules/nonexistent").unwrap();
    let nf = app.not_found().unwrap();
    assert_eq!(nf.unmatched, "nonexistent");
    assert!(app.render().unwrap().find_by_class("not-found").is_some());

    app.navigate("modules/zlib").unwrap();
    assert!(app.not_found().is_none());
    assert_eq!(app.location(), "modules/zlib/1.3/overview");
}

#[test]
fn test_history_walks_both_ways() {
    let mut app = common::app();
    app.start("").unwrap();
    app.navigate("modules/zlib").unwrap();
    app.navigate("settings").unwrap();
    assert!(app.back().unwrap());
    assert_eq!(app.location(), "modules/zlib/1.3/overview");
    assert!(app.back().unwrap());
    assert!(!app.back().unwrap());
    assert!(app.forward().unwrap());
    assert_eq!(app.location(), "modules/zlib/1.3/overview");
}

#[test]
fn test_settings_seed_and_cycle_preferences() {
    let mut app = common::app();
    app.start("settings").unwrap();
    assert_eq!(app.location(), "settings/appearance");
    assert_eq!(app.prefs().get(COLOR_MODE).as_deref(), Some("auto"));
    assert_eq!(app.prefs().get(DISPLAY_MODE).as_deref(), Some("consumer"));

    assert!(app.handle_key(Key::Char('d')).unwrap());
    assert_eq!(app.prefs().get(DISPLAY_MODE).as_deref(), Some("maintainer"));
    assert_eq!(app.document().get_attr("data-display-mode"), Some("maintainer"));
}

#[test]
fn test_search_jumps_to_module() {
    let mut app = common::app();
    app.start("").unwrap();
    assert!(app.handle_key(Key::Char('/')).unwrap());
    for c in "zli".chars() {
        app.handle_key(Key::Char(c)).unwrap();
    }
    assert_eq!(app.search_results()[0].route, "modules/zlib");
    app.handle_key(Key::Enter).unwrap();
    assert_eq!(app.location(), "modules/zlib/1.3/overview");
}
