//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::GzEncoder;
use prost::Message;

use crate::registry::{
    Maintainer, Metadata, Module, ModuleCommit, ModuleDependency, ModuleSource, ModuleVersion,
    Registry, RepositoryMetadata,
};
use crate::ui::component::{Component, ComponentBase, Env, UiError};
use crate::ui::dom::Element;
use crate::ui::route::{Route, RouteEvent};
use crate::ui::select::Select;
use crate::ui::tab_base::TabBase;

// ============================================================================
// Registry fixtures
// ============================================================================

pub fn maintainer(github: &str, email: &str) -> Maintainer {
    Maintainer {
        github: github.to_string(),
        email: email.to_string(),
        ..Default::default()
    }
}

fn version(name: &str, version: &str, date: &str, deps: Vec<ModuleDependency>) -> ModuleVersion {
    ModuleVersion {
        name: name.to_string(),
        version: version.to_string(),
        deps,
        source: Some(ModuleSource {
            url: format!("https://example.com/{name}-{version}.tar.gz"),
            ..Default::default()
        }),
        commit: Some(ModuleCommit {
            sha: format!("{name}{version}"),
            date: date.to_string(),
            message: format!("Publish {name}@{version}"),
        }),
        ..Default::default()
    }
}

fn dep(name: &str, version: &str, dev: bool) -> ModuleDependency {
    ModuleDependency {
        name: name.to_string(),
        version: version.to_string(),
        dev,
        ..Default::default()
    }
}

/// Two modules:
///
/// - `foo` 2.0 (deps bar@1.0, dev baz@0.1) and 1.0, maintained by
///   @octocat / cat@example.com
/// - `bar` 1.0, maintained by bar@example.com (no github handle)
pub fn sample_registry() -> Registry {
    let foo = Module {
        name: "foo".to_string(),
        metadata: Some(Metadata {
            homepage: "https://foo.example.com".to_string(),
            maintainers: vec![Maintainer {
                name: "Octo Cat".to_string(),
                ..maintainer("octocat", "cat@example.com")
            }],
            versions: vec!["1.0".to_string(), "2.0".to_string()],
            ..Default::default()
        }),
        versions: vec![
            version(
                "foo",
                "2.0",
                "2026-03-01T12:00:00Z",
                vec![dep("bar", "1.0", false), dep("baz", "0.1", true)],
            ),
            version("foo", "1.0", "2025-01-15T12:00:00Z", vec![]),
        ],
        repository_metadata: Some(RepositoryMetadata {
            organization: "example".to_string(),
            name: "foo".to_string(),
            description: "The foo module".to_string(),
            stargazers: 42,
            ..Default::default()
        }),
    };
    let bar = Module {
        name: "bar".to_string(),
        metadata: Some(Metadata {
            maintainers: vec![maintainer("", "bar@example.com")],
            versions: vec!["1.0".to_string()],
            ..Default::default()
        }),
        versions: vec![version("bar", "1.0", "2025-06-10T08:30:00Z", vec![])],
        repository_metadata: Some(RepositoryMetadata {
            organization: "example".to_string(),
            name: "bar".to_string(),
            description: "Bar utilities".to_string(),
            ..Default::default()
        }),
    };
    Registry {
        registry_url: "https://bcr.example.com".to_string(),
        commit_sha: "abc123".to_string(),
        commit_date: "2026-03-02T00:00:00Z".to_string(),
        modules: vec![foo, bar],
    }
}

/// `base64(gzip(protobuf))`, the embedded payload envelope.
pub fn encode_payload(registry: &Registry) -> String {
    STANDARD.encode(gzip(&registry.encode_to_vec()))
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

// ============================================================================
// Component fixtures
// ============================================================================

/// A terminal component that counts its lifecycle hooks.
pub struct Leaf {
    base: ComponentBase,
    name: String,
    entered: usize,
    exited: usize,
}

impl Leaf {
    pub fn new(name: &str) -> Self {
        Self {
            base: ComponentBase::new(),
            name: name.to_string(),
            entered: 0,
            exited: 0,
        }
    }

    pub fn entered_count(&self) -> usize {
        self.entered
    }

    pub fn exited_count(&self) -> usize {
        self.exited
    }
}

impl Component for Leaf {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        Element::new("div").class("leaf").text(self.name.clone())
    }

    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        self.entered += 1;
        Ok(())
    }

    fn exit_document(&mut self) {
        self.exited += 1;
    }
}

/// A plain select of leaves; the first name is the default.
pub struct Nested {
    base: ComponentBase,
    select: Select,
}

impl Nested {
    pub fn new(names: &[&str]) -> Self {
        let base = ComponentBase::new();
        let mut select = Select::new(base.id()).with_default(names[0]);
        for name in names {
            select.add_tab(name, Box::new(Leaf::new(name)));
        }
        Self { base, select }
    }
}

impl Component for Nested {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        Element::new("div").child(Element::new("div").class("content"))
    }

    fn tabs(&self) -> Option<&Select> {
        Some(&self.select)
    }

    fn tabs_mut(&mut self) -> Option<&mut Select> {
        Some(&mut self.select)
    }
}

/// A tab base of leaves added on enter; the first name is the default.
pub struct Tabbed {
    base: ComponentBase,
    nav: TabBase,
    names: Vec<String>,
}

impl Tabbed {
    pub fn new(names: &[&str]) -> Self {
        let base = ComponentBase::new();
        let nav = TabBase::new(Select::new(base.id()).with_default(names[0]));
        Self {
            base,
            nav,
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn nav(&self) -> &TabBase {
        &self.nav
    }

    pub fn nav_mut(&mut self) -> &mut TabBase {
        &mut self.nav
    }
}

impl Component for Tabbed {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn create_dom(&self) -> Element {
        Element::new("div")
            .child(Element::new("nav").class("menu"))
            .child(Element::new("div").class("content"))
    }

    fn enter_document(&mut self, _env: &mut Env<'_>) -> Result<(), UiError> {
        for name in &self.names {
            self.nav
                .add_tab(&mut self.base, name, Box::new(Leaf::new(name)))?;
        }
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
