//! # Registry Data
//!
//! Message types for the two payloads the browser consumes:
//!
//! ```text
//! Registry
//! └── modules: Vec<Module>
//!     ├── metadata: Metadata ── maintainers: Vec<Maintainer>
//!     ├── repository_metadata: RepositoryMetadata
//!     └── versions: Vec<ModuleVersion>        (newest first)
//!         ├── deps: Vec<ModuleDependency>
//!         └── source: ModuleSource ── documentation: ModuleVersionSymbols
//!
//! ModuleRegistrySymbols
//! └── module_version: Vec<ModuleVersionSymbols>
//!     └── files: Vec<FileSymbols> ── symbols: Vec<Symbol>
//! ```
//!
//! The wire format is protobuf; the types carry `prost` derives so the
//! decoder is generated for us. `serde::Serialize` is derived as well for
//! the JSON side of the API.
//!
//! Records are immutable once decoded. The only mutations are the two
//! load-time passes: [`payload::setup_registry`] and
//! [`symbols::decorate_registry_with_symbols`].

pub mod lookup;
pub mod payload;
pub mod symbols;

use serde::Serialize;

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct Registry {
    #[prost(string, tag = "1")]
    pub registry_url: String,
    #[prost(string, tag = "2")]
    pub commit_sha: String,
    /// RFC 3339 timestamp of the registry commit this snapshot was built from.
    #[prost(string, tag = "3")]
    pub commit_date: String,
    #[prost(message, repeated, tag = "4")]
    pub modules: Vec<Module>,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct Module {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub metadata: Option<Metadata>,
    /// Newest first. The first entry is the "latest" version.
    #[prost(message, repeated, tag = "3")]
    pub versions: Vec<ModuleVersion>,
    #[prost(message, optional, tag = "4")]
    pub repository_metadata: Option<RepositoryMetadata>,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct Metadata {
    #[prost(string, tag = "1")]
    pub homepage: String,
    #[prost(message, repeated, tag = "2")]
    pub maintainers: Vec<Maintainer>,
    #[prost(string, repeated, tag = "3")]
    pub repository: Vec<String>,
    #[prost(string, repeated, tag = "4")]
    pub versions: Vec<String>,
    #[prost(string, repeated, tag = "5")]
    pub yanked_versions: Vec<String>,
    #[prost(string, tag = "6")]
    pub deprecated: String,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct Maintainer {
    #[prost(string, tag = "1")]
    pub email: String,
    #[prost(string, tag = "2")]
    pub github: String,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(int64, tag = "4")]
    pub github_user_id: i64,
    #[prost(bool, tag = "5")]
    pub do_not_notify: bool,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct RepositoryMetadata {
    #[prost(string, tag = "1")]
    pub organization: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(int32, tag = "4")]
    pub stargazers: i32,
    #[prost(string, repeated, tag = "5")]
    pub languages: Vec<String>,
    #[prost(string, tag = "6")]
    pub homepage_url: String,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct ModuleVersion {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub version: String,
    #[prost(int32, tag = "3")]
    pub compatibility_level: i32,
    #[prost(string, tag = "4")]
    pub repo_name: String,
    #[prost(message, repeated, tag = "5")]
    pub deps: Vec<ModuleDependency>,
    #[prost(message, optional, tag = "6")]
    pub source: Option<ModuleSource>,
    /// Copied down from the owning [`Module`] at load time.
    #[prost(message, optional, tag = "7")]
    pub repository_metadata: Option<RepositoryMetadata>,
    #[prost(message, optional, tag = "8")]
    pub commit: Option<ModuleCommit>,
}

impl ModuleVersion {
    /// The `name@version` key used to join symbols onto versions.
    pub fn key(&self) -> String {
        module_key(&self.name, &self.version)
    }

    pub fn documentation(&self) -> Option<&ModuleVersionSymbols> {
        self.source.as_ref().and_then(|s| s.documentation.as_ref())
    }
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct ModuleDependency {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub version: String,
    #[prost(bool, tag = "3")]
    pub dev: bool,
    #[prost(string, tag = "4")]
    pub repo_name: String,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct ModuleSource {
    #[prost(string, tag = "1")]
    pub url: String,
    #[prost(string, tag = "2")]
    pub integrity: String,
    #[prost(string, tag = "3")]
    pub strip_prefix: String,
    #[prost(message, optional, tag = "4")]
    pub documentation: Option<ModuleVersionSymbols>,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct ModuleCommit {
    #[prost(string, tag = "1")]
    pub sha: String,
    #[prost(string, tag = "2")]
    pub date: String,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct ModuleRegistrySymbols {
    #[prost(message, repeated, tag = "1")]
    pub module_version: Vec<ModuleVersionSymbols>,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct ModuleVersionSymbols {
    #[prost(string, tag = "1")]
    pub module_name: String,
    #[prost(string, tag = "2")]
    pub version: String,
    #[prost(message, repeated, tag = "3")]
    pub files: Vec<FileSymbols>,
}

impl ModuleVersionSymbols {
    pub fn key(&self) -> String {
        module_key(&self.module_name, &self.version)
    }
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct FileSymbols {
    /// Bazel label of the `.bzl` file, e.g. `@rules_foo//foo:defs.bzl`.
    #[prost(string, tag = "1")]
    pub label: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(message, repeated, tag = "3")]
    pub symbols: Vec<Symbol>,
}

#[derive(Clone, PartialEq, Serialize, ::prost::Message)]
pub struct Symbol {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(enumeration = "SymbolKind", tag = "2")]
    pub kind: i32,
    #[prost(string, tag = "3")]
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ::prost::Enumeration)]
#[repr(i32)]
pub enum SymbolKind {
    Unspecified = 0,
    Rule = 1,
    Function = 2,
    Provider = 3,
    Macro = 4,
    ModuleExtension = 5,
    RepositoryRule = 6,
}

impl SymbolKind {
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Unspecified => "symbol",
            SymbolKind::Rule => "rule",
            SymbolKind::Function => "function",
            SymbolKind::Provider => "provider",
            SymbolKind::Macro => "macro",
            SymbolKind::ModuleExtension => "module extension",
            SymbolKind::RepositoryRule => "repository rule",
        }
    }
}

/// Joins a module name and version into the composite `name@version` key.
pub fn module_key(name: &str, version: &str) -> String {
    format!("{name}@{version}")
}
