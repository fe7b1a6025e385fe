//! Fixtures shared by the integration tests.

use std::io::Write;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::GzEncoder;
use prost::Message;

use bcr::app::App;
use bcr::core::prefs::MemoryPreferences;
use bcr::registry::payload::decode_registry;
use bcr::registry::{
    FileSymbols, Maintainer, Metadata, Module, ModuleCommit, ModuleRegistrySymbols, ModuleSource,
    ModuleVersion, ModuleVersionSymbols, Registry, Symbol, SymbolKind,
};

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn version(name: &str, version: &str, date: &str) -> ModuleVersion {
    ModuleVersion {
        name: name.to_string(),
        version: version.to_string(),
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

fn module(name: &str, versions: Vec<ModuleVersion>, maintainer: Maintainer) -> Module {
    Module {
        name: name.to_string(),
        metadata: Some(Metadata {
            maintainers: vec![maintainer],
            versions: versions.iter().rev().map(|v| v.version.clone()).collect(),
            ..Default::default()
        }),
        versions,
        repository_metadata: None,
    }
}

/// `rules_cc` 0.2.0 / 0.1.0 maintained by @octocat, `zlib` 1.3 by email only.
/// The registry goes through the same base64 + gzip + protobuf envelope
/// the binary reads from disk.
pub fn registry() -> Arc<Registry> {
    let registry = Registry {
        registry_url: "https://bcr.example.com".to_string(),
        commit_sha: "deadbeef".to_string(),
        commit_date: "2026-09-30T00:00:00Z".to_string(),
        modules: vec![
            module(
                "rules_cc",
                vec![
                    version("rules_cc", "0.2.0", "2026-09-01T00:00:00Z"),
                    version("rules_cc", "0.1.0", "2026-01-01T00:00:00Z"),
                ],
                Maintainer {
                    github: "octocat".to_string(),
                    email: "cat@example.com".to_string(),
                    ..Default::default()
                },
            ),
            module(
                "zlib",
                vec![version("zlib", "1.3", "2025-05-05T00:00:00Z")],
                Maintainer {
                    email: "zlib@example.com".to_string(),
                    ..Default::default()
                },
            ),
        ],
    };
    let payload = STANDARD.encode(gzip(&registry.encode_to_vec()));
    Arc::new(decode_registry(&payload).unwrap())
}

pub fn symbols() -> ModuleRegistrySymbols {
    ModuleRegistrySymbols {
        module_version: vec![ModuleVersionSymbols {
            module_name: "rules_cc".to_string(),
            version: "0.2.0".to_string(),
            files: vec![FileSymbols {
                label: "@rules_cc//cc:defs.bzl".to_string(),
                description: String::new(),
                symbols: vec![Symbol {
                    name: "cc_library".to_string(),
                    kind: SymbolKind::Rule as i32,
                    description: "Builds a C++ library.".to_string(),
                }],
            }],
        }],
    }
}

pub fn app() -> App {
    App::new(registry(), Box::new(MemoryPreferences::new()))
}
