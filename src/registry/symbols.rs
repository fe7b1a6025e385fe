//! # Symbol Enrichment
//!
//! Documentation symbols are too large to embed in the page, so they are
//! fetched separately from `<base_url>/symbols.pb.gz` after startup and
//! joined onto the registry by `name@version`.
//!
//! Failure here is never fatal: any error (HTTP status, network, gunzip,
//! decode) is logged and the undecorated registry is returned instead.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use prost::Message;

use super::payload::gzip_decode;
use super::{ModuleRegistrySymbols, Registry};

pub const SYMBOLS_PATH: &str = "/symbols.pb.gz";

#[derive(Debug)]
pub enum SymbolsError {
    /// Network-level failure (DNS, connection refused, body read).
    Network(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The body was not a gzip'd `ModuleRegistrySymbols`.
    Decode(String),
}

impl fmt::Display for SymbolsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolsError::Network(msg) => write!(f, "network error: {msg}"),
            SymbolsError::Status(status) => {
                write!(f, "failed to fetch symbols.pb.gz: HTTP {status}")
            }
            SymbolsError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for SymbolsError {}

/// Where the symbols payload comes from.
#[async_trait]
pub trait SymbolsSource: Send + Sync {
    /// Fetch and decode the symbols payload.
    async fn fetch_symbols(&self) -> Result<ModuleRegistrySymbols, SymbolsError>;
}

/// Fetches `symbols.pb.gz` over HTTP.
pub struct HttpSymbolsSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSymbolsSource {
    /// `base_url` is the site root; [`SYMBOLS_PATH`] is appended.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}{}", base_url.trim_end_matches('/'), SYMBOLS_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SymbolsSource for HttpSymbolsSource {
    async fn fetch_symbols(&self) -> Result<ModuleRegistrySymbols, SymbolsError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SymbolsError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SymbolsError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SymbolsError::Network(e.to_string()))?;
        let decompressed = gzip_decode(&body).map_err(|e| SymbolsError::Decode(e.to_string()))?;
        ModuleRegistrySymbols::decode(decompressed.as_slice())
            .map_err(|e| SymbolsError::Decode(e.to_string()))
    }
}

/// Attach each symbols entry to the matching module version.
///
/// A version that already carries documentation keeps it. Returns the
/// number of versions decorated.
pub fn decorate_registry_with_symbols(
    registry: &mut Registry,
    symbols: ModuleRegistrySymbols,
) -> usize {
    let mut by_key: HashMap<String, (usize, usize)> = HashMap::new();
    for (mi, module) in registry.modules.iter().enumerate() {
        for (vi, mv) in module.versions.iter().enumerate() {
            by_key.insert(mv.key(), (mi, vi));
        }
    }

    let mut decorated = 0;
    for docs in symbols.module_version {
        let Some(&(mi, vi)) = by_key.get(&docs.key()) else {
            continue;
        };
        let mv = &mut registry.modules[mi].versions[vi];
        if let Some(source) = mv.source.as_mut()
            && source.documentation.is_none()
        {
            source.documentation = Some(docs);
            decorated += 1;
        }
    }
    decorated
}

/// Produce the symbol-decorated registry, falling back to `registry`
/// unchanged if anything goes wrong.
pub async fn load_registry_with_symbols(
    registry: Arc<Registry>,
    source: &dyn SymbolsSource,
) -> Arc<Registry> {
    match source.fetch_symbols().await {
        Ok(symbols) => {
            let mut enriched = (*registry).clone();
            let count = decorate_registry_with_symbols(&mut enriched, symbols);
            info!("Decorated {} module versions with symbols", count);
            Arc::new(enriched)
        }
        Err(e) => {
            warn!("Failed to load symbols: {}", e);
            registry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FileSymbols, ModuleVersionSymbols};
    use crate::test_support::sample_registry;

    fn docs_for(name: &str, version: &str) -> ModuleVersionSymbols {
        ModuleVersionSymbols {
            module_name: name.to_string(),
            version: version.to_string(),
            files: vec![FileSymbols {
                label: format!("@{name}//:defs.bzl"),
                ..Default::default()
            }],
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SymbolsSource for FailingSource {
        async fn fetch_symbols(&self) -> Result<ModuleRegistrySymbols, SymbolsError> {
            Err(SymbolsError::Status(404))
        }
    }

    struct FixedSource(ModuleRegistrySymbols);

    #[async_trait]
    impl SymbolsSource for FixedSource {
        async fn fetch_symbols(&self) -> Result<ModuleRegistrySymbols, SymbolsError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_decorate_matches_on_name_at_version() {
        let mut registry = sample_registry();
        let symbols = ModuleRegistrySymbols {
            module_version: vec![docs_for("foo", "1.0"), docs_for("nope", "9.9")],
        };
        let count = decorate_registry_with_symbols(&mut registry, symbols);
        assert_eq!(count, 1);
        assert!(registry.modules[0].versions[1].documentation().is_some());
        assert!(registry.modules[0].versions[0].documentation().is_none());
    }

    #[test]
    fn test_decorate_keeps_existing_documentation() {
        let mut registry = sample_registry();
        let original = docs_for("foo", "2.0");
        registry.modules[0].versions[0]
            .source
            .as_mut()
            .unwrap()
            .documentation = Some(original.clone());
        let mut replacement = docs_for("foo", "2.0");
        replacement.files.clear();
        let count = decorate_registry_with_symbols(
            &mut registry,
            ModuleRegistrySymbols {
                module_version: vec![replacement],
            },
        );
        assert_eq!(count, 0);
        assert_eq!(registry.modules[0].versions[0].documentation(), Some(&original));
    }

    #[test]
    fn test_failed_fetch_returns_original_registry() {
        let registry = Arc::new(sample_registry());
        let result = tokio_test::block_on(load_registry_with_symbols(
            registry.clone(),
            &FailingSource,
        ));
        assert!(Arc::ptr_eq(&registry, &result));
    }

    #[tokio::test]
    async fn test_successful_fetch_returns_decorated_copy() {
        let registry = Arc::new(sample_registry());
        let source = FixedSource(ModuleRegistrySymbols {
            module_version: vec![docs_for("foo", "2.0")],
        });
        let result = load_registry_with_symbols(registry.clone(), &source).await;
        assert!(!Arc::ptr_eq(&registry, &result));
        assert!(result.modules[0].versions[0].documentation().is_some());
        assert!(registry.modules[0].versions[0].documentation().is_none());
    }

    #[test]
    fn test_http_source_appends_symbols_path() {
        let source = HttpSymbolsSource::new("https://bcr.example.com/");
        assert_eq!(source.url(), "https://bcr.example.com/symbols.pb.gz");
    }
}
