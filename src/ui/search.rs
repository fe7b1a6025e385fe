//! # Search
//!
//! Components contribute [`SearchProvider`]s; the app folds the providers
//! along the active component chain (plus the global module provider) into
//! a [`SearchIndex`] whenever a dispatch settles.
//!
//! ```text
//!   body ─▶ modules ─▶ foo ─▶ 2.0        active chain
//!    │                         │
//!    └── providers ────────────┘  +  modules (always)
//!                  │
//!                  ▼
//!   SearchIndex { "foo" → [modules/foo], "rules_go" → [...] }
//! ```

use std::collections::BTreeMap;

/// A navigable search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    pub label: String,
    /// In-app path, without the leading `#/`.
    pub route: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchProvider {
    name: String,
    targets: Vec<SearchTarget>,
}

impl SearchProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            targets: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, label: impl Into<String>, route: impl Into<String>, description: impl Into<String>) {
        self.targets.push(SearchTarget {
            label: label.into(),
            route: route.into(),
            description: description.into(),
        });
    }

    pub fn targets(&self) -> &[SearchTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Term → targets, keyed by lowercased label.
#[derive(Debug, Default)]
pub struct SearchIndex {
    terms: BTreeMap<String, Vec<SearchTarget>>,
    providers: Vec<String>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the index contents with the targets of `providers`.
    pub fn rebuild(&mut self, providers: impl IntoIterator<Item = SearchProvider>) {
        self.terms.clear();
        self.providers.clear();
        for provider in providers {
            self.add_provider(provider);
        }
    }

    pub fn add_provider(&mut self, provider: SearchProvider) {
        self.providers.push(provider.name);
        for target in provider.targets {
            let entry = self.terms.entry(target.label.to_lowercase()).or_default();
            if !entry.iter().any(|t| t.route == target.route) {
                entry.push(target);
            }
        }
    }

    /// Names of the providers folded into the index, in order.
    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Case-insensitive substring match over terms. Exact matches rank
    /// first, then prefix matches, then the rest; ties keep term order.
    pub fn query(&self, q: &str, limit: usize) -> Vec<&SearchTarget> {
        let q = q.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<(u8, &SearchTarget)> = self
            .terms
            .iter()
            .filter_map(|(term, targets)| {
                let rank = if *term == q {
                    0
                } else if term.starts_with(&q) {
                    1
                } else if term.contains(&q) {
                    2
                } else {
                    return None;
                };
                Some(targets.iter().map(move |t| (rank, t)))
            })
            .flatten()
            .collect();
        hits.sort_by_key(|(rank, _)| *rank);
        hits.into_iter().map(|(_, t)| t).take(limit).collect()
    }
}
