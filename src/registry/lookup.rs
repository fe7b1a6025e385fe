//! Read-only indexes over a [`Registry`] used by the views.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::{Maintainer, Module, ModuleVersion, Registry, module_key};

pub fn find_module<'a>(registry: &'a Registry, name: &str) -> Option<&'a Module> {
    registry.modules.iter().find(|m| m.name == name)
}

pub fn find_module_version<'a>(
    registry: &'a Registry,
    name: &str,
    version: &str,
) -> Option<&'a ModuleVersion> {
    find_module(registry, name)?
        .versions
        .iter()
        .find(|mv| mv.version == version)
}

/// Versions are stored newest first.
pub fn latest_version(module: &Module) -> Option<&ModuleVersion> {
    module.versions.first()
}

pub fn latest_module_versions(registry: &Registry) -> Vec<&ModuleVersion> {
    registry.modules.iter().filter_map(latest_version).collect()
}

/// All versions ordered by commit date, most recent first.
pub fn recent_module_versions(registry: &Registry, limit: usize) -> Vec<&ModuleVersion> {
    let mut versions: Vec<&ModuleVersion> = registry
        .modules
        .iter()
        .flat_map(|m| m.versions.iter())
        .collect();
    versions.sort_by(|a, b| commit_date(b).cmp(commit_date(a)));
    versions.truncate(limit);
    versions
}

fn commit_date(mv: &ModuleVersion) -> &str {
    mv.commit.as_ref().map(|c| c.date.as_str()).unwrap_or("")
}

/// Lookup key for a maintainer: `@<github>` when a handle is present,
/// otherwise the raw email.
pub fn maintainer_key(maintainer: &Maintainer) -> Option<String> {
    if !maintainer.github.is_empty() {
        Some(format!("@{}", maintainer.github))
    } else if !maintainer.email.is_empty() {
        Some(maintainer.email.clone())
    } else {
        None
    }
}

/// Every maintainer in the registry keyed by [`maintainer_key`].
///
/// When two modules list a maintainer under the same key the later record
/// replaces the earlier one (the key keeps its first position).
pub fn maintainers_map(registry: &Registry) -> IndexMap<String, Maintainer> {
    let mut result = IndexMap::new();
    for module in &registry.modules {
        let Some(metadata) = &module.metadata else {
            continue;
        };
        for maintainer in &metadata.maintainers {
            if let Some(key) = maintainer_key(maintainer) {
                result.insert(key, maintainer.clone());
            }
        }
    }
    result
}

/// Latest versions of every module the maintainer is listed on.
pub fn maintainer_module_versions<'a>(
    registry: &'a Registry,
    maintainer: &Maintainer,
) -> Vec<&'a ModuleVersion> {
    let same = |m: &Maintainer| {
        (!maintainer.github.is_empty() && maintainer.github == m.github)
            || (!maintainer.email.is_empty() && maintainer.email == m.email)
    };
    registry
        .modules
        .iter()
        .filter(|module| {
            module
                .metadata
                .as_ref()
                .is_some_and(|md| md.maintainers.iter().any(same))
        })
        .filter_map(latest_version)
        .collect()
}

/// One node of a module version's transitive dependency tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyNode {
    pub name: String,
    pub version: String,
    pub dev: bool,
    /// Already expanded elsewhere in this tree; children omitted.
    pub repeated: bool,
    /// Not present in the registry.
    pub unresolved: bool,
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    pub fn key(&self) -> String {
        module_key(&self.name, &self.version)
    }
}

/// Build the dependency tree rooted at `root`.
///
/// Each `name@version` is expanded once; later occurrences are marked
/// `repeated`, which also terminates cycles. Dev dependencies are only
/// followed at the root.
pub fn dependency_tree(registry: &Registry, root: &ModuleVersion) -> Vec<DependencyNode> {
    let mut seen = HashSet::new();
    seen.insert(root.key());
    expand(registry, root, true, &mut seen)
}

fn expand(
    registry: &Registry,
    mv: &ModuleVersion,
    include_dev: bool,
    seen: &mut HashSet<String>,
) -> Vec<DependencyNode> {
    mv.deps
        .iter()
        .filter(|d| include_dev || !d.dev)
        .map(|dep| {
            let key = module_key(&dep.name, &dep.version);
            let resolved = find_module_version(registry, &dep.name, &dep.version);
            let repeated = !seen.insert(key);
            let children = match resolved {
                Some(child) if !repeated => expand(registry, child, false, seen),
                _ => Vec::new(),
            };
            DependencyNode {
                name: dep.name.clone(),
                version: dep.version.clone(),
                dev: dep.dev,
                repeated,
                unresolved: resolved.is_none(),
                children,
            }
        })
        .collect()
}
