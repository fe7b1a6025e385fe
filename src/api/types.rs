use serde::Serialize;

/// Row of `/api/modules` and `/api/search`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ModuleListItem {
    pub name: String,
    pub latest_version: String,
    pub description: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RegistryInfo {
    pub registry_url: String,
    pub module_count: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VersionInfo {
    pub version: String,
    pub build_timestamp: String,
    pub git_commit: String,
    pub git_branch: String,
}

impl VersionInfo {
    /// Build information baked in at compile time.
    pub fn current() -> Self {
        Self {
            version: option_env!("API_VERSION").unwrap_or("dev").to_string(),
            build_timestamp: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown").to_string(),
            git_commit: option_env!("STABLE_GIT_COMMIT").unwrap_or("unknown").to_string(),
            git_branch: option_env!("STABLE_GIT_BRANCH").unwrap_or("unknown").to_string(),
        }
    }
}
