//! Endpoint handlers. Each takes the registry and request and produces a
//! complete response; a miss is a 404 response, not an error.

use log::warn;
use prost::Message;
use serde::Serialize;

use crate::registry::lookup::find_module;
use crate::registry::{Module, Registry};

use super::types::{ErrorResponse, ModuleListItem, RegistryInfo, VersionInfo};
use super::{ApiError, ApiRequest, ApiResponse, JSON, PROTOBUF};

/// Most results `/api/search` returns.
pub const SEARCH_LIMIT: usize = 20;

pub fn handle(registry: &Registry, req: &ApiRequest, path: &str, query: &str) -> Result<ApiResponse, ApiError> {
    if req.method != "GET" {
        return json(405, &ErrorResponse::new("Method not allowed"));
    }
    let rest = path.strip_prefix("/api").unwrap_or(path).trim_matches('/');
    match rest.split_once('/') {
        None if rest == "modules" => handle_modules(registry),
        Some(("modules", name)) if !name.is_empty() && !name.contains('/') => {
            handle_module_by_name(registry, req, name)
        }
        None if rest == "search" => handle_search(registry, query),
        None if rest == "registry" => handle_registry_info(registry, req),
        None if rest == "version" => json(200, &VersionInfo::current()),
        _ => {
            warn!("no api route for {path}");
            json(404, &ErrorResponse::new("Not found"))
        }
    }
}

fn list_item(m: &Module) -> ModuleListItem {
    ModuleListItem {
        name: m.name.clone(),
        latest_version: m.versions.first().map(|v| v.version.clone()).unwrap_or_default(),
        description: m
            .repository_metadata
            .as_ref()
            .map(|rm| rm.description.clone())
            .unwrap_or_default(),
    }
}

/// `GET /api/modules`: every module with its latest version.
pub fn handle_modules(registry: &Registry) -> Result<ApiResponse, ApiError> {
    let modules: Vec<ModuleListItem> = registry.modules.iter().map(list_item).collect();
    json(200, &modules)
}

/// `GET /api/modules/<name>`: the full module record.
pub fn handle_module_by_name(registry: &Registry, req: &ApiRequest, name: &str) -> Result<ApiResponse, ApiError> {
    match find_module(registry, name) {
        Some(m) => negotiate(req, m),
        None => json(404, &ErrorResponse::new("Module not found")),
    }
}

/// `GET /api/search?q=`: case-insensitive substring match over name and
/// description.
pub fn handle_search(registry: &Registry, query: &str) -> Result<ApiResponse, ApiError> {
    let query = query.to_lowercase();
    let results: Vec<ModuleListItem> = registry
        .modules
        .iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&query)
                || m.repository_metadata
                    .as_ref()
                    .map(|rm| rm.description.to_lowercase().contains(&query))
                    .unwrap_or(false)
        })
        .take(SEARCH_LIMIT)
        .map(list_item)
        .collect();
    json(200, &results)
}

/// `GET /api/registry`: the whole registry as protobuf, or a JSON summary.
pub fn handle_registry_info(registry: &Registry, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    if req.accepts_protobuf() {
        return protobuf(registry);
    }
    json(
        200,
        &RegistryInfo {
            registry_url: registry.registry_url.clone(),
            module_count: registry.modules.len(),
        },
    )
}

fn negotiate<T: Message + Serialize>(req: &ApiRequest, data: &T) -> Result<ApiResponse, ApiError> {
    if req.accepts_protobuf() {
        protobuf(data)
    } else {
        json(200, data)
    }
}

fn protobuf<T: Message>(data: &T) -> Result<ApiResponse, ApiError> {
    let mut buf = Vec::with_capacity(data.encoded_len());
    data.encode(&mut buf)
        .map_err(|e| ApiError::Encode(e.to_string()))?;
    Ok(ApiResponse {
        status: 200,
        content_type: PROTOBUF,
        body: buf,
    })
}

fn json<T: Serialize + ?Sized>(status: u16, data: &T) -> Result<ApiResponse, ApiError> {
    let body = serde_json::to_vec(data).map_err(|e| ApiError::Encode(e.to_string()))?;
    Ok(ApiResponse {
        status,
        content_type: JSON,
        body,
    })
}
