//! # API / Edge Routing
//!
//! Splits incoming requests between the JSON/protobuf API and static
//! assets, the way the site's edge worker does:
//!
//! ```text
//! GET /api/...   ──▶ handlers (JSON, or protobuf when Accept asks for it)
//! GET /anything  ──▶ static asset
//! ```
//!
//! Transport-agnostic: callers hand in method, target and `Accept`, and
//! get back status, content type and body bytes.

pub mod handlers;
pub mod types;

use std::fmt;

use log::debug;

use crate::registry::Registry;

pub const JSON: &str = "application/json";
pub const PROTOBUF: &str = "application/protobuf";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: String,
    /// Path plus optional query, e.g. `/api/search?q=rules`.
    pub target: String,
    pub accept: Option<String>,
}

impl ApiRequest {
    pub fn get(target: &str) -> Self {
        Self {
            method: "GET".to_string(),
            target: target.to_string(),
            accept: None,
        }
    }

    pub fn accept(mut self, accept: &str) -> Self {
        self.accept = Some(accept.to_string());
        self
    }

    /// True if the client named a protobuf media type.
    pub fn accepts_protobuf(&self) -> bool {
        self.accept
            .as_deref()
            .map(|a| a.contains("application/protobuf") || a.contains("application/x-protobuf"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Where the edge sends a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Edge {
    Api(ApiResponse),
    /// Not an API path: serve this asset path from the static bundle.
    Asset(String),
}

#[derive(Debug)]
pub enum ApiError {
    /// The request target could not be parsed as a URL path.
    BadTarget(String),
    Encode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadTarget(target) => write!(f, "bad request target: {target}"),
            ApiError::Encode(msg) => write!(f, "failed to encode response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Route one request.
pub fn route_request(registry: &Registry, req: &ApiRequest) -> Result<Edge, ApiError> {
    // Only the path and query matter; the host is a placeholder.
    let url = reqwest::Url::parse("http://edge.invalid")
        .and_then(|base| base.join(&req.target))
        .map_err(|_| ApiError::BadTarget(req.target.clone()))?;
    let path = url.path();
    if path != "/api" && !path.starts_with("/api/") {
        debug!("asset: {path}");
        return Ok(Edge::Asset(path.to_string()));
    }
    debug!("api: {} {}", req.method, req.target);
    let query = url
        .query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default();
    handlers::handle(registry, req, path, &query).map(Edge::Api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_registry;

    #[test]
    fn test_non_api_paths_are_assets() {
        let registry = sample_registry();
        let edge = route_request(&registry, &ApiRequest::get("/index.html")).unwrap();
        assert_eq!(edge, Edge::Asset("/index.html".to_string()));
        let edge = route_request(&registry, &ApiRequest::get("/apiary")).unwrap();
        assert_eq!(edge, Edge::Asset("/apiary".to_string()));
    }

    #[test]
    fn test_accepts_protobuf_variants() {
        assert!(ApiRequest::get("/").accept("application/x-protobuf").accepts_protobuf());
        assert!(ApiRequest::get("/").accept("text/html, application/protobuf").accepts_protobuf());
        assert!(!ApiRequest::get("/").accept("application/json").accepts_protobuf());
        assert!(!ApiRequest::get("/").accepts_protobuf());
    }

    #[test]
    fn test_query_is_decoded() {
        let registry = sample_registry();
        let Edge::Api(resp) = route_request(&registry, &ApiRequest::get("/api/search?q=Bar%20util")).unwrap() else {
            panic!("expected api response");
        };
        assert_eq!(resp.status, 200);
        assert!(resp.body_text().contains("\"name\":\"bar\""));
    }
}
