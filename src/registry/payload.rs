//! # Payload Decoding
//!
//! The primary registry ships inside the page as `base64(gzip(protobuf))`.
//! This module peels those layers and runs the load-time setup pass.
//!
//! ```text
//! "H4sIAAAA..."  ──base64──▶  1f 8b 08 ..  ──gunzip──▶  protobuf  ──prost──▶  Registry
//! ```

use std::fmt;
use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::GzDecoder;
use log::{debug, info};
use prost::Message;

use super::Registry;

#[derive(Debug)]
pub enum PayloadError {
    Base64(base64::DecodeError),
    Gzip(std::io::Error),
    Decode(prost::DecodeError),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Base64(e) => write!(f, "payload is not valid base64: {e}"),
            PayloadError::Gzip(e) => write!(f, "payload gunzip failed: {e}"),
            PayloadError::Decode(e) => write!(f, "payload protobuf decode failed: {e}"),
        }
    }
}

impl std::error::Error for PayloadError {}

/// Decompress a gzip stream into memory.
pub fn gzip_decode(data: &[u8]) -> Result<Vec<u8>, PayloadError> {
    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(PayloadError::Gzip)?;
    debug!(
        "gunzip: {} bytes -> {} bytes",
        data.len(),
        decompressed.len()
    );
    Ok(decompressed)
}

/// Decode a base64 string holding a gzip stream.
///
/// Whitespace is stripped first since embedded payloads are often
/// line-wrapped.
pub fn base64_gz_decode(b64: &str) -> Result<Vec<u8>, PayloadError> {
    let compact: String = b64.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let gz = STANDARD.decode(compact).map_err(PayloadError::Base64)?;
    gzip_decode(&gz)
}

/// Decode the embedded registry payload and prepare it for rendering.
pub fn decode_registry(b64: &str) -> Result<Registry, PayloadError> {
    let bytes = base64_gz_decode(b64)?;
    let mut registry = Registry::decode(bytes.as_slice()).map_err(PayloadError::Decode)?;
    setup_registry(&mut registry);
    info!(
        "Decoded registry with {} modules (commit {})",
        registry.modules.len(),
        registry.commit_sha
    );
    Ok(registry)
}

/// Propagates each module's repository metadata down onto its versions.
pub fn setup_registry(registry: &mut Registry) {
    for module in &mut registry.modules {
        if let Some(md) = &module.repository_metadata {
            for version in &mut module.versions {
                version.repository_metadata = Some(md.clone());
            }
        }
    }
}
