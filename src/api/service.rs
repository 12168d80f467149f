//! Purpose: Provide a thin service facade over the record codec.
//! Exports: `Service`, `ServiceInfo`, `SERVICE_NAME`, `SERVICE_STATUS`.
//! Role: Stable entry point for callers who want behavior, not plumbing.
//! Invariants: `process` only trims input and delegates; no logic lives here.
//! Invariants: `describe` is infallible; it falls back to a fixed error literal.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::core::error::Error;
use crate::core::record;
use crate::text;

pub const SERVICE_NAME: &str = "recado";
pub const SERVICE_STATUS: &str = "active";

const DESCRIBE_FALLBACK: &str = "{\"error\":\"failed to describe service\"}";

/// Static description of the running service.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub status: String,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            name: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: SERVICE_STATUS.to_string(),
        }
    }
}

/// Facade combining the text helpers and the record codec.
#[derive(Clone, Debug)]
pub struct Service;

impl Service {
    pub fn new() -> Self {
        Self
    }

    /// Trims the input and encodes it as a record named `input`.
    ///
    /// Absent or blank input encodes an empty text value; the record itself
    /// is still produced.
    pub fn process(&self, input: Option<&str>) -> Result<String, Error> {
        info!("processing input: {} bytes", input.map_or(0, str::len));
        let cleaned = match input {
            Some(raw) if !text::is_blank(raw) => raw.trim(),
            _ => "",
        };
        record::encode(Some("input"), Value::String(cleaned.to_string()))
    }

    /// Describes the service as a JSON object with name, version, and status.
    pub fn describe(&self) -> String {
        serde_json::to_string(&ServiceInfo::current())
            .unwrap_or_else(|_| DESCRIBE_FALLBACK.to_string())
    }
}

impl Default for Service {
    fn default() -> Self {
        Self::new()
    }
}
