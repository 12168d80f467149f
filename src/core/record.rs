//! Purpose: Encode named values into timestamped JSON records and decode them back.
//! Exports: `Record`, `encode`, `decode`, `now_millis`.
//! Role: The codec seam of the crate; all serde_json traffic funnels through here.
//! Invariants: Field order on the wire is `name`, `value`, `timestamp`.
//! Invariants: Absent name or value round-trips as JSON null, never as empty text.
//! Invariants: Decode failures carry `ErrorKind::Decode` and a bounded input snippet.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::error::{Error, ErrorKind};

/// One named value captured at a point in time.
///
/// The JSON shape is fixed: `{"name":...,"value":...,"timestamp":...}` with
/// `timestamp` in milliseconds since the Unix epoch. Extra keys are ignored
/// on decode and never produced on encode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Value,
    pub timestamp: u64,
}

impl Record {
    /// Builds a record stamped with the current wall clock.
    pub fn new(name: Option<&str>, value: Value) -> Result<Self, Error> {
        Ok(Self::at(name, value, now_millis()?))
    }

    /// Builds a record with an explicit timestamp. Useful for replays and tests.
    pub fn at(name: Option<&str>, value: Value, timestamp: u64) -> Self {
        Self {
            name: name.map(str::to_string),
            value,
            timestamp,
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|err| {
            Error::new(ErrorKind::Encode)
                .with_message("failed to encode record")
                .with_source(err)
        })
    }

    /// Parses JSON text into a typed record.
    ///
    /// `timestamp` must be present and a non-negative integer; `name` must be
    /// text or null; a missing `value` decodes as null.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|err| {
            Error::new(ErrorKind::Decode)
                .with_message("invalid record json")
                .with_snippet(text)
                .with_source(err)
        })
    }

    /// Formats the timestamp as RFC3339 UTC.
    ///
    /// A timestamp beyond the representable calendar range is an input
    /// defect, so it fails with the decode kind rather than an internal one.
    pub fn time_rfc3339(&self) -> Result<String, Error> {
        use time::format_description::well_known::Rfc3339;
        let nanos = i128::from(self.timestamp) * 1_000_000;
        let ts = time::OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|err| {
            Error::new(ErrorKind::Decode)
                .with_message("timestamp out of range")
                .with_snippet(&self.timestamp.to_string())
                .with_source(err)
        })?;
        ts.format(&Rfc3339).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("timestamp format failed")
                .with_source(err)
        })
    }
}

/// Encodes a name/value pair into record JSON with a generated timestamp.
pub fn encode(name: Option<&str>, value: Value) -> Result<String, Error> {
    debug!("encoding record: name={:?}", name);
    Record::new(name, value)?.to_json()
}

/// Decodes record JSON into a key/value mapping.
///
/// Returns every top-level field the input carries. Inputs that are not a
/// JSON object fail with `ErrorKind::Decode`; nothing partial escapes.
pub fn decode(text: &str) -> Result<Map<String, Value>, Error> {
    debug!("decoding record text: {} bytes", text.len());
    serde_json::from_str(text).map_err(|err| {
        Error::new(ErrorKind::Decode)
            .with_message("invalid record json")
            .with_snippet(text)
            .with_source(err)
    })
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> Result<u64, Error> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("time went backwards")
                .with_source(err)
        })?;
    Ok(duration.as_millis() as u64)
}
