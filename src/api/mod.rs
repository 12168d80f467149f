//! Purpose: Define the stable public Rust API boundary for recado.
//! Exports: Codec types, text helpers, and the service facade.
//! Role: Public, additive-only surface; callers should not reach past it.
//! Invariants: Everything exported here keeps working across minor releases.
//! Invariants: The facade stays thin; behavior lives in `core` and `text`.

mod service;

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::record::{decode, encode, now_millis, Record};
pub use service::{Service, ServiceInfo, SERVICE_NAME, SERVICE_STATUS};
