//! NiFi Align Client
//!
//! HTTP adapter implementing the access and flow interfaces of
//! `nifi-align-core` against the NiFi REST API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// REST client
pub mod client;

/// Wire types
pub mod dto;

/// Timestamp parsing
pub mod timestamp;

pub use client::{NifiClient, NifiClientConfig};
pub use timestamp::{parse_nifi_timestamp, TimestampParseError};
