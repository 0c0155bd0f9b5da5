//! Infrastructure adapters. Implement outbound ports.
//!
//! Poll file store, poll HTTP API, CSV export, terminal UI. Map errors to DomainError.

pub mod export;
pub mod http;
pub mod persistence;
pub mod ui;
