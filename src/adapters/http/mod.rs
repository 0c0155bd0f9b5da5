//! HTTP adapters. Remote poll API.

pub mod poll_api;

pub use poll_api::HttpPollGateway;
