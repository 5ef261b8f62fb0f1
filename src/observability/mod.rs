//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; every request logs its `request_id`
//! - JSON format on demand, pretty format by default
//! - Log level configurable via config and environment

pub mod logging;
