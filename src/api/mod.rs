//! Registry backend API client.
//!
//! # Data Flow
//! ```text
//! caller
//!     → auth.rs / estates.rs / transactions.rs / documents.rs / admin.rs
//!     → client.rs (URL, headers, deadline, cancellation, GET retries)
//!     → error.rs (status + body → JSON or ApiError)
//!     → reply.rs (JSON → typed records)
//!
//! lenient.rs wraps the same client and turns read failures into empty results.
//! ```
//!
//! # Design Decisions
//! - Every operation returns `ApiResult<T>`; failures are never disguised as data
//! - Bearer calls without a token fail locally with `MissingToken`
//! - Only GETs are retried; writes are sent once

pub mod admin;
pub mod auth;
pub mod client;
pub mod documents;
pub mod error;
pub mod estates;
pub mod lenient;
pub mod reply;
pub mod transactions;

pub use client::RegistryClient;
pub use error::{ApiError, ApiResult};
pub use estates::ESTATE_NOT_FOUND;
pub use lenient::LenientClient;
pub use reply::ApiReply;
