//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Ctrl+C:
//!     → signals.rs (catch interrupt)
//!     → shutdown.rs (broadcast)
//!     → in-flight API requests resolve to ApiError::Cancelled
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
