//! Client-side session persistence.
//!
//! # Data Flow
//! ```text
//! login / checkout / CLI commands
//!     → state.rs (typed accessor per key)
//!     → store.rs (JSON string per key, DashMap)
//!     → session file (whole-file rewrite on every write)
//! ```
//!
//! # Design Decisions
//! - Reads parse-or-default; unreadable values are logged and ignored
//! - Writes replace the whole value (no merge, no versioning)
//! - No cross-process locking; concurrent writers race

pub mod keys;
pub mod state;
pub mod store;

pub use keys::SessionKey;
pub use store::{SessionError, SessionResult, SessionStore};
