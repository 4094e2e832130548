//! `prodboard-auth`: the dashboard's authentication check.
//!
//! Authentication here is a single persisted marker in client-local storage
//! (the desktop analogue of a browser's `localStorage`). This crate owns the
//! storage abstraction and the guard that resolves the marker into a status.
//! It is intentionally decoupled from HTTP and from the dashboard itself.

pub mod guard;
pub mod storage;

pub use guard::{AUTH_MARKER_KEY, AUTH_MARKER_VALUE, AuthGuard, AuthStatus};
pub use storage::{LocalStorage, MemoryStorage, SqliteStorage, StorageError};
