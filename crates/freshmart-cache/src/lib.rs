//! Session-scoped key-value storage for the FreshMart storefront.
//!
//! A [`SessionStorage`] is the Rust counterpart of a browser's
//! `sessionStorage`: one string-keyed area per session, values stored as
//! JSON, gone when the session ends. Areas live either in process memory
//! (shared between handles, handy for tests) or as one JSON file per session
//! in a directory.
//!
//! # Example
//!
//! ```rust
//! use freshmart_cache::{SessionId, SessionStorage};
//!
//! let storage = SessionStorage::in_memory(SessionId::generate());
//! storage.set("greeting", &"xin chào").unwrap();
//!
//! let value: Option<String> = storage.get("greeting").unwrap();
//! assert_eq!(value.as_deref(), Some("xin chào"));
//! ```

mod error;
mod session;
mod storage;

pub use error::CacheError;
pub use session::SessionId;
pub use storage::{MemoryStore, SessionStorage};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CacheError, MemoryStore, SessionId, SessionStorage};
}
