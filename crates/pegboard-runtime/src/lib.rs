#![forbid(unsafe_code)]

//! Editing session runtime for the pegboard designer.
//!
//! - [`session`] - [`EditorSession`], the engine plus serialize-on-change
//! - [`state_persistence`] - [`SessionStorage`] backends (memory, JSON file)
//! - [`logging`] - tracing subscriber bootstrap
//!
//! # Example
//! ```
//! use pegboard_runtime::{EditorSession, MemoryStorage, SessionConfig};
//!
//! let mut session = EditorSession::with_storage(
//!     SessionConfig::default(),
//!     Box::new(MemoryStorage::new()),
//! );
//! session.set_cell(3, 4).unwrap();
//! assert_eq!(session.engine().cell(3, 4), Some("red"));
//! assert_eq!(session.persist_failures(), 0);
//! ```

pub mod logging;
pub mod session;
pub mod state_persistence;

pub use logging::{LogFormat, init_logging};
pub use session::{EditorSession, PersistenceConfig, SessionConfig};
pub use state_persistence::{
    FileStorage, MemoryStorage, SessionStorage, StorageError, StorageResult, StoredSession,
};
