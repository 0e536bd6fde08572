//! # Borges
//!
//! A keyed, in-memory list workspace. Lists are registered under string
//! keys (or passed as literal lists) and manipulated through a fixed set of
//! operations.
//!
//! ## Core Concepts
//!
//! - **Active list**: the working list for a key, created lazily by
//!   `first`/`last`
//! - **Original list**: a baseline captured on creation or `commit`, restored
//!   by `reset`
//! - **Cursor**: circular traversal over a copy of a list
//! - **Pagination**: one page size and current page shared by every key
//!
//! ## Example
//!
//! ```
//! use borges::{values, Outcome, Value, Workspace};
//!
//! let ws = Workspace::new();
//!
//! // `last` with items creates the list
//! ws.last("todo", values(["write", "test", "ship"]))?;
//! assert_eq!(ws.get("todo", -1)?.into_value(), Some(Value::from("ship")));
//!
//! // Capture a baseline, edit, roll back
//! ws.commit("todo")?;
//! ws.remove("todo", 0, "test")?;
//! ws.reset("todo")?;
//! assert!(matches!(ws.size("todo")?, Outcome::Count(3)));
//! # Ok::<(), borges::ListError>(())
//! ```

pub mod cursor;
pub mod error;
pub mod lists;
pub mod operations;
pub mod pagination;
pub mod types;
pub mod workspace;

// Re-exports
pub use cursor::Cursor;
pub use error::{ListError, Result};
pub use lists::{ListStore, StoreStats};
pub use operations::{Operation, OperationKind, Outcome, Placement};
pub use pagination::PaginationState;
pub use types::*;
pub use workspace::{UniqueKeyFn, Workspace, WorkspaceConfig};
