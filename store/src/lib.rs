//! Listkeeper Store - JSON-file-backed todo collection.
//!
//! This crate owns the persisted data model shared by the Listkeeper server
//! and CLI. The entire collection lives in one pretty-printed JSON file that
//! is read in full and rewritten in full on every mutation.
//!
//! # Architecture
//!
//! - [`todo::Todo`] - The single record type.
//! - [`store::TodoStore`] - Load/save plus all record-level operations
//!   (add, list, mark done, remove, reorder).
//!
//! There is no locking: two concurrent writers can clobber each other and
//! the last full write wins. This is an accepted limitation of the design,
//! not a bug.

pub mod store;
pub mod todo;

pub use store::{StoreError, TodoStore};
pub use todo::Todo;
