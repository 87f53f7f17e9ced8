//! JSON-file-backed store for the todo collection.
//!
//! Every operation performs one full load-modify-save cycle against a single
//! pretty-printed JSON file. A missing file reads as an empty collection; a
//! file that exists but does not parse is a fatal [`StoreError::Parse`]
//! surfaced to the caller with no attempt at repair.
//!
//! # Concurrency
//!
//! There is no locking and no isolation between concurrent callers. Two
//! writers racing on the same file will silently lose one party's update
//! (last save wins). Callers that need stricter guarantees must serialize
//! access themselves.
//!
//! # Example
//!
//! ```rust,no_run
//! use listkeeper_store::TodoStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), listkeeper_store::StoreError> {
//!     let store = TodoStore::new("todos.json");
//!     let todo = store.add("Buy milk").await?;
//!     println!("created #{}", todo.id);
//!
//!     for todo in store.list().await? {
//!         println!("[{}] {}", todo.id, todo.title);
//!     }
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

use crate::todo::Todo;

/// Errors that can occur while reading or writing the data file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data file could not be read or written.
    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),

    /// The data file exists but does not contain a valid todo list.
    #[error("failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Handle to the persisted todo collection.
///
/// The store holds only the path to the data file; state lives entirely on
/// disk and is re-read on every operation. Cloning the store is cheap and
/// clones share the same file.
#[derive(Debug, Clone)]
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    /// Creates a store backed by the given file path.
    ///
    /// The file is not touched until the first operation; a path that does
    /// not exist yet simply reads as an empty list.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full collection from disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`] if the file exists but is not a valid
    /// JSON todo array, or [`StoreError::Io`] for other read failures. A
    /// missing file is not an error and yields an empty collection.
    pub async fn load(&self) -> Result<Vec<Todo>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "Data file absent, empty list");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let todos: Vec<Todo> = serde_json::from_str(&content)?;
        trace!(count = todos.len(), "Loaded todo collection");
        Ok(todos)
    }

    /// Overwrites the data file with the given collection, pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be written.
    pub async fn save(&self, todos: &[Todo]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(todos)?;
        tokio::fs::write(&self.path, content).await?;
        trace!(count = todos.len(), "Saved todo collection");
        Ok(())
    }

    /// Appends a new todo with the next sequential id and returns it.
    ///
    /// The id is `max(existing ids) + 1`, so removed ids are never reissued
    /// while the file retains any higher id.
    ///
    /// # Errors
    ///
    /// Propagates load/save failures.
    pub async fn add(&self, title: impl Into<String>) -> Result<Todo, StoreError> {
        let mut todos = self.load().await?;
        let next_id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let todo = Todo::new(next_id, title);
        todos.push(todo.clone());
        self.save(&todos).await?;
        debug!(id = todo.id, "Added todo");
        Ok(todo)
    }

    /// Returns the full collection in persisted order.
    ///
    /// # Errors
    ///
    /// Propagates load failures.
    pub async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        self.load().await
    }

    /// Marks the todo with the given id as completed.
    ///
    /// Returns `Ok(None)` when no todo has that id. Completing an already
    /// completed todo succeeds and leaves it completed.
    ///
    /// # Errors
    ///
    /// Propagates load/save failures.
    pub async fn mark_done(&self, id: u64) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.load().await?;
        let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
            debug!(id, "Mark done: id not found");
            return Ok(None);
        };
        todo.complete();
        let updated = todo.clone();
        self.save(&todos).await?;
        debug!(id, "Marked todo done");
        Ok(Some(updated))
    }

    /// Removes the todo with the given id.
    ///
    /// Returns `Ok(false)` when no todo has that id.
    ///
    /// # Errors
    ///
    /// Propagates load/save failures.
    pub async fn remove(&self, id: u64) -> Result<bool, StoreError> {
        let mut todos = self.load().await?;
        let Some(index) = todos.iter().position(|t| t.id == id) else {
            debug!(id, "Remove: id not found");
            return Ok(false);
        };
        todos.remove(index);
        self.save(&todos).await?;
        debug!(id, "Removed todo");
        Ok(true)
    }

    /// Reconciles a caller-supplied ordering against the stored collection.
    ///
    /// Walks `ordered_ids` in order, moving each matching todo into the
    /// result; ids with no matching todo are silently ignored, and a
    /// duplicated id takes effect only at its first occurrence. Todos not
    /// mentioned in `ordered_ids` are appended afterwards in their original
    /// relative order. The result is saved and returned — this is a partial
    /// reorder, never a replacement, so no todo is ever dropped.
    ///
    /// # Errors
    ///
    /// Propagates load/save failures.
    pub async fn reorder(&self, ordered_ids: &[u64]) -> Result<Vec<Todo>, StoreError> {
        let mut remaining = self.load().await?;
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in ordered_ids {
            if let Some(index) = remaining.iter().position(|t| t.id == *id) {
                reordered.push(remaining.remove(index));
            }
        }

        // Unmentioned todos keep their prior relative order at the end.
        reordered.append(&mut remaining);

        self.save(&reordered).await?;
        debug!(count = reordered.len(), "Reordered todo collection");
        Ok(reordered)
    }
}
