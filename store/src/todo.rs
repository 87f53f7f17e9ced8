//! The todo record type.
//!
//! Records are created by [`Todo::new`] and mutated only through
//! [`Todo::complete`]; the title and creation timestamp never change after
//! construction. Field names use `camelCase` on the wire and in the data
//! file to match the JSON API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single task in the persisted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Positive identifier, unique within the collection. Assigned as
    /// `max(existing ids) + 1` and never reused while the file exists.
    pub id: u64,

    /// Task description, supplied at creation and never edited.
    pub title: String,

    /// Completion flag. The only transition is `false` to `true`.
    pub completed: bool,

    /// Creation timestamp, captured once and immutable.
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new incomplete todo with the current timestamp.
    ///
    /// # Example
    ///
    /// ```rust
    /// use listkeeper_store::Todo;
    ///
    /// let todo = Todo::new(1, "Buy milk");
    /// assert_eq!(todo.id, 1);
    /// assert_eq!(todo.title, "Buy milk");
    /// assert!(!todo.completed);
    /// ```
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Marks the todo as completed. Idempotent; there is no reverse
    /// transition.
    pub fn complete(&mut self) {
        self.completed = true;
    }
}
