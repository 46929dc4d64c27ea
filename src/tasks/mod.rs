//! Task list synchronization against the remote service.
//!
//! The store holds an ordered cache of the server's task list, matching the
//! last-fetched order. Every operation is a single network call with no
//! retry; a failure is terminal for that operation and reported once. The
//! cache is only mutated on confirmed outcomes, plus two explicit local
//! mutators the view uses to reflect edits optimistically.

use crate::api::{ApiClient, Task, TaskPatch};
use crate::error::{Error, Result};

/// In-memory task cache.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Drop the cache. Used on logout; the list is rebuilt on next load.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Replace the cache entirely with the server's list. On failure the
    /// existing cache is left as-is.
    pub async fn load(&mut self, api: &ApiClient) -> Result<usize> {
        let tasks = api.list_tasks().await?;
        tracing::debug!(count = tasks.len(), "loaded tasks");
        self.tasks = tasks;
        Ok(self.tasks.len())
    }

    /// Create a task and append the server's representation to the cache.
    /// Empty and whitespace-only names are rejected without a network call.
    pub async fn add(&mut self, api: &ApiClient, name: &str) -> Result<Task> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MissingField("task name"));
        }

        let task = api.create_task(name).await?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Send a partial update for one task. The cache is not rewritten on
    /// success — the view already reflects the edit via the local mutators —
    /// so a failure only surfaces an error.
    pub async fn update(&self, api: &ApiClient, id: i64, patch: &TaskPatch) -> Result<()> {
        api.update_task(id, patch).await?;
        Ok(())
    }

    /// Delete a task. The cached entry is removed only once the server
    /// confirms, so a failure leaves the list untouched.
    pub async fn delete(&mut self, api: &ApiClient, id: i64) -> Result<()> {
        api.delete_task(id).await?;
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }

    /// Flip a task's completion flag locally; returns the new value.
    pub fn toggle(&mut self, id: i64) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Rename a task locally.
    pub fn rename_local(&mut self, id: i64, name: impl Into<String>) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.name = name.into();
        }
    }
}
