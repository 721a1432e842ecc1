//! Substring filtering of tasks for display.
//!
//! Filtering never touches stored order: it derives the visible subsequence
//! of a list from the list and the current query.

use crate::domain::task::Task;

/// A normalized, case-insensitive substring query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    needle: Option<String>,
}

impl TaskFilter {
    /// Builds a filter from raw user input.
    ///
    /// An empty or all-whitespace query matches every task.
    pub fn new(query: &str) -> Self {
        let needle = if query.trim().is_empty() {
            None
        } else {
            Some(query.to_lowercase())
        };
        Self { needle }
    }

    /// True when the filter lets every task through
    pub fn is_empty(&self) -> bool {
        self.needle.is_none()
    }

    /// Checks whether the name or description contains the query
    pub fn matches(&self, task: &Task) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => {
                task.name.to_lowercase().contains(needle.as_str())
                    || task.description.to_lowercase().contains(needle.as_str())
            }
        }
    }

    /// Returns the matching tasks in their original order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        if self.is_empty() {
            return tasks.iter().collect();
        }
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

/// Filters `tasks` by `query`, preserving order.
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    TaskFilter::new(query).apply(tasks)
}
