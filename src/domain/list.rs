use crate::domain::{
    sorting::{sort_tasks, SortOrder},
    task::{now, Task, TaskId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};
use uuid::Uuid;

/// Unique identifier for a list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(String);

impl ListId {
    /// Generates a fresh, time-ordered list ID
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ListId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ListId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for ListId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named column holding tasks in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub name: String,
    pub tasks: Vec<Task>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Label of the last sort applied. Not enforced on later inserts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl List {
    /// Creates an empty list with a fresh ID
    pub fn new(name: String) -> Self {
        Self {
            id: ListId::generate(),
            name,
            tasks: Vec::new(),
            created_at: now(),
            sort_order: None,
        }
    }

    /// Builder-style helper for seeding a list with tasks
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Position of a task within this list
    pub fn position(&self, task_id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == task_id)
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == task_id)
    }

    fn task_mut(&mut self, task_id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == task_id)
    }

    /// Appends a task to the bottom of the list
    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Updates name and description of a task. Returns false if absent.
    pub fn update_task(&mut self, task_id: &TaskId, name: String, description: String) -> bool {
        match self.task_mut(task_id) {
            Some(task) => {
                task.update(name, description);
                true
            }
            None => false,
        }
    }

    /// Removes a task by ID, returning it
    pub fn remove_task(&mut self, task_id: &TaskId) -> Option<Task> {
        self.position(task_id).map(|index| self.tasks.remove(index))
    }

    /// Inserts a task at `index`, clamped to the current length
    pub fn insert_task(&mut self, index: usize, task: Task) {
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task);
    }

    /// Moves the task at `from` so it lands at `to` in the sequence with the
    /// task already removed.
    ///
    /// `from` must be in range; `to` is clamped. Returns false when `from` is
    /// out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tasks.len() {
            return false;
        }
        let task = self.tasks.remove(from);
        self.insert_task(to, task);
        true
    }

    /// Sorts tasks by `order` and records it as the list's sort label
    pub fn sort(&mut self, order: SortOrder) {
        sort_tasks(&mut self.tasks, order);
        self.sort_order = Some(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(names: &[&str]) -> List {
        List::new("Column".to_string()).with_tasks(
            names
                .iter()
                .map(|n| Task::new(n.to_string(), String::new()))
                .collect(),
        )
    }

    fn names(list: &List) -> Vec<&str> {
        list.tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_list_creation() {
        let list = List::new("To Do".to_string());
        assert_eq!(list.name, "To Do");
        assert!(list.tasks.is_empty());
        assert!(list.sort_order.is_none());
    }

    #[test]
    fn test_reorder_forward_uses_post_removal_index() {
        let mut list = list_with(&["T1", "T2", "T3"]);

        assert!(list.reorder(0, 2));

        assert_eq!(names(&list), vec!["T2", "T3", "T1"]);
    }

    #[test]
    fn test_reorder_backward() {
        let mut list = list_with(&["T1", "T2", "T3"]);

        assert!(list.reorder(2, 0));

        assert_eq!(names(&list), vec!["T3", "T1", "T2"]);
    }

    #[test]
    fn test_reorder_to_index_is_clamped() {
        let mut list = list_with(&["T1", "T2", "T3"]);

        assert!(list.reorder(0, 99));

        assert_eq!(names(&list), vec!["T2", "T3", "T1"]);
    }

    #[test]
    fn test_reorder_from_out_of_range_is_noop() {
        let mut list = list_with(&["T1", "T2"]);

        assert!(!list.reorder(5, 0));

        assert_eq!(names(&list), vec!["T1", "T2"]);
    }

    #[test]
    fn test_remove_and_insert_task() {
        let mut list = list_with(&["T1", "T2", "T3"]);
        let id = list.tasks[1].id.clone();

        let task = list.remove_task(&id).unwrap();
        assert_eq!(task.name, "T2");
        assert!(list.position(&id).is_none());

        list.insert_task(0, task);
        assert_eq!(names(&list), vec!["T2", "T1", "T3"]);
    }

    #[test]
    fn test_update_missing_task() {
        let mut list = list_with(&["T1"]);
        assert!(!list.update_task(&TaskId::from("missing"), "X".to_string(), String::new()));
        assert_eq!(names(&list), vec!["T1"]);
    }

    #[test]
    fn test_sort_records_sort_order() {
        let mut list = list_with(&["Zebra", "Apple", "Banana"]);

        list.sort(SortOrder::Name);

        assert_eq!(names(&list), vec!["Apple", "Banana", "Zebra"]);
        assert_eq!(list.sort_order, Some(SortOrder::Name));
    }

    #[test]
    fn test_sort_order_not_enforced_on_insert() {
        let mut list = list_with(&["Apple", "Banana"]);
        list.sort(SortOrder::Name);

        list.push_task(Task::new("Aardvark".to_string(), String::new()));

        assert_eq!(names(&list), vec!["Apple", "Banana", "Aardvark"]);
        assert_eq!(list.sort_order, Some(SortOrder::Name));
    }

    #[test]
    fn test_list_serialization_omits_missing_sort_order() {
        let list = List::new("Empty".to_string());
        let json = serde_json::to_value(&list).unwrap();

        assert!(json.get("sortOrder").is_none());
        assert!(json["createdAt"].is_i64());
        assert_eq!(json["tasks"], serde_json::json!([]));
    }
}
