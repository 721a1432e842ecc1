use crate::domain::{
    list::{List, ListId},
    sorting::SortOrder,
    task::{now, Task, TaskId},
};
use crate::error::{KanbanError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Storage key the board is persisted under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "kanban-board-storage";

/// What a board starts with when nothing has been persisted yet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// No lists at all
    #[default]
    Empty,
    /// Three starter columns with a handful of walkthrough tasks
    Demo,
}

impl SeedMode {
    pub fn board(self) -> Board {
        match self {
            SeedMode::Empty => Board::default(),
            SeedMode::Demo => Board::demo(),
        }
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct BoardConfig {
    pub storage_key: String,
    pub seed: SeedMode,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed: SeedMode::Empty,
        }
    }
}

impl BoardConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| KanbanError::ConfigError(e.to_string()))?;
        if config.storage_key.trim().is_empty() {
            return Err(KanbanError::ConfigError(
                "storageKey must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn with_seed(mut self, seed: SeedMode) -> Self {
        self.seed = seed;
        self
    }

    /// The board used when storage holds no (valid) data
    pub fn initial_board(&self) -> Board {
        self.seed.board()
    }
}

/// Kanban board state
///
/// Serializes to the persisted `{ "lists": [...] }` shape; the filter query is
/// transient and never written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub lists: Vec<List>,
    #[serde(skip)]
    pub filter_query: String,
}

impl Board {
    pub fn new(lists: Vec<List>) -> Self {
        Self {
            lists,
            filter_query: String::new(),
        }
    }

    /// Starter content shown on a first run in demo mode
    pub fn demo() -> Self {
        let now = now();
        let ago = |ms: i64| now - Duration::milliseconds(ms);
        let task = |id: &str, name: &str, description: &str, age: i64| Task {
            id: TaskId::from(id),
            name: name.to_string(),
            description: description.to_string(),
            created_at: ago(age),
            updated_at: ago(age),
        };
        let list = |id: &str, name: &str, age: i64, tasks: Vec<Task>| List {
            id: ListId::from(id),
            name: name.to_string(),
            tasks,
            created_at: ago(age),
            sort_order: None,
        };

        Self::new(vec![
            list(
                "list-1",
                "To Do",
                100_000,
                vec![
                    task(
                        "task-1",
                        "Try the Kanban Board",
                        "Explore the features and move this card around!",
                        90_000,
                    ),
                    task(
                        "task-2",
                        "Add your own tasks",
                        "Click \"+ Add Task\" to create a new task.",
                        80_000,
                    ),
                ],
            ),
            list(
                "list-2",
                "In Progress",
                70_000,
                vec![task(
                    "task-3",
                    "Drag tasks here",
                    "Move tasks between columns by dragging and dropping.",
                    60_000,
                )],
            ),
            list(
                "list-3",
                "Done",
                50_000,
                vec![task(
                    "task-4",
                    "Enjoy productivity!",
                    "Mark tasks as done by moving them here.",
                    40_000,
                )],
            ),
        ])
    }

    /// Checks that list IDs and task IDs are unique across the board
    pub fn validate(&self) -> Result<()> {
        let mut list_ids = HashSet::new();
        let mut task_ids = HashSet::new();

        for list in &self.lists {
            if !list_ids.insert(&list.id) {
                return Err(KanbanError::InvalidBoard(format!(
                    "duplicate list id {}",
                    list.id
                )));
            }
            for task in &list.tasks {
                if !task_ids.insert(&task.id) {
                    return Err(KanbanError::InvalidBoard(format!(
                        "duplicate task id {}",
                        task.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn list(&self, list_id: &ListId) -> Option<&List> {
        self.lists.iter().find(|l| &l.id == list_id)
    }

    fn list_mut(&mut self, list_id: &ListId) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| &l.id == list_id)
    }

    fn list_index(&self, list_id: &ListId) -> Option<usize> {
        self.lists.iter().position(|l| &l.id == list_id)
    }

    /// Locates a task anywhere on the board, with the list that owns it
    pub fn find_task(&self, task_id: &TaskId) -> Option<(&List, &Task)> {
        self.lists
            .iter()
            .find_map(|list| list.task(task_id).map(|task| (list, task)))
    }

    /// Total number of tasks across all lists
    pub fn task_count(&self) -> usize {
        self.lists.iter().map(|l| l.tasks.len()).sum()
    }

    /// Appends a new empty list and returns its ID
    pub fn add_list(&mut self, name: String) -> ListId {
        let list = List::new(name);
        let id = list.id.clone();
        self.lists.push(list);
        id
    }

    pub fn rename_list(&mut self, list_id: &ListId, name: String) -> bool {
        match self.list_mut(list_id) {
            Some(list) => {
                list.name = name;
                true
            }
            None => false,
        }
    }

    /// Removes a list together with every task it holds
    pub fn remove_list(&mut self, list_id: &ListId) -> bool {
        match self.list_index(list_id) {
            Some(index) => {
                self.lists.remove(index);
                true
            }
            None => false,
        }
    }

    /// Appends a new task to a list and returns its ID
    pub fn add_task(
        &mut self,
        list_id: &ListId,
        name: String,
        description: String,
    ) -> Option<TaskId> {
        let list = self.list_mut(list_id)?;
        let task = Task::new(name, description);
        let id = task.id.clone();
        list.push_task(task);
        Some(id)
    }

    pub fn update_task(
        &mut self,
        list_id: &ListId,
        task_id: &TaskId,
        name: String,
        description: String,
    ) -> bool {
        self.list_mut(list_id)
            .map(|list| list.update_task(task_id, name, description))
            .unwrap_or(false)
    }

    pub fn remove_task(&mut self, list_id: &ListId, task_id: &TaskId) -> bool {
        self.list_mut(list_id)
            .and_then(|list| list.remove_task(task_id))
            .is_some()
    }

    /// Moves a task out of `from` and into `to` at `index`.
    ///
    /// `index` addresses the destination after the task has left its source,
    /// and is clamped to the destination length. Nothing changes unless the
    /// task is in `from` and `to` exists.
    pub fn move_task(
        &mut self,
        from: &ListId,
        to: &ListId,
        task_id: &TaskId,
        index: usize,
    ) -> bool {
        let Some(dest) = self.list_index(to) else {
            return false;
        };
        let Some(task) = self.list_mut(from).and_then(|l| l.remove_task(task_id)) else {
            return false;
        };
        self.lists[dest].insert_task(index, task);
        true
    }

    pub fn reorder_tasks(&mut self, list_id: &ListId, from: usize, to: usize) -> bool {
        self.list_mut(list_id)
            .map(|list| list.reorder(from, to))
            .unwrap_or(false)
    }

    pub fn sort_list(&mut self, list_id: &ListId, order: SortOrder) -> bool {
        match self.list_mut(list_id) {
            Some(list) => {
                list.sort(order);
                true
            }
            None => false,
        }
    }
}
