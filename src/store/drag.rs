//! Translates drag-and-drop results into store operations.

use crate::domain::{ListId, TaskId};
use crate::store::BoardStore;
use serde::{Deserialize, Serialize};

/// A position within a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragLocation {
    pub list_id: ListId,
    pub index: usize,
}

/// Outcome of a finished drag gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResult {
    pub source: DragLocation,
    /// `None` when the item was dropped outside any list
    pub destination: Option<DragLocation>,
    pub item_id: TaskId,
}

/// What a drop means for the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    Ignore,
    Reorder {
        list_id: ListId,
        from_index: usize,
        to_index: usize,
    },
    Move {
        from_list_id: ListId,
        to_list_id: ListId,
        task_id: TaskId,
        index: usize,
    },
}

impl DragResult {
    pub fn action(&self) -> DropAction {
        match &self.destination {
            None => DropAction::Ignore,
            Some(dest) if dest.list_id == self.source.list_id => DropAction::Reorder {
                list_id: dest.list_id.clone(),
                from_index: self.source.index,
                to_index: dest.index,
            },
            Some(dest) => DropAction::Move {
                from_list_id: self.source.list_id.clone(),
                to_list_id: dest.list_id.clone(),
                task_id: self.item_id.clone(),
                index: dest.index,
            },
        }
    }
}

impl BoardStore {
    /// Applies a drop to the board. Returns whether anything changed.
    pub fn apply_drag(&mut self, result: &DragResult) -> bool {
        match result.action() {
            DropAction::Ignore => false,
            DropAction::Reorder {
                list_id,
                from_index,
                to_index,
            } => self.reorder_tasks(&list_id, from_index, to_index),
            DropAction::Move {
                from_list_id,
                to_list_id,
                task_id,
                index,
            } => self.move_task(&from_list_id, &to_list_id, &task_id, index),
        }
    }
}
