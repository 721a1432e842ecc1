//! # Kanban Core
//!
//! Board state store for a personal kanban board.
//!
//! The crate holds lists of tasks in memory, applies every board operation
//! (adding, editing, deleting, moving, reordering, sorting, filtering) and
//! persists the lists through a pluggable key-value [`Storage`] backend,
//! independent of any UI.

pub mod domain;
pub mod error;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use domain::{
    board::{Board, BoardConfig, SeedMode},
    filter::{filter_tasks, TaskFilter},
    list::{List, ListId},
    sorting::SortOrder,
    task::{Task, TaskId},
};
pub use error::{KanbanError, Result};
pub use storage::Storage;
pub use store::{BoardSnapshot, BoardStore, DragLocation, DragResult};
