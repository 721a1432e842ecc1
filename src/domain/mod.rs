pub mod board;
pub mod filter;
pub mod list;
pub mod sorting;
pub mod task;

pub use board::{Board, BoardConfig, SeedMode, DEFAULT_STORAGE_KEY};
pub use filter::{filter_tasks, TaskFilter};
pub use list::{List, ListId};
pub use sorting::{sort_tasks, SortOrder};
pub use task::{Task, TaskId};
