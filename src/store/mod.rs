//! The board state store.
//!
//! [`BoardStore`] owns the authoritative board. Every mutation builds a new
//! [`Board`] and swaps it in, so a [`BoardSnapshot`] handed out earlier never
//! changes underneath its holder. Mutations that change the lists are
//! persisted through the attached [`Storage`] without blocking the caller.

use crate::{
    domain::{Board, BoardConfig, List, ListId, SeedMode, SortOrder, Task, TaskFilter, TaskId},
    error::Result,
    storage::{load_board, Storage},
};
use std::sync::Arc;
use tokio::sync::watch;

pub mod drag;
mod writer;

pub use drag::{DragLocation, DragResult, DropAction};
use writer::SaveWriter;

/// An immutable view of the board at one version
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub version: u64,
    pub board: Arc<Board>,
}

/// Owns the board and applies every mutation to it
pub struct BoardStore {
    board: Arc<Board>,
    version: u64,
    seed: SeedMode,
    writer: Option<SaveWriter>,
    notifier: watch::Sender<BoardSnapshot>,
}

impl BoardStore {
    /// Creates a store with no storage attached, starting from the
    /// configured seed.
    pub fn new(config: &BoardConfig) -> Self {
        Self::with_board(config.initial_board(), config.seed, None)
    }

    /// Opens a store backed by `storage`.
    ///
    /// Hydrates from the payload under the configured key; if there is none,
    /// or it cannot be parsed, starts from the configured seed instead. Must
    /// be called from within a Tokio runtime.
    pub async fn open(config: BoardConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        storage.initialize().await?;

        let board = match load_board(storage.as_ref(), &config.storage_key).await {
            Some(board) => {
                log::info!(
                    "[kanban.store.load] Hydrated {} lists from {}",
                    board.lists.len(),
                    config.storage_key
                );
                board
            }
            None => {
                log::info!(
                    "[kanban.store.load] Starting from {:?} seed",
                    config.seed
                );
                config.initial_board()
            }
        };

        let writer = SaveWriter::spawn(storage, config.storage_key);
        Ok(Self::with_board(board, config.seed, Some(writer)))
    }

    fn with_board(board: Board, seed: SeedMode, writer: Option<SaveWriter>) -> Self {
        let board = Arc::new(board);
        let (notifier, _) = watch::channel(BoardSnapshot {
            version: 0,
            board: Arc::clone(&board),
        });
        Self {
            board,
            version: 0,
            seed,
            writer,
            notifier,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn lists(&self) -> &[List] {
        &self.board.lists
    }

    pub fn list(&self, list_id: &ListId) -> Option<&List> {
        self.board.list(list_id)
    }

    /// Locates a task anywhere on the board, with the list that owns it
    pub fn find_task(&self, task_id: &TaskId) -> Option<(&List, &Task)> {
        self.board.find_task(task_id)
    }

    pub fn task_count(&self) -> usize {
        self.board.task_count()
    }

    pub fn filter_query(&self) -> &str {
        &self.board.filter_query
    }

    /// Tasks of one list that pass the current filter query
    pub fn filtered_tasks(&self, list_id: &ListId) -> Vec<&Task> {
        match self.board.list(list_id) {
            Some(list) => TaskFilter::new(&self.board.filter_query).apply(&list.tasks),
            None => Vec::new(),
        }
    }

    /// Incremented on every committed change
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            version: self.version,
            board: Arc::clone(&self.board),
        }
    }

    /// Receives a new snapshot after every committed change
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.notifier.subscribe()
    }

    /// Waits until all queued writes have reached storage
    pub async fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush().await;
        }
    }

    /// Appends a new, empty list. The caller is responsible for trimming
    /// and rejecting empty names.
    pub fn add_list(&mut self, name: impl Into<String>) -> ListId {
        let name = name.into();
        let mut next = Board::clone(&self.board);
        let id = next.add_list(name);
        self.commit(next, true);
        log::debug!("[kanban.store.list] Added list {}", id);
        id
    }

    pub fn update_list_name(&mut self, list_id: &ListId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.update_lists(|board| board.rename_list(list_id, name))
    }

    /// Deletes a list and every task in it
    pub fn delete_list(&mut self, list_id: &ListId) -> bool {
        self.update_lists(|board| board.remove_list(list_id))
    }

    pub fn add_task(
        &mut self,
        list_id: &ListId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Option<TaskId> {
        let mut next = Board::clone(&self.board);
        let id = next.add_task(list_id, name.into(), description.into())?;
        self.commit(next, true);
        Some(id)
    }

    pub fn update_task(
        &mut self,
        list_id: &ListId,
        task_id: &TaskId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> bool {
        let (name, description) = (name.into(), description.into());
        self.update_lists(|board| board.update_task(list_id, task_id, name, description))
    }

    pub fn delete_task(&mut self, list_id: &ListId, task_id: &TaskId) -> bool {
        self.update_lists(|board| board.remove_task(list_id, task_id))
    }

    /// Moves a task to `dest_index` of another list.
    ///
    /// `dest_index` addresses the destination after the task left its source
    /// and is clamped to the destination length.
    pub fn move_task(
        &mut self,
        from_list_id: &ListId,
        to_list_id: &ListId,
        task_id: &TaskId,
        dest_index: usize,
    ) -> bool {
        let moved = self.update_lists(|board| {
            board.move_task(from_list_id, to_list_id, task_id, dest_index)
        });
        if !moved {
            log::debug!(
                "[kanban.store.move] Task {} not moved from {} to {}",
                task_id,
                from_list_id,
                to_list_id
            );
        }
        moved
    }

    /// Removes the task at `from_index` and inserts it at `to_index` of the
    /// list with that task already removed.
    ///
    /// An out-of-range `from_index` is ignored; `to_index` is clamped.
    pub fn reorder_tasks(&mut self, list_id: &ListId, from_index: usize, to_index: usize) -> bool {
        self.update_lists(|board| board.reorder_tasks(list_id, from_index, to_index))
    }

    /// Sorts a list once and records the order it was sorted by
    pub fn sort_list(&mut self, list_id: &ListId, order: SortOrder) -> bool {
        self.update_lists(|board| board.sort_list(list_id, order))
    }

    /// Replaces the filter query. Never persisted.
    pub fn set_filter_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.board.filter_query {
            return;
        }
        let mut next = Board::clone(&self.board);
        next.filter_query = query;
        self.commit(next, false);
    }

    /// Drops every list and starts again from the configured seed.
    ///
    /// The stored board is removed as well, so reopening also starts from
    /// the seed until the next mutation is persisted.
    pub fn reset(&mut self) {
        self.commit(self.seed.board(), false);
        if let Some(writer) = &self.writer {
            writer.clear();
        }
        log::info!("[kanban.store.reset] Reset board to {:?} seed", self.seed);
    }

    fn update_lists(&mut self, op: impl FnOnce(&mut Board) -> bool) -> bool {
        let mut next = Board::clone(&self.board);
        if !op(&mut next) {
            return false;
        }
        self.commit(next, true);
        true
    }

    fn commit(&mut self, board: Board, persist: bool) {
        self.board = Arc::new(board);
        self.version += 1;
        if persist {
            self.persist();
        }
        self.notifier.send_replace(self.snapshot());
    }

    fn persist(&self) {
        if let Some(writer) = &self.writer {
            writer.save(Arc::clone(&self.board));
        }
    }
}
