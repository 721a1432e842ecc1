use crate::domain::Board;
use crate::storage::{save_board, Storage};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

enum WriteCommand {
    Save(Arc<Board>),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Hands committed boards to a single task that writes them in order.
///
/// Callers never wait on storage; failed writes are logged and dropped.
pub(crate) struct SaveWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl SaveWriter {
    /// Spawns the writer task. Must be called from within a Tokio runtime.
    pub(crate) fn spawn(storage: Arc<dyn Storage>, key: String) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    WriteCommand::Save(board) => {
                        if let Err(e) = save_board(storage.as_ref(), &key, &board).await {
                            log::warn!("[kanban.store.save] Failed to persist {}: {}", key, e);
                        }
                    }
                    WriteCommand::Clear => {
                        if let Err(e) = storage.remove(&key).await {
                            log::warn!("[kanban.store.reset] Failed to clear {}: {}", key, e);
                        }
                    }
                    WriteCommand::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            log::debug!("[kanban.store.save] Writer for {} stopped", key);
        });

        Self { tx }
    }

    pub(crate) fn save(&self, board: Arc<Board>) {
        self.send(WriteCommand::Save(board));
    }

    /// Queues removal of the stored board
    pub(crate) fn clear(&self) {
        self.send(WriteCommand::Clear);
    }

    /// Resolves once every write queued before this call has been applied
    pub(crate) async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    fn send(&self, command: WriteCommand) {
        if self.tx.send(command).is_err() {
            log::warn!("[kanban.store.save] Writer stopped, dropping board write");
        }
    }
}
