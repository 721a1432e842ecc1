use crate::{domain::Board, error::Result};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Durable key-value storage for board payloads
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Reads the payload stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the payload stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes the payload stored under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Checks if the backend has been initialized
    async fn is_initialized(&self) -> bool;
}

/// Serializes the persisted part of a board (its lists)
pub fn encode_board(board: &Board) -> Result<String> {
    Ok(serde_json::to_string(board)?)
}

/// Parses and validates a persisted board payload
pub fn decode_board(payload: &str) -> Result<Board> {
    let board: Board = serde_json::from_str(payload)?;
    board.validate()?;
    Ok(board)
}

/// Loads the board stored under `key`.
///
/// Returns `None` when nothing was stored or when the stored payload cannot be
/// read, parsed or validated. Those failures are logged, not returned.
pub async fn load_board(storage: &dyn Storage, key: &str) -> Option<Board> {
    let payload = match storage.get(key).await {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            log::debug!("[kanban.storage.load] No board stored under {}", key);
            return None;
        }
        Err(e) => {
            log::warn!("[kanban.storage.load] Failed to read {}: {}", key, e);
            return None;
        }
    };

    match decode_board(&payload) {
        Ok(board) => Some(board),
        Err(e) => {
            log::warn!(
                "[kanban.storage.load] Ignoring unreadable board under {}: {}",
                key,
                e
            );
            None
        }
    }
}

/// Writes the board's lists under `key`
pub async fn save_board(storage: &dyn Storage, key: &str, board: &Board) -> Result<()> {
    let payload = encode_board(board)?;
    storage.set(key, &payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListId, SortOrder};

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let storage = MemoryStorage::new();
        let mut board = Board::demo();
        board.sort_list(&ListId::from("list-1"), SortOrder::Name);
        board.add_list("Extra".to_string());
        board.filter_query = "ignored".to_string();

        save_board(&storage, "board", &board).await.unwrap();
        let loaded = load_board(&storage, "board").await.unwrap();

        assert_eq!(loaded.lists, board.lists);
        assert!(loaded.filter_query.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_key() {
        let storage = MemoryStorage::new();
        assert!(load_board(&storage, "board").await.is_none());
    }

    #[tokio::test]
    async fn test_load_malformed_payload() {
        let storage = MemoryStorage::new();
        storage.set("board", "{ not json").await.unwrap();
        assert!(load_board(&storage, "board").await.is_none());

        storage.set("board", r#"{ "lists": 3 }"#).await.unwrap();
        assert!(load_board(&storage, "board").await.is_none());
    }

    #[tokio::test]
    async fn test_load_rejects_duplicate_ids() {
        let storage = MemoryStorage::new();
        let payload = r#"{ "lists": [
            { "id": "a", "name": "A", "createdAt": 1, "tasks": [] },
            { "id": "a", "name": "B", "createdAt": 2, "tasks": [] }
        ] }"#;
        storage.set("board", payload).await.unwrap();

        assert!(load_board(&storage, "board").await.is_none());
    }

    #[test]
    fn test_decode_persisted_schema() {
        let payload = r#"{ "lists": [ {
            "id": "list-1", "name": "To Do", "createdAt": 1700000000000,
            "sortOrder": "updated",
            "tasks": [ { "id": "task-1", "name": "Write", "description": "",
                         "createdAt": 1700000000001, "updatedAt": 1700000000002 } ]
        } ] }"#;

        let board = decode_board(payload).unwrap();

        assert_eq!(board.lists.len(), 1);
        assert_eq!(board.lists[0].sort_order, Some(SortOrder::Updated));
        assert_eq!(
            board.lists[0].tasks[0].updated_at.timestamp_millis(),
            1_700_000_000_002
        );
    }

    #[test]
    fn test_encode_has_only_lists() {
        let payload = encode_board(&Board::demo()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 1);
        assert!(object.contains_key("lists"));
    }
}
