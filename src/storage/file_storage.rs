use crate::{
    domain::BoardConfig,
    error::{KanbanError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage implementation
///
/// Each key is stored as `<project>/.kanban/data/<key>.json`, apart from
/// `config.json` in the root, so no key can overwrite the configuration.
/// Writes go to a temporary file first and are renamed into place.
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const KANBAN_DIR: &'static str = ".kanban";
    const DATA_DIR: &'static str = "data";
    const CONFIG_FILE: &'static str = "config.json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::KANBAN_DIR),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn data_path(&self) -> PathBuf {
        self.root_path.join(Self::DATA_DIR)
    }

    fn key_file(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(KanbanError::StorageError(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.data_path().join(format!("{}.json", key)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Reads `config.json` from the storage root, or the defaults if absent
    pub async fn load_config(&self) -> Result<BoardConfig> {
        let path = self.root_path.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(BoardConfig::default());
        }
        let contents = fs::read_to_string(&path).await?;
        BoardConfig::from_json(&contents)
    }

    /// Writes `config.json` into the storage root
    pub async fn save_config(&self, config: &BoardConfig) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        let json = serde_json::to_string_pretty(config)?;
        fs::write(self.root_path.join(Self::CONFIG_FILE), json).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.data_path()).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_file(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path).await?))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_file(key)?;
        self.ensure_directory_exists(&self.data_path()).await?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_file(key)?;
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Board, SeedMode, DEFAULT_STORAGE_KEY};
    use crate::storage::{load_board, save_board};
    use crate::store::BoardStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_storage_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(!storage.is_initialized().await);

        storage.initialize().await.unwrap();

        assert!(storage.is_initialized().await);
        assert!(storage.root_path().ends_with(".kanban"));
        assert!(storage.root_path().join("data").is_dir());
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(storage.get(DEFAULT_STORAGE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage.set(DEFAULT_STORAGE_KEY, "first").await.unwrap();
        storage.set(DEFAULT_STORAGE_KEY, "second").await.unwrap();

        assert_eq!(
            storage.get(DEFAULT_STORAGE_KEY).await.unwrap().as_deref(),
            Some("second")
        );
        let file = storage
            .root_path()
            .join("data")
            .join("kanban-board-storage.json");
        assert!(file.exists());
        assert!(!file.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_key() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage.set("board", "payload").await.unwrap();
        storage.remove("board").await.unwrap();
        assert!(storage.get("board").await.unwrap().is_none());

        storage.remove("board").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(storage.set("../escape", "x").await.is_err());
        assert!(storage.set("a/b", "x").await.is_err());
        assert!(storage.get("").await.is_err());
    }

    #[tokio::test]
    async fn test_board_round_trip_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let board = Board::demo();
        save_board(&storage, DEFAULT_STORAGE_KEY, &board)
            .await
            .unwrap();

        let reopened = FileStorage::new(temp_dir.path());
        let loaded = load_board(&reopened, DEFAULT_STORAGE_KEY).await.unwrap();
        assert_eq!(loaded.lists, board.lists);
    }

    #[tokio::test]
    async fn test_board_stored_under_config_key_keeps_config() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(temp_dir.path()));
        let config = BoardConfig {
            storage_key: "config".to_string(),
            seed: SeedMode::Demo,
        };
        storage.save_config(&config).await.unwrap();

        let loaded_config = storage.load_config().await.unwrap();
        let mut store = BoardStore::open(loaded_config, storage.clone())
            .await
            .unwrap();
        let list_id = store.add_list("Backlog");
        store.add_task(&list_id, "Survive a restart", "");
        store.flush().await;

        let reopened = Arc::new(FileStorage::new(temp_dir.path()));
        let reloaded_config = reopened.load_config().await.unwrap();
        assert_eq!(reloaded_config, config);
        let store_again = BoardStore::open(reloaded_config, reopened).await.unwrap();
        assert_eq!(store_again.lists(), store.lists());
        assert_eq!(store_again.lists().len(), 4);
    }

    #[tokio::test]
    async fn test_config_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let config = storage.load_config().await.unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[tokio::test]
    async fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let config = BoardConfig::default().with_seed(SeedMode::Demo);

        storage.save_config(&config).await.unwrap();

        assert_eq!(storage.load_config().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_invalid_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();
        fs::write(storage.root_path().join("config.json"), "{ oops")
            .await
            .unwrap();

        assert!(matches!(
            storage.load_config().await,
            Err(KanbanError::ConfigError(_))
        ));
    }
}
