use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::Error;

/// Fixed key the previous run's tracked-player snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "last-scores";

/// Key/value persistence for serialized snapshots. One fixed key in practice,
/// but the store itself is key-agnostic.
#[allow(async_fn_in_trait)]
pub trait SnapshotStore {
    /// Returns the stored text, or `None` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Fully replaces the value under `key`.
    async fn put(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// File-backed store: each key becomes one JSON file in the configured
/// directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(text) => {
                debug!(key, bytes = text.len(), "Read snapshot");
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, path = %path.display(), "No snapshot stored yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), Error> {
        ensure_dir(&self.dir).await?;
        fs::write(self.path_for(key), value).await?;
        debug!(key, bytes = value.len(), "Wrote snapshot");
        Ok(())
    }
}

async fn ensure_dir(dir: &Path) -> Result<(), Error> {
    if !fs::try_exists(dir).await? {
        fs::create_dir_all(dir).await?;
    }
    Ok(())
}
