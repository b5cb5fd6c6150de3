//! Flag store backed by one JSON document per user.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use super::FlagStore;
use crate::error::{StoreError, StoreResult};
use crate::user::UserId;

type Document = BTreeMap<String, BTreeMap<String, Value>>;

/// Stores each user's flags in `<dir>/<user>.json`.
#[derive(Debug)]
pub struct JsonFileFlagStore {
    dir: PathBuf,
    io: Mutex<()>,
}

impl JsonFileFlagStore {
    /// Use `dir` for flag documents. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            io: Mutex::new(()),
        }
    }

    /// The directory holding flag documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, user: &UserId) -> StoreResult<PathBuf> {
        let id = user.as_str();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::Backend(format!(
                "user id '{id}' cannot be used as a file name"
            )));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    async fn load(&self, path: &Path) -> StoreResult<Document> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, path: &Path, doc: &Document) -> StoreResult<()> {
        if doc.is_empty() {
            return match tokio::fs::remove_file(path).await {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(doc)?).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl FlagStore for JsonFileFlagStore {
    async fn get_flag(&self, user: &UserId, scope: &str, key: &str) -> StoreResult<Option<Value>> {
        let path = self.path_for(user)?;
        let _guard = self.io.lock().await;
        let mut doc = self.load(&path).await?;
        Ok(doc.get_mut(scope).and_then(|flags| flags.remove(key)))
    }

    async fn set_flag(
        &self,
        user: &UserId,
        scope: &str,
        key: &str,
        value: Value,
    ) -> StoreResult<()> {
        let path = self.path_for(user)?;
        let _guard = self.io.lock().await;
        let mut doc = self.load(&path).await?;
        doc.entry(scope.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self.save(&path, &doc).await
    }

    async fn unset_flag(&self, user: &UserId, scope: &str, key: &str) -> StoreResult<()> {
        let path = self.path_for(user)?;
        let _guard = self.io.lock().await;
        let mut doc = self.load(&path).await?;
        if let Some(flags) = doc.get_mut(scope) {
            flags.remove(key);
            if flags.is_empty() {
                doc.remove(scope);
            }
        }
        self.save(&path, &doc).await
    }

    async fn users(&self) -> StoreResult<Vec<UserId>> {
        let _guard = self.io.lock().await;
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut users = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let user = UserId::new(stem);
            if self.path_for(&user).is_err() {
                debug!(file = %path.display(), "ignoring file that is not a user document");
                continue;
            }
            users.push(user);
        }
        users.sort();
        Ok(users)
    }
}
