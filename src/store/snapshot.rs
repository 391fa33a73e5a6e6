//! [`MemoryStore`] の JSON スナップショット

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::memory::Tables;
use super::{
    MemoryStore,
    StoreError,
    StoreResult,
};

/// 現在のファイル形式のバージョン
pub const SNAPSHOT_VERSION: u32 = 1;

impl MemoryStore {
    /// スナップショットファイルからストアを開く
    ///
    /// ファイルがなければ空のストア。ファイルは [`MemoryStore::save_snapshot`] で作られる。
    ///
    /// # Errors
    /// - 読み込みエラー
    /// - JSON パースエラー、または未対応のバージョン
    /// - 一意性が崩れた行
    pub async fn open_snapshot(path: &Path) -> StoreResult<Self> {
        if !tokio::fs::try_exists(path).await? {
            tracing::debug!(path = %path.display(), "Store snapshot not found, starting empty");
            return Ok(Self::new());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let mut tables: Tables = serde_json::from_str(&content)?;
        if tables.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: tables.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        tables.rebuild_indexes()?;

        tracing::debug!(
            path = %path.display(),
            locales = tables.locales.len(),
            keys = tables.keys.len(),
            translations = tables.translations.len(),
            "Loaded store snapshot"
        );
        Ok(Self { tables: Arc::new(Mutex::new(tables)) })
    }

    /// ストアを `path` にアトミックに書き出す
    ///
    /// # Errors
    /// シリアライズ、書き込み、リネームのいずれかに失敗した場合
    pub async fn save_snapshot(&self, path: &Path) -> StoreResult<()> {
        let content = {
            let mut tables = self.tables.lock().await;
            tables.version = SNAPSHOT_VERSION;
            serde_json::to_string_pretty(&*tables)?
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, path).await?;

        tracing::debug!(path = %path.display(), "Saved store snapshot");
        Ok(())
    }
}
