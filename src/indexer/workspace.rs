//! シード資産の探索
use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use crate::config::{
    AssetKind,
    ConfigManager,
    FileMatcher,
};
use crate::indexer::types::{
    IndexerError,
    SeedWorkspace,
};
use crate::input::{
    KeyCatalogFile,
    SeedFile,
    SeedFileError,
};

/// ワークスペースのシード資産を探してパースする
#[derive(Clone, Debug)]
pub struct SeedIndexer {
    workspace_root: PathBuf,
    matcher: FileMatcher,
    locale_codes: Vec<String>,
    key_separator: String,
}

enum LoadedAsset {
    KeyCatalog(KeyCatalogFile),
    SeedFile(SeedFile),
}

impl SeedIndexer {
    /// 新しいインデクサーを作成
    ///
    /// # Errors
    /// - ワークスペースルートが未設定
    /// - 不正な glob パターン
    pub fn new(config_manager: &ConfigManager) -> Result<Self, IndexerError> {
        let workspace_root =
            config_manager.workspace_root().cloned().ok_or(IndexerError::NoWorkspaceRoot)?;
        let settings = config_manager.get_settings();
        let matcher = FileMatcher::new(workspace_root.clone(), settings)?;

        Ok(Self {
            workspace_root,
            matcher,
            locale_codes: settings.locales.iter().map(|locale| locale.code.clone()).collect(),
            key_separator: settings.key_separator.clone(),
        })
    }

    /// ワークスペースをインデックス
    ///
    /// 読み込みやパースに失敗したファイルは `failures` に集められる。
    ///
    /// # Errors
    /// ワークスペースルートがディレクトリでない場合
    pub async fn index_workspace(&self) -> Result<SeedWorkspace, IndexerError> {
        tracing::debug!(workspace_path = %self.workspace_root.display(), "Indexing workspace");
        if !self.workspace_root.is_dir() {
            return Err(IndexerError::InvalidPath(self.workspace_root.clone()));
        }

        let files = self.find_asset_files();
        // 並列処理でファイルを読み込む
        let futures: Vec<_> =
            files.into_iter().map(|(path, kind)| self.load_asset(path, kind)).collect();
        let results = futures::future::join_all(futures).await;

        let mut workspace =
            SeedWorkspace { root: self.workspace_root.clone(), ..SeedWorkspace::default() };
        for result in results {
            match result {
                Ok(LoadedAsset::KeyCatalog(catalog)) => workspace.key_catalogs.push(catalog),
                Ok(LoadedAsset::SeedFile(seed_file)) => workspace.seed_files.push(seed_file),
                Err(e) => {
                    tracing::warn!("{e}");
                    workspace.failures.push(e);
                }
            }
        }

        workspace.key_catalogs.sort_by(|a, b| a.path.cmp(&b.path));
        workspace.seed_files.sort_by(|a, b| a.path.cmp(&b.path));
        workspace.failures.sort_by(|a, b| a.path().cmp(b.path()));

        tracing::info!(
            key_catalogs = workspace.key_catalogs.len(),
            seed_files = workspace.seed_files.len(),
            failures = workspace.failures.len(),
            "Indexed workspace"
        );
        Ok(workspace)
    }

    /// 単一ファイルを読み込んでパース
    async fn load_asset(
        &self,
        path: PathBuf,
        kind: AssetKind,
    ) -> Result<LoadedAsset, SeedFileError> {
        let content = match tokio::fs::read_to_string(self.workspace_root.join(&path)).await {
            Ok(content) => content,
            Err(source) => return Err(SeedFileError::Read { path, source }),
        };

        match kind {
            AssetKind::KeyCatalog => {
                KeyCatalogFile::parse(path, &content).map(LoadedAsset::KeyCatalog)
            }
            AssetKind::SeedFile => {
                SeedFile::parse(path, &content, &self.locale_codes, &self.key_separator)
                    .map(LoadedAsset::SeedFile)
            }
        }
    }

    /// シードファイルを検索（ワークスペースからの相対パスを返す）
    fn find_asset_files(&self) -> Vec<(PathBuf, AssetKind)> {
        let mut found_files = Vec::new();

        // ignore クレートでファイルを走査
        for result in WalkBuilder::new(&self.workspace_root)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            // ファイルのみを対象
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let Ok(relative_path) = entry.path().strip_prefix(&self.workspace_root) else {
                continue;
            };
            if let Some(kind) = self.matcher.classify_relative(relative_path) {
                found_files.push((relative_path.to_path_buf(), kind));
            }
        }

        found_files
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}
