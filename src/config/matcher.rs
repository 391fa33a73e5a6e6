//! シードファイルとキーカタログのパターンマッチャー

use std::path::{
    self,
    Component,
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::SeedSettings;
use super::loader::CONFIG_FILE_NAME;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid seed file pattern '{pattern}': {source}")]
    InvalidSeedPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid key catalog pattern '{pattern}': {source}")]
    InvalidKeyCatalogPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// ワークスペース内ファイルの用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    KeyCatalog,
    SeedFile,
}

/// 設定された glob パターンでファイルを分類する
///
/// キーカタログのパターンがシードファイルより優先。設定ファイルと
/// ストアのスナップショットは対象外。
#[derive(Debug, Clone)]
pub struct FileMatcher {
    workspace_root: PathBuf,
    seed_include_set: GlobSet,
    seed_exclude_set: GlobSet,
    key_catalog_set: GlobSet,
    reserved: Vec<PathBuf>,
}

impl FileMatcher {
    /// 設定からマッチャーを作成
    pub fn new(workspace_root: PathBuf, settings: &SeedSettings) -> Result<Self, MatcherError> {
        let seed_include_set =
            Self::build_glob_set(&settings.seed_files.include_patterns, |pattern, source| {
                MatcherError::InvalidSeedPattern { pattern, source }
            })?;

        let seed_exclude_set =
            Self::build_glob_set(&settings.seed_files.exclude_patterns, |pattern, source| {
                MatcherError::InvalidExcludePattern { pattern, source }
            })?;

        let key_catalog_set =
            Self::build_glob_set(&settings.key_catalog.include_patterns, |pattern, source| {
                MatcherError::InvalidKeyCatalogPattern { pattern, source }
            })?;

        let mut reserved = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(store_path) = relative_store_path(&workspace_root, &settings.store.path) {
            reserved.push(store_path);
        }

        Ok(Self { workspace_root, seed_include_set, seed_exclude_set, key_catalog_set, reserved })
    }

    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// ワークスペースルート配下の絶対パスを分類する
    #[must_use]
    pub fn classify(&self, absolute_path: &Path) -> Option<AssetKind> {
        let relative_path = absolute_path.strip_prefix(&self.workspace_root).ok()?;
        self.classify_relative(relative_path)
    }

    /// ワークスペースルートからの相対パスを分類する
    #[must_use]
    pub fn classify_relative(&self, relative_path: &Path) -> Option<AssetKind> {
        let relative_path = without_cur_dir(relative_path);
        if self.reserved.contains(&relative_path) {
            return None;
        }
        if self.key_catalog_set.is_match(&relative_path) {
            return Some(AssetKind::KeyCatalog);
        }
        if self.seed_include_set.is_match(&relative_path)
            && !self.seed_exclude_set.is_match(&relative_path)
        {
            return Some(AssetKind::SeedFile);
        }
        None
    }
}

/// `.` 成分を取り除いたパス（`./a/./b.json` → `a/b.json`）
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components().filter(|component| *component != Component::CurDir).collect()
}

/// ストアのパスをワークスペースルートからの相対パスにする
///
/// 相対パスはルート基準で解決する（`ConfigManager::store_path` と同じ）。
/// ルートの外にあるストアは走査対象にならないので `None`。
fn relative_store_path(workspace_root: &Path, store_path: &str) -> Option<PathBuf> {
    let store_path = Path::new(store_path);
    if store_path.is_relative() {
        return Some(without_cur_dir(store_path));
    }
    let root = path::absolute(workspace_root).unwrap_or_else(|_| workspace_root.to_path_buf());
    without_cur_dir(store_path).strip_prefix(without_cur_dir(&root)).ok().map(Path::to_path_buf)
}
