//! インデクサーの型定義

use std::path::PathBuf;

use thiserror::Error;

use crate::config::MatcherError;
use crate::input::{
    KeyCatalogFile,
    SeedFile,
    SeedFileError,
};

/// ワークスペースルート配下のシード資産（パス順）
#[derive(Debug, Default)]
pub struct SeedWorkspace {
    pub root: PathBuf,
    pub key_catalogs: Vec<KeyCatalogFile>,
    pub seed_files: Vec<SeedFile>,
    /// 読み込みまたはパースに失敗した資産
    pub failures: Vec<SeedFileError>,
}

impl SeedWorkspace {
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// 全シードファイルのエントリ数（重複を含む）
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.seed_files.iter().map(|file| file.entries.len()).sum()
    }

    /// 全カタログのキー定義数（重複を含む）
    #[must_use]
    pub fn definition_count(&self) -> usize {
        self.key_catalogs.iter().map(|catalog| catalog.definitions.len()).sum()
    }
}

#[derive(Error, Debug)]
pub enum IndexerError {
    /// ワークスペースルートなしで設定が読み込まれた
    #[error("No workspace root configured")]
    NoWorkspaceRoot,
    /// ワークスペースルートを走査できない
    #[error("Workspace root is not a directory: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}
