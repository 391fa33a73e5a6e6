//! コマンドラインで報告するエラー

use thiserror::Error;

use crate::config::ConfigError;
use crate::indexer::IndexerError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// 読み込めない資産があるためシードを拒否した
    #[error("{0} seed file(s) could not be loaded; fix them before seeding")]
    LoadFailures(usize),

    #[error("No active locale registered in the store")]
    NoLocale,

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

impl AppError {
    /// 設定の問題は 2、それ以外は 1
    #[must_use]
    pub const fn exit_status(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Indexer(IndexerError::Matcher(_)) => 2,
            _ => 1,
        }
    }
}
