use std::path::PathBuf;

use thiserror::Error;

/// JSON テキストをペアに変換する際のエラー
#[derive(Error, Debug)]
pub enum JsonInputError {
    /// 有効な JSON ではない
    #[error("Invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    /// パーサーの言語設定に失敗
    #[error("Failed to set language for parser: {0}")]
    LanguageSetup(#[from] tree_sitter::LanguageError),
    /// tree-sitter が構文木を返さなかった
    #[error("Failed to parse JSON")]
    ParseFailed,
    /// トップレベルが JSON オブジェクトではない
    #[error("Top-level value must be an object, found {0}")]
    NotAnObject(String),
}

/// シードファイル・キーカタログの読み込みエラー
#[derive(Error, Debug)]
pub enum SeedFileError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: JsonInputError,
    },
}

impl SeedFileError {
    /// 失敗した資産のパス
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}
