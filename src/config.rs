//! ワークスペースの設定（`.i18n-seed.json`）
/// 設定ファイルの読み込み
mod loader;
/// 設定管理
mod manager;
/// シード資産のパターンマッチャー
mod matcher;
/// 設定の型
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use matcher::{
    AssetKind,
    FileMatcher,
    MatcherError,
};
pub use types::{
    ConfigError,
    DiagnosticsConfig,
    KeyCatalogConfig,
    LocaleConfig,
    SeedFilesConfig,
    SeedSettings,
    StoreConfig,
    ValidationError,
};
