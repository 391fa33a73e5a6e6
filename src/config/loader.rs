//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    SeedSettings,
};

/// ワークスペースの設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".i18n-seed.json";

/// ワークスペースから設定を読み込む
///
/// `.i18n-seed.json` ファイルを探して読み込む。ロケール一覧や `actor`、
/// ストアのパスなど省略したフィールドは既定値になる。
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<SeedSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: SeedSettings = serde_json::from_str(&content).inspect_err(|err| {
        tracing::warn!(path = %config_path.display(), "Invalid seed configuration: {err}");
    })?;

    Ok(Some(settings))
}
