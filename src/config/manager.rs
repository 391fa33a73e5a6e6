//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    SeedSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: SeedSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: SeedSettings::default(), workspace_root: None }
    }

    /// 設定を読み込む
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.map_or_else(SeedSettings::default, |ws| {
                tracing::debug!("Loaded workspace settings: {:?}", ws);
                ws
            })
        } else {
            SeedSettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する（`--actor` や `--store` による上書き用）
    ///
    /// 作成者・更新者として記録される `actor` と、スナップショットの保存先
    /// `store.path` が変わった場合はそれぞれログに残す。
    ///
    /// # Errors
    /// バリデーションエラー。エラー時は現在の設定を維持し、
    /// 拒否したフィールド（例: `actor`, `store.path`）を WARN で出力する。
    pub fn update_settings(&mut self, new_settings: SeedSettings) -> Result<(), ConfigError> {
        if let Err(errors) = new_settings.validate() {
            let fields: Vec<&str> = errors.iter().map(|e| e.field_path.as_str()).collect();
            tracing::warn!(
                fields = ?fields,
                actor = %self.current_settings.actor,
                store = %self.current_settings.store.path,
                "Rejected settings override, keeping current settings"
            );
            return Err(ConfigError::ValidationErrors(errors));
        }

        if new_settings.actor != self.current_settings.actor {
            tracing::debug!(
                from = %self.current_settings.actor,
                to = %new_settings.actor,
                "Actor overridden"
            );
        }
        if new_settings.store.path != self.current_settings.store.path {
            tracing::debug!(
                from = %self.current_settings.store.path,
                to = %new_settings.store.path,
                "Store path overridden"
            );
        }

        self.current_settings = new_settings;
        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &SeedSettings {
        &self.current_settings
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// ストアのスナップショットファイルのパス（ワークスペースルート基準）
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        let path = Path::new(&self.current_settings.store.path);
        match &self.workspace_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().actor, "system");
        assert!(manager.workspace_root().is_none());
    }

    /// load_settings: workspace_root が None の場合
    #[rstest]
    fn test_load_settings_without_workspace() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().key_separator, ".");
        assert_eq!(manager.store_path(), PathBuf::from("i18n-store.json"));
    }

    /// load_settings: 設定ファイルがある場合
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"actor": "ci", "store": {"path": "db/store.json"}}"#;
        fs::write(temp_dir.path().join(".i18n-seed.json"), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().actor, "ci");
        assert_eq!(manager.store_path(), temp_dir.path().join("db/store.json"));
    }

    /// load_settings: バリデーションエラー
    #[rstest]
    fn test_load_settings_with_invalid_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".i18n-seed.json"), r#"{"keySeparator": ""}"#).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert!(manager.workspace_root().is_none());
    }

    /// update_settings: 有効な設定で更新成功
    #[rstest]
    fn test_update_settings_valid() {
        let mut manager = ConfigManager::new();
        let mut new_settings = SeedSettings::default();
        new_settings.actor = "admin2".to_string();

        let result = manager.update_settings(new_settings);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().actor, "admin2");
    }

    /// update_settings: 無効な設定でエラー
    #[rstest]
    fn test_update_settings_invalid() {
        let mut manager = ConfigManager::new();
        let mut new_settings = SeedSettings::default();
        new_settings.actor = String::new(); // 空文字は無効

        let result = manager.update_settings(new_settings);

        assert!(result.is_err());
        assert_eq!(manager.get_settings().actor, "system");
    }

    /// update_settings: 無効な上書きはフィールド名付きで拒否され、ストアのパスも維持される
    #[rstest]
    fn test_update_settings_rejects_blank_store_and_actor() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"actor": "ci", "store": {"path": "db/store.json"}}"#;
        fs::write(temp_dir.path().join(".i18n-seed.json"), config_content).unwrap();
        let mut manager = ConfigManager::new();
        manager.load_settings(Some(temp_dir.path().to_path_buf())).unwrap();

        let mut new_settings = manager.get_settings().clone();
        new_settings.actor = " ".to_string();
        new_settings.store.path = String::new();
        let result = manager.update_settings(new_settings);

        let fields: Vec<String> = match result {
            Err(ConfigError::ValidationErrors(errors)) => {
                errors.into_iter().map(|e| e.field_path).collect()
            }
            _ => Vec::new(),
        };
        assert_eq!(fields, vec!["actor", "store.path"]);
        assert_eq!(manager.get_settings().actor, "ci");
        assert_eq!(manager.store_path(), temp_dir.path().join("db/store.json"));
    }
}
