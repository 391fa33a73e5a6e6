use std::collections::HashSet;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// フィールドの JSON パス（例: "locales[0].code"）
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedSettings {
    pub seed_files: SeedFilesConfig,
    pub key_catalog: KeyCatalogConfig,

    /// シードファイルのネストしたキーを連結する（`{"login": {"title": ..}}` → `login.title`）
    pub key_separator: String,

    /// シーダーが書き込む行の作成者・更新者
    pub actor: String,

    /// シード前に登録するロケール。それ以外のロケールのエントリは黙ってスキップする。
    pub locales: Vec<LocaleConfig>,

    pub store: StoreConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl Default for SeedFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*.json".to_string()],
            exclude_patterns: vec!["keys/**".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyCatalogConfig {
    pub include_patterns: Vec<String>,
}

impl Default for KeyCatalogConfig {
    fn default() -> Self {
        Self { include_patterns: vec!["keys/**/*.json".to_string()] }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleConfig {
    pub code: String,
    pub name: String,
    /// 省略時は `name`
    #[serde(default)]
    pub native_name: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    /// 省略時は `locales` 内の位置（1 始まり）
    #[serde(default)]
    pub sort_order: Option<i32>,
}

impl LocaleConfig {
    #[must_use]
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            native_name: None,
            is_default: false,
            sort_order: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// スナップショットファイル（ワークスペースルート基準）
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: "i18n-store.json".to_string() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DiagnosticsConfig {
    pub duplicate_keys: bool,
    pub unknown_keys: bool,
    pub placeholder_mismatch: bool,
    /// シードにないカタログキー（ロケールごと）。件数が多いので既定では無効
    pub missing_translations: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            duplicate_keys: true,
            unknown_keys: true,
            placeholder_mismatch: true,
            missing_translations: false,
        }
    }
}

impl SeedSettings {
    /// # Errors
    /// - 必須フィールドが空
    /// - 無効な glob パターン
    /// - ロケールコードの重複、または複数のデフォルトロケール
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.actor.trim().is_empty() {
            errors.push(ValidationError::new(
                "actor",
                "The actor cannot be empty. It is recorded as creator and modifier, for example: \"system\"",
            ));
        }

        validate_patterns(
            &mut errors,
            "seedFiles.includePatterns",
            &self.seed_files.include_patterns,
            true,
        );
        validate_patterns(
            &mut errors,
            "seedFiles.excludePatterns",
            &self.seed_files.exclude_patterns,
            false,
        );
        validate_patterns(
            &mut errors,
            "keyCatalog.includePatterns",
            &self.key_catalog.include_patterns,
            false,
        );

        let mut seen_codes = HashSet::new();
        for (index, locale) in self.locales.iter().enumerate() {
            if locale.code.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("locales[{index}].code"),
                    "The locale code cannot be empty. Example: \"en\"",
                ));
            } else if !seen_codes.insert(locale.code.as_str()) {
                errors.push(ValidationError::new(
                    format!("locales[{index}].code"),
                    format!("Duplicate locale code '{}'", locale.code),
                ));
            }
        }

        if self.locales.iter().filter(|locale| locale.is_default).count() > 1 {
            errors.push(ValidationError::new(
                "locales",
                "At most one locale can be marked 'isDefault'",
            ));
        }

        if self.store.path.trim().is_empty() {
            errors.push(ValidationError::new(
                "store.path",
                "The store path cannot be empty. Example: \"i18n-store.json\"",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// 全パターンが有効な glob か検査する（`required` なら 1 件以上必要）
fn validate_patterns(
    errors: &mut Vec<ValidationError>,
    field: &str,
    patterns: &[String],
    required: bool,
) {
    if required && patterns.is_empty() {
        errors.push(ValidationError::new(
            field,
            "At least one pattern is required. Example: [\"**/*.json\"]",
        ));
    }

    for (index, pattern) in patterns.iter().enumerate() {
        if let Err(e) = globset::Glob::new(pattern) {
            errors.push(ValidationError::new(
                format!("{field}[{index}]"),
                format!("Invalid glob pattern '{pattern}': {e}"),
            ));
        }
    }
}

impl Default for SeedSettings {
    fn default() -> Self {
        let mut korean = LocaleConfig::new("ko", "Korean");
        korean.native_name = Some("한국어".to_string());
        korean.is_default = true;

        Self {
            seed_files: SeedFilesConfig::default(),
            key_catalog: KeyCatalogConfig::default(),
            key_separator: ".".to_string(),
            actor: "system".to_string(),
            locales: vec![korean, LocaleConfig::new("en", "English")],
            store: StoreConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}
