//! キーカタログの入力定義
//!
//! キーカタログは存在する翻訳キーとそのメタデータを列挙する:
//!
//! ```json
//! {
//!   "login.title": { "category": "login", "description": "Login page title", "defaultValue": "Login" },
//!   "common.buttons.save": "Save"
//! }
//! ```
//!
//! 文字列だけの場合は `defaultValue` のみの定義の省略形。

use std::path::PathBuf;

use serde::Deserialize;

use super::error::SeedFileError;
use super::json_pairs::{
    PairValue,
    collect_pairs,
};
use super::seed_file::InvalidEntry;
use crate::types::SourceRange;

/// 翻訳キー 1 件のメタデータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    pub key_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub default_value: Option<String>,
    pub range: SourceRange,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawDefinition {
    category: Option<String>,
    description: Option<String>,
    default_value: Option<String>,
}

/// パース済みキーカタログ（ソース順、重複を保持）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCatalogFile {
    /// ワークスペースルートからの相対パス
    pub path: PathBuf,
    pub definitions: Vec<KeyDefinition>,
    pub invalid_entries: Vec<InvalidEntry>,
}

impl KeyCatalogFile {
    /// キーカタログをパースする
    ///
    /// # Errors
    /// JSON オブジェクトでない場合は [`SeedFileError::Parse`]
    pub fn parse(path: PathBuf, text: &str) -> Result<Self, SeedFileError> {
        let pairs = collect_pairs(text, None)
            .map_err(|source| SeedFileError::Parse { path: path.clone(), source })?;

        let mut definitions = Vec::with_capacity(pairs.len());
        let mut invalid_entries = Vec::new();
        for pair in pairs {
            let raw = match &pair.value {
                PairValue::String(default_value) => Some(RawDefinition {
                    default_value: Some(default_value.clone()),
                    ..RawDefinition::default()
                }),
                PairValue::Object(raw) => match serde_json::from_str::<RawDefinition>(raw) {
                    Ok(raw) => Some(raw),
                    Err(e) => {
                        tracing::debug!(key = %pair.key, "Invalid key definition: {e}");
                        None
                    }
                },
                PairValue::Other(_) => None,
            };

            match raw {
                Some(raw) => definitions.push(KeyDefinition {
                    key_name: pair.key,
                    category: raw.category,
                    description: raw.description,
                    default_value: raw.default_value,
                    range: pair.key_range,
                }),
                None => {
                    let kind = match pair.value {
                        PairValue::Other(kind) => kind,
                        PairValue::String(_) | PairValue::Object(_) => "object".to_string(),
                    };
                    invalid_entries.push(InvalidEntry {
                        key: pair.key,
                        kind,
                        range: pair.value_range,
                    });
                }
            }
        }

        tracing::debug!(
            path = %path.display(),
            definitions = definitions.len(),
            "Parsed key catalog"
        );

        Ok(Self { path, definitions, invalid_entries })
    }
}
