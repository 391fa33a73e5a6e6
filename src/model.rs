//! 翻訳ストアに保存されるエンティティ
//!
//! ID は初回保存時にストアが割り当てる。`id` が `None` のものは未保存。

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

/// [`Locale`] の ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocaleId(pub u64);

/// [`TranslationKey`] の ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId(pub u64);

/// [`Translation`] の ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TranslationId(pub u64);

/// 表示言語（`en`, `ko` などのコードで識別）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    pub id: Option<LocaleId>,
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub is_default: bool,
    pub is_active: bool,
    pub sort_order: i32,
}

impl Locale {
    /// 未保存の有効なロケールを作成（デフォルトではない）
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: None,
            code: code.into(),
            native_name: name.clone(),
            name,
            is_default: false,
            is_active: true,
            sort_order: 0,
        }
    }
}

/// UI テキストを指すドット区切りの識別子（`login.title`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationKey {
    pub id: Option<KeyId>,
    pub key_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    /// どのロケールにも翻訳がない場合の最終フォールバック
    pub default_value: Option<String>,
    pub is_active: bool,
}

impl TranslationKey {
    /// メタデータなしの有効なキーを作成
    #[must_use]
    pub fn new(key_name: impl Into<String>) -> Self {
        Self {
            id: None,
            key_name: key_name.into(),
            category: None,
            description: None,
            default_value: None,
            is_active: true,
        }
    }
}

/// (キー, ロケール) に紐づく翻訳テキスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: Option<TranslationId>,
    pub key_id: KeyId,
    pub locale_id: LocaleId,
    pub value: String,
    pub is_active: bool,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Translation {
    /// `actor` を作成者・更新者とする有効な翻訳を作成
    #[must_use]
    pub fn new(key_id: KeyId, locale_id: LocaleId, value: impl Into<String>, actor: &str) -> Self {
        Self {
            id: None,
            key_id,
            locale_id,
            value: value.into(),
            is_active: true,
            created_by: actor.to_string(),
            updated_by: actor.to_string(),
            created_at: None,
            updated_at: None,
        }
    }
}
