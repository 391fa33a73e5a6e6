//! シーダーと検索サービスが使う永続化層
//!
//! シーダーは具体的なストアに依存せず、下の 3 つのリポジトリトレイトに対して
//! ジェネリック。完全一致検索と 1 行単位の保存ができればどのバックエンドでもよい。

/// 全リポジトリトレイトを実装するインメモリテーブル
mod memory;
/// [`MemoryStore`] の JSON スナップショット
mod snapshot;

use std::future::Future;

use thiserror::Error;

pub use memory::MemoryStore;
pub use snapshot::SNAPSHOT_VERSION;

use crate::model::{
    Locale,
    Translation,
    TranslationKey,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// 一意な識別子の行が重複する挿入
    #[error("Unique constraint violated on {entity}: {value}")]
    UniqueViolation { entity: &'static str, value: String },

    #[error("{entity} not found: id {id}")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to access store snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse store snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Unsupported store snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// 翻訳キーの検索と保存
pub trait KeyRepository: Send + Sync {
    /// キー名で完全一致検索
    fn find_key_by_name(
        &self,
        key_name: &str,
    ) -> impl Future<Output = StoreResult<Option<TranslationKey>>> + Send;

    /// `id` が `None` なら挿入、それ以外は更新
    fn save_key(
        &self,
        key: TranslationKey,
    ) -> impl Future<Output = StoreResult<TranslationKey>> + Send;

    fn all_keys(&self) -> impl Future<Output = StoreResult<Vec<TranslationKey>>> + Send;
}

/// ロケールの検索と保存
pub trait LocaleRepository: Send + Sync {
    /// ロケールコードで完全一致検索
    fn find_locale_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = StoreResult<Option<Locale>>> + Send;

    /// `id` が `None` なら挿入、それ以外は更新
    fn save_locale(&self, locale: Locale) -> impl Future<Output = StoreResult<Locale>> + Send;

    /// `sort_order`、コードの順に並べた全ロケール
    fn all_locales(&self) -> impl Future<Output = StoreResult<Vec<Locale>>> + Send;

    fn default_locale(&self) -> impl Future<Output = StoreResult<Option<Locale>>> + Send;
}

/// 翻訳の検索と保存
pub trait TranslationRepository: Send + Sync {
    /// (キー, ロケール) の翻訳を取得
    fn find_translation(
        &self,
        key: &TranslationKey,
        locale: &Locale,
    ) -> impl Future<Output = StoreResult<Option<Translation>>> + Send;

    /// `id` が `None` なら挿入、それ以外は更新
    fn save_translation(
        &self,
        translation: Translation,
    ) -> impl Future<Output = StoreResult<Translation>> + Send;

    fn translations_for_locale(
        &self,
        locale: &Locale,
    ) -> impl Future<Output = StoreResult<Vec<Translation>>> + Send;
}
