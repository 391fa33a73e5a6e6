//! (キー, ロケール) 単位の冪等な翻訳 upsert

use crate::model::Translation;
use crate::store::{
    KeyRepository,
    LocaleRepository,
    MemoryStore,
    StoreResult,
    TranslationRepository,
};

/// シーダーが書き込みに使う 3 つのリポジトリ
#[derive(Debug)]
pub struct Repositories<'a, K, L, T> {
    pub keys: &'a K,
    pub locales: &'a L,
    pub translations: &'a T,
}

// derive(Clone, Copy) だと K, L, T: Copy が必要になる
impl<K, L, T> Clone for Repositories<'_, K, L, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, L, T> Copy for Repositories<'_, K, L, T> {}

impl<'a> Repositories<'a, MemoryStore, MemoryStore, MemoryStore> {
    /// 1 つのストアで 3 つのリポジトリをまとめて作る
    #[must_use]
    pub const fn from_store(store: &'a MemoryStore) -> Self {
        Self { keys: store, locales: store, translations: store }
    }
}

/// [`Repositories::ensure_translation`] の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// 新しい行を書き込んだ
    Created,
    /// 値が異なっていたので上書きした
    Updated,
    /// 既に同じ値（書き込みなし）
    Unchanged,
    /// キーが未登録（書き込みなし）
    MissingKey,
    /// ロケールが未登録（書き込みなし）
    MissingLocale,
}

impl<K, L, T> Repositories<'_, K, L, T>
where
    K: KeyRepository,
    L: LocaleRepository,
    T: TranslationRepository,
{
    /// (`key_name`, `locale_code`) の翻訳を `desired_value` にそろえる
    ///
    /// 書き込むのは高々 1 行で、同じ引数で再実行しても何も書かない。
    /// 値は `{count}` などのプレースホルダーも含めてそのまま保存する。
    ///
    /// 未登録キーは WARN を出してスキップ、未登録ロケールはログなしでスキップ。
    ///
    /// # Errors
    /// リポジトリのエラーをそのまま返す
    pub async fn ensure_translation(
        &self,
        key_name: &str,
        locale_code: &str,
        desired_value: &str,
        actor: &str,
    ) -> StoreResult<UpsertOutcome> {
        let Some(key) = self.keys.find_key_by_name(key_name).await? else {
            tracing::warn!(key = %key_name, "Translation key not found: {key_name}");
            return Ok(UpsertOutcome::MissingKey);
        };

        let Some(locale) = self.locales.find_locale_by_code(locale_code).await? else {
            return Ok(UpsertOutcome::MissingLocale);
        };

        let Some(key_id) = key.id else {
            // リポジトリから返る行は保存済み
            return Ok(UpsertOutcome::MissingKey);
        };
        let Some(locale_id) = locale.id else {
            return Ok(UpsertOutcome::MissingLocale);
        };

        match self.translations.find_translation(&key, &locale).await? {
            None => {
                let translation = Translation::new(key_id, locale_id, desired_value, actor);
                self.translations.save_translation(translation).await?;
                tracing::debug!(key = %key_name, locale = %locale_code, "Created translation");
                Ok(UpsertOutcome::Created)
            }
            Some(mut existing) if existing.value != desired_value => {
                existing.value = desired_value.to_string();
                existing.updated_by = actor.to_string();
                self.translations.save_translation(existing).await?;
                tracing::debug!(key = %key_name, locale = %locale_code, "Updated translation");
                Ok(UpsertOutcome::Updated)
            }
            Some(_) => {
                tracing::debug!(key = %key_name, locale = %locale_code, "Translation unchanged");
                Ok(UpsertOutcome::Unchanged)
            }
        }
    }
}
