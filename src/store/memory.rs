//! インメモリの翻訳ストア

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{
    Deserialize,
    Serialize,
};
use tokio::sync::Mutex;

use super::{
    KeyRepository,
    LocaleRepository,
    StoreError,
    StoreResult,
    TranslationRepository,
};
use crate::model::{
    KeyId,
    Locale,
    LocaleId,
    Translation,
    TranslationId,
    TranslationKey,
};

/// 3 つのリポジトリを実装する共有インメモリテーブル
///
/// クローンは同じテーブルを共有する。キー名・ロケールコード・(キー, ロケール) の
/// 一意性は挿入時に検査し、検査と挿入の間の競合は重複行ではなく
/// [`StoreError::UniqueViolation`] になる。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// 1 つのロックで守るテーブル
    pub(super) tables: Arc<Mutex<Tables>>,
}

/// 行と検索用インデックス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct Tables {
    /// スナップショット形式のバージョン
    pub(super) version: u32,
    /// 最後に払い出した ID（全テーブル共通の連番）
    pub(super) last_id: u64,
    /// ロケール
    pub(super) locales: Vec<Locale>,
    /// 翻訳キー
    pub(super) keys: Vec<TranslationKey>,
    /// 翻訳
    pub(super) translations: Vec<Translation>,

    /// ロケールコード → 行番号
    #[serde(skip)]
    locale_by_code: HashMap<String, usize>,
    /// キー名 → 行番号
    #[serde(skip)]
    key_by_name: HashMap<String, usize>,
    /// (キー, ロケール) → 行番号
    #[serde(skip)]
    translation_by_pair: HashMap<(KeyId, LocaleId), usize>,
}

impl Tables {
    /// デシリアライズ後にインデックスを再構築する
    ///
    /// # Errors
    /// 一意性が崩れている場合は `UniqueViolation`
    pub(super) fn rebuild_indexes(&mut self) -> StoreResult<()> {
        self.locale_by_code.clear();
        self.key_by_name.clear();
        self.translation_by_pair.clear();

        for (index, locale) in self.locales.iter().enumerate() {
            if self.locale_by_code.insert(locale.code.clone(), index).is_some() {
                return Err(unique("locale", &locale.code));
            }
        }
        for (index, key) in self.keys.iter().enumerate() {
            if self.key_by_name.insert(key.key_name.clone(), index).is_some() {
                return Err(unique("translation key", &key.key_name));
            }
        }
        for (index, translation) in self.translations.iter().enumerate() {
            let pair = (translation.key_id, translation.locale_id);
            if self.translation_by_pair.insert(pair, index).is_some() {
                return Err(unique("translation", &format!("{pair:?}")));
            }
        }
        Ok(())
    }

    /// 次の ID を払い出す
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// ロケールを挿入または更新
    fn save_locale(&mut self, mut locale: Locale) -> StoreResult<Locale> {
        let Some(id) = locale.id else {
            if self.locale_by_code.contains_key(&locale.code) {
                return Err(unique("locale", &locale.code));
            }
            locale.id = Some(LocaleId(self.next_id()));
            self.locale_by_code.insert(locale.code.clone(), self.locales.len());
            self.locales.push(locale.clone());
            return Ok(locale);
        };

        let index = self
            .locales
            .iter()
            .position(|row| row.id == Some(id))
            .ok_or(StoreError::NotFound { entity: "locale", id: id.0 })?;
        if let Some(&other) = self.locale_by_code.get(&locale.code)
            && other != index
        {
            return Err(unique("locale", &locale.code));
        }
        if let Some(row) = self.locales.get_mut(index) {
            self.locale_by_code.remove(&row.code);
            self.locale_by_code.insert(locale.code.clone(), index);
            *row = locale.clone();
        }
        Ok(locale)
    }

    /// 翻訳キーを挿入または更新
    fn save_key(&mut self, mut key: TranslationKey) -> StoreResult<TranslationKey> {
        let Some(id) = key.id else {
            if self.key_by_name.contains_key(&key.key_name) {
                return Err(unique("translation key", &key.key_name));
            }
            key.id = Some(KeyId(self.next_id()));
            self.key_by_name.insert(key.key_name.clone(), self.keys.len());
            self.keys.push(key.clone());
            return Ok(key);
        };

        let index = self
            .keys
            .iter()
            .position(|row| row.id == Some(id))
            .ok_or(StoreError::NotFound { entity: "translation key", id: id.0 })?;
        if let Some(&other) = self.key_by_name.get(&key.key_name)
            && other != index
        {
            return Err(unique("translation key", &key.key_name));
        }
        if let Some(row) = self.keys.get_mut(index) {
            self.key_by_name.remove(&row.key_name);
            self.key_by_name.insert(key.key_name.clone(), index);
            *row = key.clone();
        }
        Ok(key)
    }

    /// 翻訳を挿入または更新（`created_at` / `updated_at` を記録）
    fn save_translation(&mut self, mut translation: Translation) -> StoreResult<Translation> {
        let pair = (translation.key_id, translation.locale_id);
        let now = Utc::now();

        let Some(id) = translation.id else {
            if self.translation_by_pair.contains_key(&pair) {
                return Err(unique("translation", &format!("{pair:?}")));
            }
            translation.id = Some(TranslationId(self.next_id()));
            translation.created_at = Some(now);
            translation.updated_at = Some(now);
            self.translation_by_pair.insert(pair, self.translations.len());
            self.translations.push(translation.clone());
            return Ok(translation);
        };

        let index = self
            .translations
            .iter()
            .position(|row| row.id == Some(id))
            .ok_or(StoreError::NotFound { entity: "translation", id: id.0 })?;
        if let Some(&other) = self.translation_by_pair.get(&pair)
            && other != index
        {
            return Err(unique("translation", &format!("{pair:?}")));
        }
        if let Some(row) = self.translations.get_mut(index) {
            self.translation_by_pair.remove(&(row.key_id, row.locale_id));
            self.translation_by_pair.insert(pair, index);
            translation.created_at = row.created_at;
            translation.updated_at = Some(now);
            *row = translation.clone();
        }
        Ok(translation)
    }
}

/// `UniqueViolation` エラーを作る
fn unique(entity: &'static str, value: &str) -> StoreError {
    StoreError::UniqueViolation { entity, value: value.to_string() }
}

impl MemoryStore {
    /// 空のストアを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// テーブルごと複製する（ドライラン用）
    pub async fn fork(&self) -> Self {
        let tables = self.tables.lock().await.clone();
        Self { tables: Arc::new(Mutex::new(tables)) }
    }

    /// (ロケール, キー, 翻訳) の行数
    pub async fn row_counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.lock().await;
        (tables.locales.len(), tables.keys.len(), tables.translations.len())
    }
}

impl KeyRepository for MemoryStore {
    async fn find_key_by_name(&self, key_name: &str) -> StoreResult<Option<TranslationKey>> {
        let tables = self.tables.lock().await;
        Ok(tables.key_by_name.get(key_name).and_then(|&index| tables.keys.get(index)).cloned())
    }

    async fn save_key(&self, key: TranslationKey) -> StoreResult<TranslationKey> {
        self.tables.lock().await.save_key(key)
    }

    async fn all_keys(&self) -> StoreResult<Vec<TranslationKey>> {
        Ok(self.tables.lock().await.keys.clone())
    }
}

impl LocaleRepository for MemoryStore {
    async fn find_locale_by_code(&self, code: &str) -> StoreResult<Option<Locale>> {
        let tables = self.tables.lock().await;
        Ok(tables.locale_by_code.get(code).and_then(|&index| tables.locales.get(index)).cloned())
    }

    async fn save_locale(&self, locale: Locale) -> StoreResult<Locale> {
        self.tables.lock().await.save_locale(locale)
    }

    async fn all_locales(&self) -> StoreResult<Vec<Locale>> {
        let mut locales = self.tables.lock().await.locales.clone();
        locales.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.code.cmp(&b.code)));
        Ok(locales)
    }

    async fn default_locale(&self) -> StoreResult<Option<Locale>> {
        let tables = self.tables.lock().await;
        Ok(tables.locales.iter().find(|locale| locale.is_default).cloned())
    }
}

impl TranslationRepository for MemoryStore {
    async fn find_translation(
        &self,
        key: &TranslationKey,
        locale: &Locale,
    ) -> StoreResult<Option<Translation>> {
        let (Some(key_id), Some(locale_id)) = (key.id, locale.id) else {
            return Ok(None);
        };
        let tables = self.tables.lock().await;
        Ok(tables
            .translation_by_pair
            .get(&(key_id, locale_id))
            .and_then(|&index| tables.translations.get(index))
            .cloned())
    }

    async fn save_translation(&self, translation: Translation) -> StoreResult<Translation> {
        self.tables.lock().await.save_translation(translation)
    }

    async fn translations_for_locale(&self, locale: &Locale) -> StoreResult<Vec<Translation>> {
        let Some(locale_id) = locale.id else {
            return Ok(Vec::new());
        };
        let tables = self.tables.lock().await;
        Ok(tables.translations.iter().filter(|t| t.locale_id == locale_id).cloned().collect())
    }
}
