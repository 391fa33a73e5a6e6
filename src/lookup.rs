//! 翻訳ストアの参照側（フォールバック付き検索と統計）

use std::collections::{
    BTreeMap,
    HashMap,
    HashSet,
};
use std::fmt;

use serde::Serialize;

use crate::model::{
    KeyId,
    Locale,
    TranslationKey,
};
use crate::seed::Repositories;
use crate::store::{
    KeyRepository,
    LocaleRepository,
    StoreResult,
    TranslationRepository,
};

/// 検索した値の出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationSource {
    /// 指定ロケールの翻訳
    Locale,
    /// デフォルトロケールの翻訳
    DefaultLocale,
    /// キーの `default_value`
    KeyDefault,
    /// 見つからないのでキー名そのもの
    KeyName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTranslation {
    pub value: String,
    pub source: TranslationSource,
}

/// 有効なキーに対するロケールの翻訳率
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleCompletion {
    pub code: String,
    pub name: String,
    pub translated: usize,
    pub total: usize,
    /// 翻訳率（0.01% 単位、`9_950` は 99.50%）
    pub rate_basis_points: usize,
}

impl LocaleCompletion {
    fn new(locale: &Locale, translated: usize, total: usize) -> Self {
        let rate_basis_points =
            if total == 0 { 0 } else { (translated * 10_000 + total / 2) / total };
        Self {
            code: locale.code.clone(),
            name: locale.name.clone(),
            translated,
            total,
            rate_basis_points,
        }
    }

    /// `NN.NN%` 形式の翻訳率
    #[must_use]
    pub fn rate(&self) -> String {
        format!("{}.{:02}%", self.rate_basis_points / 100, self.rate_basis_points % 100)
    }
}

impl fmt::Display for LocaleCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}/{} {}",
            self.code,
            self.name,
            self.translated,
            self.total,
            self.rate()
        )
    }
}

/// 3 つのリポジトリを使った検索
#[derive(Debug)]
pub struct I18nLookup<'a, K, L, T> {
    repos: Repositories<'a, K, L, T>,
}

impl<'a, K, L, T> I18nLookup<'a, K, L, T>
where
    K: KeyRepository,
    L: LocaleRepository,
    T: TranslationRepository,
{
    #[must_use]
    pub const fn new(repos: Repositories<'a, K, L, T>) -> Self {
        Self { repos }
    }

    /// `locale_code` での `key_name` の有効な翻訳
    async fn active_value(&self, key_name: &str, locale_code: &str) -> StoreResult<Option<String>> {
        let Some(key) = self.repos.keys.find_key_by_name(key_name).await? else {
            return Ok(None);
        };
        let Some(locale) = self.repos.locales.find_locale_by_code(locale_code).await? else {
            return Ok(None);
        };
        let translation = self.repos.translations.find_translation(&key, &locale).await?;
        Ok(translation.filter(|t| t.is_active).map(|t| t.value))
    }

    /// `locale_code` での `key_name` のテキストを検索する
    ///
    /// フォールバックなしでは有効な翻訳がなければ `None`。
    /// フォールバックありではデフォルトロケールの翻訳、キーの既定値、キー名の順に探す。
    pub async fn translation(
        &self,
        key_name: &str,
        locale_code: &str,
        use_fallback: bool,
    ) -> StoreResult<Option<ResolvedTranslation>> {
        if let Some(value) = self.active_value(key_name, locale_code).await? {
            return Ok(Some(ResolvedTranslation { value, source: TranslationSource::Locale }));
        }
        if !use_fallback {
            return Ok(None);
        }

        if let Some(default_locale) = self.repos.locales.default_locale().await?
            && default_locale.code != locale_code
            && let Some(value) = self.active_value(key_name, &default_locale.code).await?
        {
            tracing::debug!(
                key = %key_name,
                locale = %default_locale.code,
                "Using default locale fallback"
            );
            let source = TranslationSource::DefaultLocale;
            return Ok(Some(ResolvedTranslation { value, source }));
        }

        if let Some(key) = self.repos.keys.find_key_by_name(key_name).await?
            && let Some(value) = key.default_value
        {
            tracing::debug!(key = %key_name, "Using key default value fallback");
            return Ok(Some(ResolvedTranslation { value, source: TranslationSource::KeyDefault }));
        }

        tracing::warn!(
            key = %key_name,
            locale = %locale_code,
            "No translation found, returning key name"
        );
        Ok(Some(ResolvedTranslation {
            value: key_name.to_string(),
            source: TranslationSource::KeyName,
        }))
    }

    /// ロケールの有効な翻訳（キー名 -> 値）
    pub async fn translations_map(
        &self,
        locale_code: &str,
    ) -> StoreResult<BTreeMap<String, String>> {
        let Some(locale) = self.repos.locales.find_locale_by_code(locale_code).await? else {
            return Ok(BTreeMap::new());
        };
        let key_names: HashMap<KeyId, String> = self
            .repos
            .keys
            .all_keys()
            .await?
            .into_iter()
            .filter_map(|key| key.id.map(|id| (id, key.key_name)))
            .collect();

        let map: BTreeMap<String, String> = self
            .repos
            .translations
            .translations_for_locale(&locale)
            .await?
            .into_iter()
            .filter(|translation| translation.is_active)
            .filter_map(|translation| {
                key_names.get(&translation.key_id).map(|name| (name.clone(), translation.value))
            })
            .collect();

        tracing::debug!(locale = %locale_code, "Loaded {} translations", map.len());
        Ok(map)
    }

    /// `locale_code` に有効な翻訳がない有効なキー名
    pub async fn missing_keys(&self, locale_code: &str) -> StoreResult<Vec<TranslationKey>> {
        let translated = match self.repos.locales.find_locale_by_code(locale_code).await? {
            Some(locale) => self.translated_key_ids(&locale).await?,
            None => HashSet::new(),
        };

        let mut missing: Vec<TranslationKey> = self
            .repos
            .keys
            .all_keys()
            .await?
            .into_iter()
            .filter(|key| key.is_active)
            .filter(|key| key.id.is_none_or(|id| !translated.contains(&id)))
            .collect();
        missing.sort_by(|a, b| a.key_name.cmp(&b.key_name));
        Ok(missing)
    }

    /// 有効な全ロケールの翻訳率（並び順）
    pub async fn completion_stats(&self) -> StoreResult<Vec<LocaleCompletion>> {
        let active_keys: HashSet<KeyId> = self
            .repos
            .keys
            .all_keys()
            .await?
            .into_iter()
            .filter(|key| key.is_active)
            .filter_map(|key| key.id)
            .collect();

        let mut stats = Vec::new();
        for locale in self.repos.locales.all_locales().await? {
            if !locale.is_active {
                continue;
            }
            let translated = self
                .translated_key_ids(&locale)
                .await?
                .intersection(&active_keys)
                .count();
            stats.push(LocaleCompletion::new(&locale, translated, active_keys.len()));
        }
        Ok(stats)
    }

    /// 有効なロケールならそのコード、なければデフォルトロケールのコード
    ///
    /// どちらもなければ `None`。
    pub async fn resolve_locale_code(
        &self,
        requested: Option<&str>,
    ) -> StoreResult<Option<String>> {
        if let Some(code) = requested
            && let Some(locale) = self.repos.locales.find_locale_by_code(code).await?
            && locale.is_active
        {
            return Ok(Some(locale.code));
        }
        Ok(self.repos.locales.default_locale().await?.map(|locale| locale.code))
    }

    async fn translated_key_ids(&self, locale: &Locale) -> StoreResult<HashSet<KeyId>> {
        Ok(self
            .repos
            .translations
            .translations_for_locale(locale)
            .await?
            .into_iter()
            .filter(|translation| translation.is_active)
            .map(|translation| translation.key_id)
            .collect())
    }
}
