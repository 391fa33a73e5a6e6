//! キーカタログのシード

use serde::Serialize;

use crate::input::{
    KeyCatalogFile,
    KeyDefinition,
};
use crate::model::TranslationKey;
use crate::store::{
    KeyRepository,
    StoreResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Created,
    /// 同じ名前のキーが既にある（変更しない）
    Existing,
}

/// キーカタログのシード結果件数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyReport {
    pub created: usize,
    pub existing: usize,
}

impl KeyReport {
    pub const fn merge(&mut self, other: Self) {
        self.created += other.created;
        self.existing += other.existing;
    }
}

/// `definition` のキーが未登録なら登録する
///
/// # Errors
/// リポジトリのエラーをそのまま返す
pub async fn ensure_key<K: KeyRepository>(
    keys: &K,
    definition: &KeyDefinition,
) -> StoreResult<KeyOutcome> {
    if keys.find_key_by_name(&definition.key_name).await?.is_some() {
        return Ok(KeyOutcome::Existing);
    }

    let mut key = TranslationKey::new(definition.key_name.clone());
    key.category.clone_from(&definition.category);
    key.description.clone_from(&definition.description);
    key.default_value.clone_from(&definition.default_value);
    keys.save_key(key).await?;

    tracing::debug!(key = %definition.key_name, "Created translation key");
    Ok(KeyOutcome::Created)
}

/// カタログの定義を順に登録する
///
/// 同名の定義は最初のものが有効。後続の重複は既存として数える。
///
/// # Errors
/// 最初のリポジトリエラーでカタログを中断する
pub async fn seed_key_catalog<K: KeyRepository>(
    keys: &K,
    catalog: &KeyCatalogFile,
) -> StoreResult<KeyReport> {
    let mut report = KeyReport::default();
    for definition in &catalog.definitions {
        match ensure_key(keys, definition).await? {
            KeyOutcome::Created => report.created += 1,
            KeyOutcome::Existing => report.existing += 1,
        }
    }

    tracing::info!(
        path = %catalog.path.display(),
        created = report.created,
        existing = report.existing,
        "Seeded translation keys"
    );
    Ok(report)
}
