//! 設定されたロケールの登録

use serde::Serialize;

use crate::config::LocaleConfig;
use crate::model::Locale;
use crate::store::{
    LocaleRepository,
    StoreResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleOutcome {
    Created,
    /// 同じコードのロケールが既にある（変更しない）
    Existing,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleReport {
    pub created: usize,
    pub existing: usize,
}

/// 未登録のコードならロケールを登録する
///
/// `position` は設定内の 0 始まりの位置。`sortOrder` が未指定ならこれを並び順にする。
///
/// # Errors
/// リポジトリのエラーをそのまま返す
pub async fn ensure_locale<L: LocaleRepository>(
    locales: &L,
    config: &LocaleConfig,
    position: usize,
) -> StoreResult<LocaleOutcome> {
    if locales.find_locale_by_code(&config.code).await?.is_some() {
        return Ok(LocaleOutcome::Existing);
    }

    let mut locale = Locale::new(config.code.clone(), config.name.clone());
    if let Some(native_name) = &config.native_name {
        locale.native_name.clone_from(native_name);
    }
    locale.is_default = config.is_default;
    locale.sort_order = config
        .sort_order
        .unwrap_or_else(|| i32::try_from(position + 1).unwrap_or(i32::MAX));
    locales.save_locale(locale).await?;

    tracing::info!(code = %config.code, "Registered locale");
    Ok(LocaleOutcome::Created)
}

/// 設定されたロケールを順に登録する
///
/// # Errors
/// 最初のリポジトリエラーで中断する
pub async fn seed_locales<L: LocaleRepository>(
    locales: &L,
    configs: &[LocaleConfig],
) -> StoreResult<LocaleReport> {
    let mut report = LocaleReport::default();
    for (position, config) in configs.iter().enumerate() {
        match ensure_locale(locales, config, position).await? {
            LocaleOutcome::Created => report.created += 1,
            LocaleOutcome::Existing => report.existing += 1,
        }
    }
    Ok(report)
}
