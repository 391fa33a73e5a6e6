//! ロケール、キーカタログ、シードファイルの順に行う一括シード

use std::path::PathBuf;

use serde::Serialize;

use super::keys::{
    KeyReport,
    seed_key_catalog,
};
use super::locales::{
    LocaleReport,
    seed_locales,
};
use super::seeder::{
    SeedReport,
    TranslationSeeder,
};
use super::upsert::Repositories;
use crate::config::SeedSettings;
use crate::indexer::SeedWorkspace;
use crate::store::{
    KeyRepository,
    LocaleRepository,
    StoreResult,
    TranslationRepository,
};

/// シードファイル 1 件分の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: PathBuf,
    pub locale: String,
    pub area: String,
    #[serde(flatten)]
    pub report: SeedReport,
}

/// 一括シードの集計結果
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub locales: LocaleReport,
    pub keys: KeyReport,
    /// 全シードファイルの合計
    pub translations: SeedReport,
    pub files: Vec<FileReport>,
}

/// ワークスペースの全シーダーを 1 組のリポジトリに対して実行する
#[derive(Debug, Clone, Copy)]
pub struct SeedRunner<'a> {
    settings: &'a SeedSettings,
}

impl<'a> SeedRunner<'a> {
    #[must_use]
    pub const fn new(settings: &'a SeedSettings) -> Self {
        Self { settings }
    }

    /// ロケール、キーカタログ、シードファイルの順に処理する（それぞれパス順）
    ///
    /// # Errors
    /// 最初のリポジトリエラーで中断する。書き込み済みの行は残り、再実行で続きから完了する。
    pub async fn run<K, L, T>(
        &self,
        repos: Repositories<'_, K, L, T>,
        workspace: &SeedWorkspace,
    ) -> StoreResult<SeedSummary>
    where
        K: KeyRepository,
        L: LocaleRepository,
        T: TranslationRepository,
    {
        let mut summary = SeedSummary {
            locales: seed_locales(repos.locales, &self.settings.locales).await?,
            ..SeedSummary::default()
        };

        for catalog in &workspace.key_catalogs {
            let report = seed_key_catalog(repos.keys, catalog).await?;
            summary.keys.merge(report);
        }

        for seed_file in &workspace.seed_files {
            let seeder = TranslationSeeder::from_seed_file(seed_file, &self.settings.actor);
            let report = seeder.seed_all(repos).await?;
            summary.translations.merge(&report);
            summary.files.push(FileReport {
                path: seed_file.path.clone(),
                locale: seed_file.locale.clone(),
                area: seed_file.area.clone(),
                report,
            });
        }

        tracing::info!(
            locales_created = summary.locales.created,
            keys_created = summary.keys.created,
            translations_created = summary.translations.created,
            translations_updated = summary.translations.updated,
            missing_keys = summary.translations.missing_keys.len(),
            "Seeding finished"
        );
        Ok(summary)
    }
}
