//! ロケール x 領域 単位のバッチシード

use serde::Serialize;

use super::upsert::{
    Repositories,
    UpsertOutcome,
};
use crate::input::SeedFile;
use crate::store::{
    KeyRepository,
    LocaleRepository,
    StoreResult,
    TranslationRepository,
};

/// シードバッチの結果件数
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// ロケール未登録でスキップしたエントリ数
    pub missing_locale: usize,
    /// 未登録でスキップしたキー名（シード順）
    pub missing_keys: Vec<String>,
}

impl SeedReport {
    fn record(&mut self, key_name: &str, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
            UpsertOutcome::MissingKey => self.missing_keys.push(key_name.to_string()),
            UpsertOutcome::MissingLocale => self.missing_locale += 1,
        }
    }

    /// `other` の件数を加算する
    pub fn merge(&mut self, other: &Self) {
        self.created += other.created;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.missing_locale += other.missing_locale;
        self.missing_keys.extend(other.missing_keys.iter().cloned());
    }

    /// 処理したエントリ数
    #[must_use]
    pub fn total(&self) -> usize {
        self.created
            + self.updated
            + self.unchanged
            + self.missing_locale
            + self.missing_keys.len()
    }

    /// 書き込んだ行数
    #[must_use]
    pub const fn written(&self) -> usize {
        self.created + self.updated
    }
}

/// 1 ロケール分のリテラルを順序付きで保証する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSeeder {
    pub locale: String,
    /// リテラルが属する UI 領域（表示用）
    pub area: String,
    pub actor: String,
    /// シード順の `(key, value)`。重複キーも保持する
    pub entries: Vec<(String, String)>,
}

impl TranslationSeeder {
    #[must_use]
    pub fn new(
        locale: impl Into<String>,
        area: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self { locale: locale.into(), area: area.into(), actor: actor.into(), entries: Vec::new() }
    }

    /// リテラルを 1 件追加
    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// パース済みシードファイルからシーダーを作る
    #[must_use]
    pub fn from_seed_file(seed_file: &SeedFile, actor: &str) -> Self {
        Self {
            locale: seed_file.locale.clone(),
            area: seed_file.area.clone(),
            actor: actor.to_string(),
            entries: seed_file
                .entries
                .iter()
                .map(|entry| (entry.key.clone(), entry.value.clone()))
                .collect(),
        }
    }

    /// エントリごとに順番に `ensure_translation` を実行する
    ///
    /// 未登録のキーやロケールはそのエントリだけスキップする。
    /// 重複キーは再度 upsert されるので、最後のリテラルが残る。
    ///
    /// # Errors
    /// 最初のリポジトリエラーでバッチを中断する
    pub async fn seed_all<K, L, T>(
        &self,
        repos: Repositories<'_, K, L, T>,
    ) -> StoreResult<SeedReport>
    where
        K: KeyRepository,
        L: LocaleRepository,
        T: TranslationRepository,
    {
        tracing::debug!(
            locale = %self.locale,
            area = %self.area,
            entries = self.entries.len(),
            "Seeding translations"
        );

        let mut report = SeedReport::default();
        for (key_name, value) in &self.entries {
            let outcome =
                repos.ensure_translation(key_name, &self.locale, value, &self.actor).await?;
            report.record(key_name, outcome);
        }

        tracing::info!(
            locale = %self.locale,
            area = %self.area,
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            missing_keys = report.missing_keys.len(),
            "Seeded translations"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::store::{
        MemoryStore,
        StoreError,
    };
    use crate::test_utils::{
        FailingTranslations,
        store_with,
        stored_translation,
    };

    const KEYS: [&str; 3] = ["testResult.status.pass", "testResult.status.fail", "login.title"];

    fn english_seeder() -> TranslationSeeder {
        TranslationSeeder::new("en", "test_result", "system")
            .entry("testResult.status.pass", "Pass")
            .entry("testResult.status.fail", "Fail")
    }

    #[tokio::test]
    async fn first_run_creates_every_entry() {
        let store = store_with(&["ko", "en"], &KEYS).await;

        let report = english_seeder().seed_all(Repositories::from_store(&store)).await.unwrap();

        assert_that!(report.created, eq(2));
        assert_that!(report.total(), eq(2));
        assert_that!(store.row_counts().await.2, eq(2));
    }

    #[tokio::test]
    async fn second_run_writes_nothing() {
        let store = store_with(&["ko", "en"], &KEYS).await;
        let seeder = english_seeder();
        seeder.seed_all(Repositories::from_store(&store)).await.unwrap();
        let before = stored_translation(&store, "testResult.status.pass", "en").await;

        let report = seeder.seed_all(Repositories::from_store(&store)).await.unwrap();

        assert_that!(report.unchanged, eq(2));
        assert_that!(report.written(), eq(0));
        assert_eq!(stored_translation(&store, "testResult.status.pass", "en").await, before);
    }

    #[tokio::test]
    async fn last_duplicate_literal_wins() {
        let store = store_with(&["en"], &KEYS).await;
        let seeder = english_seeder().entry("testResult.status.pass", "Passed");

        let report = seeder.seed_all(Repositories::from_store(&store)).await.unwrap();

        assert_that!(report.created, eq(2));
        assert_that!(report.updated, eq(1));
        let translation = stored_translation(&store, "testResult.status.pass", "en").await.unwrap();
        assert_that!(translation.value, eq("Passed"));
        assert_that!(store.row_counts().await.2, eq(2));
    }

    #[tokio::test]
    async fn missing_keys_do_not_stop_the_batch() {
        let store = store_with(&["en"], &KEYS).await;
        let seeder = TranslationSeeder::new("en", "misc", "system")
            .entry("unknown.first", "A")
            .entry("login.title", "Login")
            .entry("unknown.second", "B");

        let report = seeder.seed_all(Repositories::from_store(&store)).await.unwrap();

        assert_that!(report.created, eq(1));
        assert_that!(report.missing_keys, elements_are![eq("unknown.first"), eq("unknown.second")]);
        assert!(stored_translation(&store, "login.title", "en").await.is_some());
    }

    #[tokio::test]
    async fn missing_locale_skips_every_entry() {
        let store = store_with(&["en"], &KEYS).await;
        let seeder =
            TranslationSeeder::new("ja", "login", "system").entry("login.title", "ログイン");

        let report = seeder.seed_all(Repositories::from_store(&store)).await.unwrap();

        assert_that!(report.missing_locale, eq(1));
        assert_that!(report.missing_keys, is_empty());
        assert_that!(store.row_counts().await.2, eq(0));
    }

    #[tokio::test]
    async fn store_failure_aborts_the_batch() {
        let store = store_with(&["en"], &KEYS).await;
        let failing = FailingTranslations;
        let repos = Repositories { keys: &store, locales: &store, translations: &failing };

        let result = english_seeder().seed_all(repos).await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[rstest]
    #[case::in_order(&[("en", "Pass"), ("ko", "통과")], "Pass")]
    #[case::overlapping(&[("en", "Pass"), ("en", "Passed")], "Passed")]
    fn seeders_resolve_last_writer_wins(
        #[case] batches: &[(&str, &str)],
        #[case] expected_en: &str,
    ) {
        tokio_test::block_on(async {
            let store: MemoryStore = store_with(&["ko", "en"], &KEYS).await;
            for (locale, value) in batches {
                TranslationSeeder::new(*locale, "test_result", "system")
                    .entry("testResult.status.pass", *value)
                    .seed_all(Repositories::from_store(&store))
                    .await
                    .unwrap();
            }

            let translation =
                stored_translation(&store, "testResult.status.pass", "en").await.unwrap();
            assert_that!(translation.value, eq(expected_en));
        });
    }

    #[rstest]
    fn from_seed_file_keeps_entry_order() {
        let seed_file = SeedFile::parse(
            PathBuf::from("ko/login.json"),
            r#"{"login.title": "로그인", "login.title": "로그인 화면"}"#,
            &["ko".to_string()],
            ".",
        )
        .unwrap();

        let seeder = TranslationSeeder::from_seed_file(&seed_file, "system");

        assert_that!(seeder.locale, eq("ko"));
        assert_that!(seeder.area, eq("login"));
        assert_eq!(
            seeder.entries,
            vec![
                ("login.title".to_string(), "로그인".to_string()),
                ("login.title".to_string(), "로그인 화면".to_string()),
            ]
        );
    }

    #[rstest]
    fn merge_adds_counts() {
        let mut total = SeedReport { created: 1, ..SeedReport::default() };
        let other = SeedReport {
            updated: 2,
            missing_keys: vec!["a.b".to_string()],
            ..SeedReport::default()
        };

        total.merge(&other);

        assert_that!(total.total(), eq(4));
        assert_that!(total.written(), eq(3));
    }
}
