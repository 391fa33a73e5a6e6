//! ワークスペース全体のシード処理に関するテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use i18n_seed::config::ConfigManager;
use i18n_seed::diagnostics::{
    Severity,
    check_workspace,
};
use i18n_seed::indexer::{
    SeedIndexer,
    SeedWorkspace,
};
use i18n_seed::lookup::{
    I18nLookup,
    TranslationSource,
};
use i18n_seed::seed::{
    Repositories,
    SeedRunner,
};
use i18n_seed::store::{
    KeyRepository,
    LocaleRepository,
    MemoryStore,
    TranslationRepository,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

async fn index(root: &Path) -> (ConfigManager, SeedWorkspace) {
    let mut manager = ConfigManager::new();
    manager.load_settings(Some(root.to_path_buf())).unwrap();
    let workspace = SeedIndexer::new(&manager).unwrap().index_workspace().await.unwrap();
    (manager, workspace)
}

fn write(root: &Path, relative_path: &str, content: &str) {
    let path = root.join(relative_path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

async fn stored_value(store: &MemoryStore, key: &str, locale: &str) -> Option<(String, String)> {
    let key = store.find_key_by_name(key).await.unwrap()?;
    let locale = store.find_locale_by_code(locale).await.unwrap()?;
    let translation = store.find_translation(&key, &locale).await.unwrap()?;
    Some((translation.value, translation.created_by))
}

fn sample_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        ".i18n-seed.json",
        r#"{
            "actor": "bootstrap",
            "locales": [
                {"code": "ko", "name": "Korean", "nativeName": "한국어", "isDefault": true},
                {"code": "en", "name": "English"}
            ]
        }"#,
    );
    write(
        root,
        "keys/auth.json",
        r#"{
            "login.title": {"category": "login", "defaultValue": "로그인"},
            "login.button": {"category": "login"},
            "login.help": "Need help?"
        }"#,
    );
    write(
        root,
        "ko/auth.json",
        r#"{"login": {"title": "로그인", "button": "로그인하기"}}"#,
    );
    write(
        root,
        "en/auth.json",
        r#"{
            "login.title": "Log in",
            "login.button": "Sign in",
            "login.title": "Login",
            "login.unknown": "?"
        }"#,
    );
    // 登録されていないロケールは黙ってスキップされる
    write(root, "ja/auth.json", r#"{"login.title": "ログイン"}"#);
    dir
}

#[tokio::test]
async fn test_bootstrap_and_snapshot_round_trip() {
    let dir = sample_workspace();
    let (manager, workspace) = index(dir.path()).await;
    assert!(workspace.failures.is_empty());
    assert_eq!(workspace.key_catalogs.len(), 1);
    assert_eq!(workspace.seed_files.len(), 3);

    let store = MemoryStore::new();
    let summary = SeedRunner::new(manager.get_settings())
        .run(Repositories::from_store(&store), &workspace)
        .await
        .unwrap();

    assert_eq!(summary.locales.created, 2);
    assert_eq!(summary.keys.created, 3);
    assert_eq!(summary.translations.created, 4);
    assert_eq!(summary.translations.updated, 1);
    assert_eq!(summary.translations.missing_locale, 1);
    assert_eq!(summary.translations.missing_keys, vec!["login.unknown".to_string()]);
    assert_eq!(store.row_counts().await, (2, 3, 4));
    assert_eq!(
        stored_value(&store, "login.title", "en").await,
        Some(("Login".to_string(), "bootstrap".to_string()))
    );

    let snapshot = dir.path().join("out/store.json");
    fs::create_dir_all(snapshot.parent().unwrap()).unwrap();
    store.save_snapshot(&snapshot).await.unwrap();
    let reopened = MemoryStore::open_snapshot(&snapshot).await.unwrap();
    assert_eq!(reopened.row_counts().await, (2, 3, 4));

    let rerun = SeedRunner::new(manager.get_settings())
        .run(Repositories::from_store(&reopened), &workspace)
        .await
        .unwrap();
    assert_eq!(rerun.locales.existing, 2);
    assert_eq!(rerun.keys.existing, 3);
    // 重複した en の login.title は毎回順に適用し直される
    assert_eq!(rerun.translations.created, 0);
    assert_eq!(rerun.translations.updated, 2);
    assert_eq!(rerun.translations.unchanged, 3);
    assert_eq!(reopened.row_counts().await, (2, 3, 4));
    assert_eq!(
        stored_value(&reopened, "login.title", "en").await,
        Some(("Login".to_string(), "bootstrap".to_string()))
    );

    let default_locale = reopened.default_locale().await.unwrap().unwrap();
    assert_eq!(default_locale.code, "ko");
    assert_eq!(default_locale.native_name, "한국어");
}

#[tokio::test]
async fn test_changed_literal_updates_and_keeps_creator() {
    let dir = sample_workspace();
    let (manager, workspace) = index(dir.path()).await;
    let store = MemoryStore::new();
    SeedRunner::new(manager.get_settings())
        .run(Repositories::from_store(&store), &workspace)
        .await
        .unwrap();

    write(dir.path(), "ko/auth.json", r#"{"login.title": "로그인 하기"}"#);
    let (mut manager, workspace) = index(dir.path()).await;
    let mut settings = manager.get_settings().clone();
    settings.actor = "editor".to_string();
    manager.update_settings(settings).unwrap();
    let summary = SeedRunner::new(manager.get_settings())
        .run(Repositories::from_store(&store), &workspace)
        .await
        .unwrap();

    // ko の変更 1 件と en の重複 2 件
    assert_eq!(summary.translations.updated, 3);
    let key = store.find_key_by_name("login.title").await.unwrap().unwrap();
    let ko = store.find_locale_by_code("ko").await.unwrap().unwrap();
    let translation = store.find_translation(&key, &ko).await.unwrap().unwrap();
    assert_eq!(translation.value, "로그인 하기");
    assert_eq!(translation.created_by, "bootstrap");
    assert_eq!(translation.updated_by, "editor");
    // ファイルから消えたエントリは削除されない
    assert_eq!(
        stored_value(&store, "login.button", "ko").await,
        Some(("로그인하기".to_string(), "bootstrap".to_string()))
    );
}

#[tokio::test]
async fn test_bundled_seeds() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds");
    let (manager, workspace) = index(&root).await;

    assert!(workspace.failures.is_empty());
    assert_eq!(workspace.key_catalogs.len(), 16);
    assert_eq!(workspace.seed_files.len(), 16);
    let diagnostics = check_workspace(&workspace, manager.get_settings());
    assert!(diagnostics.iter().all(|d| d.severity != Severity::Error));

    let store = MemoryStore::new();
    let runner = SeedRunner::new(manager.get_settings());
    let summary = runner.run(Repositories::from_store(&store), &workspace).await.unwrap();

    assert_eq!(summary.keys.created, 2865);
    assert_eq!(summary.keys.existing, 193);
    assert_eq!(summary.translations.created, 5022);
    assert_eq!(summary.translations.updated, 190);
    assert_eq!(summary.translations.unchanged, 409);
    assert_eq!(summary.translations.missing_keys.len(), 46);
    assert_eq!(summary.translations.missing_locale, 0);
    assert_eq!(store.row_counts().await, (2, 2865, 5022));

    let lookup = I18nLookup::new(Repositories::from_store(&store));
    let title = lookup.translation("login.title", "en", true).await.unwrap().unwrap();
    assert_eq!(title.value, "Login");
    assert_eq!(title.source, TranslationSource::Locale);
    let save = lookup.translation("common.save", "ko", false).await.unwrap().unwrap();
    assert_eq!(save.value, "저장");

    let stats = lookup.completion_stats().await.unwrap();
    let rows: Vec<(&str, usize, usize)> =
        stats.iter().map(|s| (s.code.as_str(), s.translated, s.total)).collect();
    assert_eq!(rows, vec![("ko", 2395, 2865), ("en", 2627, 2865)]);

    // 値の異なる重複リテラルだけが再実行で書き戻される
    let rerun = runner.run(Repositories::from_store(&store), &workspace).await.unwrap();
    assert_eq!(rerun.translations.created, 0);
    assert_eq!(rerun.translations.updated, 359);
    assert_eq!(store.row_counts().await, (2, 2865, 5022));
}
