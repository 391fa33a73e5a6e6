//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::io::{
    self,
    Write,
};
use std::path::Path;
use std::sync::{
    Arc,
    Mutex,
};

use tracing::subscriber::DefaultGuard;

use crate::model::{
    Locale,
    Translation,
    TranslationKey,
};
use crate::store::{
    KeyRepository,
    LocaleRepository,
    MemoryStore,
    StoreError,
    StoreResult,
    TranslationRepository,
};

/// ワークスペースにファイルを書き込む（親ディレクトリも作成）
pub(crate) fn write_workspace_file(root: &Path, relative_path: &str, content: &str) {
    let path = root.join(relative_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// 指定したロケールとキーを登録済みのストアを作成する
///
/// ロケールは並び順どおりに `sort_order` が振られ、先頭がデフォルトになる。
pub(crate) async fn store_with(locale_codes: &[&str], key_names: &[&str]) -> MemoryStore {
    let store = MemoryStore::new();
    for (index, code) in locale_codes.iter().enumerate() {
        let mut locale = Locale::new(*code, code.to_uppercase());
        locale.is_default = index == 0;
        locale.sort_order = i32::try_from(index).unwrap() + 1;
        store.save_locale(locale).await.unwrap();
    }
    for name in key_names {
        store.save_key(TranslationKey::new(*name)).await.unwrap();
    }
    store
}

/// (キー名, ロケールコード) の翻訳を取得する
pub(crate) async fn stored_translation(
    store: &MemoryStore,
    key_name: &str,
    locale_code: &str,
) -> Option<Translation> {
    let key = store.find_key_by_name(key_name).await.unwrap()?;
    let locale = store.find_locale_by_code(locale_code).await.unwrap()?;
    store.find_translation(&key, &locale).await.unwrap()
}

/// 常に失敗する翻訳リポジトリ
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FailingTranslations;

impl TranslationRepository for FailingTranslations {
    async fn find_translation(
        &self,
        _key: &TranslationKey,
        _locale: &Locale,
    ) -> StoreResult<Option<Translation>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn save_translation(&self, _translation: Translation) -> StoreResult<Translation> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn translations_for_locale(&self, _locale: &Locale) -> StoreResult<Vec<Translation>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// tracing の出力を溜めるライター
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// これまでに出力されたログ
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 現在のスレッドのログを TRACE レベルまで捕捉する
///
/// ガードが生きている間だけ有効。
pub(crate) fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}
