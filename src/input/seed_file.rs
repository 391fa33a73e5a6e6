//! シードファイルの入力定義

use std::path::{
    Path,
    PathBuf,
};

use super::error::SeedFileError;
use super::json_pairs::{
    PairValue,
    collect_pairs,
};
use crate::types::SourceRange;

/// UI 領域を表さないグループ用ディレクトリ名
const COMMON_PARENTS: [&str; 7] =
    ["seeds", "locales", "messages", "translations", "i18n", "lang", "langs"];

/// ファイル名からもディレクトリ名からも決まらない場合の領域
pub const DEFAULT_AREA: &str = "default";

/// シードファイルの `key -> literal` 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    pub key: String,
    pub value: String,
    /// キーの範囲
    pub range: SourceRange,
    pub value_range: SourceRange,
}

/// シードできない値を持つペア（数値や配列など）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    pub key: String,
    /// 値の tree-sitter ノード種別
    pub kind: String,
    pub range: SourceRange,
}

/// 1 ロケール・1 領域のリテラル（ソース順）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFile {
    /// ワークスペースルートからの相対パス
    pub path: PathBuf,
    pub locale: String,
    pub area: String,
    /// 重複キーも保持する（シード時は最後のリテラルが残る）
    pub entries: Vec<SeedEntry>,
    pub invalid_entries: Vec<InvalidEntry>,
}

impl SeedFile {
    /// シードファイルをパースする
    ///
    /// `locale_codes` は `path` からロケールを判定するための設定済みロケール。
    /// ネストしたオブジェクトは `separator` で平坦化する。
    ///
    /// # Errors
    /// JSON オブジェクトでない場合は [`SeedFileError::Parse`]
    pub fn parse(
        path: PathBuf,
        text: &str,
        locale_codes: &[String],
        separator: &str,
    ) -> Result<Self, SeedFileError> {
        let pairs = collect_pairs(text, Some(separator))
            .map_err(|source| SeedFileError::Parse { path: path.clone(), source })?;

        let mut entries = Vec::with_capacity(pairs.len());
        let mut invalid_entries = Vec::new();
        for pair in pairs {
            match pair.value {
                PairValue::String(value) => entries.push(SeedEntry {
                    key: pair.key,
                    value,
                    range: pair.key_range,
                    value_range: pair.value_range,
                }),
                PairValue::Object(_) => invalid_entries.push(InvalidEntry {
                    key: pair.key,
                    kind: "object".to_string(),
                    range: pair.value_range,
                }),
                PairValue::Other(kind) => invalid_entries.push(InvalidEntry {
                    key: pair.key,
                    kind,
                    range: pair.value_range,
                }),
            }
        }

        let locale = detect_locale(&path, locale_codes);
        let area = detect_area(&path, &locale);
        tracing::debug!(
            path = %path.display(),
            locale = %locale,
            area = %area,
            entries = entries.len(),
            "Parsed seed file"
        );

        Ok(Self { path, locale, area, entries, invalid_entries })
    }
}

/// ロケールコードを正規化（小文字化し - を _ に置換）
fn normalize_locale_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// パスからシードファイルのロケールを判定する
///
/// パスを区切り文字と '.' で分割し、設定済みロケールに一致する部分を後ろから探す。
/// 見つからなければ親ディレクトリ名、次にファイル名を使う。
///
/// # Examples
/// - `en/login_dashboard_and_project.json` → `en`
/// - `test_result/ko.json` → `ko`
/// - `messages/en_US/common.json` with `en-US` configured → `en-US`
/// - `de/common.json` without `de` configured → `de`
#[must_use]
pub fn detect_locale(file_path: &Path, locale_codes: &[String]) -> String {
    let parts: Vec<String> = file_path
        .components()
        .flat_map(|component| {
            component
                .as_os_str()
                .to_string_lossy()
                .split('.')
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    for part in parts.iter().rev() {
        let normalized = normalize_locale_code(part);
        if let Some(code) =
            locale_codes.iter().find(|code| normalize_locale_code(code) == normalized)
        {
            return code.clone();
        }
    }

    file_path
        .parent()
        .and_then(Path::file_name)
        .or_else(|| file_path.file_stem())
        .map_or_else(String::new, |name| name.to_string_lossy().to_string())
}

/// パスからシードファイルの UI 領域を判定する
///
/// ファイル名が領域を表す。ファイル名がロケールそのものなら親ディレクトリを使う
/// （グループ用ディレクトリは除く）。
#[must_use]
pub fn detect_area(file_path: &Path, locale: &str) -> String {
    let locale = normalize_locale_code(locale);

    if let Some(stem) = file_path.file_stem() {
        let stem = stem.to_string_lossy();
        if normalize_locale_code(&stem) != locale {
            return stem.to_string();
        }
    }

    if let Some(parent_name) = file_path.parent().and_then(Path::file_name) {
        let parent_name = parent_name.to_string_lossy();
        if normalize_locale_code(&parent_name) != locale
            && !COMMON_PARENTS.contains(&parent_name.to_lowercase().as_str())
        {
            return parent_name.to_string();
        }
    }

    DEFAULT_AREA.to_string()
}
