//! 診断メッセージ生成モジュール
//!
//! シードファイルとキーカタログを突き合わせ、シード前に問題を検出する。

use std::collections::{
    BTreeMap,
    BTreeSet,
    HashMap,
    HashSet,
};
use std::fmt;
use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;

use crate::config::SeedSettings;
use crate::indexer::SeedWorkspace;
use crate::input::{
    InvalidEntry,
    KeyCatalogFile,
    KeyDefinition,
    SeedEntry,
    SeedFile,
};
use crate::types::SourceRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    DuplicateKey,
    UnknownKey,
    PlaceholderMismatch,
    MissingTranslation,
    InvalidValue,
}

/// シード資産で見つかった問題
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedDiagnostic {
    /// ワークスペースルートからの相対パス
    pub path: PathBuf,
    pub range: SourceRange,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl SeedDiagnostic {
    fn new(
        path: &Path,
        range: SourceRange,
        severity: Severity,
        kind: DiagnosticKind,
        message: String,
    ) -> Self {
        Self { path: path.to_path_buf(), range, severity, kind, message }
    }
}

impl fmt::Display for SeedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.path.display(),
            self.range.start,
            self.severity,
            self.message
        )
    }
}

/// ワークスペース全体の診断メッセージを生成
///
/// 不正な値は常に報告する。それ以外は `diagnostics` 設定で個別に無効化できる。
/// 結果はパス、位置の順に並ぶ。
#[must_use]
pub fn check_workspace(
    workspace: &SeedWorkspace,
    settings: &SeedSettings,
) -> Vec<SeedDiagnostic> {
    let options = settings.diagnostics;
    let mut diagnostics = Vec::new();

    for catalog in &workspace.key_catalogs {
        check_invalid_entries(&catalog.path, &catalog.invalid_entries, &mut diagnostics);
        if options.duplicate_keys {
            check_duplicate_definitions(catalog, &mut diagnostics);
        }
    }

    for seed_file in &workspace.seed_files {
        check_invalid_entries(&seed_file.path, &seed_file.invalid_entries, &mut diagnostics);
        if options.duplicate_keys {
            check_duplicate_entries(seed_file, &mut diagnostics);
        }
    }

    // カタログがない場合、キーはストアに既に存在するとみなす
    if options.unknown_keys && !workspace.key_catalogs.is_empty() {
        check_unknown_keys(workspace, &mut diagnostics);
    }

    if options.placeholder_mismatch {
        let default_locale = settings
            .locales
            .iter()
            .find(|locale| locale.is_default)
            .map(|locale| locale.code.as_str());
        check_placeholders(&workspace.seed_files, default_locale, &mut diagnostics);
    }

    if options.missing_translations {
        let locale_codes: Vec<&str> =
            settings.locales.iter().map(|locale| locale.code.as_str()).collect();
        check_missing_translations(workspace, &locale_codes, &mut diagnostics);
    }

    diagnostics.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then_with(|| a.range.start.cmp(&b.range.start))
            .then_with(|| a.kind.cmp(&b.kind))
    });
    tracing::debug!("Generated {} diagnostics", diagnostics.len());
    diagnostics
}

fn check_invalid_entries(
    path: &Path,
    invalid_entries: &[InvalidEntry],
    diagnostics: &mut Vec<SeedDiagnostic>,
) {
    for entry in invalid_entries {
        diagnostics.push(SeedDiagnostic::new(
            path,
            entry.range,
            Severity::Error,
            DiagnosticKind::InvalidValue,
            format!("Value of '{}' must be a string, found {}", entry.key, entry.kind),
        ));
    }
}

/// 同一ファイル内の重複キー（後勝ち）
fn check_duplicate_entries(seed_file: &SeedFile, diagnostics: &mut Vec<SeedDiagnostic>) {
    let mut previous: HashMap<&str, &SeedEntry> = HashMap::new();

    for entry in &seed_file.entries {
        if let Some(earlier) = previous.insert(entry.key.as_str(), entry) {
            let (severity, message) = if earlier.value == entry.value {
                (
                    Severity::Information,
                    format!(
                        "Duplicate key '{}' repeats the value defined at {}",
                        entry.key, earlier.range.start
                    ),
                )
            } else {
                (
                    Severity::Warning,
                    format!(
                        "Duplicate key '{}' overrides {:?} (defined at {}) with {:?}",
                        entry.key, earlier.value, earlier.range.start, entry.value
                    ),
                )
            };
            diagnostics.push(SeedDiagnostic::new(
                &seed_file.path,
                entry.range,
                severity,
                DiagnosticKind::DuplicateKey,
                message,
            ));
        }
    }
}

/// 同一カタログ内の重複定義（先勝ち）
fn check_duplicate_definitions(
    catalog: &KeyCatalogFile,
    diagnostics: &mut Vec<SeedDiagnostic>,
) {
    let mut first: HashMap<&str, &KeyDefinition> = HashMap::new();

    for definition in &catalog.definitions {
        let Some(original) = first.get(definition.key_name.as_str()) else {
            first.insert(definition.key_name.as_str(), definition);
            continue;
        };

        let same = original.category == definition.category
            && original.description == definition.description
            && original.default_value == definition.default_value;
        let (severity, message) = if same {
            (
                Severity::Information,
                format!(
                    "Duplicate key definition '{}' repeats the one at {}",
                    definition.key_name, original.range.start
                ),
            )
        } else {
            (
                Severity::Warning,
                format!(
                    "Duplicate key definition '{}' is ignored; the definition at {} wins",
                    definition.key_name, original.range.start
                ),
            )
        };
        diagnostics.push(SeedDiagnostic::new(
            &catalog.path,
            definition.range,
            severity,
            DiagnosticKind::DuplicateKey,
            message,
        ));
    }
}

/// カタログに存在しないキー（シード時に警告付きでスキップされる）
fn check_unknown_keys(workspace: &SeedWorkspace, diagnostics: &mut Vec<SeedDiagnostic>) {
    let known: HashSet<&str> = workspace
        .key_catalogs
        .iter()
        .flat_map(|catalog| catalog.definitions.iter())
        .map(|definition| definition.key_name.as_str())
        .collect();

    for seed_file in &workspace.seed_files {
        for entry in &seed_file.entries {
            if !known.contains(entry.key.as_str()) {
                diagnostics.push(SeedDiagnostic::new(
                    &seed_file.path,
                    entry.range,
                    Severity::Warning,
                    DiagnosticKind::UnknownKey,
                    format!("Translation key '{}' not found in any key catalog", entry.key),
                ));
            }
        }
    }
}

/// ロケールごとのキーの最終エントリ（後勝ち）
struct LocalizedEntry<'a> {
    path: &'a Path,
    entry: &'a SeedEntry,
    placeholders: BTreeSet<String>,
}

/// ロケール間でプレースホルダーが一致しないキー
///
/// 基準はデフォルトロケール（そのキーに値がなければコード順で最初のロケール）。
fn check_placeholders(
    seed_files: &[SeedFile],
    default_locale: Option<&str>,
    diagnostics: &mut Vec<SeedDiagnostic>,
) {
    let mut by_key: BTreeMap<&str, BTreeMap<&str, LocalizedEntry<'_>>> = BTreeMap::new();
    for seed_file in seed_files {
        for entry in &seed_file.entries {
            by_key.entry(entry.key.as_str()).or_default().insert(
                seed_file.locale.as_str(),
                LocalizedEntry {
                    path: &seed_file.path,
                    entry,
                    placeholders: placeholders(&entry.value),
                },
            );
        }
    }

    for (key, locales) in &by_key {
        let reference = default_locale
            .and_then(|code| locales.get_key_value(code))
            .or_else(|| locales.iter().next());
        let Some((reference_locale, reference_entry)) = reference else {
            continue;
        };

        for (locale, localized) in locales {
            if localized.placeholders == reference_entry.placeholders {
                continue;
            }
            diagnostics.push(SeedDiagnostic::new(
                localized.path,
                localized.entry.value_range,
                Severity::Warning,
                DiagnosticKind::PlaceholderMismatch,
                format!(
                    "Placeholders of '{key}' in '{locale}' [{}] differ from '{reference_locale}' [{}]",
                    join(&localized.placeholders),
                    join(&reference_entry.placeholders),
                ),
            ));
        }
    }
}

/// カタログのキーに対し、設定されたロケールのシードがない（オプトイン）
fn check_missing_translations(
    workspace: &SeedWorkspace,
    locale_codes: &[&str],
    diagnostics: &mut Vec<SeedDiagnostic>,
) {
    let seeded: HashSet<(&str, &str)> = workspace
        .seed_files
        .iter()
        .flat_map(|seed_file| {
            seed_file.entries.iter().map(|entry| (seed_file.locale.as_str(), entry.key.as_str()))
        })
        .collect();

    let mut reported = HashSet::new();
    for catalog in &workspace.key_catalogs {
        for definition in &catalog.definitions {
            if !reported.insert(definition.key_name.as_str()) {
                continue;
            }
            for locale in locale_codes {
                if seeded.contains(&(*locale, definition.key_name.as_str())) {
                    continue;
                }
                diagnostics.push(SeedDiagnostic::new(
                    &catalog.path,
                    definition.range,
                    Severity::Information,
                    DiagnosticKind::MissingTranslation,
                    format!(
                        "Translation key '{}' has no seed entry for locale '{locale}'",
                        definition.key_name
                    ),
                ));
            }
        }
    }
}

/// `{name}` 形式のプレースホルダーを抽出
#[must_use]
pub fn placeholders(value: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut rest = value;
    while let Some((_, after)) = rest.split_once('{') {
        let Some((name, tail)) = after.split_once('}') else {
            break;
        };
        if !name.is_empty()
            && name.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            found.insert(name.to_string());
            rest = tail;
        } else {
            rest = after;
        }
    }
    found
}

fn join(placeholders: &BTreeSet<String>) -> String {
    placeholders.iter().map(|name| format!("{{{name}}}")).collect::<Vec<_>>().join(", ")
}
