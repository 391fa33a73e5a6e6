//! `i18n-seed` のコマンドラインインターフェース
//!
//! コマンドの出力は渡された writer に書き、ログは `tracing` に出す。

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use clap::{
    ArgAction,
    Parser,
    Subcommand,
};
use serde::Serialize;

use crate::config::{
    ConfigError,
    ConfigManager,
};
use crate::diagnostics::{
    SeedDiagnostic,
    Severity,
    check_workspace,
};
use crate::error::AppError;
use crate::indexer::SeedIndexer;
use crate::lookup::{
    I18nLookup,
    TranslationSource,
};
use crate::seed::{
    Repositories,
    SeedRunner,
    SeedSummary,
};
use crate::store::MemoryStore;

#[derive(Parser, Debug)]
#[command(
    name = "i18n-seed",
    version,
    about = "Seed localized UI strings into a translation store"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Workspace root holding the seed assets"
    )]
    pub root: PathBuf,
    #[arg(long, global = true, help = "Write logs to this file instead of stderr")]
    pub log_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Raise log verbosity (-v debug, -vv trace)"
    )]
    pub verbose: u8,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register locales and keys, then seed every translation
    Seed {
        #[arg(long, help = "Store snapshot path (relative to the root)")]
        store: Option<PathBuf>,
        #[arg(long, help = "Recorded as creator / modifier of written rows")]
        actor: Option<String>,
        #[arg(long, default_value_t = false, help = "Run against a scratch copy of the store")]
        dry_run: bool,
    },
    /// Report problems in the seed assets without touching the store
    Check,
    /// Completion statistics per locale
    Stats {
        #[arg(long, help = "Store snapshot path (relative to the root)")]
        store: Option<PathBuf>,
    },
    /// Look up the text of one key
    Lookup {
        key: String,
        #[arg(long, help = "Locale code (defaults to the default locale)")]
        locale: Option<String>,
        #[arg(long, default_value_t = false, help = "Do not fall back to other sources")]
        no_fallback: bool,
        #[arg(long, help = "Store snapshot path (relative to the root)")]
        store: Option<PathBuf>,
    },
}

impl Cli {
    /// `RUST_LOG` 未設定時のフィルタ
    #[must_use]
    pub const fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// コマンドを実行し、終了ステータスを返す
    ///
    /// # Errors
    /// 設定・探索・ストアのエラー
    pub async fn execute(&self, out: &mut impl Write) -> Result<u8, AppError> {
        let mut manager = ConfigManager::new();
        manager.load_settings(Some(self.root.clone()))?;

        match &self.command {
            Commands::Seed { store, actor, dry_run } => {
                apply_overrides(&mut manager, store.as_deref(), actor.as_deref())?;
                seed(&manager, *dry_run, self.json, out).await
            }
            Commands::Check => check(&manager, self.json, out).await,
            Commands::Stats { store } => {
                apply_overrides(&mut manager, store.as_deref(), None)?;
                stats(&manager, self.json, out).await
            }
            Commands::Lookup { key, locale, no_fallback, store } => {
                apply_overrides(&mut manager, store.as_deref(), None)?;
                lookup(&manager, key, locale.as_deref(), !no_fallback, self.json, out).await
            }
        }
    }
}

/// コマンドライン引数で設定を上書きする
fn apply_overrides(
    manager: &mut ConfigManager,
    store: Option<&Path>,
    actor: Option<&str>,
) -> Result<(), ConfigError> {
    if store.is_none() && actor.is_none() {
        return Ok(());
    }
    let mut settings = manager.get_settings().clone();
    if let Some(path) = store {
        settings.store.path = path.to_string_lossy().into_owned();
    }
    if let Some(actor) = actor {
        settings.actor = actor.to_string();
    }
    manager.update_settings(settings)
}

/// 失敗したコマンドのエラーを 1 行で書き出す
///
/// # Errors
/// 書き込みに失敗した場合
pub fn report_error(err: &AppError, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "error: {err}")?;
    out.flush()
}

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedOutput<'a> {
    dry_run: bool,
    store: &'a Path,
    #[serde(flatten)]
    summary: &'a SeedSummary,
}

async fn seed(
    manager: &ConfigManager,
    dry_run: bool,
    json: bool,
    out: &mut impl Write,
) -> Result<u8, AppError> {
    let workspace = SeedIndexer::new(manager)?.index_workspace().await?;
    if workspace.has_failures() {
        return Err(AppError::LoadFailures(workspace.failures.len()));
    }

    let store_path = manager.store_path();
    let store = MemoryStore::open_snapshot(&store_path).await?;
    let scratch;
    let target = if dry_run {
        scratch = store.fork().await;
        &scratch
    } else {
        &store
    };

    let summary = SeedRunner::new(manager.get_settings())
        .run(Repositories::from_store(target), &workspace)
        .await?;
    if !dry_run {
        store.save_snapshot(&store_path).await?;
    }

    if json {
        write_json(out, &SeedOutput { dry_run, store: &store_path, summary: &summary })?;
        return Ok(0);
    }

    let (locales, keys, translations) = (&summary.locales, &summary.keys, &summary.translations);
    writeln!(out, "locales: {} created, {} existing", locales.created, locales.existing)?;
    writeln!(out, "keys: {} created, {} existing", keys.created, keys.existing)?;
    writeln!(
        out,
        "translations: {} created, {} updated, {} unchanged, {} skipped (locale not registered)",
        translations.created,
        translations.updated,
        translations.unchanged,
        translations.missing_locale
    )?;
    for key in &translations.missing_keys {
        writeln!(out, "missing key: {key}")?;
    }
    if dry_run {
        writeln!(out, "dry run: {} not written", store_path.display())?;
    } else {
        writeln!(out, "saved {}", store_path.display())?;
    }
    Ok(0)
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    diagnostics: &'a [SeedDiagnostic],
    failures: Vec<String>,
}

async fn check(manager: &ConfigManager, json: bool, out: &mut impl Write) -> Result<u8, AppError> {
    let workspace = SeedIndexer::new(manager)?.index_workspace().await?;
    let diagnostics = check_workspace(&workspace, manager.get_settings());
    let failures: Vec<String> = workspace.failures.iter().map(ToString::to_string).collect();

    let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();
    let errors = count(Severity::Error) + failures.len();

    if json {
        write_json(out, &CheckOutput { diagnostics: &diagnostics, failures })?;
    } else {
        for failure in &failures {
            writeln!(out, "error: {failure}")?;
        }
        for diagnostic in &diagnostics {
            writeln!(out, "{diagnostic}")?;
        }
        writeln!(
            out,
            "{} error(s), {} warning(s), {} info",
            errors,
            count(Severity::Warning),
            count(Severity::Information)
        )?;
    }
    Ok(u8::from(errors > 0))
}

async fn stats(manager: &ConfigManager, json: bool, out: &mut impl Write) -> Result<u8, AppError> {
    let store_path = manager.store_path();
    let store = MemoryStore::open_snapshot(&store_path).await?;
    let stats = I18nLookup::new(Repositories::from_store(&store)).completion_stats().await?;

    if json {
        write_json(out, &stats)?;
    } else if stats.is_empty() {
        writeln!(out, "no active locales in {}", store_path.display())?;
    } else {
        for completion in &stats {
            writeln!(out, "{completion}")?;
        }
    }
    Ok(0)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupOutput<'a> {
    key: &'a str,
    locale: &'a str,
    value: Option<&'a str>,
    source: Option<TranslationSource>,
}

async fn lookup(
    manager: &ConfigManager,
    key: &str,
    locale: Option<&str>,
    use_fallback: bool,
    json: bool,
    out: &mut impl Write,
) -> Result<u8, AppError> {
    let store = MemoryStore::open_snapshot(&manager.store_path()).await?;
    let lookup = I18nLookup::new(Repositories::from_store(&store));
    let locale = lookup.resolve_locale_code(locale).await?.ok_or(AppError::NoLocale)?;
    let resolved = lookup.translation(key, &locale, use_fallback).await?;

    if json {
        write_json(
            out,
            &LookupOutput {
                key,
                locale: &locale,
                value: resolved.as_ref().map(|r| r.value.as_str()),
                source: resolved.as_ref().map(|r| r.source),
            },
        )?;
    } else if let Some(resolved) = &resolved {
        writeln!(out, "{}", resolved.value)?;
    } else {
        tracing::info!(key = %key, locale = %locale, "Not translated");
    }
    Ok(u8::from(resolved.is_none()))
}
