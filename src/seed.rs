//! ロケール・翻訳キー・翻訳のシード
//!
//! どのシーダーも冪等で、同じストアに 2 回実行しても 2 回目は何も書かない。
/// キーカタログのシード
mod keys;
/// ロケールの登録
mod locales;
/// ワークスペースの一括シード
mod runner;
/// ロケール x 領域 のバッチ
mod seeder;
/// 翻訳 1 件の upsert
mod upsert;

pub use keys::{
    KeyOutcome,
    KeyReport,
    ensure_key,
    seed_key_catalog,
};
pub use locales::{
    LocaleOutcome,
    LocaleReport,
    ensure_locale,
    seed_locales,
};
pub use runner::{
    FileReport,
    SeedRunner,
    SeedSummary,
};
pub use seeder::{
    SeedReport,
    TranslationSeeder,
};
pub use upsert::{
    Repositories,
    UpsertOutcome,
};
