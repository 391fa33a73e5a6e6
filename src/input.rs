//! ワークスペースから読み込むシード資産
/// 入力エラー型
mod error;
/// ソース順の JSON ペア抽出
mod json_pairs;
/// キーカタログ
mod key_catalog;
/// ロケール x 領域 のシードファイル
mod seed_file;

pub use error::{
    JsonInputError,
    SeedFileError,
};
pub use json_pairs::{
    JsonPair,
    PairValue,
    collect_pairs,
};
pub use key_catalog::{
    KeyCatalogFile,
    KeyDefinition,
};
pub use seed_file::{
    DEFAULT_AREA,
    InvalidEntry,
    SeedEntry,
    SeedFile,
    detect_area,
    detect_locale,
};
