//! i18n-seed
//!
//! ローカライズ済み UI 文字列を翻訳ストアへ冪等に投入するツール

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod indexer;
pub mod input;
pub mod lookup;
pub mod model;
pub mod seed;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use error::AppError;
