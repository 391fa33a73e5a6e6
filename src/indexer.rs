//! シード資産のインデックス作成
pub mod types;
pub mod workspace;

pub use types::{
    IndexerError,
    SeedWorkspace,
};
pub use workspace::SeedIndexer;
