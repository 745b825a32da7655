//! Response handling module - asset retrieval, scratch files and content types

pub mod asset;
pub mod format;
pub mod scratch;

pub use asset::{Asset, AssetRetrieval};
pub use scratch::{ScratchFile, ScratchSpace};
