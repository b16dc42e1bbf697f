//! Memoizing asset loader shared by every tracked tag.

mod asset_cache;
mod fetcher;

pub use asset_cache::{AssetCache, Outcome, PendingAsset, Resolution};
pub use fetcher::{AssetFetcher, ImageAsset};
