use std::future::Future;
use std::sync::Arc;

use url::Url;

use crate::error::FetchError;

/// A loaded image.
///
/// Pixel layout is whatever the fetcher produced; the cache and tracker only
/// need the dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl ImageAsset {
    pub fn new(width: u32, height: u32, pixels: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }
}

/// Loads the image behind a URL.
///
/// Injected into [`AssetCache`](super::AssetCache); called at most once per
/// URL for the lifetime of the cache.
///
/// # Example
///
/// ```ignore
/// use tagcast::{AssetFetcher, FetchError, ImageAsset};
///
/// struct Placeholder;
///
/// impl AssetFetcher for Placeholder {
///     async fn fetch(&self, _url: &url::Url) -> Result<ImageAsset, FetchError> {
///         Ok(ImageAsset::new(1, 1, vec![0xff; 4]))
///     }
/// }
/// ```
pub trait AssetFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<ImageAsset, FetchError>> + Send;
}
