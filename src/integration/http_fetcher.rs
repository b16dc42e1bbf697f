//! HTTP asset fetcher.
//!
//! Downloads the payload URL with `reqwest` and decodes it as PNG into
//! 8-bit samples (palette and low bit depths expanded).
//!
//! # Example
//!
//! ```ignore
//! use tagcast::{HttpFetcher, Session};
//!
//! let session = Session::builder(HttpFetcher::new(), renderer)
//!     .build(tokio::runtime::Handle::current())?;
//! ```

use url::Url;

use crate::cache::{AssetFetcher, ImageAsset};
use crate::error::FetchError;

/// [`AssetFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<ImageAsset, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(url.as_str(), e))?;
        decode_png(url, &body)
    }
}

fn decode_png(url: &Url, bytes: &[u8]) -> Result<ImageAsset, FetchError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| FetchError::decode(url.as_str(), e))?;

    let mut pixels = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut pixels)
        .map_err(|e| FetchError::decode(url.as_str(), e))?;
    pixels.truncate(frame.buffer_size());

    Ok(ImageAsset::new(frame.width, frame.height, pixels))
}
