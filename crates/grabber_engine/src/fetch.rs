use std::path::Path;
use std::sync::Arc;

use grabber_core::DownloadOutcome;
use grabber_logging::grab_debug;

use crate::PixivClient;

/// Downloads one image to disk. Failures are reported in the outcome, never raised.
#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> DownloadOutcome;
}

/// Single-attempt streamed download through the shared client.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Arc<PixivClient>,
}

impl HttpImageFetcher {
    pub fn new(client: Arc<PixivClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> DownloadOutcome {
        let name = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dest.display().to_string());

        match self.client.download_to(url, dest).await {
            Ok(bytes) => {
                grab_debug!("Wrote {bytes} bytes to {}", dest.display());
                DownloadOutcome::succeeded(format!("Downloaded {name}"))
            }
            Err(err) => DownloadOutcome::failed(format!("Error downloading {url}: {err}")),
        }
    }
}
