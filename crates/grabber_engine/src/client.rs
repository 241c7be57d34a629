use std::future::Future;
use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use grabber_core::Attempt;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT,
};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use crate::api::decode_envelope;
use crate::{FailureKind, FetchError, GrabberSettings};

/// HTTP access to the site: browser-like headers, optional session cookie,
/// per-endpoint timeouts.
#[derive(Debug, Clone)]
pub struct PixivClient {
    http: reqwest::Client,
    settings: GrabberSettings,
}

impl PixivClient {
    pub fn new(settings: GrabberSettings) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers(&settings)?)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &GrabberSettings {
        &self.settings
    }

    pub fn illust_url(&self, id: &str) -> String {
        format!("{}/ajax/illust/{id}?lang=en", self.settings.base())
    }

    pub fn pages_url(&self, id: &str) -> String {
        format!("{}/ajax/illust/{id}/pages?lang=en", self.settings.base())
    }

    pub fn profile_url(&self, user_id: &str) -> String {
        format!("{}/ajax/user/{user_id}/profile/all?lang=en", self.settings.base())
    }

    /// GET an endpoint and decode its `{ error, message, body }` envelope.
    ///
    /// Every failure comes back as a degradation; nothing here is fatal.
    pub async fn get_api<T: DeserializeOwned>(
        &self,
        url: &str,
        referer: &str,
        timeout: Duration,
    ) -> Attempt<T> {
        match self.get_text(url, referer, timeout).await {
            Ok(body) => decode_envelope(&body),
            Err(err) => Attempt::Degraded(err.into()),
        }
    }

    pub async fn get_text(
        &self,
        url: &str,
        referer: &str,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        let response = self.send(url, referer, Some(timeout)).await?;
        response.text().await.map_err(map_reqwest_error)
    }

    /// Post page HTML, fetched with the site root as referer.
    pub async fn get_page(&self, url: &str) -> Result<String, FetchError> {
        self.get_text(url, &self.settings.site_referer(), self.settings.api_timeout)
            .await
    }

    /// Streams `url` into `dest` chunk by chunk and returns the byte count.
    ///
    /// The image timeout bounds the wait for the response head and the gap
    /// between two chunks, not the whole transfer, so a large original on a
    /// slow link still completes as long as data keeps arriving.
    ///
    /// A failure part way through leaves the partial file behind.
    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let idle = self.settings.image_timeout;
        let response = within(idle, self.send(url, &self.settings.site_referer(), None)).await??;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|err| io_error(dest, err))?;
        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = within(idle, stream.next()).await? {
            let chunk = chunk.map_err(map_reqwest_error)?;
            file.write_all(&chunk)
                .await
                .map_err(|err| io_error(dest, err))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|err| io_error(dest, err))?;
        Ok(written)
    }

    async fn send(
        &self,
        url: &str,
        referer: &str,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let referer = HeaderValue::from_str(referer)
            .map_err(|err| FetchError::new(FailureKind::InvalidHeader, err.to_string()))?;

        let mut request = self.http.get(parsed).header(REFERER, referer);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }
}

fn default_headers(settings: &GrabberSettings) -> Result<HeaderMap, FetchError> {
    let invalid = |err: reqwest::header::InvalidHeaderValue| {
        FetchError::new(FailureKind::InvalidHeader, err.to_string())
    };

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(&settings.user_agent).map_err(invalid)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    if let Some(session_id) = settings.session_id.as_deref().filter(|s| !s.is_empty()) {
        let mut cookie =
            HeaderValue::from_str(&format!("PHPSESSID={session_id}")).map_err(invalid)?;
        cookie.set_sensitive(true);
        headers.insert(COOKIE, cookie);
    }
    Ok(headers)
}

/// Runs `future` but gives up with a timeout error once `limit` passes.
async fn within<F: Future>(limit: Duration, future: F) -> Result<F::Output, FetchError> {
    tokio::time::timeout(limit, future).await.map_err(|_| {
        FetchError::new(
            FailureKind::Timeout,
            format!("no data received for {:.1}s", limit.as_secs_f64()),
        )
    })
}

fn io_error(path: &Path, err: std::io::Error) -> FetchError {
    FetchError::new(FailureKind::Io, format!("{}: {err}", path.display()))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
