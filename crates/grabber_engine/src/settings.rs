use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.pixiv.net";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Everything the engine's collaborators need, passed in at construction.
#[derive(Debug, Clone)]
pub struct GrabberSettings {
    /// Site root used for API endpoints, canonical post URLs and referers.
    pub base_url: String,
    pub user_agent: String,
    /// Value of the `PHPSESSID` cookie; needed for restricted content.
    pub session_id: Option<String>,
    pub connect_timeout: Duration,
    /// Timeout for the metadata and asset endpoints and the post page.
    pub api_timeout: Duration,
    /// Timeout for the profile listing endpoint.
    pub profile_timeout: Duration,
    /// How long an image download may wait for the response head, and
    /// afterwards for each further chunk of the body.
    pub image_timeout: Duration,
    /// Width of the per-batch download pool.
    pub workers: usize,
    /// Pause between posts of a profile download.
    pub post_delay: Duration,
    /// Directory that receives the post or profile folders.
    pub output_dir: PathBuf,
    /// Compress finished folders into `<folder>.zip` and remove them.
    pub archive: bool,
}

impl Default for GrabberSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            session_id: None,
            connect_timeout: Duration::from_secs(10),
            api_timeout: Duration::from_secs(10),
            profile_timeout: Duration::from_secs(15),
            image_timeout: Duration::from_secs(15),
            workers: 10,
            post_delay: Duration::from_millis(500),
            output_dir: PathBuf::from("."),
            archive: true,
        }
    }
}

impl GrabberSettings {
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Pool width, never zero.
    pub fn pool_width(&self) -> usize {
        self.workers.max(1)
    }

    /// Referer sent with image downloads and page fetches.
    pub fn site_referer(&self) -> String {
        format!("{}/", self.base())
    }
}
