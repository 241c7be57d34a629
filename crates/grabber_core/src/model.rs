use crate::sanitize::UNTITLED;

/// Title and ordered original-resolution image URLs of one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPost {
    pub title: String,
    pub image_urls: Vec<String>,
}

impl ResolvedPost {
    pub fn new(title: impl Into<String>, image_urls: Vec<String>) -> Self {
        Self {
            title: title.into(),
            image_urls,
        }
    }

    /// Sentinel result for a post that could not be resolved at all.
    pub fn unresolved() -> Self {
        Self::new(UNTITLED, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.image_urls.is_empty()
    }
}

/// Result of downloading one image. Never persisted, only reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub success: bool,
    pub message: String,
}

impl DownloadOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
