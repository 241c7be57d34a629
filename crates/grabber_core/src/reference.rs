use url::Url;

const ARTWORKS_SEGMENT: &str = "artworks";
const USERS_SEGMENT: &str = "users";

/// A post identifier plus its canonical page URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtworkReference {
    pub id: String,
    pub url: String,
}

impl ArtworkReference {
    /// Reference to post `id` on the site rooted at `base`.
    pub fn new(base: &str, id: impl Into<String>) -> Self {
        let id = id.into();
        let url = format!("{}/{ARTWORKS_SEGMENT}/{id}", base.trim_end_matches('/'));
        Self { id, url }
    }

    /// Parses `/artworks/<digits>` out of a post URL.
    ///
    /// The canonical URL keeps the input's origin and drops language prefixes,
    /// query strings and fragments.
    pub fn from_url(input: &str) -> Option<Self> {
        let url = parse_lenient(input)?;
        let id = numeric_after(&url, ARTWORKS_SEGMENT)?;
        Some(Self::new(&origin_of(&url), id))
    }
}

/// A user identifier taken from a profile URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserReference {
    pub id: String,
}

impl UserReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Parses `/users/<digits>` out of a profile URL.
    pub fn from_url(input: &str) -> Option<Self> {
        let url = parse_lenient(input)?;
        numeric_after(&url, USERS_SEGMENT).map(Self::new)
    }

    /// Public profile page, used as the referer for the listing endpoint.
    pub fn artworks_page(&self, base: &str) -> String {
        format!("{}/en/users/{}/artworks", base.trim_end_matches('/'), self.id)
    }
}

/// What a user-supplied URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Post(ArtworkReference),
    Profile(UserReference),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("not a post or profile URL: {0}")]
    Unrecognized(String),
    #[error("no numeric post id in {0}")]
    MissingPostId(String),
    #[error("no numeric user id in {0}")]
    MissingUserId(String),
}

/// Shape-matches an input URL against the post and profile patterns.
pub fn classify(input: &str) -> Result<Target, ShapeError> {
    let trimmed = input.trim();
    let url = parse_lenient(trimmed).ok_or_else(|| ShapeError::Unrecognized(trimmed.into()))?;
    let has_segment = |name: &str| {
        url.path_segments()
            .map(|mut segments| segments.any(|segment| segment == name))
            .unwrap_or(false)
    };

    if has_segment(ARTWORKS_SEGMENT) {
        ArtworkReference::from_url(trimmed)
            .map(Target::Post)
            .ok_or_else(|| ShapeError::MissingPostId(trimmed.into()))
    } else if has_segment(USERS_SEGMENT) {
        UserReference::from_url(trimmed)
            .map(Target::Profile)
            .ok_or_else(|| ShapeError::MissingUserId(trimmed.into()))
    } else {
        Err(ShapeError::Unrecognized(trimmed.into()))
    }
}

/// Accepts scheme-less input such as `www.pixiv.net/artworks/1`.
fn parse_lenient(input: &str) -> Option<Url> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match Url::parse(input) {
        Ok(url) if url.has_host() => Some(url),
        _ => Url::parse(&format!("https://{input}"))
            .ok()
            .filter(Url::has_host),
    }
}

fn numeric_after(url: &Url, marker: &str) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.collect();
    segments
        .windows(2)
        .find(|pair| pair[0] == marker)
        .map(|pair| pair[1])
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_after_requires_whole_digit_segment() {
        let url = Url::parse("https://www.pixiv.net/artworks/12ab").unwrap();
        assert_eq!(numeric_after(&url, ARTWORKS_SEGMENT), None);

        let url = Url::parse("https://www.pixiv.net/artworks/").unwrap();
        assert_eq!(numeric_after(&url, ARTWORKS_SEGMENT), None);
    }

    #[test]
    fn origin_keeps_port() {
        let url = Url::parse("http://127.0.0.1:8080/artworks/5").unwrap();
        assert_eq!(origin_of(&url), "http://127.0.0.1:8080");
    }
}
