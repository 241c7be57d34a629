use std::sync::Arc;

use async_trait::async_trait;
use grabber_core::{
    sanitize, ArtworkReference, Attempt, Degradation, ResolvedPost, UserReference, UNTITLED,
};
use grabber_logging::{grab_info, grab_warn};

use crate::api::{originals_from_pages, post_ids_from_profile, title_from_details};
use crate::api::{IllustDetails, PageEntry, ProfileBody};
use crate::extract::{scrape_image_urls, scrape_title};
use crate::strategy::{FallbackChain, Strategy};
use crate::{PixivClient, ResolveError};

/// State shared by the tiers resolving one post.
pub(crate) struct PostContext {
    reference: ArtworkReference,
    client: Arc<PixivClient>,
    /// Post page, fetched at most once; a failed fetch is remembered too.
    page: Option<Result<String, Degradation>>,
}

impl PostContext {
    fn new(reference: ArtworkReference, client: Arc<PixivClient>) -> Self {
        Self {
            reference,
            client,
            page: None,
        }
    }

    async fn page(&mut self) -> Result<&str, Degradation> {
        if self.page.is_none() {
            grab_info!("Fetching post page {}", self.reference.url);
            let fetched = self
                .client
                .get_page(&self.reference.url)
                .await
                .map_err(Degradation::from);
            self.page = Some(fetched);
        }
        match &self.page {
            Some(Ok(html)) => Ok(html.as_str()),
            Some(Err(reason)) => Err(reason.clone()),
            None => Err(Degradation::Missing("post page")),
        }
    }
}

struct MetadataTitle;

#[async_trait]
impl Strategy<PostContext, String> for MetadataTitle {
    fn name(&self) -> &'static str {
        "metadata api"
    }

    async fn attempt(&self, ctx: &mut PostContext) -> Attempt<String> {
        let url = ctx.client.illust_url(&ctx.reference.id);
        let timeout = ctx.client.settings().api_timeout;
        ctx.client
            .get_api::<IllustDetails>(&url, &ctx.reference.url, timeout)
            .await
            .and_then(title_from_details)
            .and_then(sanitized)
    }
}

struct PageTitle;

#[async_trait]
impl Strategy<PostContext, String> for PageTitle {
    fn name(&self) -> &'static str {
        "post page heading"
    }

    async fn attempt(&self, ctx: &mut PostContext) -> Attempt<String> {
        match ctx.page().await {
            Ok(html) => scrape_title(html)
                .map(Attempt::Resolved)
                .unwrap_or(Attempt::Degraded(Degradation::Missing("title element")))
                .and_then(sanitized),
            Err(reason) => Attempt::Degraded(reason),
        }
    }
}

struct PagesApiImages;

#[async_trait]
impl Strategy<PostContext, Vec<String>> for PagesApiImages {
    fn name(&self) -> &'static str {
        "pages api"
    }

    async fn attempt(&self, ctx: &mut PostContext) -> Attempt<Vec<String>> {
        let url = ctx.client.pages_url(&ctx.reference.id);
        let timeout = ctx.client.settings().api_timeout;
        ctx.client
            .get_api::<Vec<PageEntry>>(&url, &ctx.reference.url, timeout)
            .await
            .and_then(originals_from_pages)
    }
}

struct PageImages;

#[async_trait]
impl Strategy<PostContext, Vec<String>> for PageImages {
    fn name(&self) -> &'static str {
        "post page images"
    }

    async fn attempt(&self, ctx: &mut PostContext) -> Attempt<Vec<String>> {
        match ctx.page().await {
            Ok(html) => {
                let urls = scrape_image_urls(html);
                if urls.is_empty() {
                    Attempt::Degraded(Degradation::Empty)
                } else {
                    Attempt::Resolved(urls)
                }
            }
            Err(reason) => Attempt::Degraded(reason),
        }
    }
}

fn sanitized(title: String) -> Attempt<String> {
    let cleaned = sanitize(title.trim());
    if cleaned.trim().is_empty() {
        Attempt::Degraded(Degradation::Missing("usable title"))
    } else {
        Attempt::Resolved(cleaned)
    }
}

/// Turns a post URL into its title and original-resolution image URLs.
pub struct PostResolver {
    client: Arc<PixivClient>,
    titles: FallbackChain<PostContext, String>,
    images: FallbackChain<PostContext, Vec<String>>,
}

impl PostResolver {
    pub fn new(client: Arc<PixivClient>) -> Self {
        Self {
            client,
            titles: FallbackChain::new("title")
                .then(MetadataTitle)
                .then(PageTitle),
            images: FallbackChain::new("images")
                .then(PagesApiImages)
                .then(PageImages),
        }
    }

    /// Never fails: an unusable URL yields the untitled, empty sentinel.
    pub async fn resolve(&self, post_url: &str) -> ResolvedPost {
        match ArtworkReference::from_url(post_url) {
            Some(reference) => self.resolve_reference(&reference).await,
            None => {
                grab_warn!("Invalid artwork URL format: {post_url}");
                ResolvedPost::unresolved()
            }
        }
    }

    pub async fn resolve_reference(&self, reference: &ArtworkReference) -> ResolvedPost {
        grab_info!("Processing post {}", reference.url);
        let mut ctx = PostContext::new(reference.clone(), self.client.clone());

        let title = self
            .titles
            .resolve(&mut ctx)
            .await
            .into_value()
            .unwrap_or_else(|| UNTITLED.to_string());
        let image_urls = self
            .images
            .resolve(&mut ctx)
            .await
            .into_value()
            .unwrap_or_default();

        grab_info!(
            "Post {} resolved: title '{}', {} image(s)",
            reference.id,
            title,
            image_urls.len()
        );
        ResolvedPost::new(title, image_urls)
    }
}

/// Lists every post of a user profile.
pub struct UserResolver {
    client: Arc<PixivClient>,
}

impl UserResolver {
    pub fn new(client: Arc<PixivClient>) -> Self {
        Self { client }
    }

    /// Post URLs of the profile, illustrations first, without duplicates.
    ///
    /// Only a URL without a user id is an error; listing failures give an
    /// empty list.
    pub async fn resolve(&self, profile_url: &str) -> Result<Vec<String>, ResolveError> {
        let user = UserReference::from_url(profile_url)
            .ok_or_else(|| ResolveError::InvalidProfileUrl(profile_url.to_string()))?;
        Ok(self
            .resolve_reference(&user)
            .await
            .into_iter()
            .map(|reference| reference.url)
            .collect())
    }

    pub async fn resolve_reference(&self, user: &UserReference) -> Vec<ArtworkReference> {
        let settings = self.client.settings();
        let url = self.client.profile_url(&user.id);
        let referer = user.artworks_page(settings.base());
        grab_info!("Fetching artwork list for user {} via {}", user.id, url);

        match self
            .client
            .get_api::<ProfileBody>(&url, &referer, settings.profile_timeout)
            .await
        {
            Attempt::Resolved(body) => {
                let references: Vec<ArtworkReference> = post_ids_from_profile(body)
                    .into_iter()
                    .map(|id| ArtworkReference::new(settings.base(), id))
                    .collect();
                grab_info!("Found {} artwork(s) for user {}", references.len(), user.id);
                references
            }
            Attempt::Degraded(reason) => {
                grab_warn!("Could not list artworks for user {}: {}", user.id, reason);
                if let Degradation::NotJson { preview } = &reason {
                    grab_warn!(
                        "Profile listing returned non-JSON; check that the PHPSESSID is set and current. Body starts with: {}",
                        preview
                    );
                }
                Vec::new()
            }
        }
    }
}
