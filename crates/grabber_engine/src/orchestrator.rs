use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use grabber_core::{
    name_or_untitled, plan_flat, plan_sequential, profile_root_name, ArtworkReference,
    DownloadTask, Layout, SubdirNames, Target, UserReference,
};
use grabber_logging::{grab_error, grab_info, grab_warn};

use crate::archive::{archive_directory, ArchiveOutcome};
use crate::batch::{run_batch, BatchReport};
use crate::fetch::{HttpImageFetcher, ImageFetcher};
use crate::resolve::{PostResolver, UserResolver};
use crate::{GrabEvent, GrabberSettings, PixivClient, ProgressSink, RunError, RunSummary};

/// Drives one run: resolve, lay out, download in bounded batches, archive.
///
/// The directory being filled is remembered so that an interrupted run can
/// still be archived through [`Orchestrator::finish_interrupted`].
pub struct Orchestrator {
    settings: GrabberSettings,
    posts: PostResolver,
    users: UserResolver,
    fetcher: Arc<dyn ImageFetcher>,
    sink: Arc<dyn ProgressSink>,
    in_progress: Mutex<Option<PathBuf>>,
}

impl Orchestrator {
    pub fn new(settings: GrabberSettings, sink: Arc<dyn ProgressSink>) -> Result<Self, RunError> {
        let client = Arc::new(PixivClient::new(settings.clone())?);
        let fetcher = Arc::new(HttpImageFetcher::new(client.clone()));
        Ok(Self::with_parts(settings, client, fetcher, sink))
    }

    /// Like [`Orchestrator::new`] but with a caller-supplied image fetcher.
    pub fn with_parts(
        settings: GrabberSettings,
        client: Arc<PixivClient>,
        fetcher: Arc<dyn ImageFetcher>,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            settings,
            posts: PostResolver::new(client.clone()),
            users: UserResolver::new(client),
            fetcher,
            sink,
            in_progress: Mutex::new(None),
        }
    }

    pub async fn run(&self, target: &Target, layout: Layout) -> Result<RunSummary, RunError> {
        match target {
            Target::Post(reference) => self.download_post(reference).await,
            Target::Profile(user) => self.download_profile(user, layout).await,
        }
    }

    /// Single post into `<output>/<title>/01.ext, 02.ext, ...`.
    pub async fn download_post(&self, reference: &ArtworkReference) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary {
            posts_total: 1,
            ..RunSummary::default()
        };
        self.sink.emit(GrabEvent::PostStarted {
            index: 1,
            total: 1,
            url: reference.url.clone(),
        });

        let post = self.posts.resolve_reference(reference).await;
        if post.is_empty() {
            grab_warn!(
                "No images found for {}. It might be private, deleted, or the API structure has changed.",
                reference.url
            );
            summary.posts_skipped = 1;
            self.sink.emit(GrabEvent::PostSkipped {
                url: reference.url.clone(),
                reason: "no images found".into(),
            });
            return Ok(summary);
        }

        let dir = self.settings.output_dir.join(name_or_untitled(&post.title));
        create_dir(&dir)?;
        self.mark_in_progress(&dir);
        grab_info!(
            "Starting download of '{}' into {:?} with {} image(s)",
            post.title,
            dir,
            post.image_urls.len()
        );

        let tasks = plan_sequential(&dir, &post.image_urls);
        let report = self.execute(tasks, &post.title).await;
        summary.images_downloaded = report.succeeded();
        summary.images_failed = report.failed();
        summary.output = Some(dir);
        summary.archive = self.finish().await;
        grab_info!("Download of '{}' completed", post.title);
        Ok(summary)
    }

    /// Every post of a profile under `<output>/Pixiv_User_<id>`.
    pub async fn download_profile(
        &self,
        user: &UserReference,
        layout: Layout,
    ) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();
        let posts = self.users.resolve_reference(user).await;
        self.sink.emit(GrabEvent::ProfileResolved {
            user_id: user.id.clone(),
            posts: posts.len(),
        });
        if posts.is_empty() {
            grab_warn!(
                "No posts found for user {}, or the artwork list could not be fetched",
                user.id
            );
            return Ok(summary);
        }

        let root = self.settings.output_dir.join(profile_root_name(&user.id));
        create_dir(&root)?;
        self.mark_in_progress(&root);
        summary.posts_total = posts.len();
        summary.output = Some(root.clone());
        grab_info!(
            "Found {} post(s) for user {}, downloading into {:?} ({:?} layout)",
            posts.len(),
            user.id,
            root,
            layout
        );

        let mut subdirs = SubdirNames::new();
        let total = posts.len();
        for (index, reference) in posts.iter().enumerate() {
            self.sink.emit(GrabEvent::PostStarted {
                index: index + 1,
                total,
                url: reference.url.clone(),
            });

            match self.download_profile_post(&root, reference, layout, &mut subdirs).await {
                Ok(report) => {
                    summary.images_downloaded += report.succeeded();
                    summary.images_failed += report.failed();
                }
                Err(reason) => {
                    grab_warn!("Skipping post {}: {}", reference.url, reason);
                    summary.posts_skipped += 1;
                    self.sink.emit(GrabEvent::PostSkipped {
                        url: reference.url.clone(),
                        reason,
                    });
                }
            }

            if index + 1 < total {
                tokio::time::sleep(self.settings.post_delay).await;
            }
        }

        summary.archive = self.finish().await;
        grab_info!("All downloads for user {} completed", user.id);
        Ok(summary)
    }

    /// Archives whatever directory an interrupted run was filling.
    pub async fn finish_interrupted(&self) -> Option<ArchiveOutcome> {
        if self.current_dir().is_none() {
            grab_info!("No active download folder to archive");
            return None;
        }
        grab_warn!("Archiving partially downloaded folder");
        self.finish().await
    }

    /// Directory currently being filled, if any.
    pub fn current_dir(&self) -> Option<PathBuf> {
        self.in_progress
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    async fn download_profile_post(
        &self,
        root: &Path,
        reference: &ArtworkReference,
        layout: Layout,
        subdirs: &mut SubdirNames,
    ) -> Result<BatchReport, String> {
        let post = self.posts.resolve_reference(reference).await;
        if post.is_empty() {
            return Err("no images found".into());
        }

        let tasks = match layout {
            Layout::Nested => {
                let dir = root.join(subdirs.claim(&post.title, &reference.id));
                std::fs::create_dir_all(&dir)
                    .map_err(|err| format!("failed to create {}: {err}", dir.display()))?;
                plan_sequential(&dir, &post.image_urls)
            }
            Layout::Flat => plan_flat(root, &post.title, &reference.id, &post.image_urls),
        };

        Ok(self.execute(tasks, &post.title).await)
    }

    async fn execute(&self, tasks: Vec<DownloadTask>, label: &str) -> BatchReport {
        run_batch(
            self.fetcher.as_ref(),
            tasks,
            self.settings.pool_width(),
            self.sink.as_ref(),
            label,
        )
        .await
    }

    fn mark_in_progress(&self, dir: &Path) {
        if let Ok(mut guard) = self.in_progress.lock() {
            *guard = Some(dir.to_path_buf());
        }
    }

    /// Takes the in-progress directory and archives it unless archiving is off.
    ///
    /// The slot is cleared before archiving starts, so a second call (from the
    /// interrupt path) never archives the same directory twice.
    async fn finish(&self) -> Option<ArchiveOutcome> {
        let dir = self.in_progress.lock().ok().and_then(|mut guard| guard.take())?;
        if !self.settings.archive {
            grab_info!("Archiving disabled, leaving {:?} in place", dir);
            return None;
        }

        let outcome = match tokio::task::spawn_blocking(move || archive_directory(&dir)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                grab_error!("Archiving failed: {err}");
                return None;
            }
            Err(err) => {
                grab_error!("Archiving task failed: {err}");
                return None;
            }
        };
        self.sink.emit(GrabEvent::ArchiveFinished(outcome.clone()));
        Some(outcome)
    }
}

fn create_dir(dir: &Path) -> Result<(), RunError> {
    std::fs::create_dir_all(dir).map_err(|source| RunError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
