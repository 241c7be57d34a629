//! Grabber engine: HTTP, resolution, download and archive pipeline.
mod api;
mod archive;
mod batch;
mod client;
mod extract;
mod fetch;
mod orchestrator;
mod resolve;
mod settings;
mod strategy;
mod types;

pub use api::{
    decode_envelope, originals_from_pages, post_ids_from_profile, title_from_details,
    IllustDetails, PageEntry, PageUrls, ProfileBody, WorkCategory, WorkId, WorkItem,
};
pub use archive::{archive_directory, archive_path_for, ArchiveError, ArchiveOutcome};
pub use batch::{run_batch, BatchReport, TaskOutcome};
pub use client::PixivClient;
pub use extract::{normalize_image_url, scrape_image_urls, scrape_title};
pub use fetch::{HttpImageFetcher, ImageFetcher};
pub use orchestrator::Orchestrator;
pub use resolve::{PostResolver, UserResolver};
pub use settings::GrabberSettings;
pub use strategy::{ChainOutcome, FallbackChain, Strategy};
pub use types::{
    FailureKind, FetchError, GrabEvent, ProgressSink, ResolveError, RunError, RunSummary,
};
