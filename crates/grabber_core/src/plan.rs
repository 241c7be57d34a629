use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::sanitize::name_or_untitled;

/// Extension used when none can be read off the image URL.
pub const DEFAULT_EXTENSION: &str = ".jpg";

const MAX_EXTENSION_LEN: usize = 5;

/// How a profile download is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One subdirectory per post with purely sequential filenames.
    #[default]
    Nested,
    /// Every image directly under the root, named `<title>_<post id>_<NN>`.
    Flat,
}

/// One image to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub source_url: String,
    pub dest: PathBuf,
}

/// One-based, zero-padded sequence stem: `01`, `02`, ..., `100`.
pub fn sequence_stem(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// Extension (with the leading dot) of the last path segment of `url`.
///
/// Query strings and fragments are ignored. Falls back to [`DEFAULT_EXTENSION`].
pub fn infer_extension(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = without_query.rsplit('/').next().unwrap_or(without_query);
    match last_segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{ext}")
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// `01.ext`, `02.ext`, ... inside `dir`, one task per URL in order.
pub fn plan_sequential(dir: &Path, image_urls: &[String]) -> Vec<DownloadTask> {
    image_urls
        .iter()
        .enumerate()
        .map(|(index, url)| DownloadTask {
            source_url: url.clone(),
            dest: dir.join(format!("{}{}", sequence_stem(index), infer_extension(url))),
        })
        .collect()
}

/// `<title>_<post id>_<NN>.ext` inside `dir`, unique across posts of one profile.
pub fn plan_flat(dir: &Path, title: &str, post_id: &str, image_urls: &[String]) -> Vec<DownloadTask> {
    let title = name_or_untitled(title);
    image_urls
        .iter()
        .enumerate()
        .map(|(index, url)| DownloadTask {
            source_url: url.clone(),
            dest: dir.join(format!(
                "{title}_{post_id}_{}{}",
                sequence_stem(index),
                infer_extension(url)
            )),
        })
        .collect()
}

/// Root directory name for a whole-profile download.
pub fn profile_root_name(user_id: &str) -> String {
    format!("Pixiv_User_{}", name_or_untitled(user_id))
}

/// Hands out per-post subdirectory names for the nested layout.
///
/// The first post with a given title gets the bare title; later posts sharing
/// it get `<title>_<post id>` so they never write into each other's folder.
#[derive(Debug, Default)]
pub struct SubdirNames {
    used: HashSet<String>,
}

impl SubdirNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, title: &str, post_id: &str) -> String {
        let base = name_or_untitled(title);
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut candidate = format!("{base}_{post_id}");
        let mut suffix = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{base}_{post_id}_{suffix}");
            suffix += 1;
        }
        candidate
    }
}
