use std::sync::Mutex;

use grabber_engine::{GrabEvent, ProgressSink};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const LABEL_WIDTH: usize = 20;

/// Renders engine progress as terminal bars: one for the posts of a
/// profile, one for the images of the current post.
pub struct IndicatifSink {
    bars: MultiProgress,
    posts: Mutex<Option<ProgressBar>>,
    images: Mutex<Option<ProgressBar>>,
}

impl IndicatifSink {
    pub fn new() -> Self {
        Self {
            bars: MultiProgress::new(),
            posts: Mutex::new(None),
            images: Mutex::new(None),
        }
    }

    /// Clears any bar still on screen.
    pub fn finish(&self) {
        for slot in [&self.images, &self.posts] {
            if let Some(bar) = slot.lock().ok().and_then(|mut bar| bar.take()) {
                bar.finish_and_clear();
            }
        }
    }

    fn add_bar(&self, total: usize, message: String) -> ProgressBar {
        let bar = self.bars.add(ProgressBar::new(total as u64));
        bar.set_style(bar_style());
        bar.set_message(message);
        bar
    }

    fn with_bar(slot: &Mutex<Option<ProgressBar>>, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = slot.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }

    fn replace(slot: &Mutex<Option<ProgressBar>>, bar: ProgressBar) {
        if let Ok(mut guard) = slot.lock() {
            if let Some(previous) = guard.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }
}

impl Default for IndicatifSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for IndicatifSink {
    fn emit(&self, event: GrabEvent) {
        match event {
            GrabEvent::ProfileResolved { posts, .. } if posts > 0 => {
                let bar = self.add_bar(posts, "Processing user posts".to_string());
                Self::replace(&self.posts, bar);
            }
            GrabEvent::PostStarted { index, .. } => {
                Self::with_bar(&self.posts, |bar| bar.set_position(index.saturating_sub(1) as u64));
            }
            GrabEvent::BatchStarted { label, total } => {
                let bar = self.add_bar(total, format!("Downloading '{}'", short_label(&label)));
                Self::replace(&self.images, bar);
            }
            GrabEvent::ImageFinished { .. } => {
                Self::with_bar(&self.images, |bar| bar.inc(1));
            }
            GrabEvent::BatchFinished { .. } => {
                if let Some(bar) = self.images.lock().ok().and_then(|mut bar| bar.take()) {
                    bar.finish_and_clear();
                }
                Self::with_bar(&self.posts, |bar| bar.inc(1));
            }
            GrabEvent::ProfileResolved { .. }
            | GrabEvent::PostSkipped { .. }
            | GrabEvent::ArchiveFinished(_) => {}
        }
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

/// Post titles are cut to a fixed width so the bars stay aligned.
fn short_label(label: &str) -> String {
    if label.chars().count() <= LABEL_WIDTH {
        return label.to_string();
    }
    let mut short: String = label.chars().take(LABEL_WIDTH).collect();
    short.push_str("...");
    short
}
