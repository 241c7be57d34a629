//! Grabber core: pure domain logic shared by the engine and the app.
//!
//! Nothing in this crate touches the network or the filesystem.
mod attempt;
mod dedupe;
mod model;
mod plan;
mod reference;
mod sanitize;

pub use attempt::{Attempt, Degradation};
pub use dedupe::dedupe_preserving_order;
pub use model::{DownloadOutcome, ResolvedPost};
pub use plan::{
    infer_extension, plan_flat, plan_sequential, profile_root_name, sequence_stem, DownloadTask,
    Layout, SubdirNames, DEFAULT_EXTENSION,
};
pub use reference::{classify, ArtworkReference, ShapeError, Target, UserReference};
pub use sanitize::{is_forbidden, name_or_untitled, sanitize, UNTITLED};
