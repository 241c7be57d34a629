//! Response bodies of the ajax endpoints and their decoding.
//!
//! Every endpoint wraps its payload as `{ "error": bool, "message": str, "body": ... }`.
//! Decoding never fails hard: anything unexpected becomes a [`Degradation`].

use grabber_core::{dedupe_preserving_order, Attempt, Degradation};
use grabber_logging::grab_debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

const PREVIEW_CHARS: usize = 500;

/// `body` of `/ajax/illust/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct IllustDetails {
    #[serde(default)]
    pub title: Option<String>,
}

/// One element of the `body` array of `/ajax/illust/{id}/pages`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEntry {
    #[serde(default)]
    pub urls: Option<PageUrls>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageUrls {
    #[serde(default)]
    pub original: Option<String>,
}

/// `body` of `/ajax/user/{id}/profile/all`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileBody {
    #[serde(default)]
    pub illusts: Option<WorkCategory>,
    #[serde(default)]
    pub manga: Option<WorkCategory>,
}

/// A content category of the profile listing, in either of the shapes the API uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WorkCategory {
    /// `{ "<post id>": null | {...}, ... }`
    Keyed(serde_json::Map<String, Value>),
    /// `[ { "id": "<post id>", ... }, ... ]`
    Listed(Vec<WorkItem>),
    Unexpected(Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WorkItem {
    Work { id: WorkId },
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WorkId {
    Text(String),
    Number(u64),
}

impl WorkId {
    pub fn into_string(self) -> String {
        match self {
            WorkId::Text(text) => text,
            WorkId::Number(number) => number.to_string(),
        }
    }
}

impl WorkCategory {
    /// Post ids in API order. Items without an id are skipped.
    pub fn into_ids(self) -> Vec<String> {
        match self {
            WorkCategory::Keyed(map) => map.into_iter().map(|(id, _)| id).collect(),
            WorkCategory::Listed(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    WorkItem::Work { id } => Some(id.into_string()),
                    WorkItem::Other(_) => None,
                })
                .collect(),
            WorkCategory::Unexpected(value) => {
                grab_debug!("Ignoring profile category of unexpected type: {value}");
                Vec::new()
            }
        }
    }
}

/// Decodes an envelope and its `body` into `T`.
pub fn decode_envelope<T: DeserializeOwned>(raw: &str) -> Attempt<T> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => {
            return Attempt::Degraded(Degradation::NotJson {
                preview: raw.chars().take(PREVIEW_CHARS).collect(),
            })
        }
    };

    let Value::Object(mut envelope) = value else {
        return Attempt::Degraded(Degradation::UnexpectedShape("top level is not an object".into()));
    };

    if envelope.get("error").and_then(Value::as_bool).unwrap_or(false) {
        let message = envelope
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string);
        return Attempt::Degraded(Degradation::ErrorFlag { message });
    }

    match envelope.remove("body") {
        None | Some(Value::Null) => Attempt::Degraded(Degradation::Missing("body")),
        Some(body) => serde_json::from_value::<T>(body)
            .map_err(|err| Degradation::UnexpectedShape(err.to_string()))
            .into(),
    }
}

/// Title from the metadata endpoint; untouched, sanitizing is up to the caller.
pub fn title_from_details(details: IllustDetails) -> Attempt<String> {
    match details.title {
        Some(title) if !title.trim().is_empty() => Attempt::Resolved(title),
        _ => Attempt::Degraded(Degradation::Missing("title")),
    }
}

/// Original-resolution URLs in page order; `Empty` if there are none.
pub fn originals_from_pages(pages: Vec<PageEntry>) -> Attempt<Vec<String>> {
    let originals: Vec<String> = pages
        .into_iter()
        .filter_map(|page| page.urls.and_then(|urls| urls.original))
        .filter(|url| !url.is_empty())
        .collect();
    if originals.is_empty() {
        Attempt::Degraded(Degradation::Empty)
    } else {
        Attempt::Resolved(originals)
    }
}

/// Illustration ids followed by manga ids, first occurrence wins.
pub fn post_ids_from_profile(body: ProfileBody) -> Vec<String> {
    let illusts = body.illusts.map(WorkCategory::into_ids).unwrap_or_default();
    let manga = body.manga.map(WorkCategory::into_ids).unwrap_or_default();
    dedupe_preserving_order(illusts.into_iter().chain(manga))
}
