use std::sync::LazyLock;

use grabber_core::dedupe_preserving_order;
use regex::Regex;
use scraper::{Html, Selector};

/// Asset host paths that carry post images (as opposed to avatars, banners, ...).
static ASSET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"i\.pximg\.net/(?:c/[^/]+/)?(?:img-master|img-original|custom-thumb)/")
        .expect("asset url pattern")
});

/// Resized-thumbnail path segment such as `/c/250x250_80_a2/`.
static THUMBNAIL_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/c/\d+x\d+[^/]*/").expect("thumbnail segment pattern"));

/// `_master1200.jpg` and friends, the resolution suffix of derived images.
static RESOLUTION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_(?:master|custom|square)\d+\.(jpg|png|gif)").expect("resolution suffix pattern")
});

const LAZY_SRC_ATTR: &str = "data-src";

/// Title of a post page: first `main h1`, else `<title>` up to the first " - ".
pub fn scrape_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let heading_sel = Selector::parse("main h1").ok();
    let title_sel = Selector::parse("title").ok();

    let heading = heading_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .map(|h| h.text().collect::<String>().trim().to_string())
        .filter(|h| !h.is_empty());
    if heading.is_some() {
        return heading;
    }

    title_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .map(|t| t.text().collect::<String>())
        .and_then(|text| text.split(" - ").next().map(|s| s.trim().to_string()))
        .filter(|t| !t.is_empty())
}

/// Original-resolution image URLs referenced by `<img>` elements, in document
/// order without duplicates.
///
/// An element counts when its `src` or its lazy-load `data-src` points at the
/// asset host; `src` wins when both do.
pub fn scrape_image_urls(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let Ok(img_sel) = Selector::parse("img") else {
        return Vec::new();
    };

    let matched = doc.select(&img_sel).filter_map(|img| {
        let element = img.value();
        [element.attr("src"), element.attr(LAZY_SRC_ATTR)]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|src| ASSET_URL.is_match(src))
            .map(normalize_image_url)
    });

    dedupe_preserving_order(matched)
}

/// Rewrites a thumbnail or master URL to the original-resolution asset URL.
pub fn normalize_image_url(src: &str) -> String {
    let stripped = THUMBNAIL_SEGMENT.replace_all(src, "/");
    let rewritten = stripped
        .replace("custom-thumb", "img-original")
        .replace("/img-master/", "/img-original/");
    RESOLUTION_SUFFIX.replace_all(&rewritten, ".$1").into_owned()
}
