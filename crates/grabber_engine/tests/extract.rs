use grabber_engine::{normalize_image_url, scrape_image_urls, scrape_title};
use pretty_assertions::assert_eq;

#[test]
fn title_prefers_main_heading() {
    let html = r#"<html><head><title>Other - pixiv</title></head>
        <body><h1>Not main</h1><main><section><h1> Baz </h1></section></main></body></html>"#;
    assert_eq!(scrape_title(html).as_deref(), Some("Baz"));
}

#[test]
fn title_falls_back_to_title_element_prefix() {
    let html = r#"<html><head><title>Qux - Artist - pixiv</title></head><body></body></html>"#;
    assert_eq!(scrape_title(html).as_deref(), Some("Qux"));
}

#[test]
fn title_is_none_without_heading_or_title() {
    assert_eq!(scrape_title("<html><body><p>nothing</p></body></html>"), None);
}

#[test]
fn master_thumbnail_is_rewritten_to_original() {
    assert_eq!(
        normalize_image_url(
            "https://i.pximg.net/c/250x250_80_a2/img-master/img/2024/01/02/03/04/05/123_p0_master1200.jpg"
        ),
        "https://i.pximg.net/img-original/img/2024/01/02/03/04/05/123_p0.jpg"
    );
    assert_eq!(
        normalize_image_url(
            "https://i.pximg.net/c/250x250_80_a2/custom-thumb/img/2024/01/02/03/04/05/123_p0_custom1200.jpg"
        ),
        "https://i.pximg.net/img-original/img/2024/01/02/03/04/05/123_p0.jpg"
    );
    let original = "https://i.pximg.net/img-original/img/2024/01/02/03/04/05/123_p1.png";
    assert_eq!(normalize_image_url(original), original);
}

#[test]
fn images_are_scraped_normalized_and_deduplicated_in_order() {
    let html = r#"<html><body><main>
        <img src="https://i.pximg.net/user-profile/img/avatar_170.jpg">
        <img src="https://i.pximg.net/img-master/img/2024/01/01/00/00/00/9_p0_master1200.jpg">
        <img src="data:image/gif;base64,AAAA" data-src="https://i.pximg.net/img-original/img/2024/01/01/00/00/00/9_p1.png">
        <img src="https://i.pximg.net/c/250x250_80_a2/img-master/img/2024/01/01/00/00/00/9_p0_master1200.jpg">
        <img src="https://s.pximg.net/common/images/logo.svg">
    </main></body></html>"#;
    assert_eq!(
        scrape_image_urls(html),
        vec![
            "https://i.pximg.net/img-original/img/2024/01/01/00/00/00/9_p0.jpg".to_string(),
            "https://i.pximg.net/img-original/img/2024/01/01/00/00/00/9_p1.png".to_string(),
        ]
    );
}

#[test]
fn page_without_asset_images_yields_nothing() {
    let html = r#"<html><body><img src="/static/banner.png"></body></html>"#;
    assert!(scrape_image_urls(html).is_empty());
}
