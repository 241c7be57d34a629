mod common;

use grabber_engine::{PostResolver, ResolveError, UserResolver};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client, error_body, init_logging, ok_body, pages_body};

const SCRAPED_PAGE: &str = r#"<html><head><title>Wrong - pixiv</title></head><body><main>
    <h1>Baz</h1>
    <img src="https://i.pximg.net/img-master/img/2024/05/06/07/08/09/123_p0_master1200.jpg">
    <img src="https://i.pximg.net/c/250x250_80_a2/img-master/img/2024/05/06/07/08/09/123_p1_master1200.png">
    <img src="https://i.pximg.net/img-master/img/2024/05/06/07/08/09/123_p0_master1200.jpg">
</main></body></html>"#;

#[tokio::test]
async fn title_comes_from_metadata_api_and_is_sanitized() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/123"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({ "title": "Foo:Bar" }))))
        .mount(&server)
        .await;
    let images = vec![
        format!("{}/img-original/img/123_p0.png", server.uri()),
        format!("{}/img-original/img/123_p1.png", server.uri()),
    ];
    Mock::given(method("GET"))
        .and(path("/ajax/illust/123/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pages_body(&images)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artworks/123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SCRAPED_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = PostResolver::new(client(&server.uri()));
    let post = resolver
        .resolve(&format!("{}/en/artworks/123", server.uri()))
        .await;

    assert_eq!(post.title, "FooBar");
    assert_eq!(post.image_urls, images);
}

#[tokio::test]
async fn both_apis_flagged_fall_back_to_one_page_scrape() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body("restricted")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/123/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body("restricted")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artworks/123"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SCRAPED_PAGE, "text/html; charset=utf-8"))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = PostResolver::new(client(&server.uri()));
    let post = resolver
        .resolve(&format!("{}/artworks/123", server.uri()))
        .await;

    assert_eq!(post.title, "Baz");
    assert_eq!(
        post.image_urls,
        vec![
            "https://i.pximg.net/img-original/img/2024/05/06/07/08/09/123_p0.jpg".to_string(),
            "https://i.pximg.net/img-original/img/2024/05/06/07/08/09/123_p1.png".to_string(),
        ]
    );
}

#[tokio::test]
async fn login_page_instead_of_json_uses_title_element() {
    init_logging();
    let server = MockServer::start().await;
    let login_page = "<html><head><title>Qux: study - pixiv</title></head><body>Please log in</body></html>";
    Mock::given(method("GET"))
        .and(path("/ajax/illust/55"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(login_page, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/55/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(login_page, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artworks/55"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(login_page, "text/html"))
        .mount(&server)
        .await;

    let resolver = PostResolver::new(client(&server.uri()));
    let post = resolver
        .resolve(&format!("{}/artworks/55", server.uri()))
        .await;

    assert_eq!(post.title, "Qux study");
    assert!(post.image_urls.is_empty());
}

#[tokio::test]
async fn unreachable_everything_yields_sentinel() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = PostResolver::new(client(&server.uri()));
    let post = resolver
        .resolve(&format!("{}/artworks/77", server.uri()))
        .await;

    assert_eq!(post.title, "Untitled");
    assert!(post.image_urls.is_empty());
    // metadata, page (fetched once for both fallbacks), pages api
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn invalid_post_url_makes_no_requests() {
    init_logging();
    let server = MockServer::start().await;

    let resolver = PostResolver::new(client(&server.uri()));
    let post = resolver.resolve(&format!("{}/artworks/", server.uri())).await;

    assert_eq!(post.title, "Untitled");
    assert!(post.image_urls.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn api_requests_carry_browser_headers_cookie_and_post_referer() {
    init_logging();
    let server = MockServer::start().await;
    let post_url = format!("{}/artworks/9", server.uri());
    Mock::given(method("GET"))
        .and(path("/ajax/illust/9"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .and(header("cookie", "PHPSESSID=test-session"))
        .and(header("referer", post_url.as_str()))
        .and(header("sec-fetch-mode", "cors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({ "title": "Headers" }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ajax/illust/9/pages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(pages_body(&["https://i.pximg.net/img-original/img/9_p0.png".into()])),
        )
        .mount(&server)
        .await;

    let resolver = PostResolver::new(client(&server.uri()));
    let post = resolver.resolve(&post_url).await;

    assert_eq!(post.title, "Headers");
}

#[tokio::test]
async fn profile_listing_merges_both_shapes() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/user/42/profile/all"))
        .and(header(
            "referer",
            format!("{}/en/users/42/artworks", server.uri()).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "illusts": { "1": null, "2": null },
            "manga": [ { "id": "2" }, { "id": "3" } ],
            "novels": []
        }))))
        .mount(&server)
        .await;

    let resolver = UserResolver::new(client(&server.uri()));
    let posts = resolver
        .resolve(&format!("{}/en/users/42", server.uri()))
        .await
        .unwrap();

    let base = server.uri();
    assert_eq!(
        posts,
        vec![
            format!("{base}/artworks/1"),
            format!("{base}/artworks/2"),
            format!("{base}/artworks/3"),
        ]
    );
}

#[tokio::test]
async fn profile_listing_failure_is_an_empty_list() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/user/42/profile/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body("User not found")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ajax/user/43/profile/all"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>captcha</html>", "text/html"))
        .mount(&server)
        .await;

    let resolver = UserResolver::new(client(&server.uri()));
    let flagged = resolver
        .resolve(&format!("{}/users/42", server.uri()))
        .await
        .unwrap();
    let not_json = resolver
        .resolve(&format!("{}/users/43", server.uri()))
        .await
        .unwrap();

    assert!(flagged.is_empty());
    assert!(not_json.is_empty());
}

#[tokio::test]
async fn profile_url_without_user_id_is_an_error() {
    init_logging();
    let server = MockServer::start().await;
    let resolver = UserResolver::new(client(&server.uri()));

    let err = resolver
        .resolve(&format!("{}/users/me", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::InvalidProfileUrl(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
