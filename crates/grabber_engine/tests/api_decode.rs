use grabber_core::{Attempt, Degradation};
use grabber_engine::{
    decode_envelope, originals_from_pages, post_ids_from_profile, title_from_details,
    IllustDetails, PageEntry, ProfileBody,
};
use pretty_assertions::assert_eq;

fn degradation<T>(attempt: Attempt<T>) -> Option<Degradation> {
    match attempt {
        Attempt::Resolved(_) => None,
        Attempt::Degraded(reason) => Some(reason),
    }
}

#[test]
fn details_title_is_extracted() {
    let raw = r#"{"error":false,"message":"","body":{"title":"Foo:Bar","illustId":"1"}}"#;
    let title = decode_envelope::<IllustDetails>(raw).and_then(title_from_details);
    assert_eq!(title, Attempt::Resolved("Foo:Bar".to_string()));
}

#[test]
fn error_flag_degrades_with_message() {
    let raw = r#"{"error":true,"message":"Work has been deleted","body":[]}"#;
    assert_eq!(
        degradation(decode_envelope::<IllustDetails>(raw)),
        Some(Degradation::ErrorFlag {
            message: Some("Work has been deleted".into())
        })
    );
}

#[test]
fn html_body_degrades_as_not_json_with_preview() {
    let raw = format!("<!DOCTYPE html><html>{}</html>", "x".repeat(1000));
    match decode_envelope::<IllustDetails>(&raw) {
        Attempt::Degraded(Degradation::NotJson { preview }) => {
            assert!(preview.starts_with("<!DOCTYPE html>"));
            assert_eq!(preview.chars().count(), 500);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn missing_body_and_missing_title_degrade() {
    assert_eq!(
        degradation(decode_envelope::<IllustDetails>(r#"{"error":false}"#)),
        Some(Degradation::Missing("body"))
    );

    let blank = decode_envelope::<IllustDetails>(r#"{"error":false,"body":{"title":"  "}}"#)
        .and_then(title_from_details);
    assert_eq!(blank, Attempt::Degraded(Degradation::Missing("title")));
}

#[test]
fn pages_keep_order_and_skip_entries_without_original() {
    let raw = r#"{"error":false,"body":[
        {"urls":{"original":"https://i.pximg.net/img-original/img/1_p0.png"}},
        {"urls":{"small":"https://i.pximg.net/c/540x540_70/img-master/img/1_p1_master1200.jpg"}},
        {"urls":{"original":"https://i.pximg.net/img-original/img/1_p2.jpg"}}
    ]}"#;
    let urls = decode_envelope::<Vec<PageEntry>>(raw).and_then(originals_from_pages);
    assert_eq!(
        urls,
        Attempt::Resolved(vec![
            "https://i.pximg.net/img-original/img/1_p0.png".to_string(),
            "https://i.pximg.net/img-original/img/1_p2.jpg".to_string(),
        ])
    );
}

#[test]
fn empty_pages_degrade_as_empty() {
    let urls = decode_envelope::<Vec<PageEntry>>(r#"{"error":false,"body":[]}"#)
        .and_then(originals_from_pages);
    assert_eq!(urls, Attempt::Degraded(Degradation::Empty));
}

#[test]
fn profile_accepts_mapping_and_list_shapes() {
    let raw = r#"{"error":false,"body":{
        "illusts":{"1":null,"2":null},
        "manga":[{"id":"2"},{"id":"3"}]
    }}"#;
    let body = decode_envelope::<ProfileBody>(raw).ok().expect("profile body");
    assert_eq!(post_ids_from_profile(body), vec!["1", "2", "3"]);
}

#[test]
fn profile_keeps_api_order_of_mapping_keys() {
    let raw = r#"{"error":false,"body":{"illusts":{"30":null,"4":null,"100":null},"manga":[]}}"#;
    let body = decode_envelope::<ProfileBody>(raw).ok().expect("profile body");
    assert_eq!(post_ids_from_profile(body), vec!["30", "4", "100"]);
}

#[test]
fn profile_tolerates_numeric_ids_odd_items_and_nulls() {
    let raw = r#"{"error":false,"body":{
        "illusts":[{"id":10},{"title":"no id"},"junk",{"id":"11"}],
        "manga":null
    }}"#;
    let body = decode_envelope::<ProfileBody>(raw).ok().expect("profile body");
    assert_eq!(post_ids_from_profile(body), vec!["10", "11"]);
}

#[test]
fn profile_ignores_category_of_unexpected_type() {
    let raw = r#"{"error":false,"body":{"illusts":"nope","manga":{"5":null}}}"#;
    let body = decode_envelope::<ProfileBody>(raw).ok().expect("profile body");
    assert_eq!(post_ids_from_profile(body), vec!["5"]);
}
