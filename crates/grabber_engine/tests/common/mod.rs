#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use grabber_engine::{GrabEvent, GrabberSettings, PixivClient, ProgressSink};
use serde_json::{json, Value};

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GrabEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take(&self) -> Vec<GrabEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: GrabEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn init_logging() {
    grabber_logging::initialize_for_tests();
}

pub fn settings(base_url: &str, output_dir: &Path) -> GrabberSettings {
    GrabberSettings {
        base_url: base_url.to_string(),
        session_id: Some("test-session".to_string()),
        api_timeout: Duration::from_secs(5),
        profile_timeout: Duration::from_secs(5),
        image_timeout: Duration::from_secs(5),
        workers: 2,
        post_delay: Duration::from_millis(10),
        output_dir: output_dir.to_path_buf(),
        ..GrabberSettings::default()
    }
}

pub fn client(base_url: &str) -> Arc<PixivClient> {
    Arc::new(PixivClient::new(settings(base_url, Path::new("."))).expect("client"))
}

pub fn ok_body(body: Value) -> Value {
    json!({ "error": false, "message": "", "body": body })
}

pub fn error_body(message: &str) -> Value {
    json!({ "error": true, "message": message, "body": [] })
}

pub fn pages_body(urls: &[String]) -> Value {
    let pages: Vec<Value> = urls
        .iter()
        .map(|url| json!({ "urls": { "original": url, "regular": "ignored" }, "width": 10 }))
        .collect();
    ok_body(Value::Array(pages))
}
