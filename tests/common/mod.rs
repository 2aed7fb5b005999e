#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{DateTime, FixedOffset, TimeZone};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use fyyur::{
    config::AppConfig,
    db::connection,
    forms::{ArtistForm, ShowForm, VenueForm},
    routes::router,
    services::ServiceContext,
    state::{AppState, FixedClock},
};

/// A router over a throwaway SQLite file. The directory lives as long as
/// the harness.
pub struct TestApp {
    pub state: Arc<AppState>,
    _dir: TempDir,
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .expect("offset should be valid")
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("timestamp should be valid")
}

pub fn fixed_now() -> DateTime<FixedOffset> {
    at(2030, 1, 1, 12, 0)
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut cfg = AppConfig::default();
        cfg.database.url = format!("sqlite://{}?mode=rwc", dir.path().join("fyyur.db").display());
        cfg.database.max_connections = 4;
        cfg.database.min_idle = 1;

        let db = connection::connect(&cfg.database)
            .await
            .expect("connect to sqlite");
        let state = AppState::with_clock(cfg, db, Arc::new(FixedClock(fixed_now())));
        Self { state, _dir: dir }
    }

    pub fn services(&self) -> ServiceContext {
        ServiceContext::from_state(&self.state)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router should respond")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_body(fields)))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn create_venue(&self, name: &str, city: &str, state: &str) -> Uuid {
        let form = VenueForm {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: "1015 Folsom Street".to_string(),
            genres: vec!["Jazz".to_string()],
            ..VenueForm::default()
        };
        self.services()
            .venue()
            .create(&form)
            .await
            .expect("seed venue")
            .venue
            .id
    }

    pub async fn create_artist(&self, name: &str) -> Uuid {
        let form = ArtistForm {
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            genres: vec!["Rock n Roll".to_string()],
            ..ArtistForm::default()
        };
        self.services()
            .artist()
            .create(&form)
            .await
            .expect("seed artist")
            .artist
            .id
    }

    pub async fn create_show(
        &self,
        artist_id: Uuid,
        venue_id: Uuid,
        start_time: DateTime<FixedOffset>,
    ) -> Uuid {
        let form = ShowForm {
            artist_id: artist_id.to_string(),
            venue_id: venue_id.to_string(),
            start_time: start_time.to_rfc3339(),
        };
        self.services()
            .show()
            .create(&form)
            .await
            .expect("seed show")
            .id
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

pub async fn json_body(response: Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("body should be json");
    (status, json)
}

fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
