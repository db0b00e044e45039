//! Mock Graph API server shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use events_by_location::app::ports::GraphApi;
use events_by_location::infra::ReqwestGraph;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const VERSION: &str = "v2.8";

pub struct GraphMockServer {
    pub server: MockServer,
}

impl GraphMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn graph(&self) -> Arc<dyn GraphApi> {
        Arc::new(ReqwestGraph::new(&self.server.uri(), Duration::from_secs(5)).unwrap())
    }

    /// Places search around `center` ("lat,lng") answering with `ids`
    pub async fn mock_places(&self, center: &str, ids: &[&str]) {
        let data: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
        Mock::given(method("GET"))
            .and(path(format!("/{VERSION}/search")))
            .and(query_param("type", "place"))
            .and(query_param("center", center))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .mount(&self.server)
            .await;
    }

    /// Batched `/?ids=` lookup for exactly `ids` (comma-joined)
    pub async fn mock_venue_batch(&self, ids: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{VERSION}/")))
            .and(query_param("ids", ids))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_object(&self, id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{VERSION}/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_graph_error(&self, request_path: &str) {
        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "message": "Invalid OAuth access token.",
                    "type": "OAuthException",
                    "code": 190
                }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn request_count(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .count()
    }

    pub async fn total_requests(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }
}

/// Start time `hours` from now in the Graph API's `-0800` offset style
pub fn start_in_hours(hours: i64) -> String {
    (Utc::now() + ChronoDuration::hours(hours))
        .format("%Y-%m-%dT%H:%M:%S%z")
        .to_string()
}

pub fn event_json(id: &str, name: &str, start_time: &str, attending: u64, maybe: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "public",
        "cover": {"id": format!("cover-{id}"), "source": format!("https://img.example/{id}.jpg")},
        "picture": {"data": {"url": format!("https://img.example/{id}-p.jpg")}},
        "description": format!("{name} description"),
        "start_time": start_time,
        "end_time": start_time,
        "category": "MUSIC_EVENT",
        "attending_count": attending,
        "declined_count": 1,
        "maybe_count": maybe,
        "noreply_count": 7
    })
}

pub fn venue_json(id: &str, name: &str, lat: f64, lng: f64, events: Vec<Value>) -> Value {
    json!({
        "id": id,
        "name": name,
        "about": format!("About {name}"),
        "emails": [format!("info@{id}.example")],
        "cover": {"id": format!("cover-{id}"), "source": format!("https://img.example/{id}-cover.jpg")},
        "picture": {"data": {"url": format!("https://img.example/{id}-profile.jpg")}},
        "location": {"latitude": lat, "longitude": lng, "city": "Berlin", "country": "Germany"},
        "events": {"data": events}
    })
}
