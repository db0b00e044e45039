mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{event_json, start_in_hours, venue_json, GraphMockServer};
use events_by_location::infra::ReqwestGraph;
use events_by_location::server::{create_server, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(mock: &GraphMockServer, token: Option<&str>, whitelist: &[String]) -> Router {
    let state = AppState {
        graph: mock.graph(),
        default_access_token: token.map(str::to_string),
        request_deadline: Duration::from_secs(5),
    };
    create_server(state, whitelist)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, bytes.to_vec())
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn health_says_ok() {
    let mock = GraphMockServer::new().await;
    let (status, body) = get(app(&mock, None, &[]), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn events_without_coordinates_is_a_500_with_code_one() {
    let mock = GraphMockServer::new().await;
    let (status, body) = get(app(&mock, Some("tok"), &[]), "/events?distance=500").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(&body);
    assert_eq!(body["code"], 1);
    assert_eq!(body["message"], "Please specify the lat and lng parameters!");
    assert_eq!(mock.total_requests().await, 0);
}

#[tokio::test]
async fn events_round_trip() {
    let mock = GraphMockServer::new().await;
    mock.mock_places("52.52,13.405", &["111"]).await;
    mock.mock_venue_batch(
        "111",
        json!({"111": venue_json("111", "Berghain", 52.511, 13.443, vec![
            event_json("e1", "Klubnacht", &start_in_hours(12), 3, 1),
            event_json("e2", "Klubnacht II", &start_in_hours(36), 30, 2),
        ])}),
    )
    .await;

    let (status, body) = get(
        app(&mock, Some("tok"), &[]),
        "/events?latLanArray=52.52,13.405&sort=POPULARITY",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["id"], "e2");
    assert_eq!(events[0]["venue"]["name"], "Berghain");
    assert_eq!(events[0]["stats"]["attending"], 30);
    assert!(events[0]["timeFromNow"].as_i64().unwrap() > 0);
    assert!(events[0]["coverPicture"].is_string());
}

#[tokio::test]
async fn events_by_ids_needs_venue_ids_first() {
    let mock = GraphMockServer::new().await;
    let (status, body) = get(app(&mock, None, &[]), "/eventsbyids?eventIdArray=e1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(&body);
    assert_eq!(body["code"], 1);
    assert_eq!(body["message"], "Please specify the venue details!");
}

#[tokio::test]
async fn events_by_ids_needs_a_token() {
    let mock = GraphMockServer::new().await;
    let (status, body) = get(
        app(&mock, None, &[]),
        "/eventsbyids?venueIdArray=v1&eventIdArray=e1",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(&body)["code"], 2);
    assert_eq!(mock.total_requests().await, 0);
}

#[tokio::test]
async fn events_by_ids_rejects_mismatched_lists() {
    let mock = GraphMockServer::new().await;
    let (status, body) = get(
        app(&mock, Some("tok"), &[]),
        "/eventsbyids?venueIdArray=v1,v2&eventIdArray=e1",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(&body)["code"], 1);
    assert_eq!(mock.total_requests().await, 0);
}

#[tokio::test]
async fn schema_is_served() {
    let mock = GraphMockServer::new().await;
    let (status, body) = get(app(&mock, None, &[]), "/schema").await;
    assert_eq!(status, StatusCode::OK);
    let schema = json_body(&body);
    assert_eq!(schema["$schema"], "http://json-schema.org/draft-07/schema#");
}

#[tokio::test]
async fn cors_whitelist_echoes_allowed_origin() {
    let mock = GraphMockServer::new().await;
    let whitelist = vec!["https://allowed.example".to_string()];

    let response = app(&mock, None, &whitelist)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://allowed.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://allowed.example"
    );

    let response = app(&mock, None, &whitelist)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn unreachable_graph_api_does_not_leak_the_server_token() {
    let graph = ReqwestGraph::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let state = AppState {
        graph: Arc::new(graph),
        default_access_token: Some("SERVER_SECRET_TOKEN".into()),
        request_deadline: Duration::from_secs(5),
    };

    let (status, body) = get(
        create_server(state, &[]),
        "/eventsbyids?venueIdArray=v1&eventIdArray=e1",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body).unwrap();
    assert!(!text.contains("SERVER_SECRET_TOKEN"), "{text}");
    assert_eq!(json_body(text.as_bytes())["code"], -1);
}
