use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use newsdeck::{
    CacheBust, FetchError, HttpSource, HttpSourceConfig, LoadOutcome, ResourceSource, Viewer,
    ViewerConfig,
};

#[derive(Clone, Default)]
struct SiteState {
    files: Arc<HashMap<String, String>>,
    queries: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

async fn serve_data(
    State(state): State<SiteState>,
    Path(file): Path<String>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    state
        .queries
        .lock()
        .expect("query log lock should not be poisoned")
        .push((file.clone(), query));
    match state.files.get(&file) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, "missing".to_string()),
    }
}

async fn spawn_site(files: &[(&str, &str)]) -> (SocketAddr, SiteState) {
    let state = SiteState {
        files: Arc::new(
            files
                .iter()
                .map(|(name, body)| (name.to_string(), body.to_string()))
                .collect(),
        ),
        queries: Arc::default(),
    };
    let app = Router::new()
        .route("/site/data/{file}", get(serve_data))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn source_for(addr: SocketAddr, cache_bust: CacheBust) -> HttpSource {
    let mut cfg = HttpSourceConfig::new(format!("http://{addr}/site/"));
    cfg.timeout_ms = 5_000;
    cfg.cache_bust = cache_bust;
    HttpSource::new(cfg).unwrap()
}

#[tokio::test]
async fn every_fetch_carries_a_cache_busting_parameter() {
    let (addr, state) = spawn_site(&[("date.json", r#"{"dates":[]}"#)]).await;
    let source = source_for(addr, CacheBust::Timestamp);

    let body = source.fetch("data/date.json").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    source.fetch("data/date.json").await.unwrap();

    assert_eq!(body, br#"{"dates":[]}"#);
    let queries = state.queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 2);
    for (file, query) in &queries {
        assert_eq!(file, "date.json");
        let query = query.as_deref().expect("query should be present");
        let stamp = query.strip_prefix("_=").expect("cache-busting parameter");
        assert!(stamp.parse::<i64>().is_ok());
    }
    assert_ne!(queries[0].1, queries[1].1);
}

#[tokio::test]
async fn cache_busting_can_be_disabled() {
    let (addr, state) = spawn_site(&[("date.json", "{}")]).await;
    let source = source_for(addr, CacheBust::Disabled);

    source.fetch("data/date.json").await.unwrap();

    assert_eq!(state.queries.lock().unwrap()[0].1, None);
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let (addr, _state) = spawn_site(&[]).await;
    let source = source_for(addr, CacheBust::Timestamp);

    let err = source.fetch("data/NewsPage-2025-11-18.json").await.unwrap_err();

    assert!(matches!(err, FetchError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source_for(addr, CacheBust::Timestamp)
        .fetch("data/date.json")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::HttpRequest { .. }));
}

#[tokio::test]
async fn viewer_renders_published_site_over_http() {
    let (addr, state) = spawn_site(&[
        ("date.json", r#"{"dates":["2025-11-19","2025-11-18"]}"#),
        (
            "NewsPage-2025-11-19.json",
            r#"{"date":"2025-11-19","BBC中文网热点":[{"title":"Headline","link":"https://www.bbc.com/zhongwen/simp/1"}]}"#,
        ),
        ("NewsPage-2025-11-18.json", r#"{"date":"2025-11-18"}"#),
    ])
    .await;
    let viewer = Viewer::new(
        Arc::new(source_for(addr, CacheBust::Timestamp)),
        ViewerConfig::default(),
    );

    assert_eq!(viewer.load_dates().await, LoadOutcome::Loaded);
    assert_eq!(viewer.page().sections()[0].name, "BBC中文网热点");

    assert_eq!(viewer.select_date("2025-11-18").await, LoadOutcome::Empty);
    assert_eq!(viewer.page().status, "Loaded 2025-11-18.");

    let files: Vec<String> = state
        .queries
        .lock()
        .unwrap()
        .iter()
        .map(|(file, _)| file.clone())
        .collect();
    assert_eq!(
        files,
        vec![
            "date.json",
            "NewsPage-2025-11-19.json",
            "NewsPage-2025-11-18.json"
        ]
    );
}
