use axum::{http::header, routing::get, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wordfreq_charts::{api::routes::create_router, config::Config, AppState};

const PAGE: &str = "<!DOCTYPE html><html><head><title>Pets</title>\
    <script>var cat = 'not counted';</script></head>\
    <body><h1>cat dog cat</h1><p>bird, dog &amp; cat!</p></body></html>";

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn start() -> (String, String) {
    let site = serve(Router::new().route(
        "/pets",
        get(|| async { ([(header::CONTENT_TYPE, "text/html")], PAGE) }),
    ))
    .await;
    let api = serve(create_router(AppState::new(Config::default()).unwrap())).await;
    (site, api)
}

async fn analyze(api: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/analyze", api))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    let body = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    (status, body)
}

#[tokio::test]
async fn analyzes_a_page_end_to_end() {
    let (site, api) = start().await;

    let (status, body) = analyze(
        &api,
        json!({ "url": format!("{}/pets", site), "chart_kind": "waterfall" }),
    )
    .await;
    assert_eq!(status, 200);

    let data = &body["data"];
    assert_eq!(data["chart_kind"], "waterfall");
    assert_eq!(data["encoding"], "UTF-8");
    assert_eq!(data["top_words_text"], "1. cat: 3\n2. dog: 2\n3. Pets: 1\n4. bird: 1");
    assert_eq!(data["chart"]["format"], "figure");
    assert_eq!(data["chart"]["figure"]["data"][0]["y"], json!([3, 2, 1, 1]));
    assert_eq!(data["token_count"], 7);
}

#[tokio::test]
async fn word_cloud_comes_back_as_html() {
    let (site, api) = start().await;

    let (status, body) = analyze(
        &api,
        json!({ "url": format!("{}/pets", site), "chart_kind": "词云图" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["chart"]["format"], "html");
    assert_eq!(body["data"]["chart"]["words"][0]["font_size"], json!(100.0));
}

#[tokio::test]
async fn unknown_kind_is_reported_not_fatal() {
    let (site, api) = start().await;

    let (status, body) = analyze(
        &api,
        json!({ "url": format!("{}/pets", site), "chart_kind": "sunburst" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["chart_kind"], Value::Null);
    let degradations = body["data"]["degradations"].as_array().unwrap();
    assert!(degradations.iter().any(|d| d["kind"] == "unknown_chart_kind"));
}

#[tokio::test]
async fn fetch_failures_surface_as_errors() {
    let (site, api) = start().await;

    let (status, body) = analyze(&api, json!({ "url": format!("{}/missing", site) })).await;
    assert_eq!(status, 502);
    assert_eq!(body["meta"]["error_code"], "status");
    assert_eq!(body["data"], Value::Null);

    let (status, body) = analyze(&api, json!({ "url": "file:///etc/passwd" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["meta"]["error_code"], "invalid_url");
}

#[tokio::test]
async fn lists_chart_kinds() {
    let (_, api) = start().await;

    let body: Value = serde_json::from_str(
        &reqwest::get(format!("{}/api/chart-kinds", api))
            .await
            .unwrap()
            .text()
            .await
            .unwrap(),
    )
    .unwrap();
    let kinds = body["data"].as_array().unwrap();
    assert_eq!(kinds.len(), 7);
    assert_eq!(kinds[4]["kind"], "word-cloud");
    assert_eq!(kinds[4]["embeds_html"], true);
}
