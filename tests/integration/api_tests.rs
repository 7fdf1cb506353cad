use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use similar_proxy::config::Config;
use similar_proxy::server::{build_router, AppState};
use similar_proxy::Coordinator;
use tower::ServiceExt;
use wiremock::matchers::{header as header_eq, headers as headers_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Response as seen by a client of the proxy
struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response is not JSON")
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response is not UTF-8")
    }
}

/// Builds the router against a mock upstream
fn app_for(server: &MockServer) -> Router {
    let mut config = Config::default();
    config.upstream.base_url = server.uri();
    config.pagination.page_delay_ms = 0;

    let coordinator = Coordinator::from_config(&config).expect("Failed to build coordinator");
    build_router(AppState::new(coordinator))
}

async fn get(app: Router, uri: &str) -> Reply {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    Reply {
        status,
        content_type,
        body,
    }
}

/// Renders a listing page with one block per `(poster, label, is_tv)`
fn listing(items: &[(&str, &str, bool)]) -> String {
    let blocks: String = items
        .iter()
        .map(|(poster, label, tv)| {
            format!(
                r#"<div class="column"><div class="column-img"><img src="{}" alt="{}"></div>{}</div>"#,
                poster,
                label,
                if *tv {
                    r#"<span class="label label-default">TV show</span>"#
                } else {
                    ""
                }
            )
        })
        .collect();
    format!(
        r#"<html><head><title>Similar</title><meta name="description" content="Similar movies and shows"></head><body><div class="row">{}</div></body></html>"#,
        blocks
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let reply = get(app_for(&server), "/health").await;

    assert_eq!(reply.status, StatusCode::OK);
    let json = reply.json();
    assert_eq!(json["status"], "OK");
    let timestamp = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_missing_parameters_are_bad_requests() {
    let server = MockServer::start().await;

    for uri in [
        "/api/suggestions",
        "/api/suggestions?term=",
        "/api/recommendations",
        "/api/recommendations?url=",
        "/api/recommendations?other=/movies/1-x",
    ] {
        let reply = get(app_for(&server), uri).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(reply.json()["error"].is_string(), "{}", uri);
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_suggestions_pass_through_verbatim() {
    let server = MockServer::start().await;
    let upstream_body = "[ {\"label\" : \"Game of Thrones (2011)\", \"rating\": 8.50},\n  {\"label\":\"Gamer\"} ]";

    Mock::given(method("GET"))
        .and(path("/site/autocomplete"))
        .and(query_param("term", "game of"))
        .and(headers_eq("accept", vec!["application/json", "text/plain", "*/*"]))
        .and(header_eq("origin", server.uri().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(upstream_body))
        .expect(1)
        .mount(&server)
        .await;

    let reply = get(app_for(&server), "/api/suggestions?term=game%20of").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type.as_deref(), Some("application/json"));
    assert_eq!(reply.body, upstream_body.as_bytes());
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/site/autocomplete"))
        .and(query_param("term", "a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let reply = get(app_for(&server), "/api/suggestions?term=a&term=b").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), "[]");

    let reply = get(app_for(&server), "/api/recommendations?url=/tag/1-x&url=/tag/2-y").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["total"], 0);

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert!(requested.iter().any(|p| p == "/tag/1-x"));
    assert!(requested.iter().all(|p| p != "/tag/2-y"));
}

#[tokio::test]
async fn test_repeated_empty_keys_are_json_bad_requests() {
    let server = MockServer::start().await;

    for uri in ["/api/suggestions?term=&term=", "/api/recommendations?url=&url="] {
        let reply = get(app_for(&server), uri).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(reply.content_type.as_deref(), Some("application/json"), "{}", uri);
        assert!(reply.json()["error"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_suggestions_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/site/autocomplete"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let reply = get(app_for(&server), "/api/suggestions?term=x").await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json()["error"], "Failed to fetch suggestions");
}

#[tokio::test]
async fn test_title_flow_collects_all_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movies/26240-game-of-thrones"))
        .and(headers_eq("accept-language", vec!["en-GB", "en;q=0.5"]))
        .and(header_eq("referer", format!("{}/", server.uri()).as_str()))
        .respond_with(html(listing(&[
            ("/img/1.jpg", "The Tudors (2007)", true),
            ("/img/2.jpg", "Troy (2004)", false),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    for (page, items) in [
        (
            "2",
            vec![
                ("/img/3.jpg", "Rome (2005)", true),
                ("https://cdn.example.com/4.jpg", "Gladiator (2000)", false),
            ],
        ),
        ("3", vec![("/img/5.jpg", "Vikings (2013)", true)]),
    ] {
        Mock::given(method("GET"))
            .and(path("/movies/rel"))
            .and(query_param("id", "26240"))
            .and(query_param("order", "0"))
            .and(query_param("page", page))
            .and(header_eq("x-requested-with", "XMLHttpRequest"))
            .and(header_eq(
                "referer",
                format!("{}/movies/26240-game-of-thrones", server.uri()).as_str(),
            ))
            .respond_with(html(listing(&items)))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/movies/rel"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/movies/rel"))
        .and(query_param("page", "5"))
        .respond_with(html(listing(&[("/img/9.jpg", "Never (1999)", false)])))
        .expect(0)
        .mount(&server)
        .await;

    let reply = get(
        app_for(&server),
        "/api/recommendations?url=/movies/26240-game-of-thrones",
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    let json = reply.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 5);
    assert_eq!(json["movieCount"], 2);
    assert_eq!(json["tvCount"], 3);

    let titles: Vec<_> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        titles,
        vec!["The Tudors", "Troy", "Rome", "Gladiator", "Vikings"]
    );

    assert_eq!(
        json["items"][0]["poster"],
        format!("{}/img/1.jpg", server.uri())
    );
    assert_eq!(json["items"][3]["poster"], "https://cdn.example.com/4.jpg");
    assert_eq!(json["items"][0]["type"], "tv");
    assert_eq!(json["items"][1]["year"], "2004");
}

#[tokio::test]
async fn test_title_flow_without_id_returns_seed_html() {
    let server = MockServer::start().await;
    let seed = "<html><body><h1>Somewhere without an id</h1></body></html>";

    Mock::given(method("GET"))
        .and(path("/movies/mystery"))
        .respond_with(ResponseTemplate::new(200).set_body_string(seed))
        .mount(&server)
        .await;

    let reply = get(app_for(&server), "/api/recommendations?url=/movies/mystery").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("text/html"));
    assert_eq!(reply.text(), seed);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_title_flow_seed_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movies/1-broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let reply = get(app_for(&server), "/api/recommendations?url=/movies/1-broken").await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json()["error"], "Failed to fetch recommendations");
}

#[tokio::test]
async fn test_tag_flow_stops_on_empty_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tag/3853-incest"))
        .and(query_param("page", "1"))
        .respond_with(html(listing(&[
            ("/img/a.jpg", "Alpha (1991)", false),
            ("/img/b.jpg", "Beta (1992)", true),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tag/3853-incest"))
        .and(query_param("page", "2"))
        .respond_with(html(listing(&[("/img/c.jpg", "Gamma (1993)", false)])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tag/3853-incest"))
        .and(query_param("page", "3"))
        .respond_with(html(listing(&[])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tag/3853-incest"))
        .and(query_param("page", "4"))
        .respond_with(html(listing(&[("/img/d.jpg", "Delta (1994)", false)])))
        .expect(0)
        .mount(&server)
        .await;

    let reply = get(
        app_for(&server),
        "/api/recommendations?url=/tag/3853-incest%3Fpage%3D9",
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    let json = reply.json();
    assert_eq!(json["total"], 3);
    assert_eq!(json["movieCount"], 2);
    assert_eq!(json["tvCount"], 1);
    assert_eq!(json["items"][2]["title"], "Gamma");
}

#[tokio::test]
async fn test_tag_flow_unreachable_listing_is_empty_success() {
    let server = MockServer::start().await;

    let reply = get(app_for(&server), "/api/recommendations?url=/tag/1-nothing").await;

    assert_eq!(reply.status, StatusCode::OK);
    let json = reply.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 0);
    assert_eq!(json["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_route() {
    let server = MockServer::start().await;
    let reply = get(app_for(&server), "/api/unknown").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}
