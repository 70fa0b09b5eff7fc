use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use meadowlark_api::{app, AppState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use meadowlark_catalog::CatalogFilter;
use meadowlark_core::validation::{GUEST_COUNT_ERROR, WAIVER_WARNING};
use meadowlark_core::{RepoResult, SessionData, SessionStore};
use meadowlark_store::{Backends, Config, MemorySessionStore};
use serde_json::Value;
use tower::ServiceExt;

struct TestSite {
    app: Router,
    backends: Backends,
    cookie: Option<String>,
}

impl TestSite {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let backends = Backends::in_memory();
        let app = app(AppState::new(backends.clone(), &config));
        Self { app, backends, cookie: None }
    }

    async fn send(&mut self, mut req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        if let Some(cookie) = &self.cookie {
            req.headers_mut().insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        if let Some(set_cookie) = headers.get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, headers, body)
    }

    async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, _, body) = self.send(req).await;
        (status, body)
    }

    async fn post_form(&mut self, uri: &str, form: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(req).await
    }

    async fn post_xhr(&mut self, uri: &str, form: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-requested-with", "XMLHttpRequest")
            .body(Body::from(form.to_string()))
            .unwrap();
        let (status, _, body) = self.send(req).await;
        (status, body)
    }

    async fn packages_sold(&self, sku: &str) -> u64 {
        self.backends
            .vacations
            .find_one(&CatalogFilter::by_sku(sku))
            .await
            .unwrap()
            .map_or(0, |v| v.packages_sold)
    }
}

#[tokio::test]
async fn test_vacations_lists_available_packages() {
    let mut site = TestSite::new();

    let (status, body) = site.get("/vacations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], "vacations");
    let vacations = body["vacations"].as_array().unwrap();
    assert_eq!(vacations.len(), 2);
    assert!(vacations.iter().any(|v| v["sku"] == "HR199" && v["price"] == "$99.95"));
    assert!(!vacations.iter().any(|v| v["sku"] == "B99"));
}

#[tokio::test]
async fn test_vacation_detail_by_slug() {
    let mut site = TestSite::new();

    let (status, body) = site.get("/vacation/oregon-coast-getaway").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vacation"]["sku"], "OC39");
    assert_eq!(body["price"], "$2699.95");

    let (status, body) = site.get("/vacation/moon-base").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_booking_flash_is_shown_exactly_once() {
    let mut site = TestSite::new();

    let (status, headers, _) = site.post_form("/vacations/book", "sku=HR199").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/vacations");
    assert_eq!(site.packages_sold("HR199").await, 1);

    let (_, body) = site.get("/vacations").await;
    assert_eq!(body["flash"]["type"], "success");
    assert_eq!(body["flash"]["intro"], "Thank you!");

    let (_, body) = site.get("/vacations").await;
    assert!(body["flash"].is_null());
}

#[tokio::test]
async fn test_booking_unknown_sku_mutates_nothing() {
    let mut site = TestSite::new();

    site.post_form("/vacations/book", "sku=UNKNOWN").await;

    for sku in ["HR199", "OC39", "B99"] {
        assert_eq!(site.packages_sold(sku).await, 0);
    }
    let (_, body) = site.get("/").await;
    assert_eq!(body["flash"]["type"], "warning");
    assert_eq!(body["flash"]["intro"], "Ooops!");
}

#[tokio::test]
async fn test_booking_over_xhr_reports_inline() {
    let mut site = TestSite::new();

    let (status, body) = site.post_xhr("/vacations/book", "sku=OC39").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["flash"]["type"], "success");

    let (_, body) = site.get("/").await;
    assert!(body["flash"].is_null());
}

#[tokio::test]
async fn test_cart_guest_count_over_maximum() {
    let mut site = TestSite::new();

    let (status, headers, _) = site.post_form("/cart/add", "sku=HR199&guests=20").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/cart");

    let (_, body) = site.get("/cart").await;
    assert_eq!(body["items"][0]["guests"], 20);
    assert_eq!(body["errors"], serde_json::json!([GUEST_COUNT_ERROR]));

    // Validation is recomputed, not accumulated.
    let (_, body) = site.get("/cart").await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cart_guest_count_at_maximum() {
    let mut site = TestSite::new();

    site.post_form("/cart/add", "sku=HR199&guests=16").await;
    let (_, body) = site.get("/cart").await;

    assert!(body["errors"].as_array().unwrap().is_empty());
    assert!(body["warnings"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], "$1599.20");
}

#[tokio::test]
async fn test_cart_waiver_warning() {
    let mut site = TestSite::new();

    site.post_form("/cart/add", "sku=B99&guests=2").await;
    site.post_form("/cart/add", "sku=B99").await;
    let (_, body) = site.get("/cart").await;

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["guests"], 1);
    assert_eq!(body["warnings"], serde_json::json!([WAIVER_WARNING]));
}

#[tokio::test]
async fn test_cart_unknown_sku() {
    let mut site = TestSite::new();

    let (status, _, body) = site.post_form("/cart/add", "sku=NOPE&guests=2").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown SKU: NOPE");
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let mut alice = TestSite::new();
    alice.post_form("/cart/add", "sku=HR199&guests=2").await;

    let mut bob = TestSite { app: alice.app.clone(), backends: alice.backends.clone(), cookie: None };
    let (_, body) = bob.get("/cart").await;
    assert!(body["items"].as_array().unwrap().is_empty());

    let (_, body) = alice.get("/cart").await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_notify_me_twice_keeps_one_sku() {
    let mut site = TestSite::new();

    for _ in 0..2 {
        let (status, _, _) = site
            .post_form("/notify-me-when-in-season", "email=jane%40example.com&sku=OC39")
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
    }

    let subscription = site
        .backends
        .subscriptions
        .find_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(subscription.skus, vec!["OC39".to_string()]);

    let (_, body) = site.get("/vacations").await;
    assert_eq!(body["flash"]["type"], "success");
}

#[tokio::test]
async fn test_notify_me_twice_with_duplicates_permitted() {
    let mut config = Config::default();
    config.business_rules.dedupe_subscription_skus = false;
    let mut site = TestSite::with_config(config);

    site.post_form("/notify-me-when-in-season", "email=jane%40example.com&sku=OC39").await;
    site.post_form("/notify-me-when-in-season", "email=jane%40example.com&sku=OC39").await;

    let subscription = site
        .backends
        .subscriptions
        .find_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(subscription.skus, vec!["OC39".to_string(), "OC39".to_string()]);
}

#[tokio::test]
async fn test_newsletter_over_xhr() {
    let mut site = TestSite::new();

    let (status, body) = site.post_xhr("/newsletter", "name=Jane&email=not-an-email").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid name email address.");

    let (status, body) = site.post_xhr("/newsletter", "name=Jane&email=jane%40example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_newsletter_form_flashes() {
    let mut site = TestSite::new();

    let (status, headers, _) = site.post_form("/newsletter", "name=Jane&email=bad").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/newsletter");
    let (_, body) = site.get("/newsletter").await;
    assert_eq!(body["flash"]["type"], "danger");
    assert_eq!(body["flash"]["intro"], "Validation error!");

    let (_, headers, _) = site.post_form("/newsletter", "name=Jane&email=jane%40example.com").await;
    assert_eq!(headers[header::LOCATION], "/newsletter/archive");
    let (_, body) = site.get("/newsletter/archive").await;
    assert_eq!(body["flash"]["type"], "success");
}

#[tokio::test]
async fn test_process_form() {
    let mut site = TestSite::new();

    let (status, headers, _) = site
        .post_form("/process?form=newsletter", "_csrf=dummy&name=Jane&email=jane%40example.com")
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/thank-you");

    let (status, body) = site.post_xhr("/process?form=newsletter", "name=Jane").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_session_cookie_is_stable() {
    let mut site = TestSite::new();

    site.get("/").await;
    let first = site.cookie.clone().unwrap();
    assert!(first.starts_with("meadowlark.sid="));

    site.get("/").await;
    assert_eq!(site.cookie.clone().unwrap(), first);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let mut site = TestSite::new();

    let (status, body) = site.get("/no/such/page").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_cart_blank_guests_field_defaults() {
    let mut site = TestSite::new();

    let (status, headers, _) = site.post_form("/cart/add", "sku=HR199&guests=").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/cart");

    let (_, body) = site.get("/cart").await;
    assert_eq!(body["items"][0]["guests"], 1);
    assert_eq!(body["total"], "$99.95");
}

#[tokio::test]
async fn test_vacations_by_category() {
    let mut site = TestSite::new();

    let (_, body) = site.get("/vacations?category=Weekend%20Getaway").await;
    let vacations = body["vacations"].as_array().unwrap();
    assert_eq!(vacations.len(), 1);
    assert_eq!(vacations[0]["sku"], "OC39");

    // Adventure only holds an unavailable package.
    let (_, body) = site.get("/vacations?category=Adventure").await;
    assert!(body["vacations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_about_page_has_a_fortune() {
    let mut site = TestSite::new();

    let (status, body) = site.get("/about").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], "about");
    let fortune = body["fortune"].as_str().unwrap();
    assert!(meadowlark_core::fortune::FORTUNES.contains(&fortune));
}

#[tokio::test]
async fn test_tour_pages() {
    let mut site = TestSite::new();

    let (status, body) = site.get("/tours").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tours"].as_array().unwrap().len(), 2);

    let (_, body) = site.get("/tours/hood-river").await;
    assert_eq!(body["page"], "tours/hood-river");
    assert_eq!(body["vacation"]["sku"], "HR199");

    let (_, body) = site.get("/tours/oregon-coast").await;
    assert_eq!(body["vacation"]["price"], "$2699.95");

    let (status, body) = site.get("/tours/request-group-rate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], "tours/request-group-rate");
}

#[tokio::test]
async fn test_photo_contest_view() {
    let mut site = TestSite::new();

    let (status, body) = site.get("/contest/vacation-photo").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["year"].as_i64().unwrap() >= 2024);
    assert!(body["month"].as_u64().unwrap() <= 11);
}

#[tokio::test]
async fn test_wildcard_accept_gets_json() {
    let mut site = TestSite::new();

    let req = Request::builder()
        .method("POST")
        .uri("/vacations/book")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "*/*")
        .body(Body::from("sku=HR199"))
        .unwrap();
    let (status, _, body) = site.send(req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

/// Fails to read one session id, as if its stored payload were corrupt.
struct UnreadableSession {
    inner: MemorySessionStore,
    bad_id: &'static str,
    destroyed: AtomicUsize,
}

#[async_trait]
impl SessionStore for UnreadableSession {
    async fn load(&self, id: &str) -> RepoResult<Option<SessionData>> {
        if id == self.bad_id {
            return Err("expected value at line 1 column 1".into());
        }
        self.inner.load(id).await
    }

    async fn save(&self, id: &str, data: &SessionData, ttl_seconds: u64) -> RepoResult<()> {
        self.inner.save(id, data, ttl_seconds).await
    }

    async fn destroy(&self, id: &str) -> RepoResult<()> {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        self.inner.destroy(id).await
    }
}

#[tokio::test]
async fn test_unreadable_session_starts_fresh() {
    let store = Arc::new(UnreadableSession {
        inner: MemorySessionStore::default(),
        bad_id: "garbled",
        destroyed: AtomicUsize::new(0),
    });
    let mut backends = Backends::in_memory();
    backends.sessions = store.clone() as Arc<dyn SessionStore>;
    let app = app(AppState::new(backends.clone(), &Config::default()));
    let mut site = TestSite { app, backends, cookie: Some("meadowlark.sid=garbled".to_string()) };

    let (status, body) = site.get("/cart").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(store.destroyed.load(Ordering::SeqCst), 1);
    let cookie = site.cookie.clone().unwrap();
    assert_ne!(cookie, "meadowlark.sid=garbled");

    site.post_form("/cart/add", "sku=OC39&guests=2").await;
    let (_, body) = site.get("/cart").await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(site.cookie.clone().unwrap(), cookie);
}
