#![allow(clippy::unwrap_used)]
// Integration tests for `ResourceClient` using wiremock.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use catalog_api::kinds::{Brands, Pricings, Services, SupportPricings};
use catalog_api::{
    ApiClient, CreateBrandRequest, CreatePricingRequest, CreateServiceRequest, EntityId, Error,
    ImageUpload, MemorySession, NewPriceItem, ResourceClient, UpdatePricingRequest,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let api = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Arc::new(MemorySession::with_token("test-token")),
    );
    (server, api)
}

fn basic_pricing() -> CreatePricingRequest {
    CreatePricingRequest {
        page_number: 1,
        title_ar: "أساسي".into(),
        title_en: "Basic".into(),
        price: 10.0,
        items: None,
    }
}

/// In-memory pricing backend: the subset of the server's behavior the
/// round-trip properties depend on.
#[derive(Clone, Default)]
struct FakePricings {
    rows: Arc<Mutex<BTreeMap<u64, Value>>>,
}

impl FakePricings {
    fn seed(&self, id: u64, row: Value) {
        self.rows.lock().unwrap().insert(id, row);
    }
}

fn camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Request bodies are snake_case, stored rows are camelCase.
fn camelize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (camel(&key), camelize(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(camelize).collect()),
        other => other,
    }
}

fn merge_fields(row: &mut Map<String, Value>, body: &[u8]) {
    let patch: Value = serde_json::from_slice(body).unwrap();
    if let Value::Object(patch) = camelize(patch) {
        row.extend(patch);
    }
}

impl Respond for FakePricings {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut rows = self.rows.lock().unwrap();
        let segments: Vec<&str> = request.url.path_segments().unwrap().collect();
        let id = segments.get(2).and_then(|s| s.parse::<u64>().ok());

        match (request.method.as_str(), id) {
            ("GET", None) => {
                let page = request
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "page_number")
                    .and_then(|(_, v)| v.parse::<u64>().ok());
                let data: Vec<Value> = rows
                    .values()
                    .filter(|row| page.is_none_or(|p| row["pageNumber"] == json!(p)))
                    .cloned()
                    .collect();
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
            }
            ("POST", None) => {
                let next = rows.keys().next_back().map_or(1, |last| last + 1);
                let mut row = Map::new();
                row.insert("id".into(), json!(next));
                row.insert("isActive".into(), json!(true));
                row.insert("items".into(), json!([]));
                merge_fields(&mut row, &request.body);
                let row = Value::Object(row);
                rows.insert(next, row.clone());
                ResponseTemplate::new(201).set_body_json(json!({ "data": row }))
            }
            ("GET", Some(id)) => match rows.get(&id) {
                Some(row) => ResponseTemplate::new(200).set_body_json(json!({ "data": row })),
                None => ResponseTemplate::new(404).set_body_json(json!({ "error": "Pricing not found" })),
            },
            ("PUT", Some(id)) => match rows.get_mut(&id) {
                Some(Value::Object(row)) => {
                    merge_fields(row, &request.body);
                    ResponseTemplate::new(200).set_body_json(json!({ "data": row }))
                }
                _ => ResponseTemplate::new(404).set_body_json(json!({ "error": "Pricing not found" })),
            },
            ("DELETE", Some(id)) => match rows.remove(&id) {
                Some(_) => ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "message": "deleted" })),
                None => ResponseTemplate::new(404).set_body_json(json!({ "error": "Pricing not found" })),
            },
            _ => ResponseTemplate::new(405),
        }
    }
}

async fn fake_backend() -> (MockServer, ResourceClient<Pricings>, FakePricings) {
    let (server, api) = setup().await;
    let backend = FakePricings::default();
    Mock::given(wiremock::matchers::path_regex(r"^/api/pricings(/\d+)?$"))
        .respond_with(backend.clone())
        .mount(&server)
        .await;
    (server, ResourceClient::new(api), backend)
}

// ── Round-trip properties ───────────────────────────────────────────

#[tokio::test]
async fn test_create_then_list_includes_entity_once() {
    let (_server, client, _backend) = fake_backend().await;

    let created = client.create(&basic_pricing()).await.unwrap();

    assert!((created.price - 10.0).abs() < f64::EPSILON);
    assert!(created.is_active);

    let page = client.list(Some(1)).await.unwrap();
    let matches = page.iter().filter(|p| p.id == created.id).count();
    assert_eq!(matches, 1);
}

#[tokio::test]
async fn test_list_filters_by_page_number() {
    let (_server, client, backend) = fake_backend().await;
    backend.seed(1, json!({ "id": 1, "pageNumber": 1, "titleAr": "أ", "titleEn": "A", "price": 5 }));
    backend.seed(2, json!({ "id": 2, "pageNumber": 2, "titleAr": "ب", "titleEn": "B", "price": 7 }));

    let first = client.list(Some(1)).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].title_en, "A");

    // Page 0 means "no filter".
    assert_eq!(client.list(Some(0)).await.unwrap().len(), 2);
    assert_eq!(client.list(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_sparse_update_only_touches_sent_fields() {
    let (server, client, backend) = fake_backend().await;
    backend.seed(
        5,
        json!({ "id": 5, "pageNumber": 1, "titleAr": "أساسي", "titleEn": "Basic", "price": "10.00", "isActive": true }),
    );

    let update = UpdatePricingRequest {
        is_active: Some(false),
        ..Default::default()
    };
    client.update(EntityId(5), &update).await.unwrap();

    let fetched = client.get(EntityId(5)).await.unwrap();
    assert!(!fetched.is_active);
    assert_eq!(fetched.title_ar, "أساسي");

    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    let sent: Value = serde_json::from_slice(&put.body).unwrap();
    assert_eq!(sent, json!({ "is_active": false }));
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let (_server, client, _backend) = fake_backend().await;
    let created = client.create(&basic_pricing()).await.unwrap();

    client.delete(created.id).await.unwrap();

    let err = client.get(created.id).await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
    assert!(
        matches!(err, Error::Http { status: 404, ref message } if message == "Pricing not found")
    );
}

#[tokio::test]
async fn test_create_sends_items_as_json() {
    let (server, client, _backend) = fake_backend().await;
    let mut request = basic_pricing();
    request.items = Some(vec![NewPriceItem {
        text_ar: "نطاق مجاني".into(),
        text_en: "Free domain".into(),
        display_order: Some(0),
    }]);

    client.create(&request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let post = &requests[0];
    let content_type = post.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("application/json"));
    let sent: Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(sent["items"][0]["text_en"], "Free domain");
    assert_eq!(sent["price"], json!(10.0));
}

// ── Envelope and error handling ─────────────────────────────────────

#[tokio::test]
async fn test_list_by_page_uses_page_path() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/support-pricings/page/3"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 9, "pageNumber": 3, "titleAr": "دعم", "titleEn": "Support", "price": 99,
                "items": [{ "id": 1, "supportPricingId": 9, "textAr": "٢٤/٧", "textEn": "24/7" }]
            }]
        })))
        .mount(&server)
        .await;

    let client = ResourceClient::<SupportPricings>::new(api);
    let items = client.list_by_page(3).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].items[0].parent_id, Some(EntityId(9)));
}

#[tokio::test]
async fn test_list_without_data_is_empty() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/pricings"))
        .and(query_param("page_number", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let client = ResourceClient::<Pricings>::new(api);
    assert!(client.list(Some(4)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_error_message_from_message_key() {
    let (server, api) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/pricings"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Price must be positive" })),
        )
        .mount(&server)
        .await;

    let client = ResourceClient::<Pricings>::new(api);
    let err = client.create(&basic_pricing()).await.unwrap_err();

    assert!(
        matches!(err, Error::Http { status: 400, ref message } if message == "Price must be positive"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_error_without_body_uses_default_message() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/brands"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ResourceClient::<Brands>::new(api);
    let err = client.list(None).await.unwrap_err();

    assert!(
        matches!(err, Error::Http { status: 500, ref message } if message == "failed to fetch brands"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_single_without_entity_is_envelope_mismatch() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/pricings/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let client = ResourceClient::<Pricings>::new(api);
    let err = client.get(EntityId(3)).await.unwrap_err();

    assert!(matches!(err, Error::EnvelopeMismatch { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let api = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
        Arc::new(MemorySession::new()),
    );
    let client = ResourceClient::<Pricings>::new(api);

    let err = client.list(None).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got: {err:?}");
}

// ── Multipart resources ─────────────────────────────────────────────

#[tokio::test]
async fn test_create_service_sends_multipart_with_image() {
    let (server, api) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "id": 11, "pageNumber": 2, "titleAr": "استضافة", "titleEn": "Hosting",
                "img": "/uploads/hosting.png", "isActive": true
            }
        })))
        .mount(&server)
        .await;

    let client = ResourceClient::<Services>::new(api);
    let created = client
        .create(&CreateServiceRequest {
            page_number: 2,
            title_ar: "استضافة".into(),
            title_en: "Hosting".into(),
            description_ar: None,
            description_en: Some("Fast".into()),
            display_order: None,
            image: ImageUpload::new("hosting.png", "image/png", vec![0x89, b'P', b'N', b'G']),
        })
        .await
        .unwrap();

    assert_eq!(created.id, EntityId(11));

    let requests = server.received_requests().await.unwrap();
    let post = &requests[0];
    let content_type = post.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&post.body);
    assert!(body.contains(r#"name="title_en""#));
    assert!(body.contains(r#"name="page_number""#));
    assert!(body.contains(r#"name="image"; filename="hosting.png""#));
    assert!(!body.contains(r#"name="description_ar""#));
}

#[tokio::test]
async fn test_brands_accept_bare_array_and_bare_entity() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/brands"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 1, "img": "/a.png", "order": 0 }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/brands"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": 2, "img": "/b.png", "order": 1 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/brands/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = ResourceClient::<Brands>::new(api);
    assert_eq!(client.list(None).await.unwrap().len(), 1);

    let created = client
        .create(&CreateBrandRequest {
            order: Some(1),
            image: ImageUpload::new("b.png", "image/png", vec![1]),
        })
        .await
        .unwrap();
    assert_eq!(created.img, "/b.png");

    client.delete(created.id).await.unwrap();
}
