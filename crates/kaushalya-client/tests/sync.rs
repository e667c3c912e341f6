//! Integration tests for `SyncController` using wiremock HTTP mocks.

use kaushalya_client::{
    AlwaysConfirm, ApiClient, BestSeller, Catalog, ClientError, Confirm, NewArrivals, Orders,
    Session, SyncController, SyncError,
};
use kaushalya_core::{CategoryDraft, Money, NewArrivalDraft, ProductDraft, RecordId};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(base_url, 30).expect("client construction should not fail")
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

struct Decline;

impl Confirm for Decline {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

async fn requests_with_method(server: &MockServer, verb: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .into_iter()
        .filter(|r| r.method.as_str() == verb)
        .collect()
}

#[tokio::test]
async fn load_replaces_local_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/new-arrivals"))
        .respond_with(ok(json!([
            { "id": 1, "title": "Pearl Drops" },
            { "id": 2, "title": "Temple Jhumka" }
        ])))
        .mount(&server)
        .await;

    let mut controller = SyncController::<NewArrivals>::new(test_client(&server.uri()));
    let records = controller.load().await.expect("load should succeed");
    assert_eq!(records.len(), 2);
    assert_eq!(controller.records()[1].title, "Temple Jhumka");
    assert_eq!(controller.search("pearl").len(), 1);
}

#[tokio::test]
async fn load_without_data_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let mut controller = SyncController::<Orders>::new(test_client(&server.uri()));
    assert!(controller.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn load_keeps_backend_records_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ok(json!([
            { "_id": "abc", "orderId": "ORD-1", "total": "1100", "paymentMethod": null }
        ])))
        .mount(&server)
        .await;

    let mut controller = SyncController::<Orders>::new(test_client(&server.uri()));
    controller.load().await.unwrap();
    let raw = controller.raw_records();
    assert_eq!(raw.len(), 1);
    let keys: Vec<&str> = raw[0].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["_id", "orderId", "total", "paymentMethod"]);
    assert_eq!(raw[0]["total"], json!("1100"));
    assert_eq!(controller.records()[0].order_id, "ORD-1");
}

#[tokio::test]
async fn failed_load_keeps_previous_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bestseller"))
        .respond_with(ok(json!([{ "id": 1, "bestSellerName": "Festive" }])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bestseller"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Database unavailable" })),
        )
        .mount(&server)
        .await;

    let mut controller = SyncController::<BestSeller>::new(test_client(&server.uri()));
    controller.load().await.unwrap();

    let err = controller.load().await.unwrap_err();
    assert!(
        matches!(err, SyncError::Client(ClientError::Api(ref m)) if m == "Database unavailable"),
        "got {err:?}"
    );
    assert_eq!(controller.records().len(), 1);
    assert_eq!(controller.records()[0].category_name, "Festive");
}

#[tokio::test]
async fn server_error_without_envelope_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let mut controller = SyncController::<Orders>::new(test_client(&server.uri()));
    let err = controller.load().await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Client(ClientError::UnexpectedStatus { status: 502, .. })
    ));
}

#[tokio::test]
async fn error_status_with_envelope_surfaces_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/catalog"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "success": false, "message": "Catalog already exists" })),
        )
        .mount(&server)
        .await;

    let mut controller = SyncController::<Catalog>::new(test_client(&server.uri()));
    let draft = CategoryDraft {
        name: "Bridal".into(),
        ..CategoryDraft::default()
    };
    let err = controller.create(&draft).await.unwrap_err();
    assert!(matches!(err, SyncError::Client(ClientError::Api(ref m)) if m == "Catalog already exists"));
    assert_eq!(draft.name, "Bridal", "caller keeps its input after a failed save");
}

#[tokio::test]
async fn create_posts_then_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/catalog"))
        .and(body_partial_json(json!({ "catalogName": "Bridal" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "success": true, "message": "Catalog created" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ok(json!([{ "id": 7, "catalogName": "Bridal", "products": [] }])))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = SyncController::<Catalog>::new(test_client(&server.uri()));
    let draft = CategoryDraft {
        name: "Bridal".into(),
        description: Some("Wedding sets".into()),
        image: None,
    };
    let outcome = controller.create(&draft).await.expect("create should succeed");

    assert_eq!(outcome.message.as_deref(), Some("Catalog created"));
    assert!(outcome.refreshed);
    let names: Vec<&str> = controller
        .records()
        .iter()
        .map(|c| c.category_name.as_str())
        .collect();
    assert_eq!(names, vec!["Shop All", "Bridal"]);
}

#[tokio::test]
async fn invalid_draft_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = SyncController::<NewArrivals>::new(test_client(&server.uri()));
    let err = controller
        .create(&NewArrivalDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_record_after_reload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/new-arrivals"))
        .respond_with(ok(json!([
            { "id": "a1", "title": "Pearl Drops" },
            { "id": "b2", "title": "Temple Jhumka" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new-arrivals"))
        .respond_with(ok(json!([{ "id": "a1", "title": "Pearl Drops" }])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/new-arrivals/b2"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = SyncController::<NewArrivals>::new(test_client(&server.uri()));
    controller.load().await.unwrap();
    let id = RecordId::from("b2");
    assert!(controller.find(&id).is_some());

    controller
        .delete(&id, &mut AlwaysConfirm)
        .await
        .expect("delete should succeed");
    assert!(controller.find(&id).is_none());
    assert_eq!(controller.records().len(), 1);
}

#[tokio::test]
async fn shop_all_is_never_deleted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ok(json!([{ "id": 7, "catalogName": "Bridal" }])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = SyncController::<Catalog>::new(test_client(&server.uri()));
    controller.load().await.unwrap();
    let before = controller.records().to_vec();

    let err = controller
        .delete(&RecordId::from("shopall"), &mut AlwaysConfirm)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Protected { .. }));
    assert_eq!(controller.records(), before.as_slice());
    assert!(requests_with_method(&server, "DELETE").await.is_empty());
}

#[tokio::test]
async fn stored_shop_all_is_protected_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ok(json!([
            { "id": 9, "catalogName": "Shop All" },
            { "id": 7, "catalogName": "Bridal" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = SyncController::<Catalog>::new(test_client(&server.uri()));
    controller.load().await.unwrap();
    assert_eq!(controller.records().len(), 2);

    let err = controller
        .delete(&RecordId::from("9"), &mut AlwaysConfirm)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Protected { ref id, .. } if id == "9"));
    assert!(requests_with_method(&server, "DELETE").await.is_empty());
}

#[tokio::test]
async fn declined_confirmation_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = SyncController::<BestSeller>::new(test_client(&server.uri()));
    let err = controller
        .delete(&RecordId::from("4"), &mut Decline)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Declined));
}

#[tokio::test]
async fn catalog_update_is_unsupported() {
    let server = MockServer::start().await;
    let mut controller = SyncController::<Catalog>::new(test_client(&server.uri()));
    let draft = CategoryDraft {
        name: "Rings".into(),
        ..CategoryDraft::default()
    };
    let err = controller
        .update(&RecordId::from("1"), &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Unsupported { operation: "update", .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn best_seller_update_posts_to_save_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bestseller/save"))
        .and(body_partial_json(json!({ "id": "4", "bestSellerName": "Festive Picks" })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bestseller"))
        .respond_with(ok(json!([{ "id": 4, "bestSellerName": "Festive Picks" }])))
        .mount(&server)
        .await;

    let mut controller = SyncController::<BestSeller>::new(test_client(&server.uri()));
    let draft = CategoryDraft {
        name: "Festive Picks".into(),
        ..CategoryDraft::default()
    };
    controller
        .update(&RecordId::from("4"), &draft)
        .await
        .expect("update should succeed");
    assert_eq!(controller.records()[0].category_name, "Festive Picks");
}

#[tokio::test]
async fn upsert_product_targets_loaded_parent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ok(json!([{ "id": 7, "catalogName": "Bridal", "products": [] }])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ok(json!([{
            "id": 7,
            "catalogName": "Bridal",
            "products": [{ "id": 11, "productName": "Choker", "realPrice": 1200, "discountPrice": 699 }]
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/catalog/save-product"))
        .and(body_partial_json(json!({
            "catalogName": "Bridal",
            "productName": "Choker",
            "realPrice": 1200.0,
            "discountPrice": 699.0
        })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = SyncController::<Catalog>::new(test_client(&server.uri()));
    controller.load().await.unwrap();

    let draft = ProductDraft {
        name: "Choker".into(),
        real_price: Some(Money::from(1200)),
        discount_price: Some(Money::from(699)),
        ..ProductDraft::default()
    };
    controller
        .upsert_product("bridal", None, &draft)
        .await
        .expect("save should succeed");

    let bridal = controller.find_by_name("Bridal").expect("bridal is loaded");
    assert_eq!(bridal.products.len(), 1);
    assert_eq!(bridal.products[0].discount_percent(), 42);
}

#[tokio::test]
async fn upsert_product_into_unknown_parent_sends_nothing() {
    let server = MockServer::start().await;
    let mut controller = SyncController::<Catalog>::new(test_client(&server.uri()));
    let draft = ProductDraft {
        name: "Choker".into(),
        real_price: Some(Money::from(1200)),
        discount_price: Some(Money::from(699)),
        ..ProductDraft::default()
    };
    let err = controller
        .upsert_product("Nowhere", None, &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::UnknownParent { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn session_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ok(json!([{ "id": 1, "firstName": "Ravi" }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::with_session(&server.uri(), 30, &Session::new("token-123")).unwrap();
    let mut controller = SyncController::<kaushalya_client::Customers>::new(client);
    assert_eq!(controller.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_is_retried_but_mutations_are_not() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ok(json!([{ "orderId": "ORD-001" }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/new-arrivals"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retries(2, 0);
    let mut orders = SyncController::<Orders>::new(client.clone());
    assert_eq!(orders.load().await.unwrap().len(), 1);

    let mut arrivals = SyncController::<NewArrivals>::new(client);
    let draft = NewArrivalDraft {
        title: "Pearl Drops".into(),
        ..NewArrivalDraft::default()
    };
    let err = arrivals.create(&draft).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Client(ClientError::UnexpectedStatus { status: 503, .. })
    ));
}
