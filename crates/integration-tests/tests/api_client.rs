//! Endpoint paths, bearer auth, caching, and error mapping.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use easybuy_core::{CategoryId, Price, ProductId};
use easybuy_integration_tests::TestBackend;
use easybuy_storefront::{ApiError, CategoryPatch, NewCategory, NewProduct, ProductPatch};

#[tokio::test]
async fn bearer_token_is_attached_once_logged_in() {
    let backend = TestBackend::start().await;
    backend.mount_login_success("tok-secret", "user").await;
    Mock::given(method("GET"))
        .and(path("/api/product"))
        .and(header("authorization", "Bearer tok-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    ctx.auth().login("shopper@example.com", "pw").await.unwrap();
    ctx.api().list_products().await.unwrap();
}

#[tokio::test]
async fn product_list_is_cached_for_repeat_reads() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            TestBackend::product_json(Uuid::new_v4(), "Widget", 9.50),
        ])))
        .expect(1) // the second read must come from cache
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let first = ctx.api().list_products().await.unwrap();
    let second = ctx.api().list_products().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn get_product_maps_404_to_not_found() {
    let backend = TestBackend::start().await;
    let id = ProductId::new(Uuid::new_v4());
    Mock::given(method("GET"))
        .and(path(format!("/api/product/get/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("Product not found"))
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let err = ctx.api().get_product(id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn search_sends_the_query_parameter() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product/search"))
        .and(query_param("query", "keyboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let results = ctx.api().search_products("keyboard").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn create_product_invalidates_the_list_cache() {
    let backend = TestBackend::start().await;
    let listed = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/api/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            TestBackend::product_json(listed, "Widget", 9.50),
        ])))
        .expect(2) // cache must be refilled after the create
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/product"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(TestBackend::product_json(Uuid::new_v4(), "Gadget", 20.0)),
        )
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    ctx.api().list_products().await.unwrap();
    ctx.api()
        .create_product(&NewProduct {
            name: "Gadget".into(),
            description: None,
            price: Price::from_f64(20.0).unwrap(),
            stock_quantity: 3,
            category_id: None,
        })
        .await
        .unwrap();
    ctx.api().list_products().await.unwrap();
}

#[tokio::test]
async fn product_update_and_delete_use_their_paths() {
    let backend = TestBackend::start().await;
    let id = ProductId::new(Uuid::new_v4());
    Mock::given(method("PUT"))
        .and(path(format!("/api/product/{id}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(TestBackend::product_json(id.as_uuid(), "Widget v2", 12.0)),
        )
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/product/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let updated = ctx
        .api()
        .update_product(
            id,
            &ProductPatch {
                name: Some("Widget v2".into()),
                ..ProductPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Widget v2");

    ctx.api().delete_product(id).await.unwrap();
}

#[tokio::test]
async fn category_lifecycle_hits_the_backend_routes() {
    let backend = TestBackend::start().await;
    let id = CategoryId::new(Uuid::new_v4());
    let record = json!({
        "id": id.as_uuid(),
        "name": "Peripherals",
        "description": "Keyboards and mice",
    });

    Mock::given(method("POST"))
        .and(path("/api/category/create"))
        .respond_with(ResponseTemplate::new(201).set_body_json(&record))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/category/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record])))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("/api/category/update/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&record))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("/api/category/delete/soft/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/category/delete/hard/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let created = ctx
        .api()
        .create_category(&NewCategory {
            name: "Peripherals".into(),
            description: Some("Keyboards and mice".into()),
        })
        .await
        .unwrap();
    assert_eq!(created.id, id);

    let listed = ctx.api().list_categories().await.unwrap();
    assert_eq!(listed.len(), 1);

    ctx.api()
        .update_category(
            id,
            &CategoryPatch {
                name: Some("Accessories".into()),
                description: None,
            },
        )
        .await
        .unwrap();

    ctx.api().archive_category(id).await.unwrap();
    ctx.api().delete_category(id).await.unwrap();
}

#[tokio::test]
async fn upload_normalizes_single_and_multi_responses() {
    let backend = TestBackend::start().await;
    let product_id = ProductId::new(Uuid::new_v4());
    Mock::given(method("POST"))
        .and(path("/api/product-images"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"image_url": "/uploads/products/a.jpg"})),
        )
        .expect(1)
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let urls = ctx
        .api()
        .upload_product_image(product_id, "photo.jpg", vec![0xFF, 0xD8, 0xFF], true)
        .await
        .unwrap();
    assert_eq!(urls, vec!["/uploads/products/a.jpg"]);
}

#[tokio::test]
async fn product_images_list_parses_records() {
    let backend = TestBackend::start().await;
    let product_id = ProductId::new(Uuid::new_v4());
    Mock::given(method("GET"))
        .and(path(format!("/api/product-images/{product_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": Uuid::new_v4(),
                "product_id": product_id.as_uuid(),
                "image_url": "/uploads/products/a.jpg",
                "is_primary": true,
            },
            {
                "product_id": product_id.as_uuid(),
                "image_url": "/uploads/products/b.jpg",
            },
        ])))
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let images = ctx.api().list_product_images(product_id).await.unwrap();
    assert_eq!(images.len(), 2);
    assert!(images.first().unwrap().is_primary);
    assert!(!images.get(1).unwrap().is_primary, "is_primary defaults off");
}

#[tokio::test]
async fn upload_rejection_maps_to_upload_error() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/product-images"))
        .respond_with(ResponseTemplate::new(400).set_body_string("missing image field"))
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    let err = ctx
        .api()
        .upload_product_image(ProductId::new(Uuid::new_v4()), "x.jpg", vec![], false)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Upload(_)));
}

#[tokio::test]
async fn anonymous_requests_carry_no_authorization_header() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&backend.server)
        .await;
    let ctx = backend.context().await;

    // No login happened; the request must still succeed (public read)
    ctx.api().list_products().await.unwrap();

    let requests = backend.server.received_requests().await.unwrap();
    let product_request = requests
        .iter()
        .find(|r| r.url.path() == "/api/product")
        .unwrap();
    assert!(!product_request.headers.contains_key("authorization"));
}
