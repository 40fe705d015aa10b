mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::TestApp;

fn approx(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .map(|v| (v - expected).abs() < 1e-6)
        .unwrap_or(false)
}

#[actix_rt::test]
async fn test_health_check() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["catalog"]["status"], "ok");
    assert_eq!(body["services"]["story_assistant"]["status"], "ok");
    assert_eq!(body["environment"], "development");
}

#[actix_rt::test]
async fn test_packages_carry_price_ranges() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/creative-writing/packages")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let packages = body.as_array().unwrap();
    assert_eq!(packages.len(), 3);

    // Free package
    assert_eq!(packages[0]["priceRange"], json!({ "min": 0.0, "max": 0.0 }));
    // Net overrides from both instructors
    assert_eq!(packages[1]["name"], "Starter");
    assert_eq!(packages[1]["popular"], true);
    assert_eq!(packages[1]["priceRange"], json!({ "min": 350.0, "max": 450.0 }));
    // No overrides falls back to the base price
    assert_eq!(packages[2]["priceRange"], json!({ "min": 600.0, "max": 600.0 }));
}

#[actix_rt::test]
async fn test_services_are_marked_up() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/creative-writing/services")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let services = body.as_array().unwrap();
    assert_eq!(services.len(), 1);

    // 100 * 1.2 + 50
    assert!(approx(&services[0]["priceRange"]["min"], 170.0));
    assert!(approx(&services[0]["priceRange"]["max"], 170.0));
    assert_eq!(services[0]["instructorCount"], 1);
}

#[actix_rt::test]
async fn test_instructors_listing() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/instructors").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let instructors = body.as_array().unwrap();

    assert_eq!(instructors.len(), 2);
    assert_eq!(instructors[0]["name"], "Huda");
    assert_eq!(instructors[0]["weeklySchedule"]["friday"], json!(["10:00", "23:59"]));
}

#[actix_rt::test]
async fn test_quote_follows_policy_per_kind() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/pricing/quote")
        .set_json(&json!({ "kind": "package", "itemId": 2, "instructorId": 10 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["policy"], "net");
    assert_eq!(body["finalPrice"], 350.0);

    let req = test::TestRequest::post()
        .uri("/api/pricing/quote")
        .set_json(&json!({ "kind": "service", "itemId": 101, "instructorId": 10 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["policy"], "markup");
    assert!(approx(&body["finalPrice"], 170.0));

    // Instructor without an override pays the base price
    let req = test::TestRequest::post()
        .uri("/api/pricing/quote")
        .set_json(&json!({ "kind": "service", "itemId": 101, "instructorId": 20 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["finalPrice"], 250.0);

    // No instructor yet
    let req = test::TestRequest::post()
        .uri("/api/pricing/quote")
        .set_json(&json!({ "kind": "package", "itemId": 2 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["finalPrice"].is_null());
}

#[actix_rt::test]
async fn test_quote_unknown_item_is_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/pricing/quote")
        .set_json(&json!({ "kind": "package", "itemId": 77 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::post()
        .uri("/api/pricing/quote")
        .set_json(&json!({ "kind": "service", "itemId": 101, "instructorId": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_admin_price_review() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/price-review")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["companyPercentage"], 1.2);
    assert_eq!(body["fixedFee"], 50.0);

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0]["instructorName"], "Huda");
    assert_eq!(rows[0]["kind"], "package");
    assert_eq!(rows[0]["netRate"], 350.0);
    assert!(approx(&rows[0]["customerPrice"], 470.0));

    assert_eq!(rows[1]["instructorName"], "Omar");
    assert!(approx(&rows[1]["customerPrice"], 590.0));

    assert_eq!(rows[2]["kind"], "service");
    assert_eq!(rows[2]["itemId"], 101);
    assert!(approx(&rows[2]["customerPrice"], 170.0));
}
