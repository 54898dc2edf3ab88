mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{bearer, init_app, register, register_and_login};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[actix_rt::test]
async fn test_create_user() {
    let app = init_app().await;

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({
            "name": "  Alice  ",
            "email": "alice@example.com",
            "password": "secret123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[actix_rt::test]
async fn test_create_user_rejects_duplicate_email() {
    let app = init_app().await;
    register(&app, "Alice", "alice@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({
            "name": "Other Alice",
            "email": "alice@example.com",
            "password": "secret123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Email already in use");
}

#[actix_rt::test]
async fn test_create_user_validation() {
    let app = init_app().await;

    let cases = [
        (json!({ "name": "Al", "email": "al@example.com", "password": "secret123" }), "name"),
        (json!({ "name": "Alice", "email": "nope", "password": "secret123" }), "email"),
        (json!({ "name": "Alice", "email": "a@example.com", "password": "12345" }), "password"),
    ];

    for (payload, field) in cases {
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], field);
    }

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "email": "a@example.com" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_rt::test]
async fn test_list_users_paginates_with_tasks() {
    let app = init_app().await;
    let alice = register_and_login(&app, "Alice", "alice@example.com").await;
    for i in 0..3 {
        register(&app, &format!("User {}", i), &format!("user{}@example.com", i)).await;
    }

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&alice.token))
        .set_json(json!({ "title": "Water plants" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::get()
        .uri("/api/users?page=1&perPage=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["meta"],
        json!({
            "total": 4,
            "perPage": 2,
            "currentPage": 1,
            "lastPage": 2,
            "firstPage": 1
        })
    );
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["email"], "alice@example.com");
    assert_eq!(data[0]["tasks"][0]["title"], "Water plants");
    assert_eq!(data[1]["tasks"], json!([]));

    let req = test::TestRequest::get()
        .uri("/api/users?page=2&perPage=2")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["meta"]["currentPage"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get().uri("/api/users?page=9").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["meta"]["perPage"], 10);
    assert_eq!(body["data"], json!([]));
}

#[actix_rt::test]
async fn test_list_users_rejects_bad_pagination() {
    let app = init_app().await;

    for query in ["perPage=101", "page=0", "page=-1", "page=abc", "perPage=0"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/users?{}", query))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "query: {}", query);
    }
}

#[actix_rt::test]
async fn test_get_user() {
    let app = init_app().await;
    let alice = register_and_login(&app, "Alice", "alice@example.com").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", alice.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], alice.id);
    assert_eq!(body["tasks"], json!([]));

    let req = test::TestRequest::get().uri("/api/users/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User not found");

    let req = test::TestRequest::get().uri("/api/users/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "id");
}

#[actix_rt::test]
async fn test_update_user() {
    let app = init_app().await;
    let alice = register_and_login(&app, "Alice", "alice@example.com").await;
    register(&app, "Bob", "bob@example.com").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", alice.id))
        .set_json(json!({ "name": "Alice Liddell" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Alice Liddell");
    assert_eq!(body["email"], "alice@example.com");

    // Keeping one's own email is not a conflict.
    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", alice.id))
        .set_json(json!({ "email": "alice@example.com" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", alice.id))
        .set_json(json!({ "email": "bob@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Email already in use by another user");

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", alice.id))
        .set_json(json!({ "password": "123" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::put()
        .uri("/api/users/999")
        .set_json(json!({ "name": "Nobody" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_rt::test]
async fn test_update_user_password_changes_login() {
    let app = init_app().await;
    let alice = register_and_login(&app, "Alice", "alice@example.com").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", alice.id))
        .set_json(json!({ "password": "brand-new-password" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(json!({ "email": "alice@example.com", "password": common::PASSWORD }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(json!({ "email": "alice@example.com", "password": "brand-new-password" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_delete_user_cascades() {
    let app = init_app().await;
    let alice = register_and_login(&app, "Alice", "alice@example.com").await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", alice.id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", alice.id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // Her tokens went with her.
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&alice.token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", alice.id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
