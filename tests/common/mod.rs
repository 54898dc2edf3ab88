#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use serde_json::{json, Value};
use tasktrack::auth::AuthSettings;
use tasktrack::routes::{self, health};
use tasktrack::state::AppState;

pub const PASSWORD: &str = "secret123";
/// Lowest cost bcrypt accepts.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Fresh in-memory state with a cheap bcrypt cost.
pub fn test_state() -> AppState {
    AppState::in_memory(AuthSettings {
        jwt_secret: "integration-test-secret".to_string(),
        token_ttl: Some(chrono::Duration::hours(24)),
        bcrypt_cost: TEST_BCRYPT_COST,
    })
}

/// The application as `main.rs` assembles it, over `state`.
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
        )
        .wrap(Logger::default())
        .service(health::health)
        .service(web::scope("/api").configure(routes::config))
}

pub async fn init_app() -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(build_app(web::Data::new(test_state()))).await
}

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// `POST /api/users`; panics unless the user is created.
pub async fn register(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "name": name, "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::CREATED,
        "Registration of {} failed",
        email
    );
    test::read_body_json(resp).await
}

/// `POST /api/sessions` with the shared test password.
pub async fn login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "Login of {} failed", email);
    let body: Value = test::read_body_json(resp).await;
    body["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

pub async fn register_and_login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
) -> TestUser {
    let user = register(app, name, email).await;
    let token = login(app, email).await;
    TestUser {
        id: user["id"].as_i64().expect("user id"),
        email: email.to_string(),
        token,
    }
}
