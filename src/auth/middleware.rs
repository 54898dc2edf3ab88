use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::session;
use crate::error::AppError;
use crate::state::AppState;

/// Authentication gate for protected routes.
///
/// Resolves the `Authorization: Bearer <token>` header against the session
/// store and stores the result as an [`AuthenticatedUser`] in request
/// extensions. Requests without a valid, unrevoked token are answered with 401
/// here and never reach the handler.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match resolve(&req).await {
                Ok(current) => {
                    req.extensions_mut().insert(current);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(app_err) => {
                    log::debug!("Rejected {} {}: {}", req.method(), req.path(), app_err);
                    Ok(req.error_response(app_err).map_into_right_body())
                }
            }
        })
    }
}

async fn resolve(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let token = bearer_token(req)
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?
        .to_string();
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;

    session::authenticate(&state, &token).await
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App, HttpResponse};

    use crate::auth::password::TEST_BCRYPT_COST;
    use crate::auth::AuthSettings;

    async fn protected(current: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(current.id().to_string())
    }

    fn state() -> AppState {
        AppState::in_memory(AuthSettings {
            jwt_secret: "middleware-secret".into(),
            token_ttl: None,
            bcrypt_cost: TEST_BCRYPT_COST,
        })
    }

    #[actix_rt::test]
    async fn test_missing_and_malformed_headers_are_rejected() {
        let app = test::init_service(
            App::new().app_data(web::Data::new(state())).service(
                web::resource("/protected")
                    .wrap(AuthMiddleware)
                    .to(protected),
            ),
        )
        .await;

        for header_value in [None, Some("Basic abc"), Some("Bearer "), Some("Bearer garbage")] {
            let mut req = test::TestRequest::get().uri("/protected");
            if let Some(value) = header_value {
                req = req.insert_header((header::AUTHORIZATION, value));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(
                resp.status(),
                actix_web::http::StatusCode::UNAUTHORIZED,
                "header {:?}",
                header_value
            );
        }
    }

    #[::core::prelude::v1::test]
    fn test_bearer_scheme_is_case_insensitive() {
        for value in ["Bearer abc", "bearer abc", "BEARER abc", "  bearer   abc  "] {
            let req = test::TestRequest::default()
                .insert_header((header::AUTHORIZATION, value))
                .to_srv_request();
            assert_eq!(bearer_token(&req), Some("abc"), "header {:?}", value);
        }

        for value in ["Basic abc", "Bearerabc", "bearer", "Bearer    "] {
            let req = test::TestRequest::default()
                .insert_header((header::AUTHORIZATION, value))
                .to_srv_request();
            assert_eq!(bearer_token(&req), None, "header {:?}", value);
        }
    }

    #[actix_rt::test]
    async fn test_lowercase_scheme_is_accepted() {
        let state = state();
        let user = state
            .users
            .create(crate::models::NewUser {
                name: "Middleware".into(),
                email: "mw@example.com".into(),
                password_hash: crate::auth::hash_password("secret1", TEST_BCRYPT_COST).unwrap(),
            })
            .await
            .unwrap();
        let session = session::login(
            &state,
            &crate::auth::LoginRequest {
                email: "mw@example.com".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap();

        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).service(
                web::resource("/protected")
                    .wrap(AuthMiddleware)
                    .to(protected),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((header::AUTHORIZATION, format!("bearer {}", session.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, user.id.to_string());
    }
}
