// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::{HeaderName, Request},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{Identity, Role},
    catalog::{Activity, Category, Direction},
    error::{ErrorBody, FieldError},
    ledger::{Balance, LedgerTransaction},
    models::{ActivityDraftRequest, LoginRequest, LoginResponse},
    state::AppState,
    transfer::{RawTransferInput, TransferResult},
};

pub mod activities;
pub mod auth;
pub mod health;
pub mod rankings;
pub mod transfers;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/users/me", get(users::get_current_user))
        .route("/users/me/balance", get(users::get_my_balance))
        .route("/users/me/transactions", get(users::get_my_transactions))
        .route("/sign-up/users", post(users::sign_up_user))
        .route("/sign-up/clubs", post(users::sign_up_club))
        .route("/rankings/users", get(rankings::user_ranking))
        .route("/rankings/clubs", get(rankings::club_ranking))
        .route("/transfers", post(transfers::create_transfer))
        .route("/activities/catalog", get(activities::list_catalog))
        .route(
            "/activities/catalog/{activity_id}",
            get(activities::get_catalog_activity),
        )
        .route(
            "/activities",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route(
            "/activities/{activity_id}",
            put(activities::update_activity).delete(activities::delete_activity),
        )
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        auth::login,
        users::get_current_user,
        users::get_my_balance,
        users::get_my_transactions,
        users::sign_up_user,
        users::sign_up_club,
        rankings::user_ranking,
        rankings::club_ranking,
        transfers::create_transfer,
        activities::list_catalog,
        activities::get_catalog_activity,
        activities::list_activities,
        activities::create_activity,
        activities::update_activity,
        activities::delete_activity
    ),
    components(
        schemas(
            Identity,
            Role,
            Activity,
            Category,
            Direction,
            Balance,
            LedgerTransaction,
            LoginRequest,
            LoginResponse,
            RawTransferInput,
            TransferResult,
            ActivityDraftRequest,
            ErrorBody,
            FieldError,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Auth", description = "Session bootstrap"),
        (name = "Users", description = "Caller account, balance and history"),
        (name = "Sign-up", description = "Account registration"),
        (name = "Rankings", description = "Leaderboards"),
        (name = "Transfers", description = "Coin transfers"),
        (name = "Activities", description = "Activity catalog and club-managed activities")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bearer, club_identity, student_identity, test_state};
    use axum::{
        body::to_bytes,
        http::{header, Method, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: Method, uri: &str, auth: Option<String>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn liveness_is_public_and_tagged_with_request_id() {
        let (state, _ledger) = test_state();
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn login_then_transfer_round_trip() {
        let (state, ledger) = test_state();
        let app = router(state);

        let (status, login) = send(
            app.clone(),
            json_request(
                Method::POST,
                "/v1/auth/login",
                None,
                json!({"id": "sada", "password": "pw"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = login["token"].as_str().unwrap();

        let (status, result) = send(
            app,
            json_request(
                Method::POST,
                "/v1/transfers",
                Some(format!("Bearer {token}")),
                json!({
                    "sender_hash": "club_sada",
                    "receiver_hash": "stu_hash_abc",
                    "amount": 500,
                    "activity_id": "act_001"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(result, json!({"success": true, "message": "ok"}));
        assert_eq!(ledger.transfer_calls(), 1);
    }

    #[tokio::test]
    async fn transfer_without_session_is_unauthorized() {
        let (state, ledger) = test_state();
        let (status, body) = send(
            router(state),
            json_request(
                Method::POST,
                "/v1/transfers",
                None,
                json!({"sender_hash": "a", "receiver_hash": "b", "amount": 1}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "unauthenticated");
        assert_eq!(ledger.transfer_calls(), 0);
    }

    #[tokio::test]
    async fn invalid_transfer_lists_field_errors() {
        let (state, ledger) = test_state();
        let auth = bearer(&state, &club_identity());
        let (status, body) = send(
            router(state),
            json_request(
                Method::POST,
                "/v1/transfers",
                Some(auth),
                json!({"sender_hash": "club_sada", "receiver_hash": "stu_hash_abc", "amount": 0}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "non_positive_amount");
        assert_eq!(ledger.transfer_calls(), 0);
    }

    #[tokio::test]
    async fn students_cannot_create_activities() {
        let (state, ledger) = test_state();
        let auth = bearer(&state, &student_identity());
        let (status, _) = send(
            router(state),
            json_request(Method::POST, "/v1/activities", Some(auth), json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(ledger.calls().is_empty());
    }

    #[tokio::test]
    async fn catalog_route_wins_over_activity_id() {
        let (state, _ledger) = test_state();
        let auth = bearer(&state, &student_identity());
        let (status, body) = send(
            router(state),
            Request::builder()
                .uri("/v1/activities/catalog")
                .header(header::AUTHORIZATION, auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body
            .as_array()
            .unwrap()
            .iter()
            .all(|a| a["direction"] == "student_to_club"));
    }

    #[test]
    fn openapi_document_lists_transfer_route() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/transfers"));
        assert!(doc.paths.paths.contains_key("/v1/activities/{activity_id}"));
    }
}
