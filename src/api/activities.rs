// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Activity endpoints.
//!
//! Two sources of activities exist:
//! - the predefined catalog served from memory (`/v1/activities/catalog`)
//! - club-managed activities stored by the ledger (`/v1/activities`), whose
//!   create/update bodies are validated here before being forwarded

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use utoipa::IntoParams;

use crate::{
    auth::{Auth, ClubOnly, Identity},
    catalog::{Activity, Direction},
    error::{ApiError, FieldError},
    models::{ActivityDraft, ActivityDraftRequest},
    state::AppState,
    transfer::{validator::parse_amount, ValidationError},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ActivityListQuery {
    /// Restrict the list to one club.
    pub club_id: Option<String>,
}

/// Predefined activities the caller can act on.
///
/// Clubs see every active activity; students see the ones they can be
/// charged for.
#[utoipa::path(
    get,
    path = "/v1/activities/catalog",
    tag = "Activities",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Applicable activities", body = Vec<Activity>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_catalog(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Json<Vec<Activity>> {
    Json(state.catalog.applicable_activities(identity.role))
}

#[utoipa::path(
    get,
    path = "/v1/activities/catalog/{activity_id}",
    tag = "Activities",
    params(("activity_id" = String, Path, description = "Catalog activity id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Activity", body = Activity),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown activity")
    )
)]
pub async fn get_catalog_activity(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> Result<Json<Activity>, ApiError> {
    state
        .catalog
        .get_activity(&activity_id)
        .map(|a| Json(a.clone()))
        .map_err(|e| ApiError::not_found(e.to_string()))
}

/// Club-managed activities stored by the ledger.
#[utoipa::path(
    get,
    path = "/v1/activities",
    tag = "Activities",
    params(ActivityListQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Activities", body = serde_json::Value),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Ledger unreachable")
    )
)]
pub async fn list_activities(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    Query(query): Query<ActivityListQuery>,
) -> Result<Json<Value>, ApiError> {
    let club_id = query.club_id.as_deref().filter(|c| !c.is_empty());
    let activities = state
        .ledger
        .list_activities(club_id)
        .await
        .map_err(|e| ApiError::from_ledger(e, "Failed to fetch activities"))?;
    Ok(Json(activities))
}

#[utoipa::path(
    post,
    path = "/v1/activities",
    tag = "Activities",
    request_body = ActivityDraftRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Activity created", body = serde_json::Value),
        (status = 400, description = "Invalid activity", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a club, or not the caller's club")
    )
)]
pub async fn create_activity(
    ClubOnly(club): ClubOnly,
    State(state): State<AppState>,
    Json(request): Json<ActivityDraftRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let draft = validate_draft(&request, &club)?;
    let created = state
        .ledger
        .create_activity(&draft)
        .await
        .map_err(|e| ApiError::from_ledger(e, "Failed to create activity"))?;

    info!(club_id = %draft.club_id, amount = draft.amount, "Activity created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/v1/activities/{activity_id}",
    tag = "Activities",
    params(("activity_id" = String, Path, description = "Ledger activity id")),
    request_body = ActivityDraftRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Activity updated", body = serde_json::Value),
        (status = 400, description = "Invalid activity", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a club, or not the caller's club")
    )
)]
pub async fn update_activity(
    ClubOnly(club): ClubOnly,
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
    Json(request): Json<ActivityDraftRequest>,
) -> Result<Json<Value>, ApiError> {
    let draft = validate_draft(&request, &club)?;
    let updated = state
        .ledger
        .update_activity(&activity_id, &draft)
        .await
        .map_err(|e| ApiError::from_ledger(e, "Failed to update activity"))?;

    info!(%activity_id, club_id = %draft.club_id, "Activity updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/v1/activities/{activity_id}",
    tag = "Activities",
    params(("activity_id" = String, Path, description = "Ledger activity id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Activity deleted", body = serde_json::Value),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a club")
    )
)]
pub async fn delete_activity(
    ClubOnly(club): ClubOnly,
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .ledger
        .delete_activity(&activity_id)
        .await
        .map_err(|e| ApiError::from_ledger(e, "Failed to delete activity"))?;

    info!(%activity_id, club_id = %club.id, "Activity deleted");
    Ok(Json(deleted))
}

/// Check a create/update body and bind it to the calling club.
pub fn validate_draft(
    request: &ActivityDraftRequest,
    club: &Identity,
) -> Result<ActivityDraft, ApiError> {
    let mut errors = Vec::new();

    let title = required_text(request.title.as_deref(), "title", &mut errors);
    let description = required_text(request.description.as_deref(), "description", &mut errors);
    let club_id = required_text(request.club_id.as_deref(), "club_id", &mut errors);

    let amount = match &request.amount {
        None | Some(Value::Null) => {
            errors.push(ValidationError::MissingField("amount"));
            None
        }
        Some(raw) => match parse_amount(Some(raw)) {
            Ok(amount) => Some(amount),
            Err(e) => {
                errors.push(e);
                None
            }
        },
    };

    let direction = match required_text(request.direction.as_deref(), "type", &mut errors) {
        Some(raw) => match Direction::parse(&raw) {
            Some(direction) => Some(direction),
            None => {
                errors.push(ValidationError::InvalidTransactionType(raw));
                None
            }
        },
        None => None,
    };

    match (title, description, amount, direction, club_id) {
        (Some(title), Some(description), Some(amount), Some(direction), Some(club_id))
            if errors.is_empty() =>
        {
            if club_id != club.id {
                return Err(ApiError::forbidden(
                    "Clubs can only manage their own activities",
                ));
            }
            Ok(ActivityDraft {
                title,
                description,
                amount,
                direction,
                club_id,
            })
        }
        _ => Err(ApiError::bad_request("Invalid activity")
            .with_errors(errors.iter().map(FieldError::from).collect())),
    }
}

fn required_text(
    value: Option<&str>,
    field: &'static str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Some(v.to_string()),
        None => {
            errors.push(ValidationError::MissingField(field));
            None
        }
    }
}
