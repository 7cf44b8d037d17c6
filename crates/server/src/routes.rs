use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Redirect,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use server_api::{get_activity, list_activities, signup, unregister};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ActivityCatalog, ActivityDetails, ErrorDetail, MessageResponse},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::app_state::AppState;

pub(crate) const INDEX_PAGE: &str = "/static/index.html";

type Rejection = (StatusCode, Json<ErrorDetail>);

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

impl EmailQuery {
    fn required(query: Result<Query<Self>, QueryRejection>) -> Result<String, Rejection> {
        let Query(q) = query.map_err(|e| malformed(e.body_text()))?;
        q.email.ok_or_else(|| {
            reject(ApiError::new(
                ErrorCode::Validation,
                "email query parameter is required",
            ))
        })
    }
}

fn path_activity_name(
    path: Result<Path<String>, PathRejection>,
) -> Result<String, Rejection> {
    let Path(name) = path.map_err(|e| malformed(e.body_text()))?;
    Ok(name)
}

pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/activities", get(http_list_activities))
        .route("/activities/:activity_name", get(http_get_activity))
        .route("/activities/:activity_name/signup", post(http_signup))
        .route(
            "/activities/:activity_name/unregister",
            delete(http_unregister),
        )
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Redirect {
    Redirect::temporary(INDEX_PAGE)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_activities(State(state): State<Arc<AppState>>) -> Json<ActivityCatalog> {
    Json(list_activities(&state.api).await)
}

async fn http_get_activity(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ActivityDetails>, Rejection> {
    let activity_name = path_activity_name(path)?;
    let activity = get_activity(&state.api, &activity_name)
        .await
        .map_err(reject)?;
    Ok(Json(activity))
}

async fn http_signup(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, Rejection> {
    let activity_name = path_activity_name(path)?;
    let email = EmailQuery::required(query)?;
    let response = signup(&state.api, &activity_name, &email)
        .await
        .map_err(reject)?;
    Ok(Json(response))
}

async fn http_unregister(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, Rejection> {
    let activity_name = path_activity_name(path)?;
    let email = EmailQuery::required(query)?;
    let response = unregister(&state.api, &activity_name, &email)
        .await
        .map_err(reject)?;
    Ok(Json(response))
}

fn malformed(detail: String) -> Rejection {
    reject(ApiError::new(ErrorCode::Validation, detail))
}

fn reject(err: ApiError) -> Rejection {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::AlreadySignedUp | ErrorCode::NotRegistered => StatusCode::BAD_REQUEST,
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(ErrorDetail::from(err)))
}

#[cfg(test)]
#[path = "tests/routes_tests.rs"]
mod tests;
