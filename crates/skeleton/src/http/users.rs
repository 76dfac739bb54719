use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::http::ApiError;
use crate::models::{NewUser, UpdateUser};
use crate::services::UserService;

const DEFAULT_PER_PAGE: usize = 15;
const MAX_PER_PAGE: usize = 100;

#[derive(Clone)]
struct UsersState {
    users: Arc<dyn UserService>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<usize>,
    per_page: Option<usize>,
}

/// CRUD routes under `/users`.
pub fn user_routes(users: Arc<dyn UserService>) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(show_user).put(update_user).delete(delete_user),
        )
        .with_state(UsersState { users })
}

async fn list_users(
    State(state): State<UsersState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);
    if page == 0 || per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(ApiError::BadRequest(format!(
            "page must be at least 1 and per_page between 1 and {MAX_PER_PAGE}"
        )));
    }
    Ok(Json(state.users.list(page, per_page)?))
}

async fn create_user(
    State(state): State<UsersState>,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let user = state.users.create(payload)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn show_user(
    State(state): State<UsersState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    match state.users.get(id)? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::NotFound(format!("user {id}"))),
    }
}

async fn update_user(
    State(state): State<UsersState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateUser>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    match state.users.update(id, payload)? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::NotFound(format!("user {id}"))),
    }
}

async fn delete_user(
    State(state): State<UsersState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    if state.users.delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("user {id}")))
    }
}
