// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `/v1/users` endpoints.

use crate::dto::{EmailUpdate, UserDto};
use crate::error::{AppError, Result};
use crate::models::{UserBasicInfo, UserEmailInfo};
use crate::routes::extract::{AppJson, AppPath, AppQuery};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/users", get(list_users).post(create_user))
        .route("/v1/users/basic-info", get(basic_info))
        .route("/v1/users/email", get(get_user_by_email))
        .route("/v1/users/search", get(search_by_email))
        .route("/v1/users/searchByAge", get(search_by_age))
        .route("/v1/users/{id}", get(get_user).delete(delete_user))
        .route("/v1/users/{id}/email", put(update_email))
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserDto>>> {
    let users = state.users.find_all_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<UserDto>,
) -> Result<Json<UserDto>> {
    body.validate()?;
    let created = state.users.create_user(body.into()).await?;
    Ok(Json(created.into()))
}

async fn basic_info(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserBasicInfo>>> {
    Ok(Json(state.users.basic_info().await?))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<UserDto>> {
    let user = state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::user_not_found(id))?;
    Ok(Json(user.into()))
}

#[derive(Deserialize)]
struct EmailQuery {
    email: String,
}

async fn get_user_by_email(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<EmailQuery>,
) -> Result<Json<UserDto>> {
    let user = state
        .users
        .get_user_by_email(&params.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user with email {}", params.email)))?;
    Ok(Json(user.into()))
}

/// Always 204, whether or not the user existed.
async fn delete_user(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
) -> Result<StatusCode> {
    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct EmailSearchQuery {
    #[serde(rename = "emailFragment")]
    email_fragment: String,
}

async fn search_by_email(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<EmailSearchQuery>,
) -> Result<Json<Vec<UserEmailInfo>>> {
    Ok(Json(
        state
            .users
            .search_users_by_email(&params.email_fragment)
            .await?,
    ))
}

#[derive(Deserialize)]
struct AgeQuery {
    age: u32,
}

async fn search_by_age(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<AgeQuery>,
) -> Result<Json<Vec<UserDto>>> {
    let users = state.users.search_users_older_than(params.age).await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

async fn update_email(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
    AppJson(body): AppJson<EmailUpdate>,
) -> Result<Json<UserDto>> {
    body.validate()?;
    if let Some(body_id) = body.id.filter(|body_id| *body_id != id) {
        return Err(AppError::InvalidArgument(format!(
            "Body id {} does not match path id {}",
            body_id, id
        )));
    }

    let updated = state
        .users
        .update_user_email(id, &body.email)
        .await?
        .ok_or_else(|| AppError::user_not_found(id))?;
    Ok(Json(updated.into()))
}
