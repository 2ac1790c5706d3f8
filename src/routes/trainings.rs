// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `/v1/trainings` endpoints.

use crate::dto::{DistanceUpdate, TrainingDto};
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training};
use crate::routes::extract::{AppJson, AppPath, AppQuery};
use crate::time_utils::parse_instant;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/trainings", get(list_trainings).post(create_training))
        .route("/v1/trainings/completed", get(completed_after))
        .route("/v1/trainings/activity", get(by_activity))
        .route("/v1/trainings/user/{user_id}", get(by_user))
        .route("/v1/trainings/{training_id}", get(get_training))
        .route("/v1/trainings/{training_id}/distance", put(update_distance))
}

fn to_dtos(trainings: Vec<Training>) -> Json<Vec<TrainingDto>> {
    Json(trainings.into_iter().map(TrainingDto::from).collect())
}

async fn list_trainings(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TrainingDto>>> {
    Ok(to_dtos(state.trainings.find_all_trainings().await?))
}

async fn create_training(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<TrainingDto>,
) -> Result<Json<TrainingDto>> {
    body.validate()?;
    let created = state.trainings.create_training(body.into()).await?;
    Ok(Json(created.into()))
}

async fn get_training(
    State(state): State<Arc<AppState>>,
    AppPath(training_id): AppPath<u64>,
) -> Result<Json<TrainingDto>> {
    let training = state
        .trainings
        .get_training(training_id)
        .await?
        .ok_or_else(|| AppError::training_not_found(training_id))?;
    Ok(Json(training.into()))
}

/// 404 when the user itself is unknown.
async fn by_user(
    State(state): State<Arc<AppState>>,
    AppPath(user_id): AppPath<u64>,
) -> Result<Json<Vec<TrainingDto>>> {
    let user = state
        .users
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(user_id))?;
    Ok(to_dtos(state.trainings.find_trainings_by_user(&user).await?))
}

#[derive(Deserialize)]
struct CompletedQuery {
    /// `yyyy-MM-dd` or RFC 3339
    date: String,
}

async fn completed_after(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<CompletedQuery>,
) -> Result<Json<Vec<TrainingDto>>> {
    let instant = parse_instant(&params.date).ok_or_else(|| {
        AppError::InvalidArgument(
            "Invalid 'date' parameter: expected yyyy-MM-dd or RFC3339 datetime".to_string(),
        )
    })?;
    Ok(to_dtos(
        state.trainings.find_trainings_completed_after(instant).await?,
    ))
}

#[derive(Deserialize)]
struct ActivityQuery {
    #[serde(rename = "activityType")]
    activity_type: String,
}

async fn by_activity(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ActivityQuery>,
) -> Result<Json<Vec<TrainingDto>>> {
    let activity_type: ActivityType = params.activity_type.parse()?;
    Ok(to_dtos(
        state
            .trainings
            .find_trainings_by_activity(activity_type)
            .await?,
    ))
}

async fn update_distance(
    State(state): State<Arc<AppState>>,
    AppPath(training_id): AppPath<u64>,
    AppJson(body): AppJson<DistanceUpdate>,
) -> Result<Json<TrainingDto>> {
    body.validate()?;
    let updated = state
        .trainings
        .update_training_distance(training_id, body.distance)
        .await?
        .ok_or_else(|| AppError::training_not_found(training_id))?;
    Ok(Json(updated.into()))
}
