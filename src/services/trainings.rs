// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training operations on top of the record store.

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training, User};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct TrainingService {
    store: Arc<dyn RecordStore>,
}

impl TrainingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Persist a new training for an existing user.
    pub async fn create_training(&self, training: Training) -> Result<Training> {
        tracing::info!(
            user_id = training.user_id,
            activity = %training.activity_type,
            "Creating training"
        );
        if let Some(id) = training.id {
            return Err(AppError::InvalidArgument(format!(
                "Training already has id {}, update is not permitted via create",
                id
            )));
        }

        if self
            .store
            .find_user_by_id(training.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::InvalidArgument(format!(
                "Training references unknown user {}",
                training.user_id
            )));
        }

        let created = self.store.save_training(training).await?;
        tracing::info!(training_id = ?created.id, "Training created");
        Ok(created)
    }

    pub async fn get_training(&self, id: u64) -> Result<Option<Training>> {
        tracing::debug!(training_id = id, "Fetching training");
        self.store.find_training_by_id(id).await
    }

    pub async fn find_all_trainings(&self) -> Result<Vec<Training>> {
        self.store.find_all_trainings().await
    }

    /// Trainings owned by `user`. An unsaved user owns nothing.
    pub async fn find_trainings_by_user(&self, user: &User) -> Result<Vec<Training>> {
        match user.id {
            Some(user_id) => self.store.find_trainings_by_user(user_id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Trainings that ended strictly after `instant`.
    pub async fn find_trainings_completed_after(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Training>> {
        tracing::debug!(%instant, "Searching trainings completed after");
        self.store.find_trainings_ending_after(instant).await
    }

    pub async fn find_trainings_by_activity(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Training>> {
        self.store.find_trainings_by_activity(activity_type).await
    }

    /// Set a training's distance. Returns None for unknown ids.
    pub async fn update_training_distance(
        &self,
        id: u64,
        new_distance: f64,
    ) -> Result<Option<Training>> {
        if new_distance.is_nan() || new_distance < 0.0 {
            return Err(AppError::InvalidArgument(
                "Distance must be a non-negative number".to_string(),
            ));
        }

        let Some(mut training) = self.store.find_training_by_id(id).await? else {
            tracing::debug!(training_id = id, "Distance update for unknown training");
            return Ok(None);
        };

        training.distance = new_distance;
        let updated = self.store.save_training(training).await?;
        tracing::info!(training_id = id, distance = new_distance, "Training distance updated");
        Ok(Some(updated))
    }
}
