// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User operations on top of the record store.
//!
//! Every call is a single lookup, scan, or read-modify-write. Concurrent
//! email updates of the same user race and the last write wins.

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::models::{User, UserBasicInfo, UserEmailInfo};
use crate::time_utils::age_threshold;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn RecordStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Persist a new user.
    ///
    /// Rejects users that already carry an id; email uniqueness is left to
    /// the store, which reports `Conflict`.
    pub async fn create_user(&self, user: User) -> Result<User> {
        tracing::info!(email = %user.email, "Creating user");
        if let Some(id) = user.id {
            return Err(AppError::InvalidArgument(format!(
                "User already has id {}, update is not permitted via create",
                id
            )));
        }

        let created = self.store.save_user(user).await?;
        tracing::info!(user_id = ?created.id, "User created");
        Ok(created)
    }

    pub async fn get_user(&self, id: u64) -> Result<Option<User>> {
        tracing::debug!(user_id = id, "Fetching user");
        self.store.find_user_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.store.find_user_by_email(email).await
    }

    pub async fn find_all_users(&self) -> Result<Vec<User>> {
        self.store.find_all_users().await
    }

    pub async fn basic_info(&self) -> Result<Vec<UserBasicInfo>> {
        self.store.find_all_user_basic_info().await
    }

    /// Remove a user; unknown ids are not an error. Trainings are kept.
    pub async fn delete_user(&self, id: u64) -> Result<()> {
        tracing::info!(user_id = id, "Deleting user");
        self.store.delete_user_by_id(id).await
    }

    pub async fn search_users_by_email(&self, fragment: &str) -> Result<Vec<UserEmailInfo>> {
        tracing::debug!(fragment, "Searching users by email");
        self.store.find_user_emails_containing(fragment).await
    }

    /// Users strictly older than `age` years today.
    pub async fn search_users_older_than(&self, age: u32) -> Result<Vec<User>> {
        self.search_users_older_than_on(age, Utc::now().date_naive())
            .await
    }

    /// Users born strictly before `today - age years`.
    ///
    /// Someone turning exactly `age` on `today` is excluded.
    pub async fn search_users_older_than_on(&self, age: u32, today: NaiveDate) -> Result<Vec<User>> {
        let Some(threshold) = age_threshold(today, age) else {
            return Ok(Vec::new());
        };
        tracing::debug!(age, %threshold, "Searching users by age");

        Ok(self
            .store
            .find_all_users()
            .await?
            .into_iter()
            .filter(|u| u.birthdate < threshold)
            .collect())
    }

    /// Replace a user's email. Returns None (store untouched) for unknown ids.
    ///
    /// No pre-check for uniqueness; a taken address fails in the store
    /// with `Conflict`.
    pub async fn update_user_email(&self, id: u64, new_email: &str) -> Result<Option<User>> {
        let Some(mut user) = self.store.find_user_by_id(id).await? else {
            tracing::debug!(user_id = id, "Email update for unknown user");
            return Ok(None);
        };

        user.email = new_email.to_string();
        let updated = self.store.save_user(user).await?;
        tracing::info!(user_id = id, "User email updated");
        Ok(Some(updated))
    }
}
