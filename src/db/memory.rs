// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory record store.
//!
//! Tables are `DashMap`s keyed by id. Email uniqueness is enforced through a
//! separate claim map whose entry API makes check-and-claim atomic.

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training, User, UserBasicInfo, UserEmailInfo};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent in-memory store. Data lives as long as the process.
#[derive(Debug)]
pub struct MemoryStore {
    users: DashMap<u64, User>,
    trainings: DashMap<u64, Training>,
    /// email -> owning user id
    emails: DashMap<String, u64>,
    next_user_id: AtomicU64,
    next_training_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            users: DashMap::new(),
            trainings: DashMap::new(),
            emails: DashMap::new(),
            next_user_id: AtomicU64::new(1),
            next_training_id: AtomicU64::new(1),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `email` for `user_id`. Re-claiming one's own email is a no-op.
    fn claim_email(&self, email: &str, user_id: u64) -> Result<()> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(owner) if *owner.get() != user_id => {
                Err(AppError::duplicate_email(email))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(user_id);
                Ok(())
            }
        }
    }

    fn release_email(&self, email: &str, user_id: u64) {
        self.emails.remove_if(email, |_, owner| *owner == user_id);
    }

    fn sorted_users(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(|u| u.id);
        users
    }

    fn sorted_trainings(&self, predicate: impl Fn(&Training) -> bool) -> Vec<Training> {
        let mut trainings: Vec<Training> = self
            .trainings
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        trainings.sort_by_key(|t| t.id);
        trainings
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save_user(&self, mut user: User) -> Result<User> {
        match user.id {
            None => {
                let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
                self.claim_email(&user.email, id)?;
                user.id = Some(id);
                self.users.insert(id, user.clone());
                Ok(user)
            }
            Some(id) => {
                // Holding the row serializes updates of one user, so the
                // claim map always matches the stored email.
                let mut existing = self
                    .users
                    .get_mut(&id)
                    .ok_or_else(|| AppError::user_not_found(id))?;

                if existing.email != user.email {
                    self.claim_email(&user.email, id)?;
                    self.release_email(&existing.email, id);
                }
                *existing = user.clone();
                Ok(user)
            }
        }
    }

    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_all_users(&self) -> Result<Vec<User>> {
        Ok(self.sorted_users(|_| true))
    }

    async fn delete_user_by_id(&self, id: u64) -> Result<()> {
        if let Some((_, user)) = self.users.remove(&id) {
            self.release_email(&user.email, id);
        }
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let Some(id) = self.emails.get(email).map(|owner| *owner.value()) else {
            return Ok(None);
        };
        Ok(self
            .users
            .get(&id)
            .filter(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn find_user_emails_containing(&self, fragment: &str) -> Result<Vec<UserEmailInfo>> {
        Ok(self
            .sorted_users(|u| u.email.contains(fragment))
            .iter()
            .filter_map(User::email_info)
            .collect())
    }

    async fn find_all_user_basic_info(&self) -> Result<Vec<UserBasicInfo>> {
        Ok(self
            .sorted_users(|_| true)
            .iter()
            .filter_map(User::basic_info)
            .collect())
    }

    async fn save_training(&self, mut training: Training) -> Result<Training> {
        match training.id {
            None => {
                let id = self.next_training_id.fetch_add(1, Ordering::SeqCst);
                training.id = Some(id);
                self.trainings.insert(id, training.clone());
            }
            Some(id) => {
                let mut existing = self
                    .trainings
                    .get_mut(&id)
                    .ok_or_else(|| AppError::training_not_found(id))?;
                *existing = training.clone();
            }
        }
        Ok(training)
    }

    async fn find_training_by_id(&self, id: u64) -> Result<Option<Training>> {
        Ok(self.trainings.get(&id).map(|t| t.value().clone()))
    }

    async fn find_all_trainings(&self) -> Result<Vec<Training>> {
        Ok(self.sorted_trainings(|_| true))
    }

    async fn find_trainings_by_user(&self, user_id: u64) -> Result<Vec<Training>> {
        Ok(self.sorted_trainings(|t| t.user_id == user_id))
    }

    async fn find_trainings_ending_after(&self, instant: DateTime<Utc>) -> Result<Vec<Training>> {
        Ok(self.sorted_trainings(|t| t.end_time > instant))
    }

    async fn find_trainings_by_activity(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Training>> {
        Ok(self.sorted_trainings(|t| t.activity_type == activity_type))
    }
}
