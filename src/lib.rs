// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitness tracker: users and their training sessions over HTTP.
//!
//! Records live in a [`db::RecordStore`] (Firestore or in-memory), the
//! services in [`services`] implement the queries, and [`routes`] exposes
//! them under `/v1`.

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::RecordStore;
use services::{TrainingService, UserService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: UserService,
    pub trainings: TrainingService,
}

impl AppState {
    /// Wire both services to the same store.
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config,
            users: UserService::new(store.clone()),
            trainings: TrainingService::new(store),
        }
    }
}
