// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod training;
pub mod user;

pub use training::{ActivityType, Training};
pub use user::{User, UserBasicInfo, UserEmailInfo};
