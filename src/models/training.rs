// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Training session record and activity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of activity performed during a training.
///
/// Serialized by name. The declaration order is the legacy ordinal order
/// and must not change; see [`ActivityType::ordinal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    Running,
    Cycling,
    Walking,
    Swimming,
    Tennis,
}

impl ActivityType {
    /// All activity types in ordinal order.
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Running,
        ActivityType::Cycling,
        ActivityType::Walking,
        ActivityType::Swimming,
        ActivityType::Tennis,
    ];

    /// Stable name used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "RUNNING",
            ActivityType::Cycling => "CYCLING",
            ActivityType::Walking => "WALKING",
            ActivityType::Swimming => "SWIMMING",
            ActivityType::Tennis => "TENNIS",
        }
    }

    /// Human readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityType::Running => "Running",
            ActivityType::Cycling => "Cycling",
            ActivityType::Walking => "Walking",
            ActivityType::Swimming => "Swimming",
            ActivityType::Tennis => "Tennis",
        }
    }

    /// Position in the legacy ordinal encoding (Running = 0 .. Tennis = 4).
    ///
    /// Only for migrating rows written with ordinal encoding.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Inverse of [`ActivityType::ordinal`].
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown activity type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown activity type: {0}")]
pub struct UnknownActivityType(pub String);

impl FromStr for ActivityType {
    type Err = UnknownActivityType;

    /// Accepts the stored name in any letter case ("RUNNING", "running").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownActivityType(s.to_string()))
    }
}

/// A single training session owned by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Training {
    /// Store-assigned identifier (None until persisted)
    pub id: Option<u64>,
    /// Owning user's id
    pub user_id: u64,
    pub start_time: DateTime<Utc>,
    /// Not checked against `start_time`
    pub end_time: DateTime<Utc>,
    pub activity_type: ActivityType,
    /// Distance in kilometers
    pub distance: f64,
    /// Average speed in km/h
    pub average_speed: f64,
}

impl Training {
    /// Build a training that has not been persisted yet.
    pub fn new(
        user_id: u64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        activity_type: ActivityType,
        distance: f64,
        average_speed: f64,
    ) -> Self {
        Self {
            id: None,
            user_id,
            start_time,
            end_time,
            activity_type,
            distance,
            average_speed,
        }
    }
}
