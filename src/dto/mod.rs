// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wire representations of records.
//!
//! Conversions to and from records are plain `From` impls: field for field,
//! no derived values and no validation. Request bodies are validated at the
//! route layer with `validator`.

pub mod training;
pub mod user;

pub use training::{DistanceUpdate, TrainingDto};
pub use user::{EmailUpdate, UserDto};
