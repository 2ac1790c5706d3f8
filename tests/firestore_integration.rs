// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it. Otherwise they are skipped.

use chrono::{NaiveDate, TimeZone, Utc};
use fitness_tracker::db::RecordStore;
use fitness_tracker::error::AppError;
use fitness_tracker::models::{ActivityType, Training, User};

mod common;
use common::test_db;

/// Unique email so repeated runs against one emulator don't collide.
fn unique_email(tag: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}@test.example", tag, nanos)
}

fn test_user(email: &str) -> User {
    User::new(
        "Test",
        "User",
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        email,
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_create_and_fetch() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email("create");

    let created = db.save_user(test_user(&email)).await.unwrap();
    let id = created.id.expect("store assigns an id");

    let fetched = db.find_user_by_id(id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let by_email = db.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_email.id, Some(id));
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email("dup");
    db.save_user(test_user(&email)).await.unwrap();

    let err = db.save_user(test_user(&email)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_email_change_releases_old_address() {
    require_emulator!();

    let db = test_db().await;
    let old_email = unique_email("old");
    let new_email = unique_email("new");

    let mut user = db.save_user(test_user(&old_email)).await.unwrap();
    user.email = new_email.clone();
    db.save_user(user).await.unwrap();

    assert!(db.find_user_by_email(&old_email).await.unwrap().is_none());
    assert!(db.find_user_by_email(&new_email).await.unwrap().is_some());

    // Old address is free again
    db.save_user(test_user(&old_email)).await.unwrap();
}

#[tokio::test]
async fn test_delete_user() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email("delete");
    let user = db.save_user(test_user(&email)).await.unwrap();
    let id = user.id.unwrap();

    db.delete_user_by_id(id).await.unwrap();
    assert!(db.find_user_by_id(id).await.unwrap().is_none());

    // Deleting again is a no-op
    db.delete_user_by_id(id).await.unwrap();

    let again = db.save_user(test_user(&email)).await.unwrap();
    assert_ne!(again.id, Some(id));
}

#[tokio::test]
async fn test_email_fragment_search() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email("fragment");
    let user = db.save_user(test_user(&email)).await.unwrap();

    let found = db.find_user_emails_containing(&email).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, user.id.unwrap());
}

// ═══════════════════════════════════════════════════════════════════════════
// TRAINING TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_training_round_trip_and_update() {
    require_emulator!();

    let db = test_db().await;
    let user = db.save_user(test_user(&unique_email("trainer"))).await.unwrap();
    let user_id = user.id.unwrap();

    let created = db
        .save_training(Training::new(
            user_id,
            Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap(),
            ActivityType::Tennis,
            5.0,
            10.0,
        ))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let mut changed = created.clone();
    changed.distance = 7.5;
    db.save_training(changed).await.unwrap();

    let fetched = db.find_training_by_id(id).await.unwrap().unwrap();
    assert_eq!(fetched.distance, 7.5);
    assert_eq!(fetched.activity_type, ActivityType::Tennis);
    assert_eq!(fetched.end_time, created.end_time);

    let owned = db.find_trainings_by_user(user_id).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, Some(id));

    let later = db
        .find_trainings_ending_after(created.end_time)
        .await
        .unwrap();
    assert!(later.iter().all(|t| t.id != Some(id)));
}
