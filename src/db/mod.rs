//! Record store layer.
//!
//! [`RecordStore`] is the persistence port used by the services. Two
//! backends implement it: [`FirestoreDb`] for durable storage and
//! [`MemoryStore`] for local runs and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::{ActivityType, Training, User, UserBasicInfo, UserEmailInfo};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TRAININGS: &str = "trainings";
    /// Email uniqueness claims (keyed by url-encoded email)
    pub const USER_EMAILS: &str = "user_emails";
    /// Id sequences (keyed by collection name)
    pub const COUNTERS: &str = "counters";
}

/// Persistence operations for users and trainings.
///
/// `save_*` inserts when the record has no id (assigning a fresh one) and
/// updates otherwise. Updating an unknown id fails with `NotFound`.
/// Scans are full-table filters returned in id order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    /// Insert or update a user. Fails with `Conflict` if another user
    /// already holds the email.
    async fn save_user(&self, user: User) -> Result<User>;

    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>>;

    async fn find_all_users(&self) -> Result<Vec<User>>;

    /// Remove a user. Unknown ids are accepted silently.
    async fn delete_user_by_id(&self, id: u64) -> Result<()>;

    /// Exact email match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// `(id, email)` pairs for every email containing `fragment`.
    async fn find_user_emails_containing(&self, fragment: &str) -> Result<Vec<UserEmailInfo>>;

    /// `(id, lastName)` pairs for every user.
    async fn find_all_user_basic_info(&self) -> Result<Vec<UserBasicInfo>>;

    // ─── Trainings ───────────────────────────────────────────────

    async fn save_training(&self, training: Training) -> Result<Training>;

    async fn find_training_by_id(&self, id: u64) -> Result<Option<Training>>;

    async fn find_all_trainings(&self) -> Result<Vec<Training>>;

    async fn find_trainings_by_user(&self, user_id: u64) -> Result<Vec<Training>>;

    /// Trainings whose end time is strictly after `instant`.
    async fn find_trainings_ending_after(&self, instant: DateTime<Utc>) -> Result<Vec<Training>>;

    async fn find_trainings_by_activity(&self, activity_type: ActivityType)
        -> Result<Vec<Training>>;
}
