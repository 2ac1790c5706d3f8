// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed record store.
//!
//! Layout:
//! - `users/{id}` and `trainings/{id}`: one document per record
//! - `user_emails/{url-encoded email}`: uniqueness claim pointing at a user id
//! - `counters/{collection}`: next id hint for each record collection
//!
//! Firestore has neither auto-increment keys nor unique indexes. Ids are
//! created with `insert` (which fails if the document exists) and retried on
//! conflict, so an id is never handed out twice even if the counter hint is
//! stale. Email uniqueness works the same way through claim documents.

use crate::db::{collections, RecordStore};
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training, User, UserBasicInfo, UserEmailInfo};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use firestore::errors::FirestoreError;
use firestore::FirestoreQueryDirection;
use serde::{Deserialize, Serialize};

/// Upper bound on id candidates tried when concurrent inserts collide.
const MAX_ID_ATTEMPTS: u64 = 16;

// ─── Document Shapes ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    id: u64,
    first_name: String,
    last_name: String,
    birthdate: NaiveDate,
    email: String,
}

impl UserDocument {
    fn new(id: u64, user: &User) -> Self {
        Self {
            id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            birthdate: user.birthdate,
            email: user.email.clone(),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: Some(doc.id),
            first_name: doc.first_name,
            last_name: doc.last_name,
            birthdate: doc.birthdate,
            email: doc.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrainingDocument {
    id: u64,
    user_id: u64,
    #[serde(with = "firestore::serialize_as_timestamp")]
    start_time: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    end_time: DateTime<Utc>,
    /// Stored by name, never by ordinal
    activity_type: ActivityType,
    distance: f64,
    average_speed: f64,
}

impl TrainingDocument {
    fn new(id: u64, training: &Training) -> Self {
        Self {
            id,
            user_id: training.user_id,
            start_time: training.start_time,
            end_time: training.end_time,
            activity_type: training.activity_type,
            distance: training.distance,
            average_speed: training.average_speed,
        }
    }
}

impl From<TrainingDocument> for Training {
    fn from(doc: TrainingDocument) -> Self {
        Self {
            id: Some(doc.id),
            user_id: doc.user_id,
            start_time: doc.start_time,
            end_time: doc.end_time,
            activity_type: doc.activity_type,
            distance: doc.distance,
            average_speed: doc.average_speed,
        }
    }
}

/// Claim on an email address by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmailClaim {
    user_id: u64,
}

/// Next-id hint for a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IdCounter {
    next_id: u64,
}

fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Read the next-id hint for a collection (1 if none yet).
    async fn next_id_hint(&self, collection: &str) -> Result<u64> {
        let counter: Option<IdCounter> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::COUNTERS)
            .obj()
            .one(collection)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(counter.map(|c| c.next_id).unwrap_or(1))
    }

    /// Advance the next-id hint past `id`.
    async fn advance_counter(&self, collection: &str, id: u64) -> Result<()> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::COUNTERS)
            .document_id(collection)
            .object(&IdCounter { next_id: id + 1 })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Create a document that must not exist yet.
    ///
    /// Returns `Ok(false)` if the document id is already taken.
    async fn insert_new<T>(&self, collection: &str, doc_id: &str, object: &T) -> Result<bool>
    where
        T: Serialize + Sync + Send,
        for<'de> T: Deserialize<'de>,
    {
        let inserted: std::result::Result<(), FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await;

        match inserted {
            Ok(()) => Ok(true),
            Err(FirestoreError::DataConflictError(_)) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Claim `email` for `user_id`. Succeeds if the claim is already ours.
    async fn claim_email(&self, email: &str, user_id: u64) -> Result<()> {
        let doc_id = email_doc_id(email);
        if self
            .insert_new(collections::USER_EMAILS, &doc_id, &EmailClaim { user_id })
            .await?
        {
            return Ok(());
        }

        let existing: Option<EmailClaim> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one(&doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match existing {
            Some(claim) if claim.user_id == user_id => Ok(()),
            _ => Err(AppError::duplicate_email(email)),
        }
    }

    async fn release_email(&self, email: &str) -> Result<()> {
        self.client
            .fluent()
            .delete()
            .from(collections::USER_EMAILS)
            .document_id(email_doc_id(email))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn get_user_doc(&self, id: u64) -> Result<Option<UserDocument>> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn all_user_docs(&self) -> Result<Vec<UserDocument>> {
        self.client
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([("id", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        let first = self.next_id_hint(collections::USERS).await?;
        self.insert_user_from(first, user).await
    }

    /// Insert `user` at the first free id from `first` on.
    ///
    /// The email claim is taken up front and released again if the user
    /// document cannot be written.
    async fn insert_user_from(&self, first: u64, user: User) -> Result<User> {
        self.claim_email(&user.email, first).await?;

        match self.insert_user_doc(first, &user).await {
            Ok(doc) => {
                if let Err(e) = self.advance_counter(collections::USERS, doc.id).await {
                    tracing::warn!(user_id = doc.id, error = %e, "Failed to advance user id counter");
                }
                tracing::debug!(user_id = doc.id, "User document created");
                Ok(doc.into())
            }
            Err(e) => {
                self.release_email_after_failure(&user.email).await;
                Err(e)
            }
        }
    }

    async fn insert_user_doc(&self, first: u64, user: &User) -> Result<UserDocument> {
        for id in first..first + MAX_ID_ATTEMPTS {
            if id != first {
                // Lost the race for the previous id; move the claim along.
                let _: () = self
                    .client
                    .fluent()
                    .update()
                    .in_col(collections::USER_EMAILS)
                    .document_id(email_doc_id(&user.email))
                    .object(&EmailClaim { user_id: id })
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }

            let doc = UserDocument::new(id, user);
            if self
                .insert_new(collections::USERS, &id.to_string(), &doc)
                .await?
            {
                return Ok(doc);
            }
        }

        Err(AppError::Database(
            "Could not allocate a user id after repeated conflicts".to_string(),
        ))
    }

    /// Best-effort release of a claim whose user write failed.
    async fn release_email_after_failure(&self, email: &str) {
        if let Err(e) = self.release_email(email).await {
            tracing::error!(email, error = %e, "Failed to release email claim");
        }
    }

    async fn update_user(&self, id: u64, user: User) -> Result<User> {
        let existing = self
            .get_user_doc(id)
            .await?
            .ok_or_else(|| AppError::user_not_found(id))?;

        let released = (existing.email != user.email).then_some(existing.email.as_str());
        if released.is_some() {
            self.claim_email(&user.email, id).await?;
        }

        let doc = UserDocument::new(id, &user);
        if let Err(e) = self.write_user_doc(&doc, released).await {
            if released.is_some() {
                self.release_email_after_failure(&user.email).await;
            }
            return Err(e);
        }

        Ok(doc.into())
    }

    /// Overwrite a user document and drop its old email claim in one transaction.
    async fn write_user_doc(&self, doc: &UserDocument, released: Option<&str>) -> Result<()> {
        let mut transaction =
            self.client.begin_transaction().await.map_err(|e| {
                AppError::Database(format!("Failed to begin transaction: {}", e))
            })?;

        self.client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(doc.id.to_string())
            .object(doc)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add user to transaction: {}", e))
            })?;

        if let Some(old_email) = released {
            self.client
                .fluent()
                .delete()
                .from(collections::USER_EMAILS)
                .document_id(email_doc_id(old_email))
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to add email release to transaction: {}",
                        e
                    ))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(())
    }

    async fn get_training_doc(&self, id: u64) -> Result<Option<TrainingDocument>> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::TRAININGS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn save_user(&self, user: User) -> Result<User> {
        match user.id {
            None => self.insert_user(user).await,
            Some(id) => self.update_user(id, user).await,
        }
    }

    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>> {
        Ok(self.get_user_doc(id).await?.map(User::from))
    }

    async fn find_all_users(&self) -> Result<Vec<User>> {
        Ok(self
            .all_user_docs()
            .await?
            .into_iter()
            .map(User::from)
            .collect())
    }

    async fn delete_user_by_id(&self, id: u64) -> Result<()> {
        let Some(existing) = self.get_user_doc(id).await? else {
            tracing::debug!(user_id = id, "Delete of unknown user ignored");
            return Ok(());
        };

        let mut transaction =
            self.client.begin_transaction().await.map_err(|e| {
                AppError::Database(format!("Failed to begin transaction: {}", e))
            })?;

        self.client
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(id.to_string())
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add user deletion to transaction: {}", e))
            })?;

        self.client
            .fluent()
            .delete()
            .from(collections::USER_EMAILS)
            .document_id(email_doc_id(&existing.email))
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!(
                    "Failed to add email release to transaction: {}",
                    e
                ))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let claim: Option<EmailClaim> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // A claim can briefly point at an id that isn't ours yet
        let Some(claim) = claim else {
            return Ok(None);
        };
        Ok(self
            .get_user_doc(claim.user_id)
            .await?
            .filter(|doc| doc.email == email)
            .map(User::from))
    }

    async fn find_user_emails_containing(&self, fragment: &str) -> Result<Vec<UserEmailInfo>> {
        // Firestore has no substring operator; scan and filter here.
        Ok(self
            .all_user_docs()
            .await?
            .into_iter()
            .filter(|doc| doc.email.contains(fragment))
            .map(|doc| UserEmailInfo {
                id: doc.id,
                email: doc.email,
            })
            .collect())
    }

    async fn find_all_user_basic_info(&self) -> Result<Vec<UserBasicInfo>> {
        Ok(self
            .all_user_docs()
            .await?
            .into_iter()
            .map(|doc| UserBasicInfo {
                id: doc.id,
                last_name: doc.last_name,
            })
            .collect())
    }

    // ─── Training Operations ─────────────────────────────────────

    async fn save_training(&self, training: Training) -> Result<Training> {
        if let Some(id) = training.id {
            if self.get_training_doc(id).await?.is_none() {
                return Err(AppError::training_not_found(id));
            }

            let doc = TrainingDocument::new(id, &training);
            let _: () = self
                .client
                .fluent()
                .update()
                .in_col(collections::TRAININGS)
                .document_id(id.to_string())
                .object(&doc)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(doc.into());
        }

        let first = self.next_id_hint(collections::TRAININGS).await?;
        for id in first..first + MAX_ID_ATTEMPTS {
            let doc = TrainingDocument::new(id, &training);
            if self
                .insert_new(collections::TRAININGS, &id.to_string(), &doc)
                .await?
            {
                if let Err(e) = self.advance_counter(collections::TRAININGS, id).await {
                    tracing::warn!(training_id = id, error = %e, "Failed to advance training id counter");
                }
                tracing::debug!(training_id = id, "Training document created");
                return Ok(doc.into());
            }
        }

        Err(AppError::Database(
            "Could not allocate a training id after repeated conflicts".to_string(),
        ))
    }

    async fn find_training_by_id(&self, id: u64) -> Result<Option<Training>> {
        Ok(self.get_training_doc(id).await?.map(Training::from))
    }

    async fn find_all_trainings(&self) -> Result<Vec<Training>> {
        let docs: Vec<TrainingDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .order_by([("id", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(docs.into_iter().map(Training::from).collect())
    }

    async fn find_trainings_by_user(&self, user_id: u64) -> Result<Vec<Training>> {
        let docs: Vec<TrainingDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .filter(move |q| q.field("user_id").eq(user_id))
            .order_by([("id", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(docs.into_iter().map(Training::from).collect())
    }

    async fn find_trainings_ending_after(&self, instant: DateTime<Utc>) -> Result<Vec<Training>> {
        let docs: Vec<TrainingDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .filter(move |q| {
                q.field("end_time")
                    .greater_than(firestore::FirestoreTimestamp(instant))
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Range filters force ordering on end_time; restore id order.
        let mut trainings: Vec<Training> = docs.into_iter().map(Training::from).collect();
        trainings.sort_by_key(|t| t.id);
        Ok(trainings)
    }

    async fn find_trainings_by_activity(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Training>> {
        let docs: Vec<TrainingDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .filter(move |q| q.field("activity_type").eq(activity_type.as_str()))
            .order_by([("id", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(docs.into_iter().map(Training::from).collect())
    }
}
