//! User record and its lightweight projections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Store-assigned identifier (None until persisted)
    pub id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    /// Unique across all users
    pub email: String,
}

impl User {
    /// Build a user that has not been persisted yet.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthdate: NaiveDate,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthdate,
            email: email.into(),
        }
    }

    /// Basic-info projection; None for an unsaved user.
    pub fn basic_info(&self) -> Option<UserBasicInfo> {
        self.id.map(|id| UserBasicInfo {
            id,
            last_name: self.last_name.clone(),
        })
    }

    /// Email projection; None for an unsaved user.
    pub fn email_info(&self) -> Option<UserEmailInfo> {
        self.id.map(|id| UserEmailInfo {
            id,
            email: self.email.clone(),
        })
    }
}

/// `(id, lastName)` projection used by the basic-info listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserBasicInfo {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub last_name: String,
}

/// `(id, email)` projection returned by email searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserEmailInfo {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub email: String,
}
