//! User transfer shapes.

use crate::models::User;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// User as sent and received over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(optional, type = "number"))]
    pub id: Option<u64>,
    #[validate(length(min = 1, message = "firstName must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "lastName must not be empty"))]
    pub last_name: String,
    /// `yyyy-MM-dd`
    pub birthdate: NaiveDate,
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            birthdate: user.birthdate,
            email: user.email,
        }
    }
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            birthdate: dto.birthdate,
            email: dto.email,
        }
    }
}

/// Body of `PUT /v1/users/{id}/email`. `id`, if sent, must equal the path id.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailUpdate {
    #[serde(default)]
    pub id: Option<u64>,
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,
}
