//! Training transfer shapes.

use crate::models::{ActivityType, Training};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Training as sent and received over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainingDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(optional, type = "number"))]
    pub id: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    /// RFC 3339
    pub start_time: DateTime<Utc>,
    /// RFC 3339
    pub end_time: DateTime<Utc>,
    pub activity_type: ActivityType,
    /// Kilometers
    #[validate(range(min = 0.0, message = "distance must not be negative"))]
    pub distance: f64,
    /// Kilometers per hour
    #[validate(range(min = 0.0, message = "averageSpeed must not be negative"))]
    pub average_speed: f64,
}

impl From<Training> for TrainingDto {
    fn from(training: Training) -> Self {
        Self {
            id: training.id,
            user_id: training.user_id,
            start_time: training.start_time,
            end_time: training.end_time,
            activity_type: training.activity_type,
            distance: training.distance,
            average_speed: training.average_speed,
        }
    }
}

impl From<TrainingDto> for Training {
    fn from(dto: TrainingDto) -> Self {
        Self {
            id: dto.id,
            user_id: dto.user_id,
            start_time: dto.start_time,
            end_time: dto.end_time,
            activity_type: dto.activity_type,
            distance: dto.distance,
            average_speed: dto.average_speed,
        }
    }
}

/// Body of `PUT /v1/trainings/{id}/distance`.
///
/// Clients may send a whole `TrainingDto`; only `distance` is read.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DistanceUpdate {
    #[validate(range(min = 0.0, message = "distance must not be negative"))]
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn morning_run() -> Training {
        Training {
            id: Some(3),
            user_id: 1,
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap(),
            activity_type: ActivityType::Running,
            distance: 5.0,
            average_speed: 10.0,
        }
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let training = morning_run();
        let back: Training = TrainingDto::from(training.clone()).into();
        assert_eq!(back, training);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(TrainingDto::from(morning_run())).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["activityType"], "RUNNING");
        assert_eq!(json["startTime"], "2024-05-01T06:00:00Z");
        assert_eq!(json["averageSpeed"], 10.0);
    }

    #[test]
    fn test_distance_update_ignores_other_fields() {
        let update: DistanceUpdate = serde_json::from_value(serde_json::json!({
            "id": 3,
            "userId": 1,
            "activityType": "RUNNING",
            "distance": 7.5
        }))
        .unwrap();
        assert_eq!(update.distance, 7.5);
    }

    #[test]
    fn test_negative_distance_fails_validation() {
        let update = DistanceUpdate { distance: -1.0 };
        assert!(update.validate().is_err());
    }
}
