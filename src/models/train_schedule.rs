use std::collections::HashSet;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::time::option_iso_duration_serde;
use super::{Margins, PathItem, PowerRestrictionRange, ReceptionSignal};

/// Schedule constraint attached to a path waypoint
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// Id of the path item this constraint applies to
    pub at: String,
    /// Expected arrival, relative to the train start time
    #[serde(with = "option_iso_duration_serde", default)]
    pub arrival: Option<Duration>,
    /// `None` when the train does not stop, `PT0S` for a zero-length stop
    #[serde(with = "option_iso_duration_serde", default)]
    pub stop_for: Option<Duration>,
    #[serde(default)]
    pub reception_signal: ReceptionSignal,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comfort {
    #[default]
    Standard,
    AirConditioning,
    Heating,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Distribution {
    #[default]
    Standard,
    Mareco,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrainCategory {
    Main { main_category: String },
    Sub { sub_category_code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainScheduleOptions {
    #[serde(default = "default_true")]
    pub use_electrical_profiles: bool,
    #[serde(default = "default_true")]
    pub use_speed_limits_for_simulation: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TrainScheduleOptions {
    fn default() -> Self {
        Self {
            use_electrical_profiles: true,
            use_speed_limits_for_simulation: true,
        }
    }
}

/// A train schedule as saved in a timetable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSchedule {
    pub train_name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub rolling_stock_name: String,
    pub start_time: DateTime<Utc>,
    pub path: Vec<PathItem>,
    #[serde(default)]
    pub schedule: Vec<ScheduleItem>,
    #[serde(default)]
    pub margins: Margins,
    /// Initial speed in m/s
    #[serde(default)]
    pub initial_speed: f64,
    #[serde(default)]
    pub comfort: Comfort,
    #[serde(default)]
    pub constraint_distribution: Distribution,
    #[serde(default)]
    pub speed_limit_tag: Option<String>,
    #[serde(default)]
    pub power_restrictions: Vec<PowerRestrictionRange>,
    #[serde(default)]
    pub options: TrainScheduleOptions,
    #[serde(default)]
    pub category: Option<TrainCategory>,
}

/// Inconsistencies between the path of a schedule and what references it
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule has an empty path")]
    EmptyPath,
    #[error("duplicate path waypoint id '{0}'")]
    DuplicatePathId(String),
    #[error("invalid schedule, path waypoint '{0}' not found")]
    UnknownSchedulePoint(String),
    #[error("invalid margin boundary, path waypoint '{0}' not found")]
    UnknownMarginBoundary(String),
    #[error("invalid power restriction, path waypoint '{0}' not found")]
    UnknownPowerRestrictionPoint(String),
    #[error("multiple schedule points at waypoint '{0}'")]
    DuplicateSchedulePoint(String),
    #[error("first path waypoint can't have an arrival time")]
    ArrivalAtOrigin,
    #[error("margins need one more value than boundaries ({boundaries} boundaries, {values} values)")]
    MarginValueCount { boundaries: usize, values: usize },
}

impl TrainSchedule {
    /// Check that every reference to a path waypoint resolves
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let Some(first) = self.path.first() else {
            return Err(ScheduleError::EmptyPath);
        };

        let mut path_ids = HashSet::new();
        for item in &self.path {
            if !path_ids.insert(item.id.as_str()) {
                return Err(ScheduleError::DuplicatePathId(item.id.clone()));
            }
        }

        let mut scheduled = HashSet::new();
        for item in &self.schedule {
            if !path_ids.contains(item.at.as_str()) {
                return Err(ScheduleError::UnknownSchedulePoint(item.at.clone()));
            }
            if !scheduled.insert(item.at.as_str()) {
                return Err(ScheduleError::DuplicateSchedulePoint(item.at.clone()));
            }
            if item.at == first.id && item.arrival.is_some() {
                return Err(ScheduleError::ArrivalAtOrigin);
            }
        }

        if let Some(boundary) = self.margins.boundaries.iter().find(|b| !path_ids.contains(b.as_str())) {
            return Err(ScheduleError::UnknownMarginBoundary(boundary.clone()));
        }
        if self.margins.values.len() != self.margins.boundaries.len() + 1 {
            return Err(ScheduleError::MarginValueCount {
                boundaries: self.margins.boundaries.len(),
                values: self.margins.values.len(),
            });
        }

        for restriction in &self.power_restrictions {
            for endpoint in [&restriction.from, &restriction.to] {
                if !path_ids.contains(endpoint.as_str()) {
                    return Err(ScheduleError::UnknownPowerRestrictionPoint(endpoint.clone()));
                }
            }
        }

        Ok(())
    }

    /// Schedule constraint attached to a path waypoint, if any
    #[must_use]
    pub fn schedule_at(&self, step_id: &str) -> Option<&ScheduleItem> {
        self.schedule.iter().find(|item| item.at == step_id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{MarginValue, PathStepLocation};

    pub(crate) fn sample_schedule() -> TrainSchedule {
        serde_json::from_str(
            r#"{
                "train_name": "ABC3615",
                "labels": ["fast"],
                "rolling_stock_name": "R2D2",
                "start_time": "2024-05-22T08:00:00Z",
                "path": [
                    {"id": "a", "operational_point": "South_station"},
                    {"id": "b", "trigram": "MID", "secondary_code": "BV"},
                    {"id": "c", "track": "TC1", "offset": 4000}
                ],
                "schedule": [
                    {"at": "b", "arrival": "PT10M", "stop_for": "PT2M", "locked": true},
                    {"at": "c", "stop_for": "PT0S", "reception_signal": "STOP"}
                ],
                "margins": {"boundaries": ["b"], "values": ["5%", "3min/100km"]},
                "initial_speed": 12.5,
                "comfort": "AIR_CONDITIONING",
                "constraint_distribution": "MARECO",
                "speed_limit_tag": "MA100",
                "power_restrictions": [{"from": "a", "to": "b", "value": "C1US"}],
                "options": {"use_electrical_profiles": false},
                "category": {"main_category": "HIGH_SPEED_TRAIN"}
            }"#,
        )
        .expect("sample schedule should deserialize")
    }

    #[test]
    fn test_sample_schedule_deserializes() {
        let schedule = sample_schedule();
        assert_eq!(schedule.path.len(), 3);
        assert_eq!(schedule.path[2].location, PathStepLocation::track_offset("TC1", 4000));
        assert_eq!(schedule.comfort, Comfort::AirConditioning);
        assert_eq!(schedule.constraint_distribution, Distribution::Mareco);
        assert!(!schedule.options.use_electrical_profiles);
        assert!(schedule.options.use_speed_limits_for_simulation);
        assert_eq!(schedule.margins.values[1], MarginValue::MinPer100Km(3.0));
        assert_eq!(schedule.schedule[1].reception_signal, ReceptionSignal::Stop);
        assert_eq!(
            schedule.category,
            Some(TrainCategory::Main { main_category: "HIGH_SPEED_TRAIN".to_string() })
        );
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_schedule_at() {
        let schedule = sample_schedule();
        let item = schedule.schedule_at("b").expect("b is scheduled");
        assert_eq!(item.arrival, Some(Duration::minutes(10)));
        assert!(schedule.schedule_at("a").is_none());
    }

    #[test]
    fn test_validate_duplicate_path_id() {
        let mut schedule = sample_schedule();
        schedule.path[1].id = "a".to_string();
        schedule.schedule.clear();
        schedule.margins = Margins::default();
        schedule.power_restrictions.clear();
        assert_eq!(schedule.validate(), Err(ScheduleError::DuplicatePathId("a".to_string())));
    }

    #[test]
    fn test_validate_unknown_schedule_point() {
        let mut schedule = sample_schedule();
        schedule.schedule[0].at = "z".to_string();
        assert_eq!(schedule.validate(), Err(ScheduleError::UnknownSchedulePoint("z".to_string())));
    }

    #[test]
    fn test_validate_duplicate_schedule_point() {
        let mut schedule = sample_schedule();
        schedule.schedule[1].at = "b".to_string();
        assert_eq!(schedule.validate(), Err(ScheduleError::DuplicateSchedulePoint("b".to_string())));
    }

    #[test]
    fn test_validate_arrival_at_origin() {
        let mut schedule = sample_schedule();
        schedule.schedule.push(ScheduleItem {
            at: "a".to_string(),
            arrival: Some(Duration::minutes(1)),
            ..ScheduleItem::default()
        });
        assert_eq!(schedule.validate(), Err(ScheduleError::ArrivalAtOrigin));
    }

    #[test]
    fn test_validate_unknown_margin_boundary() {
        let mut schedule = sample_schedule();
        schedule.margins.boundaries = vec!["y".to_string()];
        assert_eq!(schedule.validate(), Err(ScheduleError::UnknownMarginBoundary("y".to_string())));
    }

    #[test]
    fn test_validate_margin_value_count() {
        let mut schedule = sample_schedule();
        schedule.margins.values.push(MarginValue::None);
        assert_eq!(
            schedule.validate(),
            Err(ScheduleError::MarginValueCount { boundaries: 1, values: 3 })
        );
    }

    #[test]
    fn test_validate_unknown_power_restriction_point() {
        let mut schedule = sample_schedule();
        schedule.power_restrictions[0].to = "x".to_string();
        assert_eq!(
            schedule.validate(),
            Err(ScheduleError::UnknownPowerRestrictionPoint("x".to_string()))
        );
    }

    #[test]
    fn test_validate_empty_path() {
        let mut schedule = sample_schedule();
        schedule.path.clear();
        assert_eq!(schedule.validate(), Err(ScheduleError::EmptyPath));
    }
}
