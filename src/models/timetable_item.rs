use std::fmt;
use serde::{Deserialize, Serialize};
use super::{Paced, PacedTrain, TrainSchedule};

/// Identifier of a timetable item, distinguishing train schedules from paced trains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum TimetableItemId {
    TrainSchedule(i64),
    PacedTrain(i64),
}

impl fmt::Display for TimetableItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrainSchedule(id) => write!(f, "trainschedule_{id}"),
            Self::PacedTrain(id) => write!(f, "paced_{id}"),
        }
    }
}

/// A saved item of a timetable
#[derive(Debug, Clone, PartialEq)]
pub enum TimetableItem {
    TrainSchedule { id: i64, schedule: TrainSchedule },
    PacedTrain { id: i64, paced_train: PacedTrain },
}

impl TimetableItem {
    #[must_use]
    pub fn id(&self) -> TimetableItemId {
        match self {
            Self::TrainSchedule { id, .. } => TimetableItemId::TrainSchedule(*id),
            Self::PacedTrain { id, .. } => TimetableItemId::PacedTrain(*id),
        }
    }

    /// The schedule, or the base schedule of a paced train
    #[must_use]
    pub fn schedule(&self) -> &TrainSchedule {
        match self {
            Self::TrainSchedule { schedule, .. } => schedule,
            Self::PacedTrain { paced_train, .. } => &paced_train.train_schedule_base,
        }
    }

    #[must_use]
    pub fn paced(&self) -> Option<&Paced> {
        match self {
            Self::TrainSchedule { .. } => None,
            Self::PacedTrain { paced_train, .. } => Some(&paced_train.paced),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::models::train_schedule::tests::sample_schedule;

    #[test]
    fn test_display_ids() {
        assert_eq!(TimetableItemId::TrainSchedule(12).to_string(), "trainschedule_12");
        assert_eq!(TimetableItemId::PacedTrain(3).to_string(), "paced_3");
    }

    #[test]
    fn test_item_accessors() {
        let train = TimetableItem::TrainSchedule { id: 1, schedule: sample_schedule() };
        assert_eq!(train.id(), TimetableItemId::TrainSchedule(1));
        assert!(train.paced().is_none());

        let paced = Paced { time_window: Duration::hours(2), interval: Duration::minutes(20) };
        let item = TimetableItem::PacedTrain {
            id: 2,
            paced_train: PacedTrain {
                train_schedule_base: sample_schedule(),
                paced,
                exceptions: Vec::new(),
            },
        };
        assert_eq!(item.id(), TimetableItemId::PacedTrain(2));
        assert_eq!(item.paced(), Some(&paced));
        assert_eq!(item.schedule().train_name, "ABC3615");
    }

    #[test]
    fn test_id_json_shape() {
        let json = serde_json::to_string(&TimetableItemId::PacedTrain(4)).expect("should serialize");
        assert_eq!(json, r#"{"type":"paced_train","id":4}"#);
    }
}
