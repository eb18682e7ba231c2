use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use crate::constants::MAX_PACED_OCCURRENCES;
use crate::time::iso_duration_serde;
use super::{
    Comfort, Distribution, Margins, PathItem, PowerRestrictionRange, ScheduleItem, TrainCategory, TrainSchedule,
    TrainScheduleOptions,
};

/// Pacing of a paced train: one occurrence every `interval` during `time_window`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paced {
    #[serde(with = "iso_duration_serde")]
    pub time_window: Duration,
    #[serde(with = "iso_duration_serde")]
    pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExceptionType {
    /// Replaces the base occurrence at `occurrence_index`
    Modified { occurrence_index: u32 },
    /// Adds an occurrence outside the base pacing
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeGroup<T> {
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingStockChangeGroup {
    pub rolling_stock_name: String,
    pub comfort: Comfort,
}

/// Replacement itinerary of an occurrence, with everything tied to its path ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathAndScheduleChangeGroup {
    pub path: Vec<PathItem>,
    #[serde(default)]
    pub schedule: Vec<ScheduleItem>,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub power_restrictions: Vec<PowerRestrictionRange>,
}

/// A deviation from the base pacing of a paced train
///
/// Each change group present overrides the matching fields of the base schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacedTrainException {
    pub key: String,
    #[serde(flatten)]
    pub exception_type: ExceptionType,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub train_name: Option<ChangeGroup<String>>,
    #[serde(default)]
    pub rolling_stock: Option<RollingStockChangeGroup>,
    #[serde(default)]
    pub rolling_stock_category: Option<ChangeGroup<Option<TrainCategory>>>,
    #[serde(default)]
    pub labels: Option<ChangeGroup<Vec<String>>>,
    #[serde(default)]
    pub speed_limit_tag: Option<ChangeGroup<Option<String>>>,
    #[serde(default)]
    pub start_time: Option<ChangeGroup<DateTime<Utc>>>,
    #[serde(default)]
    pub constraint_distribution: Option<ChangeGroup<Distribution>>,
    /// Initial speed in m/s
    #[serde(default)]
    pub initial_speed: Option<ChangeGroup<f64>>,
    #[serde(default)]
    pub options: Option<ChangeGroup<TrainScheduleOptions>>,
    #[serde(default)]
    pub path_and_schedule: Option<PathAndScheduleChangeGroup>,
}

impl PacedTrainException {
    /// An enabled exception without any change group
    #[must_use]
    pub fn new(key: &str, exception_type: ExceptionType) -> Self {
        Self {
            key: key.to_string(),
            exception_type,
            disabled: false,
            train_name: None,
            rolling_stock: None,
            rolling_stock_category: None,
            labels: None,
            speed_limit_tag: None,
            start_time: None,
            constraint_distribution: None,
            initial_speed: None,
            options: None,
            path_and_schedule: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OccurrenceId {
    BaseOccurrence { index: u32 },
    ModifiedException { index: u32, exception_key: String },
    CreatedException { exception_key: String },
}

/// A train schedule repeated at a fixed interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacedTrain {
    #[serde(flatten)]
    pub train_schedule_base: TrainSchedule,
    pub paced: Paced,
    #[serde(default)]
    pub exceptions: Vec<PacedTrainException>,
}

impl PacedTrain {
    /// Number of base occurrences within the pacing window, capped at `MAX_PACED_OCCURRENCES`
    #[must_use]
    pub fn num_base_occurrences(&self) -> u32 {
        let interval = self.paced.interval.num_seconds();
        if interval <= 0 {
            return 0;
        }
        let count = self.paced.time_window.num_seconds().max(0) / interval;
        if count > i64::from(MAX_PACED_OCCURRENCES) {
            log::warn!("Paced train has {count} occurrences, only the first {MAX_PACED_OCCURRENCES} are expanded");
            return MAX_PACED_OCCURRENCES;
        }
        u32::try_from(count).unwrap_or(MAX_PACED_OCCURRENCES)
    }

    /// Start time of a base occurrence, `None` when it falls outside the representable range
    #[must_use]
    pub fn occurrence_start_time(&self, occurrence_index: u32) -> Option<DateTime<Utc>> {
        let offset = self.paced.interval.checked_mul(i32::try_from(occurrence_index).ok()?)?;
        self.train_schedule_base.start_time.checked_add_signed(offset)
    }

    /// The base schedule with an exception's change groups applied
    #[must_use]
    pub fn apply_exception(&self, exception: &PacedTrainException) -> TrainSchedule {
        let mut schedule = self.train_schedule_base.clone();

        if let Some(change) = &exception.train_name {
            schedule.train_name.clone_from(&change.value);
        }
        if let Some(change) = &exception.rolling_stock {
            schedule.rolling_stock_name.clone_from(&change.rolling_stock_name);
            schedule.comfort = change.comfort;
        }
        if let Some(change) = &exception.rolling_stock_category {
            schedule.category.clone_from(&change.value);
        }
        if let Some(change) = &exception.labels {
            schedule.labels.clone_from(&change.value);
        }
        if let Some(change) = &exception.speed_limit_tag {
            schedule.speed_limit_tag.clone_from(&change.value);
        }
        match (&exception.start_time, &exception.exception_type) {
            (Some(change), _) => schedule.start_time = change.value,
            (None, ExceptionType::Modified { occurrence_index }) => {
                if let Some(start_time) = self.occurrence_start_time(*occurrence_index) {
                    schedule.start_time = start_time;
                }
            }
            (None, ExceptionType::Created) => {}
        }
        if let Some(change) = &exception.constraint_distribution {
            schedule.constraint_distribution = change.value;
        }
        if let Some(change) = &exception.initial_speed {
            schedule.initial_speed = change.value;
        }
        if let Some(change) = &exception.options {
            schedule.options = change.value;
        }
        if let Some(change) = &exception.path_and_schedule {
            schedule.path.clone_from(&change.path);
            schedule.schedule.clone_from(&change.schedule);
            schedule.margins.clone_from(&change.margins);
            schedule.power_restrictions.clone_from(&change.power_restrictions);
        }

        schedule
    }

    /// All occurrences of the paced train, sorted by start time
    ///
    /// Modified exceptions replace their base occurrence (or remove it when
    /// disabled), created exceptions are added on top. Base occurrences stop
    /// at the first start time that cannot be represented.
    #[must_use]
    pub fn occurrences(&self) -> Vec<(OccurrenceId, TrainSchedule)> {
        let mut base: Vec<Option<(OccurrenceId, TrainSchedule)>> = (0..self.num_base_occurrences())
            .map_while(|index| {
                let start_time = self.occurrence_start_time(index)?;
                let schedule = TrainSchedule {
                    start_time,
                    ..self.train_schedule_base.clone()
                };
                Some(Some((OccurrenceId::BaseOccurrence { index }, schedule)))
            })
            .collect();

        for exception in &self.exceptions {
            let ExceptionType::Modified { occurrence_index } = exception.exception_type else {
                continue;
            };
            let Some(slot) = usize::try_from(occurrence_index).ok().and_then(|i| base.get_mut(i)) else {
                continue;
            };
            *slot = if exception.disabled {
                None
            } else {
                Some((
                    OccurrenceId::ModifiedException {
                        index: occurrence_index,
                        exception_key: exception.key.clone(),
                    },
                    self.apply_exception(exception),
                ))
            };
        }

        // Disabling only applies to modified occurrences
        let created = self
            .exceptions
            .iter()
            .filter(|exception| exception.exception_type == ExceptionType::Created)
            .map(|exception| {
                (
                    OccurrenceId::CreatedException {
                        exception_key: exception.key.clone(),
                    },
                    self.apply_exception(exception),
                )
            });

        base.into_iter()
            .flatten()
            .chain(created)
            .sorted_by_key(|(_, schedule)| schedule.start_time)
            .collect()
    }
}
