use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use super::{
    Comfort, ConfSettings, Distribution, PathStep, PowerRestrictionRange, TimetableItemId, TrainCategory,
};

/// Whether the record describes a single train or a paced train
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditingMode {
    #[default]
    Train,
    PacedTrain,
}

impl EditingMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Train => Self::PacedTrain,
            Self::PacedTrain => Self::Train,
        }
    }
}

/// The train configuration being edited in a session
///
/// Path steps and power restrictions live behind `Arc`s: every edit replaces
/// both at once, and an untouched sequence keeps its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct OsrdConf {
    pub name: String,
    pub rolling_stock_id: Option<i64>,
    pub category: Option<TrainCategory>,
    pub start_time: DateTime<Utc>,
    /// Initial speed in km/h
    pub initial_speed: f64,
    pub rolling_stock_comfort: Comfort,
    pub labels: Vec<String>,
    pub constraint_distribution: Distribution,
    pub speed_limit_by_tag: Option<String>,
    pub use_electrical_profiles: bool,
    pub use_speed_limits_for_simulation: bool,
    pub editing_mode: EditingMode,
    pub time_window: Duration,
    pub interval: Duration,
    pub timetable_item_id_to_edit: Option<TimetableItemId>,
    /// Origin first, destination last, either may be unset
    pub path_steps: Arc<Vec<Option<PathStep>>>,
    pub power_restrictions: Arc<Vec<PowerRestrictionRange>>,
}

impl OsrdConf {
    /// An empty record with unset origin and destination
    #[must_use]
    pub fn new(settings: &ConfSettings, start_time: DateTime<Utc>) -> Self {
        Self {
            name: String::new(),
            rolling_stock_id: None,
            category: None,
            start_time,
            initial_speed: 0.0,
            rolling_stock_comfort: settings.default_comfort,
            labels: Vec::new(),
            constraint_distribution: settings.default_constraint_distribution,
            speed_limit_by_tag: None,
            use_electrical_profiles: settings.use_electrical_profiles,
            use_speed_limits_for_simulation: settings.use_speed_limits_for_simulation,
            editing_mode: EditingMode::Train,
            time_window: settings.default_time_window,
            interval: settings.default_interval,
            timetable_item_id_to_edit: None,
            path_steps: Arc::new(vec![None, None]),
            power_restrictions: Arc::new(Vec::new()),
        }
    }

    /// Replace path steps and power restrictions together
    pub fn set_path(&mut self, path_steps: Vec<Option<PathStep>>, power_restrictions: Vec<PowerRestrictionRange>) {
        self.path_steps = Arc::new(path_steps);
        self.power_restrictions = Arc::new(power_restrictions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 22, 8, 0, 0).single().expect("valid date")
    }

    #[test]
    fn test_new_conf_has_unset_ends() {
        let conf = OsrdConf::new(&ConfSettings::default(), start());
        assert_eq!(conf.path_steps.as_slice(), &[None, None]);
        assert!(conf.power_restrictions.is_empty());
        assert_eq!(conf.editing_mode, EditingMode::Train);
        assert_eq!(conf.time_window, Duration::hours(2));
        assert_eq!(conf.interval, Duration::hours(1));
    }

    #[test]
    fn test_new_conf_uses_settings() {
        let settings = ConfSettings {
            default_comfort: Comfort::Heating,
            use_electrical_profiles: false,
            ..ConfSettings::default()
        };
        let conf = OsrdConf::new(&settings, start());
        assert_eq!(conf.rolling_stock_comfort, Comfort::Heating);
        assert!(!conf.use_electrical_profiles);
    }

    #[test]
    fn test_editing_mode_toggle() {
        assert_eq!(EditingMode::Train.toggled(), EditingMode::PacedTrain);
        assert_eq!(EditingMode::PacedTrain.toggled(), EditingMode::Train);
    }

    #[test]
    fn test_set_path_replaces_both() {
        let mut conf = OsrdConf::new(&ConfSettings::default(), start());
        let before = Arc::clone(&conf.path_steps);
        conf.set_path(vec![None, None], vec![PowerRestrictionRange::new("a", "b", "C1US")]);
        assert!(!Arc::ptr_eq(&before, &conf.path_steps));
        assert_eq!(conf.power_restrictions.len(), 1);
    }
}
