use chrono::{DateTime, Duration, Utc};
use crate::error::ConfError;
use crate::models::{
    Comfort, ConfSettings, Distribution, EditingMode, OsrdConf, PathStep, PowerRestrictionRange, TimetableItem,
    TrainCategory, TrainSchedule,
};
use crate::path_steps::{clean_unused_entries, compact};
use crate::power_restrictions::{apply_edit, sort_by_position, RestrictionEdit};
use crate::time::ms_to_kmh;

/// A user action on the configuration record
#[derive(Debug, Clone, PartialEq)]
pub enum ConfAction {
    UpdateName(String),
    UpdateRollingStockId(Option<i64>),
    UpdateCategory(Option<TrainCategory>),
    UpdateStartTime(DateTime<Utc>),
    /// Initial speed in km/h
    UpdateInitialSpeed(f64),
    UpdateComfort(Comfort),
    UpdateLabels(Vec<String>),
    UpdateConstraintDistribution(Distribution),
    UpdateSpeedLimitByTag(Option<String>),
    UpdateTimeWindow(Duration),
    UpdateInterval(Duration),
    ToggleElectricalProfiles,
    ToggleSpeedLimitsForSimulation,
    ToggleEditingMode,
    UpdateOrigin(Option<PathStep>),
    UpdateDestination(Option<PathStep>),
    AddVia(PathStep),
    /// Remove the via at this index among the vias
    DeleteVia(usize),
    /// Replace the whole itinerary; ranges losing an endpoint go with it
    UpdatePathSteps(Vec<Option<PathStep>>),
    /// Positions computed by pathfinding, one per path step entry
    UpdatePathStepPositions(Vec<u64>),
    EditPowerRestrictions(RestrictionEdit),
    SelectTrainToEdit {
        item: TimetableItem,
        rolling_stock_id: Option<i64>,
    },
    ResetConf,
}

/// Apply an action to the record
///
/// Fallible work happens before anything is written, so on error the record is
/// unchanged.
///
/// # Errors
///
/// Returns an error if the action breaks a path step or power restriction invariant.
pub fn reduce(conf: &mut OsrdConf, action: ConfAction, settings: &ConfSettings) -> Result<(), ConfError> {
    match action {
        ConfAction::UpdateName(name) => conf.name = name,
        ConfAction::UpdateRollingStockId(id) => conf.rolling_stock_id = id,
        ConfAction::UpdateCategory(category) => conf.category = category,
        ConfAction::UpdateStartTime(start_time) => conf.start_time = start_time,
        ConfAction::UpdateInitialSpeed(speed) => conf.initial_speed = speed,
        ConfAction::UpdateComfort(comfort) => conf.rolling_stock_comfort = comfort,
        ConfAction::UpdateLabels(labels) => conf.labels = labels,
        ConfAction::UpdateConstraintDistribution(distribution) => conf.constraint_distribution = distribution,
        ConfAction::UpdateSpeedLimitByTag(tag) => conf.speed_limit_by_tag = tag,
        ConfAction::UpdateTimeWindow(time_window) => conf.time_window = time_window,
        ConfAction::UpdateInterval(interval) => conf.interval = interval,
        ConfAction::ToggleElectricalProfiles => conf.use_electrical_profiles = !conf.use_electrical_profiles,
        ConfAction::ToggleSpeedLimitsForSimulation => {
            conf.use_speed_limits_for_simulation = !conf.use_speed_limits_for_simulation;
        }
        ConfAction::ToggleEditingMode => conf.editing_mode = conf.editing_mode.toggled(),
        ConfAction::UpdateOrigin(origin) => replace_end(conf, origin, true),
        ConfAction::UpdateDestination(destination) => replace_end(conf, destination, false),
        ConfAction::AddVia(via) => add_via(conf, via),
        ConfAction::DeleteVia(index) => delete_via(conf, index)?,
        ConfAction::UpdatePathSteps(mut path_steps) => {
            unflag_ends(&mut path_steps);
            let restrictions = retain_resolved(&path_steps, &conf.power_restrictions);
            let path_steps = clean_unused_entries(path_steps, &restrictions);
            conf.set_path(path_steps, restrictions);
        }
        ConfAction::UpdatePathStepPositions(positions) => update_positions(conf, &positions)?,
        ConfAction::EditPowerRestrictions(edit) => {
            if let Some((path_steps, restrictions)) = apply_edit(&conf.path_steps, &conf.power_restrictions, &edit)? {
                conf.set_path(path_steps, restrictions);
            }
        }
        ConfAction::SelectTrainToEdit { item, rolling_stock_id } => {
            select_train_to_edit(conf, &item, rolling_stock_id, settings);
        }
        ConfAction::ResetConf => *conf = OsrdConf::new(settings, conf.start_time),
    }
    Ok(())
}

/// Ranges whose endpoints both still exist among the path steps
fn retain_resolved(path_steps: &[Option<PathStep>], restrictions: &[PowerRestrictionRange]) -> Vec<PowerRestrictionRange> {
    let exists = |id: &str| path_steps.iter().flatten().any(|step| step.id == id);
    restrictions
        .iter()
        .filter(|range| exists(&range.from) && exists(&range.to))
        .cloned()
        .collect()
}

/// Origin and destination are never power restriction steps
fn unflag_ends(path_steps: &mut [Option<PathStep>]) {
    let last = path_steps.len().saturating_sub(1);
    for index in [0, last] {
        if let Some(Some(step)) = path_steps.get_mut(index) {
            step.is_from_power_restriction = false;
        }
    }
}

fn replace_end(conf: &mut OsrdConf, step: Option<PathStep>, origin: bool) {
    let mut path_steps = conf.path_steps.as_ref().clone();
    if origin {
        match path_steps.first_mut() {
            Some(slot) => *slot = step,
            None => path_steps.push(step),
        }
    } else if path_steps.len() < 2 {
        path_steps.resize(1, None);
        path_steps.push(step);
    } else if let Some(slot) = path_steps.last_mut() {
        *slot = step;
    }

    unflag_ends(&mut path_steps);
    let restrictions = retain_resolved(&path_steps, &conf.power_restrictions);
    let path_steps = clean_unused_entries(path_steps, &restrictions);
    conf.set_path(path_steps, restrictions);
}

/// Insert a via before the first interior step located after it, or before the destination
fn add_via(conf: &mut OsrdConf, via: PathStep) {
    if conf.path_steps.iter().flatten().any(|step| step.id == via.id) {
        return;
    }

    let mut path_steps = conf.path_steps.as_ref().clone();
    let destination_index = path_steps.len().saturating_sub(1).max(1);
    let index = via
        .position_on_path
        .and_then(|position| {
            path_steps.iter().skip(1).position(|step| {
                step.as_ref()
                    .and_then(|step| step.position_on_path)
                    .is_some_and(|step_position| step_position > position)
            })
        })
        .map_or(destination_index, |offset| offset + 1)
        .min(destination_index);

    crate::log!("Adding via {} at index {}", via.id, index);
    if path_steps.len() < 2 {
        path_steps.resize(2, None);
    }
    path_steps.insert(index, Some(via));
    let restrictions = conf.power_restrictions.as_ref().clone();
    conf.set_path(path_steps, restrictions);
}

fn delete_via(conf: &mut OsrdConf, via_index: usize) -> Result<(), ConfError> {
    let index = via_index + 1;
    if index + 1 >= conf.path_steps.len() {
        return Err(ConfError::ViaIndexOutOfRange(via_index));
    }

    let mut path_steps = conf.path_steps.as_ref().clone();
    let removed = path_steps.remove(index);
    let restrictions: Vec<PowerRestrictionRange> = match &removed {
        Some(via) => conf
            .power_restrictions
            .iter()
            .filter(|range| !range.references(&via.id))
            .cloned()
            .collect(),
        None => conf.power_restrictions.as_ref().clone(),
    };

    let path_steps = clean_unused_entries(path_steps, &restrictions);
    conf.set_path(path_steps, restrictions);
    Ok(())
}

fn update_positions(conf: &mut OsrdConf, positions: &[u64]) -> Result<(), ConfError> {
    if positions.len() != conf.path_steps.len() {
        return Err(ConfError::PositionCountMismatch {
            expected: conf.path_steps.len(),
            found: positions.len(),
        });
    }

    let path_steps: Vec<Option<PathStep>> = conf
        .path_steps
        .iter()
        .zip(positions)
        .map(|(step, position)| step.clone().map(|step| step.with_position(*position)))
        .collect();
    let restrictions = sort_by_position(&compact(&path_steps), conf.power_restrictions.as_ref().clone())?;

    conf.set_path(path_steps, restrictions);
    Ok(())
}

/// Path steps of a saved schedule, with its schedule and margin constraints attached
///
/// Positions on path are left undefined until pathfinding runs again.
#[must_use]
pub fn path_steps_from_schedule(schedule: &TrainSchedule) -> Vec<Option<PathStep>> {
    let path_len = schedule.path.len();
    let mut path_steps: Vec<Option<PathStep>> = schedule
        .path
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut step = PathStep::new(&item.id, item.location.clone());
            step.name = item.location.trigram_name();
            step.deleted = item.deleted;
            step.theoretical_margin = schedule.margins.margin_starting_at(&item.id, index, path_len);
            if let Some(constraint) = schedule.schedule_at(&item.id) {
                step.arrival = constraint.arrival;
                step.stop_for = constraint.stop_for;
                step.reception_signal = constraint.reception_signal;
                step.locked = constraint.locked;
            }
            Some(step)
        })
        .collect();

    if path_steps.len() < 2 {
        path_steps.resize(2, None);
    }
    path_steps
}

/// Load a saved timetable item into the record for edition
pub fn select_train_to_edit(
    conf: &mut OsrdConf,
    item: &TimetableItem,
    rolling_stock_id: Option<i64>,
    settings: &ConfSettings,
) {
    let schedule = item.schedule();
    crate::log!("Editing timetable item {}", item.id());

    conf.rolling_stock_id = rolling_stock_id;
    conf.set_path(path_steps_from_schedule(schedule), schedule.power_restrictions.clone());
    conf.start_time = schedule.start_time;
    conf.name.clone_from(&schedule.train_name);
    conf.category.clone_from(&schedule.category);
    conf.initial_speed = ms_to_kmh(schedule.initial_speed);
    conf.use_electrical_profiles = schedule.options.use_electrical_profiles;
    conf.use_speed_limits_for_simulation = schedule.options.use_speed_limits_for_simulation;
    conf.labels.clone_from(&schedule.labels);
    conf.constraint_distribution = schedule.constraint_distribution;
    conf.rolling_stock_comfort = schedule.comfort;
    conf.speed_limit_by_tag.clone_from(&schedule.speed_limit_tag);
    conf.timetable_item_id_to_edit = Some(item.id());

    match item.paced() {
        Some(paced) => {
            conf.time_window = paced.time_window;
            conf.interval = paced.interval;
            conf.editing_mode = EditingMode::PacedTrain;
        }
        None => {
            conf.time_window = settings.default_time_window;
            conf.interval = settings.default_interval;
            conf.editing_mode = EditingMode::Train;
        }
    }
}
