use indexmap::IndexMap;
use crate::error::ConfError;
use crate::models::{PathStep, PowerRestrictionRange};

/// Whether a path step can be dropped from the itinerary without losing information
///
/// A step is kept as soon as a power restriction starts or ends on it, or when
/// the user attached a lock, arrival time, stop or margin to it.
#[must_use]
pub fn can_remove(step: &PathStep, restrictions: &[PowerRestrictionRange]) -> bool {
    if restrictions.iter().any(|range| range.references(&step.id)) {
        return false;
    }
    !step.has_constraints()
}

/// Insert a path step before the first step located strictly after it
///
/// Inserting a step whose id is already present returns the sequence unchanged.
/// When no step qualifies, or positions are unknown, the step is appended.
#[must_use]
pub fn insert_ordered(steps: &[PathStep], new_step: &PathStep) -> Vec<PathStep> {
    let mut result = steps.to_vec();
    if steps.iter().any(|step| step.id == new_step.id) {
        return result;
    }

    let index = insertion_index(steps, new_step).unwrap_or(steps.len());
    result.insert(index, new_step.clone());
    result
}

/// Index of the first step strictly after `new_step`, if positions allow to tell
#[must_use]
pub fn insertion_index(steps: &[PathStep], new_step: &PathStep) -> Option<usize> {
    let new_position = new_step.position_on_path?;
    steps
        .iter()
        .position(|step| step.position_on_path.is_some_and(|position| position > new_position))
}

fn is_orphan(step: &PathStep, restrictions: &[PowerRestrictionRange]) -> bool {
    step.is_from_power_restriction && can_remove(step, restrictions)
}

/// Drop intermediate steps created by power restriction edits that nothing references anymore
///
/// Origin and destination are always kept.
#[must_use]
pub fn clean_unused(steps: &[PathStep], restrictions: &[PowerRestrictionRange]) -> Vec<PathStep> {
    let last = steps.len().saturating_sub(1);
    steps
        .iter()
        .enumerate()
        .filter(|(index, step)| *index == 0 || *index == last || !is_orphan(step, restrictions))
        .map(|(_, step)| step.clone())
        .collect()
}

/// Same as [`clean_unused`] over a record's entries, where origin and destination may be unset
///
/// The first and last entries are kept whether set or not, so a step next to
/// an unset end is treated like any other intermediate step.
#[must_use]
pub fn clean_unused_entries(
    steps: Vec<Option<PathStep>>,
    restrictions: &[PowerRestrictionRange],
) -> Vec<Option<PathStep>> {
    let last = steps.len().saturating_sub(1);
    steps
        .into_iter()
        .enumerate()
        .filter(|(index, step)| {
            *index == 0 || *index == last || !step.as_ref().is_some_and(|step| is_orphan(step, restrictions))
        })
        .map(|(_, step)| step)
        .collect()
}

#[must_use]
pub fn find_path_step<'a>(steps: &'a [PathStep], id: &str) -> Option<&'a PathStep> {
    steps.iter().find(|step| step.id == id)
}

/// Position on path of a step, which must exist and be located
///
/// # Errors
///
/// Returns an error if the step is missing or has no position on path.
pub fn position_of(steps: &[PathStep], id: &str) -> Result<u64, ConfError> {
    find_path_step(steps, id)
        .ok_or_else(|| ConfError::PathStepNotFound(id.to_string()))?
        .position_on_path
        .ok_or_else(|| ConfError::UndefinedPosition(id.to_string()))
}

/// Positions of all steps keyed by id, in path order
#[must_use]
pub fn position_index(steps: &[PathStep]) -> IndexMap<&str, Option<u64>> {
    steps
        .iter()
        .map(|step| (step.id.as_str(), step.position_on_path))
        .collect()
}

/// Set steps only, dropping an unset origin or destination
#[must_use]
pub fn compact(steps: &[Option<PathStep>]) -> Vec<PathStep> {
    steps.iter().flatten().cloned().collect()
}

/// All steps, which must all be set
///
/// # Errors
///
/// Returns an error if any entry is unset.
pub fn complete(steps: &[Option<PathStep>]) -> Result<Vec<PathStep>, ConfError> {
    steps
        .iter()
        .map(|step| step.clone().ok_or(ConfError::IncompletePathSteps))
        .collect()
}
