use indexmap::IndexMap;
use itertools::Itertools;
use crate::constants::NO_POWER_RESTRICTION;
use crate::error::ConfError;
use crate::models::{PathStep, PowerRestrictionRange};
use crate::path_steps::{
    clean_unused, clean_unused_entries, compact, complete, insert_ordered, insertion_index, position_index, position_of,
};

/// Path steps and power restrictions produced together by one edit
#[derive(Debug, Clone, PartialEq)]
pub struct RestrictionState {
    pub path_steps: Vec<PathStep>,
    pub restrictions: Vec<PowerRestrictionRange>,
}

/// Whether a range lies strictly inside `(pos_min, pos_max)`
///
/// # Errors
///
/// Returns an error if either endpoint of the range does not resolve to a located step.
pub fn is_range_covered(
    steps: &[PathStep],
    range: &PowerRestrictionRange,
    pos_min: u64,
    pos_max: u64,
) -> Result<bool, ConfError> {
    let from = position_of(steps, &range.from)?;
    let to = position_of(steps, &range.to)?;
    Ok(pos_min < from && to < pos_max)
}

/// Remove ranges and move a boundary to a new path step
///
/// Ranges matching an entry of `to_remove` by their endpoints are dropped. With
/// a `new_step_id`, ranges ending at `first_boundary.to` now end at the new step
/// and ranges starting at `second_boundary.from` now start at it.
#[must_use]
pub fn update_restrictions(
    restrictions: &[PowerRestrictionRange],
    to_remove: &[PowerRestrictionRange],
    first_boundary: Option<&PowerRestrictionRange>,
    second_boundary: Option<&PowerRestrictionRange>,
    new_step_id: Option<&str>,
) -> Vec<PowerRestrictionRange> {
    restrictions
        .iter()
        .filter(|range| !to_remove.iter().any(|removed| removed.same_bounds(range)))
        .map(|range| {
            let mut range = range.clone();
            if let Some(new_id) = new_step_id {
                if first_boundary.is_some_and(|first| range.to == first.to) {
                    range.to = new_id.to_string();
                }
                if second_boundary.is_some_and(|second| range.from == second.from) {
                    range.from = new_id.to_string();
                }
            }
            range
        })
        .collect()
}

fn lookup_position(index: &IndexMap<&str, Option<u64>>, id: &str) -> Result<u64, ConfError> {
    index
        .get(id)
        .ok_or_else(|| ConfError::PathStepNotFound(id.to_string()))?
        .ok_or_else(|| ConfError::UndefinedPosition(id.to_string()))
}

/// Sort ranges by the position of their start, keeping ties in order
///
/// # Errors
///
/// Returns an error if a range start does not resolve to a located step.
pub fn sort_by_position(
    steps: &[PathStep],
    restrictions: Vec<PowerRestrictionRange>,
) -> Result<Vec<PowerRestrictionRange>, ConfError> {
    let index = position_index(steps);
    let keyed: Vec<(u64, PowerRestrictionRange)> = restrictions
        .into_iter()
        .map(|range| -> Result<_, ConfError> { Ok((lookup_position(&index, &range.from)?, range)) })
        .collect::<Result<_, _>>()?;

    Ok(keyed
        .into_iter()
        .sorted_by_key(|(position, _)| *position)
        .map(|(_, range)| range)
        .collect())
}

fn finish(steps: Vec<PathStep>, restrictions: Vec<PowerRestrictionRange>) -> Result<RestrictionState, ConfError> {
    let restrictions = sort_by_position(&steps, restrictions)?;
    let path_steps = clean_unused(&steps, &restrictions);
    Ok(RestrictionState { path_steps, restrictions })
}

/// Add or replace the power restriction between two path steps
///
/// Ranges starting at `from` or ending at `to` are replaced. The
/// `NO_POWER_RESTRICTION` code only clears them.
///
/// # Errors
///
/// Returns an error if a resulting range does not resolve to located steps.
pub fn upsert(
    steps: &[PathStep],
    restrictions: &[PowerRestrictionRange],
    from: &PathStep,
    to: &PathStep,
    code: &str,
) -> Result<RestrictionState, ConfError> {
    let mut kept: Vec<PowerRestrictionRange> = restrictions
        .iter()
        .filter(|range| range.from != from.id && range.to != to.id)
        .cloned()
        .collect();

    let steps = insert_ordered(steps, from);
    let steps = insert_ordered(&steps, to);

    if code != NO_POWER_RESTRICTION {
        kept.push(PowerRestrictionRange::new(&from.id, &to.id, code));
    }

    crate::log!("Upserted power restriction {} -> {} ({})", from.id, to.id, code);
    finish(steps, kept)
}

/// Split the range containing `cut_at` in two
///
/// Returns `Ok(None)` when nothing changes: the step is already on the path,
/// or its insertion point or neighbours cannot be determined.
///
/// # Errors
///
/// Returns an error if an existing range does not resolve to located steps.
pub fn cut(
    steps: &[PathStep],
    restrictions: &[PowerRestrictionRange],
    cut_at: &PathStep,
) -> Result<Option<RestrictionState>, ConfError> {
    if steps.iter().any(|step| step.id == cut_at.id) {
        return Ok(None);
    }

    let (Some(index), Some(cut_position)) = (insertion_index(steps, cut_at), cut_at.position_on_path) else {
        log::error!("cut: no insertion point for path step {}", cut_at.id);
        return Ok(None);
    };

    let mut new_steps = steps.to_vec();
    new_steps.insert(index, cut_at.clone());

    let has_neighbours = index > 0 && new_steps.get(index + 1).is_some();
    if !has_neighbours {
        log::error!("cut: previous or next step of {} is undefined", cut_at.id);
        return Ok(None);
    }

    let mut new_restrictions = Vec::with_capacity(restrictions.len() + 1);
    for range in restrictions {
        let from = position_of(&new_steps, &range.from)?;
        let to = position_of(&new_steps, &range.to)?;
        if from < cut_position && cut_position < to {
            new_restrictions.push(PowerRestrictionRange::new(&range.from, &cut_at.id, &range.value));
            new_restrictions.push(PowerRestrictionRange::new(&cut_at.id, &range.to, &range.value));
        } else {
            new_restrictions.push(range.clone());
        }
    }

    Ok(Some(RestrictionState {
        path_steps: new_steps,
        restrictions: new_restrictions,
    }))
}

/// Merge two adjacent ranges into one carrying the value of the left one
///
/// # Errors
///
/// Returns an error if a path step is unset, the ranges do not share a
/// boundary, or either range is unknown.
pub fn merge(
    steps: &[Option<PathStep>],
    restrictions: &[PowerRestrictionRange],
    left: &PowerRestrictionRange,
    right: &PowerRestrictionRange,
) -> Result<RestrictionState, ConfError> {
    let steps = complete(steps)?;

    if left.to != right.from {
        return Err(ConfError::NonAdjacentRanges {
            left_to: left.to.clone(),
            right_from: right.from.clone(),
        });
    }
    for range in [left, right] {
        if !restrictions.iter().any(|r| r.same_bounds(range)) {
            return Err(ConfError::RangeNotFound {
                from: range.from.clone(),
                to: range.to.clone(),
            });
        }
    }

    let merged = restrictions
        .iter()
        .filter(|range| !range.same_bounds(right))
        .map(|range| {
            if range.same_bounds(left) {
                PowerRestrictionRange::new(&left.from, &right.to, &range.value)
            } else {
                range.clone()
            }
        })
        .collect();

    finish(steps, merged)
}

/// The range sharing a boundary with `new_position`, excluding the one being resized
fn neighbour_boundary<'a>(
    steps: &[PathStep],
    restrictions: &'a [PowerRestrictionRange],
    resized: &PowerRestrictionRange,
    removed: &[PowerRestrictionRange],
    adjacent: impl Fn(&PowerRestrictionRange) -> bool,
    new_position: u64,
) -> Result<Option<&'a PowerRestrictionRange>, ConfError> {
    for range in restrictions {
        if range.same_bounds(resized) || removed.iter().any(|r| r.same_bounds(range)) {
            continue;
        }
        if adjacent(range) {
            return Ok(Some(range));
        }
        let from = position_of(steps, &range.from)?;
        let to = position_of(steps, &range.to)?;
        if from < new_position && new_position < to {
            return Ok(Some(range));
        }
    }
    Ok(None)
}

/// Move the end of a range to a new path step
///
/// Ranges swallowed by the new extent are removed, and the neighbouring range
/// starting at the old end (or overlapping the new one) now starts at `new_end`.
///
/// # Errors
///
/// Returns an error if a step does not resolve to a located step or the range would be inverted.
pub fn resize_end(
    steps: &[PathStep],
    restrictions: &[PowerRestrictionRange],
    range: &PowerRestrictionRange,
    new_end: &PathStep,
) -> Result<RestrictionState, ConfError> {
    let new_position = new_end
        .position_on_path
        .ok_or_else(|| ConfError::UndefinedPosition(new_end.id.clone()))?;
    let from_position = position_of(steps, &range.from)?;
    if new_position <= from_position {
        return Err(ConfError::InvertedRange(range.from.clone()));
    }

    let steps = insert_ordered(steps, new_end);

    let mut to_remove = Vec::new();
    for other in restrictions {
        if other.same_bounds(range) {
            continue;
        }
        let swallowed = is_range_covered(&steps, other, from_position, new_position)?
            || (position_of(&steps, &other.from)? > from_position && position_of(&steps, &other.to)? <= new_position);
        if swallowed {
            to_remove.push(other.clone());
        }
    }

    let next = neighbour_boundary(
        &steps,
        restrictions,
        range,
        &to_remove,
        |other| other.from == range.to,
        new_position,
    )?;

    let updated = update_restrictions(restrictions, &to_remove, Some(range), next, Some(&new_end.id));
    finish(steps, updated)
}

/// Move the start of a range to a new path step
///
/// Symmetric to [`resize_end`]: the neighbouring range ending at the old start
/// (or overlapping the new one) now ends at `new_begin`.
///
/// # Errors
///
/// Returns an error if a step does not resolve to a located step or the range would be inverted.
pub fn resize_begin(
    steps: &[PathStep],
    restrictions: &[PowerRestrictionRange],
    range: &PowerRestrictionRange,
    new_begin: &PathStep,
) -> Result<RestrictionState, ConfError> {
    let new_position = new_begin
        .position_on_path
        .ok_or_else(|| ConfError::UndefinedPosition(new_begin.id.clone()))?;
    let to_position = position_of(steps, &range.to)?;
    if new_position >= to_position {
        return Err(ConfError::InvertedRange(range.from.clone()));
    }

    let steps = insert_ordered(steps, new_begin);

    let mut to_remove = Vec::new();
    for other in restrictions {
        if other.same_bounds(range) {
            continue;
        }
        let swallowed = is_range_covered(&steps, other, new_position, to_position)?
            || (position_of(&steps, &other.from)? >= new_position && position_of(&steps, &other.to)? < to_position);
        if swallowed {
            to_remove.push(other.clone());
        }
    }

    let previous = neighbour_boundary(
        &steps,
        restrictions,
        range,
        &to_remove,
        |other| other.to == range.from,
        new_position,
    )?;

    let updated = update_restrictions(restrictions, &to_remove, previous, Some(range), Some(&new_begin.id));
    finish(steps, updated)
}

/// A power restriction edit, as produced by the restriction editor
#[derive(Debug, Clone, PartialEq)]
pub enum RestrictionEdit {
    Upsert {
        from: PathStep,
        to: PathStep,
        code: String,
    },
    Cut {
        cut_at: PathStep,
    },
    Merge {
        left: PowerRestrictionRange,
        right: PowerRestrictionRange,
    },
    ResizeBegin {
        range: PowerRestrictionRange,
        new_begin: PathStep,
    },
    ResizeEnd {
        range: PowerRestrictionRange,
        new_end: PathStep,
    },
}

/// Put back the unset origin or destination dropped before editing
fn restore_unset_ends(original: &[Option<PathStep>], steps: Vec<PathStep>) -> Vec<Option<PathStep>> {
    let mut result: Vec<Option<PathStep>> = Vec::with_capacity(steps.len() + 2);
    if original.first().is_some_and(Option::is_none) {
        result.push(None);
    }
    result.extend(steps.into_iter().map(Some));
    if original.len() > 1 && original.last().is_some_and(Option::is_none) {
        result.push(None);
    }
    result
}

/// Apply an edit to the record's path steps and power restrictions
///
/// Returns `Ok(None)` when the edit is a no-op.
///
/// # Errors
///
/// Returns an error if the edit breaks a path step invariant; nothing is applied then.
pub fn apply_edit(
    steps: &[Option<PathStep>],
    restrictions: &[PowerRestrictionRange],
    edit: &RestrictionEdit,
) -> Result<Option<(Vec<Option<PathStep>>, Vec<PowerRestrictionRange>)>, ConfError> {
    let set_steps = compact(steps);
    let state = match edit {
        RestrictionEdit::Upsert { from, to, code } => Some(upsert(&set_steps, restrictions, from, to, code)?),
        RestrictionEdit::Cut { cut_at } => cut(&set_steps, restrictions, cut_at)?,
        RestrictionEdit::Merge { left, right } => Some(merge(steps, restrictions, left, right)?),
        RestrictionEdit::ResizeBegin { range, new_begin } => {
            Some(resize_begin(&set_steps, restrictions, range, new_begin)?)
        }
        RestrictionEdit::ResizeEnd { range, new_end } => Some(resize_end(&set_steps, restrictions, range, new_end)?),
    };

    Ok(state.map(|state| {
        let path_steps = clean_unused_entries(restore_unset_ends(steps, state.path_steps), &state.restrictions);
        (path_steps, state.restrictions)
    }))
}

/// Drag state of the power restriction editor
///
/// `Idle -> Dragging(boundary) -> commit -> Idle`; the commit yields the new
/// path steps and ranges to store together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Dragging { boundary: String },
}

impl EditSession {
    pub fn begin_drag(&mut self, boundary: &str) {
        *self = Self::Dragging {
            boundary: boundary.to_string(),
        };
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub fn dragged_boundary(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Dragging { boundary } => Some(boundary),
        }
    }

    /// End the drag with an edit
    ///
    /// The session is idle again afterwards, whether the edit succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns an error if no drag is in progress or the edit fails.
    pub fn commit(
        &mut self,
        steps: &[Option<PathStep>],
        restrictions: &[PowerRestrictionRange],
        edit: &RestrictionEdit,
    ) -> Result<Option<(Vec<Option<PathStep>>, Vec<PowerRestrictionRange>)>, ConfError> {
        let session = std::mem::take(self);
        if session == Self::Idle {
            return Err(ConfError::NotDragging);
        }
        apply_edit(steps, restrictions, edit)
    }
}
