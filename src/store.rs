use std::sync::Arc;
use chrono::{DateTime, Utc};
use crate::error::ConfError;
use crate::models::{ConfHistory, ConfSettings, OsrdConf, PathStep};
use crate::power_restrictions::{EditSession, RestrictionEdit};
use crate::reducers::{reduce, ConfAction};
use crate::selectors::{self, ConfTotals, ViasSelector};

/// Editing session around one configuration record
///
/// Every action is applied to a copy of the record, which replaces the current
/// one only when the action succeeds.
#[derive(Debug, Clone)]
pub struct ConfStore {
    conf: OsrdConf,
    settings: ConfSettings,
    history: ConfHistory,
    session: EditSession,
    vias: ViasSelector,
}

impl ConfStore {
    #[must_use]
    pub fn new(settings: ConfSettings, start_time: DateTime<Utc>) -> Self {
        let conf = OsrdConf::new(&settings, start_time);
        let mut history = ConfHistory::new(settings.undo_levels);
        history.push_snapshot(conf.clone());
        Self {
            conf,
            settings,
            history,
            session: EditSession::default(),
            vias: ViasSelector::new(),
        }
    }

    #[must_use]
    pub fn conf(&self) -> &OsrdConf {
        &self.conf
    }

    #[must_use]
    pub fn settings(&self) -> &ConfSettings {
        &self.settings
    }

    /// Apply an action
    ///
    /// # Errors
    ///
    /// Returns the reducer error; the record is left untouched then.
    pub fn dispatch(&mut self, action: ConfAction) -> Result<(), ConfError> {
        let mut next = self.conf.clone();
        if let Err(e) = reduce(&mut next, action, &self.settings) {
            log::warn!("Action rejected: {e}");
            return Err(e);
        }
        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, next: OsrdConf) {
        if next == self.conf {
            return;
        }
        self.history.push_snapshot(next.clone());
        self.conf = next;
    }

    /// Restore the previous record, returns whether anything changed
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.conf.clone()) {
            Some(previous) => {
                self.conf = previous;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(next) => {
                self.conf = next;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn begin_drag(&mut self, boundary: &str) {
        crate::log!("Dragging power restriction boundary {}", boundary);
        self.session.begin_drag(boundary);
    }

    pub fn cancel_drag(&mut self) {
        self.session.cancel();
    }

    #[must_use]
    pub fn dragged_boundary(&self) -> Option<&str> {
        self.session.dragged_boundary()
    }

    /// End the current drag with a power restriction edit
    ///
    /// # Errors
    ///
    /// Returns an error if no drag is in progress or the edit fails.
    pub fn commit_drag(&mut self, edit: &RestrictionEdit) -> Result<(), ConfError> {
        let result = self
            .session
            .commit(&self.conf.path_steps, &self.conf.power_restrictions, edit)?;
        if let Some((path_steps, restrictions)) = result {
            let mut next = self.conf.clone();
            next.set_path(path_steps, restrictions);
            self.commit(next);
        }
        Ok(())
    }

    #[must_use]
    pub fn origin(&self) -> Option<&PathStep> {
        selectors::origin(&self.conf)
    }

    #[must_use]
    pub fn destination(&self) -> Option<&PathStep> {
        selectors::destination(&self.conf)
    }

    #[must_use]
    pub fn vias(&self) -> Arc<Vec<PathStep>> {
        self.vias.select(&self.conf)
    }

    #[must_use]
    pub fn totals(&self) -> ConfTotals {
        selectors::totals(&self.conf)
    }
}
