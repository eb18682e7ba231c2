use chrono::Duration;
use serde::{Deserialize, Serialize};
use crate::time::option_iso_duration_serde;
use super::MarginValue;
use super::id::generate_path_step_id;

/// Reference to a track inside an operational point
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackReference {
    Id { track_id: String },
    Name { track_name: String },
}

/// The unique code identifying an operational point
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationalPointIdentifier {
    Id {
        operational_point: String,
    },
    Trigram {
        trigram: String,
        #[serde(default)]
        secondary_code: Option<String>,
    },
    Uic {
        uic: u32,
        #[serde(default)]
        secondary_code: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationalPointReference {
    #[serde(flatten)]
    pub reference: OperationalPointIdentifier,
    #[serde(default)]
    pub track_reference: Option<TrackReference>,
}

/// Where a path step is located on the infrastructure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStepLocation {
    /// Offset in mm on a track section
    TrackOffset { track: String, offset: u64 },
    OperationalPoint(OperationalPointReference),
}

impl PathStepLocation {
    #[must_use]
    pub fn track_offset(track: &str, offset: u64) -> Self {
        Self::TrackOffset {
            track: track.to_string(),
            offset,
        }
    }

    #[must_use]
    pub fn operational_point(id: &str) -> Self {
        Self::OperationalPoint(OperationalPointReference {
            reference: OperationalPointIdentifier::Id {
                operational_point: id.to_string(),
            },
            track_reference: None,
        })
    }

    /// Display name derived from a trigram reference, e.g. `MES BV`
    #[must_use]
    pub fn trigram_name(&self) -> Option<String> {
        match self {
            Self::OperationalPoint(OperationalPointReference {
                reference: OperationalPointIdentifier::Trigram { trigram, secondary_code },
                ..
            }) => Some(match secondary_code {
                Some(code) => format!("{trigram} {code}"),
                None => trigram.clone(),
            }),
            _ => None,
        }
    }
}

/// State of the signal where the train is received for its stop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceptionSignal {
    #[default]
    Open,
    Stop,
    ShortSlipStop,
}

/// A waypoint of the itinerary being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub id: String,
    #[serde(flatten)]
    pub location: PathStepLocation,
    #[serde(default)]
    pub name: Option<String>,
    /// Arrival time, relative to the train start time
    #[serde(with = "option_iso_duration_serde", default)]
    pub arrival: Option<Duration>,
    #[serde(with = "option_iso_duration_serde", default)]
    pub stop_for: Option<Duration>,
    #[serde(default)]
    pub reception_signal: ReceptionSignal,
    #[serde(default)]
    pub theoretical_margin: Option<MarginValue>,
    #[serde(default)]
    pub locked: bool,
    /// Distance from the start of the path, in mm
    #[serde(default)]
    pub position_on_path: Option<u64>,
    /// Created by a power restriction edit rather than by the user
    #[serde(default)]
    pub is_from_power_restriction: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl PathStep {
    /// Create a path step with no constraint attached
    #[must_use]
    pub fn new(id: &str, location: PathStepLocation) -> Self {
        Self {
            id: id.to_string(),
            location,
            name: None,
            arrival: None,
            stop_for: None,
            reception_signal: ReceptionSignal::Open,
            theoretical_margin: None,
            locked: false,
            position_on_path: None,
            is_from_power_restriction: false,
            deleted: false,
        }
    }

    /// Create a boundary step for a power restriction edit at a track offset
    #[must_use]
    pub fn power_restriction_boundary(track: &str, offset: u64, position_on_path: u64) -> Self {
        Self {
            position_on_path: Some(position_on_path),
            is_from_power_restriction: true,
            ..Self::new(&generate_path_step_id(), PathStepLocation::track_offset(track, offset))
        }
    }

    #[must_use]
    pub fn with_position(mut self, position_on_path: u64) -> Self {
        self.position_on_path = Some(position_on_path);
        self
    }

    /// Whether a schedule or margin constraint is attached to this step
    #[must_use]
    pub fn has_constraints(&self) -> bool {
        self.locked || self.arrival.is_some() || self.stop_for.is_some() || self.theoretical_margin.is_some()
    }
}

/// A waypoint as stored in a saved train schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(flatten)]
    pub location: PathStepLocation,
}
