/// Restriction code meaning "no power restriction on this range"
pub const NO_POWER_RESTRICTION: &str = "NO_POWER_RESTRICTION";

/// Default time window of a paced train, in minutes
pub const DEFAULT_TIME_WINDOW_MINUTES: i64 = 120;

/// Default time between two occurrences of a paced train, in minutes
pub const DEFAULT_INTERVAL_MINUTES: i64 = 60;

/// Maximum number of undo levels kept by a store
pub const DEFAULT_UNDO_LEVELS: usize = 20;

/// Conversion factor from m/s to km/h
pub const MS_TO_KMH: f64 = 3.6;

/// Upper bound on the base occurrences expanded from one paced train
pub const MAX_PACED_OCCURRENCES: u32 = 10_000;
