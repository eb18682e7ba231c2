mod conf;
pub mod id;
mod margins;
mod paced_train;
mod path_step;
mod power_restriction;
mod settings;
mod timetable_item;
pub(crate) mod train_schedule;
mod undo;

pub use conf::{EditingMode, OsrdConf};
pub use margins::{MarginValue, Margins};
pub use paced_train::{
    ChangeGroup, ExceptionType, OccurrenceId, Paced, PacedTrain, PacedTrainException, PathAndScheduleChangeGroup,
    RollingStockChangeGroup,
};
pub use path_step::{
    OperationalPointIdentifier, OperationalPointReference, PathItem, PathStep, PathStepLocation, ReceptionSignal,
    TrackReference,
};
pub use power_restriction::PowerRestrictionRange;
pub use settings::ConfSettings;
pub use timetable_item::{TimetableItem, TimetableItemId};
pub use train_schedule::{
    Comfort, Distribution, ScheduleError, ScheduleItem, TrainCategory, TrainSchedule, TrainScheduleOptions,
};
pub use undo::ConfHistory;
