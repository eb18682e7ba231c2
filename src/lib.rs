#![allow(clippy::implicit_hasher)]

pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod path_steps;
pub mod power_restrictions;
pub mod reducers;
pub mod selectors;
pub mod store;
pub mod time;

pub use error::ConfError;
pub use reducers::ConfAction;
pub use store::ConfStore;
