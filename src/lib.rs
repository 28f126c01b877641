//! Editing core for the LED settings of a button controller: the button
//! to LED order, the player/case/grid options and their validation, and the
//! boundary that loads and saves the persisted record.

pub mod buttons;
pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod pins;
pub mod sync;
pub mod web;

pub use error::{LedConfigError, Result, ValidationErrors, Violation};
pub use model::{LedConfiguration, LedEdit, LedOptionsRecord};
pub use sync::{EditSession, LedOptionsStore, Store};
