//! Session state of one viewer and the intents that change it.

mod controller;
mod intent;

pub use controller::{BuildSettings, Session};
pub use intent::{Intent, Outcome};
