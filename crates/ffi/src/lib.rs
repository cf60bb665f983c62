//! C ABI for the wildfire grid automaton
//!
//! Hosts create an opaque [`WildfireInstance`] with `wildfire_new`, drive it
//! with `wildfire_step`, and read cells or an RGB snapshot back. Failures
//! return a [`WildfireErrorCode`]; the message is available from
//! `wildfire_get_last_error` on the same thread.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{wildfire_get_last_error, wildfire_get_last_error_code, WildfireErrorCode};
pub use instance::{wildfire_destroy, wildfire_new, wildfire_new_extended, WildfireInstance};
pub use queries::{
    wildfire_count_by_state, wildfire_get_cell, wildfire_get_snapshot, wildfire_get_tick, CellInfo,
};
pub use simulation::{wildfire_ignite, wildfire_set_wind, wildfire_step};
