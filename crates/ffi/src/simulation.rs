use tracing::debug;
use wildfire_grid_core::{CellLocation, WindDirection};

use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_result, with_wildfire_mut};
use crate::instance::WildfireInstance;

/// Advance the simulation by `ticks` ticks.
///
/// Thread-safe: holds the `RwLock` write lock for the whole batch.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `wildfire_new`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_step(
    ptr: *const WildfireInstance,
    ticks: u32,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: forwarded caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let counts = with_wildfire_mut(instance, |sim| sim.advance_by(ticks))?;
        debug!("FFI step of {} ticks, {} ignitions", ticks, counts.ignitions);
        Ok(())
    })
}

/// Set the cell at `(x, y)` on fire.
///
/// Returns `true` if the cell was unburned and is now burning. Out-of-bounds
/// coordinates and cells already burning or destroyed return `false`; only
/// out-of-bounds and null handles set the last error.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `wildfire_new`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_ignite(ptr: *const WildfireInstance, x: u32, y: u32) -> bool {
    let result = (|| -> Result<bool, DefaultWildfireError> {
        // SAFETY: forwarded caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_wildfire_mut(instance, |sim| {
            let (x, y) = (x as usize, y as usize);
            if x >= sim.width() || y >= sim.height() {
                return Err(DefaultWildfireError::invalid_parameter(format!(
                    "Cell ({x}, {y}) is outside the {}x{} grid",
                    sim.width(),
                    sim.height()
                )));
            }
            Ok(sim.ignite(CellLocation::new(x, y)))
        })?
    })();

    track_result(result).unwrap_or(false)
}

/// Set the wind direction by code (0 calm, 1 S, 2 N, 3 W, 4 E, 5 SW, 6 SE,
/// 7 NW, 8 NE).
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `wildfire_new`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_set_wind(
    ptr: *const WildfireInstance,
    direction: u8,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: forwarded caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let wind = WindDirection::from_code(direction).ok_or_else(|| {
            DefaultWildfireError::invalid_parameter(format!("Unknown wind direction {direction}"))
        })?;
        with_wildfire_mut(instance, |sim| sim.set_wind(wind))
    })
}
