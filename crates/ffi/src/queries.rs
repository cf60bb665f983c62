use std::ptr;

use wildfire_grid_core::{Cell, CellState};

use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, track_result, with_wildfire};
use crate::instance::WildfireInstance;

/// FFI-friendly view of one cell.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellInfo {
    /// 0 not on fire, 1 on fire, 2 destroyed
    pub state: u8,

    /// 0 grass, 1 water, 2 bedrock, 3 tree
    pub material: u8,

    /// Normalized terrain height in `[0, 1]`
    pub height: f32,
}

impl From<&Cell> for CellInfo {
    fn from(cell: &Cell) -> Self {
        Self {
            state: cell.state().code(),
            material: cell.material().code(),
            height: cell.height(),
        }
    }
}

/// Number of cells currently in `state` (0 not on fire, 1 on fire, 2 destroyed).
///
/// Returns 0 and sets the last error for a null handle or unknown state code.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `wildfire_new`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_count_by_state(ptr: *const WildfireInstance, state: u8) -> u32 {
    let result = (|| -> Result<u32, DefaultWildfireError> {
        // SAFETY: forwarded caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let state = CellState::from_code(state).ok_or_else(|| {
            DefaultWildfireError::invalid_parameter(format!("Unknown cell state {state}"))
        })?;
        with_wildfire(instance, |sim| sim.count_by_state(state) as u32)
    })();

    track_result(result).unwrap_or(0)
}

/// Fill `out_cell` with the cell at `(x, y)`.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) on success
/// - `WildfireErrorCode::NullPointer` if `ptr` or `out_cell` is null
/// - `WildfireErrorCode::InvalidParameter` if `(x, y)` is outside the grid
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `wildfire_new`.
/// - `out_cell` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wildfire_get_cell(
    ptr: *const WildfireInstance,
    x: u32,
    y: u32,
    out_cell: *mut CellInfo,
) -> WildfireErrorCode {
    if out_cell.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_cell"));
    }

    handle_ffi_result_error(|| {
        // SAFETY: forwarded caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let info = with_wildfire(instance, |sim| {
            sim.grid().cell(x as usize, y as usize).map(CellInfo::from)
        })?
        .ok_or_else(|| {
            DefaultWildfireError::invalid_parameter(format!("Cell ({x}, {y}) is outside the grid"))
        })?;

        // SAFETY: out_cell checked non-null above
        unsafe {
            *out_cell = info;
        }
        Ok(())
    })
}

/// Render the grid into a cached RGB buffer and return a borrowed pointer to it.
///
/// The buffer is `width * height * 3` bytes, row-major, coloured with the
/// reference palette. **DO NOT FREE THIS POINTER**. It is invalidated by the
/// next call to this function and by `wildfire_destroy`.
///
/// Thread-safe: holds the snapshot `Mutex` and the simulation read lock.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) with the buffer in `out_data` and its length in `out_len`
/// - `WildfireErrorCode::NullPointer` if any pointer is null
/// - `WildfireErrorCode::LockPoisoned` if an internal lock is poisoned
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `wildfire_new`.
/// - `out_data` and `out_len` must be null or valid for writes.
///
/// # Example Usage (C++)
/// ```cpp
/// const uint8_t* pixels = nullptr;
/// uintptr_t len = 0;
/// if (wildfire_get_snapshot(fire, &pixels, &len) == WildfireErrorCode::Ok) {
///     memcpy(texture_data, pixels, len);
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn wildfire_get_snapshot(
    ptr: *const WildfireInstance,
    out_data: *mut *const u8,
    out_len: *mut usize,
) -> WildfireErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_len"));
    }

    if out_data.is_null() {
        // SAFETY: out_len checked non-null above
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultWildfireError::null_pointer("out_data"));
    }

    let result = handle_ffi_result_error(|| {
        // SAFETY: forwarded caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let mut snapshot = instance
            .snapshot
            .lock()
            .map_err(|_| DefaultWildfireError::lock_poisoned("Mutex"))?;

        let raster = with_wildfire(instance, |sim| sim.render_snapshot(&instance.palette))?;
        snapshot.clear();
        snapshot.extend_from_slice(&raster.data);

        // SAFETY: both out pointers checked non-null above
        unsafe {
            *out_len = snapshot.len();
            *out_data = snapshot.as_ptr();
        }
        Ok(())
    });

    if result != WildfireErrorCode::Ok {
        // SAFETY: both out pointers checked non-null above
        unsafe {
            *out_data = ptr::null();
            *out_len = 0;
        }
    }

    result
}

/// Current tick counter, 0 for a null handle.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `wildfire_new`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_get_tick(ptr: *const WildfireInstance) -> u32 {
    // SAFETY: forwarded caller contract
    let result = unsafe { instance_from_ptr(ptr) }
        .and_then(|instance| with_wildfire(instance, |sim| sim.tick()));
    track_result(result).unwrap_or(0)
}
