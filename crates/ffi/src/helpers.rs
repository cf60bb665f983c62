use std::ffi::CString;

use wildfire_grid_core::WildfireSimulation;

use crate::error::{with_last_error_mut, DefaultWildfireError, WildfireError, WildfireErrorCode};
use crate::instance::WildfireInstance;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl WildfireError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl WildfireError) -> WildfireErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called when an operation succeeds.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = WildfireErrorCode::Ok;
    });
}

/// Record the error of a failed result and hand back its code.
pub(crate) fn track_result<T>(
    result: Result<T, DefaultWildfireError>,
) -> Result<T, WildfireErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Run an FFI body and translate its result into an error code.
pub(crate) fn handle_ffi_result_error<F>(body: F) -> WildfireErrorCode
where
    F: FnOnce() -> Result<(), DefaultWildfireError>,
{
    match track_result(body()) {
        Ok(()) => WildfireErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow an instance from a raw handle.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `wildfire_new`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const WildfireInstance,
) -> Result<&'a WildfireInstance, DefaultWildfireError> {
    // SAFETY: upheld by the caller
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultWildfireError::null_pointer("ptr"))
}

/// Run `f` under the simulation read lock.
pub(crate) fn with_wildfire<T>(
    instance: &WildfireInstance,
    f: impl FnOnce(&WildfireSimulation) -> T,
) -> Result<T, DefaultWildfireError> {
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultWildfireError::lock_poisoned("RwLock"))?;
    Ok(f(&sim))
}

/// Run `f` under the simulation write lock.
pub(crate) fn with_wildfire_mut<T>(
    instance: &WildfireInstance,
    f: impl FnOnce(&mut WildfireSimulation) -> T,
) -> Result<T, DefaultWildfireError> {
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultWildfireError::lock_poisoned("RwLock"))?;
    Ok(f(&mut sim))
}
