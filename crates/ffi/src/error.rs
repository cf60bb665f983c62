use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use wildfire_grid_core::GridError;

/// Common interface for FFI error types.
///
/// - `code()` - the error code passed across the FFI boundary
/// - `msg()` - the message kept for `wildfire_get_last_error`
pub(crate) trait WildfireError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> WildfireErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `WildfireError` for the FFI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultWildfireError {
    code: WildfireErrorCode,
    msg: String,
}

impl DefaultWildfireError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: WildfireErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"RwLock"`, `"Mutex"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: WildfireErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for an unusable grid size.
    pub fn invalid_dimensions(width: u32, height: u32) -> Self {
        Self {
            code: WildfireErrorCode::InvalidDimensions,
            msg: format!("Grid dimensions must be positive, got {width}x{height}"),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: WildfireErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl WildfireError for DefaultWildfireError {
    fn code(&self) -> WildfireErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<GridError> for DefaultWildfireError {
    fn from(error: GridError) -> Self {
        let code = match error {
            GridError::InvalidDimensions { .. } => WildfireErrorCode::InvalidDimensions,
            _ => WildfireErrorCode::InvalidParameter,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

/// FFI error codes returned by wildfire functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildfireErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Grid width or height is zero or too large.
    InvalidDimensions = 3,

    /// Invalid parameter passed to function (unknown code, out-of-bounds cell).
    InvalidParameter = 4,
}

impl From<DefaultWildfireError> for WildfireErrorCode {
    fn from(error: DefaultWildfireError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The `CString` is owned here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, WildfireErrorCode)> = const { RefCell::new((None, WildfireErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, WildfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, WildfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// Errors are stored per thread. The pointer is valid until the next FFI
/// call on the same thread. **DO NOT FREE THIS POINTER**.
///
/// Example:
/// ```cpp
/// WildfireInstance* sim = nullptr;
/// if (wildfire_new(0, 64, 42, &sim) != WildfireErrorCode::Ok) {
///     const char* error = wildfire_get_last_error();
///     if (error) {
///         printf("Wildfire creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn wildfire_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `WildfireErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn wildfire_get_last_error_code() -> WildfireErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
