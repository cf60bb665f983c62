use std::ptr;
use std::sync::{Mutex, RwLock};

use tracing::info;
use wildfire_grid_core::{ColorPalette, SimulationConfig, WildfireSimulation};

use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{track_error, track_result};

/// An opaque wildfire simulation handle.
///
/// # Thread Safety
/// The engine sits behind an `RwLock`, so queries from several threads run
/// concurrently while `wildfire_step` takes the write lock. The snapshot
/// buffer handed out by `wildfire_get_snapshot` is cached behind a `Mutex`
/// and reused between calls.
///
/// ## Godot Example
/// ```gdscript
/// var fire: int = 0  # Opaque pointer to WildfireInstance
///
/// func _ready():
///     var result = WildfireFFI.wildfire_new(128, 128, 42)
///     if result.error != WildfireFFI.WildfireErrorCode.Ok:
///         push_error(WildfireFFI.wildfire_get_last_error())
///         return
///     fire = result.instance
///     WildfireFFI.wildfire_ignite(fire, 64, 64)
///
/// func _on_tick_timer_timeout():
///     WildfireFFI.wildfire_step(fire, 1)
///
/// func _exit_tree():
///     if fire != 0:
///         WildfireFFI.wildfire_destroy(fire)
/// ```
///
/// ## Unreal Engine Example
/// ```cpp
/// WildfireInstance* Fire = nullptr;
/// if (wildfire_new(256, 256, 7, &Fire) != WildfireErrorCode::Ok) {
///     UE_LOG(LogTemp, Error, TEXT("%hs"), wildfire_get_last_error());
///     return;
/// }
/// wildfire_step(Fire, 10);
/// const uint8_t* Pixels = nullptr;
/// uintptr_t Len = 0;
/// wildfire_get_snapshot(Fire, &Pixels, &Len);
/// // Upload Pixels to a 256x256 RGB8 texture
/// wildfire_destroy(Fire);
/// ```
pub struct WildfireInstance {
    pub(crate) sim: RwLock<WildfireSimulation>,
    pub(crate) snapshot: Mutex<Vec<u8>>,
    pub(crate) palette: ColorPalette,
}

impl WildfireInstance {
    pub(crate) fn new(
        config: SimulationConfig,
        seed: u64,
    ) -> Result<Box<Self>, DefaultWildfireError> {
        let snapshot_capacity = config.width.saturating_mul(config.height).saturating_mul(3);
        let sim = WildfireSimulation::new(config, seed)?;
        info!(
            "FFI instance created ({}x{}, seed {})",
            sim.width(),
            sim.height(),
            seed
        );

        Ok(Box::new(Self {
            sim: RwLock::new(sim),
            snapshot: Mutex::new(Vec::with_capacity(snapshot_capacity)),
            palette: ColorPalette::reference(),
        }))
    }
}

fn sized_config(
    base: SimulationConfig,
    width: u32,
    height: u32,
) -> Result<SimulationConfig, DefaultWildfireError> {
    if width == 0 || height == 0 {
        return Err(DefaultWildfireError::invalid_dimensions(width, height));
    }
    Ok(base.with_size(width as usize, height as usize))
}

/// Shared body of the constructors: writes the handle or null.
unsafe fn create_into(
    config: Result<SimulationConfig, DefaultWildfireError>,
    seed: u64,
    out_instance: *mut *mut WildfireInstance,
) -> WildfireErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_instance"));
    }

    let created = config.and_then(|config| WildfireInstance::new(config, seed));
    match track_result(created) {
        Ok(instance) => {
            // SAFETY: out_instance checked non-null, validity upheld by the caller
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            WildfireErrorCode::Ok
        }
        Err(code) => {
            // SAFETY: as above
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Create a simulation with the reference rules (no spontaneous ignition,
/// no regrowth) and return it via out-parameter.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) with a valid handle in `out_instance`
/// - `WildfireErrorCode::NullPointer` if `out_instance` is null
/// - `WildfireErrorCode::InvalidDimensions` if `width` or `height` is zero;
///   `out_instance` is set to null
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the returned instance and MUST call `wildfire_destroy`
///   exactly once.
#[no_mangle]
pub unsafe extern "C" fn wildfire_new(
    width: u32,
    height: u32,
    seed: u64,
    out_instance: *mut *mut WildfireInstance,
) -> WildfireErrorCode {
    let config = sized_config(SimulationConfig::reference(), width, height);
    // SAFETY: forwarded caller contract
    unsafe { create_into(config, seed, out_instance) }
}

/// Same as `wildfire_new` with the extended rules: spontaneous ignition,
/// grass and tree regrowth, mixed grass and tree fuel.
///
/// # Safety
///
/// Same contract as `wildfire_new`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_new_extended(
    width: u32,
    height: u32,
    seed: u64,
    out_instance: *mut *mut WildfireInstance,
) -> WildfireErrorCode {
    let config = sized_config(SimulationConfig::extended(), width, height);
    // SAFETY: forwarded caller contract
    unsafe { create_into(config, seed, out_instance) }
}

/// Destroys an instance previously created by `wildfire_new` or
/// `wildfire_new_extended`. A null pointer is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by one of the constructors above.
/// - It MUST NOT have been freed already; the caller must not use it afterwards.
#[no_mangle]
pub unsafe extern "C" fn wildfire_destroy(ptr: *mut WildfireInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: ptr came from Box::into_raw in create_into and is freed once
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
