//! Guest-side linear-memory allocator shim.
//!
//! The host and the guest do not share a heap: every buffer the guest will
//! read must first be materialized through [`alloc`], and every buffer the
//! guest hands back must later be reclaimed through [`free`]. An address is
//! a plain offset into the guest's linear memory; on a native target it is
//! an ordinary heap pointer, which keeps the whole crate testable off-wasm.
//!
//! Memory returned by [`alloc`] is not zero-initialized by contract, and no
//! two live allocations overlap. The protocol itself carries no liveness
//! tracking, so releasing a dead or unknown address is undefined behavior;
//! debug builds keep a liveness registry and turn that misuse into a loud
//! panic instead of silent corruption.
//!
//! # Example
//!
//! ```
//! let ptr = vecwire::memory::alloc(4);
//! unsafe {
//!     std::ptr::copy_nonoverlapping(b"ping".as_ptr(), ptr, 4);
//!     vecwire::memory::free(ptr, 4);
//! }
//! ```

mod lease;

pub use lease::Lease;

use std::mem;

use crate::error::{Result, VecwireError};

/// Reserve `size` bytes of guest linear memory and return the address of
/// the first byte.
///
/// The address is stable and immediately usable for raw byte writes; the
/// runtime is instructed to forget the buffer, not dispose of it, so the
/// region stays live until [`free`] is called with the same address and
/// size.
///
/// # Errors
///
/// Returns [`VecwireError::Alloc`] if the allocation cannot be satisfied.
pub fn try_alloc(size: usize) -> Result<*mut u8> {
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| VecwireError::Alloc { size })?;
    let ptr = buf.as_mut_ptr();
    mem::forget(buf);
    #[cfg(debug_assertions)]
    registry::record(ptr as usize, size);
    Ok(ptr)
}

/// Infallible form of [`try_alloc`] for the exported ABI boundary.
///
/// # Panics
///
/// Panics if the allocation cannot be satisfied. The wire has no frame type
/// that could report this to the host, so the call traps.
pub fn alloc(size: usize) -> *mut u8 {
    match try_alloc(size) {
        Ok(ptr) => ptr,
        Err(err) => panic!("{err}"),
    }
}

/// Release a region previously returned by [`alloc`].
///
/// After this call the address must not be read or written by either side.
///
/// # Safety
///
/// `ptr` must have been returned by [`alloc`]`(size)` (or [`try_alloc`])
/// with exactly this `size`, and must not have been freed already. Debug
/// builds check this against the liveness registry and panic on violation;
/// release builds cannot detect it.
pub unsafe fn free(ptr: *mut u8, size: usize) {
    #[cfg(debug_assertions)]
    {
        if !registry::release(ptr as usize, size) {
            let err = VecwireError::DeadAddress(ptr as usize);
            tracing::error!(%err, "protocol misuse");
            panic!("{err}");
        }
    }
    drop(unsafe { Vec::from_raw_parts(ptr, 0, size) });
}

/// Whether the registry currently considers `ptr` a live allocation.
///
/// Available in debug builds only; test harnesses use it to assert the
/// ownership contract (an input address is dead after `transform`, an
/// output address stays live until explicitly freed).
#[cfg(debug_assertions)]
pub fn is_live(ptr: *const u8) -> bool {
    registry::is_live(ptr as usize)
}

/// Debug-build liveness registry: address -> allocation size.
///
/// Zero-size allocations are not tracked (they share the dangling address
/// and never hit the deallocator).
#[cfg(debug_assertions)]
mod registry {
    use std::collections::HashMap;
    use std::sync::{Mutex, OnceLock};

    fn live() -> &'static Mutex<HashMap<usize, usize>> {
        static LIVE: OnceLock<Mutex<HashMap<usize, usize>>> = OnceLock::new();
        LIVE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    pub(super) fn record(addr: usize, size: usize) {
        if size == 0 {
            return;
        }
        if let Ok(mut map) = live().lock() {
            map.insert(addr, size);
        }
    }

    /// Returns false if the address is not live with this exact size.
    pub(super) fn release(addr: usize, size: usize) -> bool {
        if size == 0 {
            return true;
        }
        match live().lock() {
            Ok(mut map) => match map.get(&addr) {
                Some(&recorded) if recorded == size => {
                    map.remove(&addr);
                    true
                }
                _ => false,
            },
            // Poisoned by an earlier panicking test; skip the check.
            Err(_) => true,
        }
    }

    pub(super) fn is_live(addr: usize) -> bool {
        live().lock().map(|map| map.contains_key(&addr)).unwrap_or(false)
    }
}
