//! Wasm ABI export macros.
//!
//! A guest module crate invokes exactly one of these at its root to emit
//! the fixed exported surface the host runtime calls. Both shapes export
//! the allocator pair; they differ in how `transform` receives its input:
//!
//! - [`export_single_shot!`](crate::export_single_shot) -
//!   `transform(ptr) -> ptr`, input handed in as a call argument.
//! - [`export_streaming!`](crate::export_streaming) -
//!   `transform() -> ptr`, input pulled through the host's imported
//!   `next() -> ptr` function (tagged framing, since the stream ends with
//!   an end-of-stream frame).
//!
//! Errors reaching this boundary trap the call (a panic compiles to
//! `unreachable` on wasm32): the wire has no error frame, so a partially
//! constructed vector must never be returned instead.

/// Export the allocator pair: `alloc(size) -> ptr` and `free(ptr, size)`.
///
/// Invoked by the two shape macros; only needed directly when a module
/// wires up a custom `transform` export by hand.
#[macro_export]
macro_rules! export_allocator {
    () => {
        #[no_mangle]
        pub extern "C" fn alloc(size: usize) -> *mut u8 {
            $crate::memory::alloc(size)
        }

        #[no_mangle]
        pub unsafe extern "C" fn free(ptr: *mut u8, size: usize) {
            unsafe { $crate::memory::free(ptr, size) }
        }
    };
}

/// Export the single-shot surface for the given codec and transform.
///
/// # Example
///
/// ```ignore
/// use vecwire::codec::Tagged;
/// use vecwire::entry::BoxError;
///
/// vecwire::export_single_shot!(Tagged, |payload: &str| -> Result<String, BoxError> {
///     Ok(payload.to_uppercase())
/// });
/// ```
#[macro_export]
macro_rules! export_single_shot {
    ($codec:ty, $transform:expr) => {
        $crate::export_allocator!();

        #[no_mangle]
        pub unsafe extern "C" fn transform(input: *mut u8) -> *mut u8 {
            match unsafe { $crate::entry::transform_at::<$codec, _>(input, &$transform) } {
                Ok(output) => output,
                Err(err) => ::std::panic!("transform failed: {err}"),
            }
        }
    };
}

/// Export the streaming surface for the given transform, importing
/// `next() -> ptr` from the host's `"host"` module namespace.
///
/// The terminal flag is the only state persisted across calls; once an
/// end-of-stream frame has been returned, a further `transform()` call is
/// protocol misuse and traps.
///
/// # Example
///
/// ```ignore
/// use vecwire::entry::BoxError;
///
/// vecwire::export_streaming!(|payload: &str| -> Result<String, BoxError> {
///     Ok(payload.to_uppercase())
/// });
/// ```
#[macro_export]
macro_rules! export_streaming {
    ($transform:expr) => {
        $crate::export_allocator!();

        #[link(wasm_import_module = "host")]
        extern "C" {
            fn next() -> *mut u8;
        }

        #[no_mangle]
        pub unsafe extern "C" fn transform() -> *mut u8 {
            use ::std::sync::atomic::{AtomicBool, Ordering};
            static FINISHED: AtomicBool = AtomicBool::new(false);

            let mut stream = $crate::entry::PullStream::<$crate::codec::Tagged, _>::resume(
                || unsafe { next() },
                FINISHED.load(Ordering::Relaxed),
            );
            let result = unsafe { stream.pull_once(&$transform) };
            FINISHED.store(stream.is_finished(), Ordering::Relaxed);
            match result {
                Ok(output) => output,
                Err(err) => ::std::panic!("transform failed: {err}"),
            }
        }
    };
}
