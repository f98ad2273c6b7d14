//! Lease guard for host-supplied addresses.
//!
//! When the host passes an address into a guest call, ownership of that
//! region transfers to the guest, which must consume it exactly once:
//! either decode it (which reclaims the region, see
//! [`take_frame`](crate::codec::take_frame)) or release it unread. The
//! guard makes both paths consuming, so "decoded or freed exactly once" is
//! enforced by the type system rather than by convention.

use std::mem;

/// A host-supplied transport-vector address owned by the guest until it is
/// consumed.
#[derive(Debug)]
pub struct Lease {
    ptr: *mut u8,
}

impl Lease {
    /// Wrap a raw address received from the host.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live allocation produced by this module's allocator,
    /// exclusively owned by the caller from this point on.
    pub unsafe fn new(ptr: *mut u8) -> Self {
        Self { ptr }
    }

    /// The leased address, without consuming the lease.
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Consume the lease without freeing; the caller takes back full
    /// responsibility for the raw address.
    pub fn into_raw(self) -> *mut u8 {
        let ptr = self.ptr;
        mem::forget(self);
        ptr
    }

    /// Release the leased region, consuming the lease.
    ///
    /// # Safety
    ///
    /// `size` must be the exact size of the allocation backing this lease.
    pub unsafe fn release(self, size: usize) {
        let ptr = self.into_raw();
        unsafe { super::free(ptr, size) };
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        // Dropping a lease leaks the region: once the lease is gone nothing
        // knows the frame size needed to free it.
        tracing::warn!(
            addr = self.ptr as usize,
            "transport-vector lease dropped without being consumed"
        );
    }
}
