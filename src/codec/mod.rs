//! Transport frame codec.
//!
//! Maps between a transport vector (an address plus wire bytes in guest
//! linear memory) and a decoded in-memory [`Frame`]. Two framing variants
//! exist in the protocol family; a deployment picks one and applies it
//! consistently, they are not wire-compatible with each other:
//!
//! - [`Tagged`] - `[tag: u8][len: u32 LE][payload]`; the tag distinguishes
//!   ordinary data from the end-of-stream marker, so this variant supports
//!   pull-based streaming.
//! - [`Untagged`] - `[len: u32 LE][payload]`; no type discrimination, used
//!   only where the interaction is single-shot and no end-of-stream
//!   signaling is needed.
//!
//! # Design
//!
//! Codecs are marker structs behind the [`FrameCodec`] trait, selected at
//! compile time as a generic parameter, never conflated in one code path.
//! The slice-level `encode`/`decode` pair is pure and bounds-checked; the
//! address-level [`take_frame`]/[`emit`] pair composes it with the
//! allocator and is the only place the length field has to be trusted.
//!
//! # Example
//!
//! ```
//! use vecwire::codec::{Frame, FrameCodec, Tagged};
//!
//! let wire = Tagged::encode(&Frame::Data("hello".into())).unwrap();
//! assert_eq!(&wire[..5], &[1, 5, 0, 0, 0]); // tag 1, length 5 LE
//! assert_eq!(Tagged::decode(&wire).unwrap(), Frame::Data("hello".into()));
//! ```

mod tagged;
mod untagged;

pub use tagged::Tagged;
pub use untagged::Untagged;

use std::ptr;
use std::slice;

use bytes::Bytes;

use crate::error::{Result, VecwireError};
use crate::memory::{self, Lease};

/// Type tag for an ordinary data frame.
pub const TAG_DATA: u8 = 1;

/// Type tag for the terminal end-of-stream marker.
pub const TAG_EOS: u8 = 127;

/// Size in bytes of the payload length field (unsigned, little-endian).
pub const LEN_SIZE: usize = 4;

/// A decoded transport vector.
///
/// A vector is immutable once written; transforming one always produces a
/// new vector rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// An ordinary data frame carrying a UTF-8 text payload.
    Data(String),
    /// The terminal end-of-stream marker. Once observed, the stream yields
    /// no further items.
    EndOfStream,
}

impl Frame {
    /// The payload text; empty for end-of-stream.
    pub fn payload(&self) -> &str {
        match self {
            Frame::Data(payload) => payload,
            Frame::EndOfStream => "",
        }
    }

    /// Whether this frame is the end-of-stream marker.
    #[inline]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Frame::EndOfStream)
    }
}

/// A framing variant of the transport-vector protocol.
///
/// Implemented by the [`Tagged`] and [`Untagged`] marker structs.
pub trait FrameCodec {
    /// Header size in bytes of a data frame (everything before the payload).
    const DATA_HEADER_SIZE: usize;

    /// Encode a frame into wire bytes.
    ///
    /// # Errors
    ///
    /// [`VecwireError::LengthOverflow`] if the payload byte length does not
    /// fit the length field; [`VecwireError::EosNotSupported`] if the
    /// variant cannot express end-of-stream.
    fn encode(frame: &Frame) -> Result<Bytes>;

    /// Decode one frame from a byte slice.
    ///
    /// The slice must hold exactly one frame: a declared length
    /// inconsistent with the available bytes is rejected, data is never
    /// silently lost or invented. End-of-stream decodes ignore anything
    /// past the tag, so peers that pad the frame with a zero length field
    /// still interoperate.
    ///
    /// # Errors
    ///
    /// [`VecwireError::SizeMismatch`], [`VecwireError::UnknownTag`] or
    /// [`VecwireError::Utf8`].
    fn decode(bytes: &[u8]) -> Result<Frame>;

    /// Total size in bytes of the frame starting at `ptr`, header included.
    ///
    /// # Safety
    ///
    /// `ptr` must point at a frame written by a conforming peer; with no
    /// allocation bound to check against, the length field is trusted.
    unsafe fn frame_len_at(ptr: *const u8) -> Result<usize>;
}

/// Decode the frame at a leased address and reclaim the region.
///
/// The region is freed whether or not the payload decodes, so a malformed
/// payload cannot leak the input. The one exception is an unrecognized tag:
/// the frame cannot be sized, the region is left in place and the call
/// fails (it will trap at the boundary anyway).
///
/// # Safety
///
/// The lease must refer to a live allocation holding one complete frame in
/// this codec's framing.
pub unsafe fn take_frame<C: FrameCodec>(lease: Lease) -> Result<Frame> {
    let ptr = lease.into_raw();
    let total = unsafe { C::frame_len_at(ptr)? };
    let frame = {
        let bytes = unsafe { slice::from_raw_parts(ptr, total) };
        C::decode(bytes)
    };
    unsafe { memory::free(ptr, total) };
    frame
}

/// Encode a frame into a fresh guest allocation and return its address.
///
/// The allocation size is exactly the frame size; ownership of the address
/// transfers to the caller, which must eventually free it.
///
/// # Errors
///
/// Propagates encode errors plus [`VecwireError::Alloc`].
pub fn emit<C: FrameCodec>(frame: &Frame) -> Result<*mut u8> {
    let wire = C::encode(frame)?;
    let ptr = memory::try_alloc(wire.len())?;
    unsafe { ptr::copy_nonoverlapping(wire.as_ptr(), ptr, wire.len()) };
    Ok(ptr)
}

/// Validate a payload length against the 4-byte length field.
pub(crate) fn check_len(payload: &str) -> Result<u32> {
    u32::try_from(payload.len()).map_err(|_| VecwireError::LengthOverflow(payload.len()))
}

/// Read the length field from the front of `bytes`; `header` is the data
/// header size reported on failure.
pub(crate) fn read_len(bytes: &[u8], header: usize) -> Result<u32> {
    match bytes.first_chunk::<LEN_SIZE>() {
        Some(raw) => Ok(u32::from_le_bytes(*raw)),
        None => Err(VecwireError::SizeMismatch {
            expected: header,
            found: bytes.len(),
        }),
    }
}

/// Read a length field at `ptr` (unaligned, little-endian).
pub(crate) unsafe fn read_len_at(ptr: *const u8) -> u32 {
    let mut raw = [0u8; LEN_SIZE];
    unsafe { ptr::copy_nonoverlapping(ptr, raw.as_mut_ptr(), LEN_SIZE) };
    u32::from_le_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_then_take_frame_round_trip() {
        let ptr = emit::<Tagged>(&Frame::Data("round trip".into())).unwrap();
        let frame = unsafe { take_frame::<Tagged>(Lease::new(ptr)) }.unwrap();
        assert_eq!(frame, Frame::Data("round trip".into()));
    }

    #[test]
    fn test_take_frame_reclaims_the_input_region() {
        let ptr = emit::<Tagged>(&Frame::Data("owned".into())).unwrap();
        assert!(memory::is_live(ptr));
        let frame = unsafe { take_frame::<Tagged>(Lease::new(ptr)) }.unwrap();
        assert!(!frame.is_end_of_stream());
        assert!(!memory::is_live(ptr));
    }

    #[test]
    fn test_emit_allocates_exactly_the_frame_size() {
        // Tagged data frame: 1 tag byte + 4 length bytes + payload.
        let ptr = emit::<Tagged>(&Frame::Data("abc".into())).unwrap();
        let bytes = unsafe { std::slice::from_raw_parts(ptr, 8) };
        assert_eq!(bytes, &[TAG_DATA, 3, 0, 0, 0, b'a', b'b', b'c']);
        unsafe { memory::free(ptr, 8) };
    }

    #[test]
    fn test_emit_end_of_stream_is_one_byte() {
        let ptr = emit::<Tagged>(&Frame::EndOfStream).unwrap();
        assert_eq!(unsafe { ptr.read() }, TAG_EOS);
        let frame = unsafe { take_frame::<Tagged>(Lease::new(ptr)) }.unwrap();
        assert!(frame.is_end_of_stream());
    }

    #[test]
    fn test_take_frame_rejects_unknown_tag() {
        let ptr = memory::alloc(5);
        unsafe { ptr.write(9) };
        let err = unsafe { take_frame::<Tagged>(Lease::new(ptr)) }.unwrap_err();
        assert!(matches!(err, VecwireError::UnknownTag(9)));
        // The region could not be sized, so it is still live.
        assert!(memory::is_live(ptr));
        unsafe { memory::free(ptr, 5) };
    }
}
