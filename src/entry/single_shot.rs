//! Single-shot entry point: one input vector in, one output vector out.

use crate::codec::{self, Frame, FrameCodec};
use crate::error::{Result, VecwireError};
use crate::memory::Lease;

/// Run one single-shot transform call.
///
/// Decodes the vector at `input`, applies `transform` to its payload,
/// encodes the result into a fresh allocation and returns the new address.
/// The input region is reclaimed before returning; ownership of the output
/// address transfers to the caller, which must eventually free it.
///
/// An end-of-stream input (expressible under tagged framing only) is
/// re-emitted unchanged without invoking the transform.
///
/// On any failure no partially constructed vector is returned; the error
/// propagates to the exported boundary, which traps.
///
/// # Safety
///
/// `input` must be a live allocation holding one complete frame in codec
/// `C`'s framing, exclusively owned by this call.
pub unsafe fn transform_at<C, T>(input: *mut u8, transform: &T) -> Result<*mut u8>
where
    C: FrameCodec,
    T: crate::entry::Transform,
{
    let frame = unsafe { codec::take_frame::<C>(Lease::new(input))? };
    tracing::trace!(
        payload_len = frame.payload().len(),
        eos = frame.is_end_of_stream(),
        "decoded input vector"
    );

    let output = match frame {
        Frame::EndOfStream => Frame::EndOfStream,
        Frame::Data(payload) => Frame::Data(
            transform
                .apply(&payload)
                .map_err(VecwireError::Transform)?,
        ),
    };
    codec::emit::<C>(&output)
}
