//! Untagged framing: `[len: u32 LE][payload]`.
//!
//! No type discrimination: every frame is a data frame, so this variant
//! serves single-shot deployments only. Encoding [`Frame::EndOfStream`] is
//! a defined error rather than a silent fallback, the two variants are not
//! wire-compatible and must not be mixed.
//!
//! ```text
//! ┌───────────┬────────────────┐
//! │ Length    │ Payload        │
//! │ 4 B u32 LE│ Length bytes   │
//! └───────────┴────────────────┘
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::{check_len, read_len, read_len_at, Frame, FrameCodec, LEN_SIZE};
use crate::error::{Result, VecwireError};

/// The untagged framing variant.
pub struct Untagged;

impl FrameCodec for Untagged {
    const DATA_HEADER_SIZE: usize = LEN_SIZE;

    fn encode(frame: &Frame) -> Result<Bytes> {
        match frame {
            Frame::EndOfStream => Err(VecwireError::EosNotSupported),
            Frame::Data(payload) => {
                let len = check_len(payload)?;
                let mut buf = BytesMut::with_capacity(Self::DATA_HEADER_SIZE + payload.len());
                buf.put_u32_le(len);
                buf.put_slice(payload.as_bytes());
                Ok(buf.freeze())
            }
        }
    }

    fn decode(bytes: &[u8]) -> Result<Frame> {
        let len = read_len(bytes, Self::DATA_HEADER_SIZE)? as usize;
        let expected = Self::DATA_HEADER_SIZE + len;
        if bytes.len() != expected {
            return Err(VecwireError::SizeMismatch {
                expected,
                found: bytes.len(),
            });
        }
        let payload = String::from_utf8(bytes[Self::DATA_HEADER_SIZE..].to_vec())?;
        Ok(Frame::Data(payload))
    }

    unsafe fn frame_len_at(ptr: *const u8) -> Result<usize> {
        let len = unsafe { read_len_at(ptr) };
        Ok(Self::DATA_HEADER_SIZE + len as usize)
    }
}
