//! Tagged framing: `[tag: u8][len: u32 LE][payload]`.
//!
//! The leading tag byte discriminates ordinary data (tag 1) from the
//! end-of-stream marker (tag 127), which makes this the variant used by the
//! pull-based streaming shape. An end-of-stream frame is exactly one byte:
//! the tag, no length field, no payload. Decoders accept a padded
//! end-of-stream frame (tag followed by a zero length field) but never read
//! past the tag themselves.
//!
//! ```text
//! ┌──────┬───────────┬────────────────┐
//! │ Tag  │ Length    │ Payload        │
//! │ 1 B  │ 4 B u32 LE│ Length bytes   │
//! └──────┴───────────┴────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use vecwire::codec::{Frame, FrameCodec, Tagged};
//!
//! let eos = Tagged::encode(&Frame::EndOfStream).unwrap();
//! assert_eq!(&eos[..], &[127]);
//! assert!(Tagged::decode(&eos).unwrap().is_end_of_stream());
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::{check_len, read_len, read_len_at, Frame, FrameCodec, LEN_SIZE, TAG_DATA, TAG_EOS};
use crate::error::{Result, VecwireError};

/// The tagged framing variant.
pub struct Tagged;

impl FrameCodec for Tagged {
    const DATA_HEADER_SIZE: usize = 1 + LEN_SIZE;

    fn encode(frame: &Frame) -> Result<Bytes> {
        match frame {
            Frame::EndOfStream => Ok(Bytes::from_static(&[TAG_EOS])),
            Frame::Data(payload) => {
                let len = check_len(payload)?;
                let mut buf = BytesMut::with_capacity(Self::DATA_HEADER_SIZE + payload.len());
                buf.put_u8(TAG_DATA);
                buf.put_u32_le(len);
                buf.put_slice(payload.as_bytes());
                Ok(buf.freeze())
            }
        }
    }

    fn decode(bytes: &[u8]) -> Result<Frame> {
        let tag = *bytes.first().ok_or(VecwireError::SizeMismatch {
            expected: 1,
            found: 0,
        })?;
        match tag {
            TAG_EOS => Ok(Frame::EndOfStream),
            TAG_DATA => {
                let len = read_len(&bytes[1..], Self::DATA_HEADER_SIZE)? as usize;
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
            other => Err(VecwireError::UnknownTag(other)),
        }
    }

    unsafe fn frame_len_at(ptr: *const u8) -> Result<usize> {
        match unsafe { ptr.read() } {
            TAG_EOS => Ok(1),
            TAG_DATA => {
                let len = unsafe { read_len_at(ptr.add(1)) };
                Ok(Self::DATA_HEADER_SIZE + len as usize)
            }
            other => Err(VecwireError::UnknownTag(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_round_trip() {
        let frame = Frame::Data(r#"{"FullName":"Ada","Age":30}"#.into());
        let wire = Tagged::encode(&frame).unwrap();
        assert_eq!(Tagged::decode(&wire).unwrap(), frame);
    }

    #[test]
    fn test_empty_payload_round_trip() {
        let wire = Tagged::encode(&Frame::Data(String::new())).unwrap();
        assert_eq!(&wire[..], &[TAG_DATA, 0, 0, 0, 0]);
        assert_eq!(Tagged::decode(&wire).unwrap(), Frame::Data(String::new()));
    }

    #[test]
    fn test_length_field_counts_utf8_bytes_not_chars() {
        // "é" is one char but two UTF-8 bytes; the length field must say 2.
        let wire = Tagged::encode(&Frame::Data("é".into())).unwrap();
        assert_eq!(wire[0], TAG_DATA);
        assert_eq!(u32::from_le_bytes([wire[1], wire[2], wire[3], wire[4]]), 2);
        assert_eq!(wire.len(), Tagged::DATA_HEADER_SIZE + 2);
        assert_eq!(Tagged::decode(&wire).unwrap(), Frame::Data("é".into()));
    }

    #[test]
    fn test_end_of_stream_is_a_single_tag_byte() {
        let wire = Tagged::encode(&Frame::EndOfStream).unwrap();
        assert_eq!(&wire[..], &[TAG_EOS]);
    }

    #[test]
    fn test_end_of_stream_decode_ignores_padded_length_field() {
        // Some peers write a zero length field after the tag; still EOS.
        let padded = [TAG_EOS, 0, 0, 0, 0];
        assert!(Tagged::decode(&padded).unwrap().is_end_of_stream());
        assert_eq!(Tagged::decode(&padded).unwrap().payload(), "");
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let wire = [42u8, 1, 0, 0, 0, b'x'];
        assert!(matches!(
            Tagged::decode(&wire),
            Err(VecwireError::UnknownTag(42))
        ));
    }

    #[test]
    fn test_decode_rejects_empty_buffer() {
        assert!(matches!(
            Tagged::decode(&[]),
            Err(VecwireError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_length_field() {
        assert!(matches!(
            Tagged::decode(&[TAG_DATA, 5, 0]),
            Err(VecwireError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_declared_length_past_buffer() {
        // Declares 10 payload bytes, provides 4.
        let wire = [TAG_DATA, 10, 0, 0, 0, b'a', b'b', b'c', b'd'];
        assert!(matches!(
            Tagged::decode(&wire),
            Err(VecwireError::SizeMismatch {
                expected: 15,
                found: 9
            })
        ));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes_after_payload() {
        // Declares 1 payload byte, provides 3: data would be lost silently.
        let wire = [TAG_DATA, 1, 0, 0, 0, b'a', b'b', b'c'];
        assert!(matches!(
            Tagged::decode(&wire),
            Err(VecwireError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8_payload() {
        let wire = [TAG_DATA, 2, 0, 0, 0, 0xFF, 0xFE];
        assert!(matches!(Tagged::decode(&wire), Err(VecwireError::Utf8(_))));
    }

    #[test]
    fn test_frame_len_at_reads_the_header() {
        let wire = Tagged::encode(&Frame::Data("abcd".into())).unwrap();
        let len = unsafe { Tagged::frame_len_at(wire.as_ptr()) }.unwrap();
        assert_eq!(len, wire.len());

        let eos = Tagged::encode(&Frame::EndOfStream).unwrap();
        assert_eq!(unsafe { Tagged::frame_len_at(eos.as_ptr()) }.unwrap(), 1);
    }
}
