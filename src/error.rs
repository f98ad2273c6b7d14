//! Error types for vecwire.

use thiserror::Error;

/// Main error type for all transport-vector operations.
///
/// The protocol has no recoverable-error path across the guest/host
/// boundary: every variant here is fatal for the current call. Internal
/// code propagates these as ordinary `Result`s so it stays testable; only
/// the exported ABI boundary (see the `export_*` macros) turns them into a
/// trap.
#[derive(Debug, Error)]
pub enum VecwireError {
    /// The requested allocation size could not be satisfied.
    #[error("allocation of {size} bytes failed")]
    Alloc {
        /// Requested size in bytes.
        size: usize,
    },

    /// A frame's declared size is inconsistent with the bytes backing it.
    #[error("frame size mismatch: expected {expected} bytes, found {found}")]
    SizeMismatch {
        /// Total frame size implied by the header.
        expected: usize,
        /// Bytes actually present.
        found: usize,
    },

    /// The type tag is not one of the two known tags.
    #[error("unknown frame tag {0:#04x}")]
    UnknownTag(u8),

    /// Payload bytes are not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A payload's byte length does not fit the 4-byte length field.
    #[error("payload of {0} bytes exceeds the 32-bit length field")]
    LengthOverflow(usize),

    /// The untagged framing has no way to express end-of-stream.
    #[error("untagged framing cannot encode end-of-stream")]
    EosNotSupported,

    /// The payload transform could not produce a result for this input.
    #[error("transform failed: {0}")]
    Transform(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// `pull_once` was called after end-of-stream was observed.
    #[error("stream already finished")]
    StreamFinished,

    /// An address was released that is not a live allocation
    /// (detected by the debug-build liveness registry only).
    #[error("address {0:#x} is not a live allocation")]
    DeadAddress(usize),
}

/// Result type alias using VecwireError.
pub type Result<T> = std::result::Result<T, VecwireError>;
