//! Guest entry points.
//!
//! The fixed function surface a host runtime is permitted to call,
//! composing the frame codec with an arbitrary payload [`Transform`]:
//!
//! - [`transform_at`] - single-shot call/response: one input address in,
//!   one output address out.
//! - [`PullStream`] - pull-based streaming: the guest draws input vectors
//!   from a host-supplied [`Source`] until it observes end-of-stream.
//!
//! Both shapes are stateless apart from the stream's terminal flag, and
//! strictly synchronous: control passes host -> guest -> host once per
//! call, with no concurrent invocations against one guest instance.
//!
//! # Example
//!
//! ```
//! use vecwire::codec::{Frame, Tagged};
//! use vecwire::entry::{transform_at, BoxError};
//! use vecwire::memory::Lease;
//!
//! let shout = |payload: &str| -> Result<String, BoxError> {
//!     Ok(payload.to_uppercase())
//! };
//!
//! let input = vecwire::codec::emit::<Tagged>(&Frame::Data("hi".into())).unwrap();
//! let output = unsafe { transform_at::<Tagged, _>(input, &shout) }.unwrap();
//! let frame = unsafe { vecwire::codec::take_frame::<Tagged>(Lease::new(output)) }.unwrap();
//! assert_eq!(frame.payload(), "HI");
//! ```

mod single_shot;
mod streaming;

pub use single_shot::transform_at;
pub use streaming::{PullStream, Source};

/// Boxed error type produced by payload transforms.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A payload transform: a pure function from one UTF-8 payload to another.
///
/// Supplied by guest-side user code and treated as opaque by the transport
/// layer. A failure is fatal for the current call; the wire has no error
/// frame that could carry it to the host.
pub trait Transform {
    /// Apply the transform to a decoded payload.
    fn apply(&self, payload: &str) -> std::result::Result<String, BoxError>;
}

impl<F> Transform for F
where
    F: Fn(&str) -> std::result::Result<String, BoxError>,
{
    fn apply(&self, payload: &str) -> std::result::Result<String, BoxError> {
        self(payload)
    }
}
