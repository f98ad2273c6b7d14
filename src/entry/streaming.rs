//! Pull-based streaming entry point.
//!
//! Instead of receiving its input as a call argument, the guest draws each
//! input vector from a host-supplied [`Source`]. The stream is driven one
//! item per call: every [`PullStream::pull_once`] makes exactly one
//! `next()` call and performs at most one allocation/free pair, never
//! buffering pulled items. Observing end-of-stream is terminal.

use std::marker::PhantomData;

use crate::codec::{self, Frame, FrameCodec};
use crate::error::{Result, VecwireError};
use crate::memory::Lease;

/// Capability handing the guest the address of the next input vector.
///
/// In a deployed module this is backed by the host's imported `next()`
/// function, which blocks until a vector is available (see
/// [`export_streaming!`](crate::export_streaming)). Tests substitute a
/// deterministic fake; any `FnMut() -> *mut u8` qualifies.
pub trait Source {
    /// Address of the next available transport vector.
    fn next(&mut self) -> *mut u8;
}

impl<F> Source for F
where
    F: FnMut() -> *mut u8,
{
    fn next(&mut self) -> *mut u8 {
        self()
    }
}

/// A pull stream over a [`Source`].
///
/// State machine: `AwaitingItem -> { ProcessingItem -> EmittingData |
/// EmittingEndOfStream }`. The only state carried across calls is the
/// terminal flag.
///
/// Streaming requires tagged framing; the untagged variant cannot express
/// the end-of-stream marker this state machine is built around.
pub struct PullStream<C: FrameCodec, S: Source> {
    source: S,
    finished: bool,
    _codec: PhantomData<C>,
}

impl<C: FrameCodec, S: Source> PullStream<C, S> {
    /// A fresh, open stream over `source`.
    pub fn new(source: S) -> Self {
        Self::resume(source, false)
    }

    /// Reconstruct a stream in a known state.
    ///
    /// Used by the export macros, which persist only the terminal flag
    /// across exported `transform()` calls.
    pub fn resume(source: S, finished: bool) -> Self {
        Self {
            source,
            finished,
            _codec: PhantomData,
        }
    }

    /// Whether end-of-stream has been observed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Pull one input vector, transform it, and return the address of the
    /// freshly encoded result.
    ///
    /// Calls `next()` exactly once. A data frame is decoded, transformed
    /// and re-encoded, and the stream stays open. An end-of-stream frame
    /// marks the stream finished and a fresh end-of-stream frame is
    /// returned; the consumed input is freed in both cases. Ownership of
    /// the returned address transfers to the caller.
    ///
    /// Calling again after end-of-stream fails with
    /// [`VecwireError::StreamFinished`] without touching the source.
    ///
    /// # Safety
    ///
    /// Every address the source yields must be a live allocation holding
    /// one complete frame in codec `C`'s framing, owned by this call once
    /// yielded.
    pub unsafe fn pull_once<T>(&mut self, transform: &T) -> Result<*mut u8>
    where
        T: crate::entry::Transform,
    {
        if self.finished {
            tracing::warn!("pull_once called after end-of-stream");
            return Err(VecwireError::StreamFinished);
        }

        let input = self.source.next();
        let frame = unsafe { codec::take_frame::<C>(Lease::new(input))? };

        let output = match frame {
            Frame::EndOfStream => {
                tracing::trace!("source reached end-of-stream");
                self.finished = true;
                Frame::EndOfStream
            }
            Frame::Data(payload) => Frame::Data(
                transform
                    .apply(&payload)
                    .map_err(VecwireError::Transform)?,
            ),
        };
        codec::emit::<C>(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::codec::{emit, take_frame, Tagged};
    use crate::entry::BoxError;
    use crate::memory;

    fn shout(payload: &str) -> std::result::Result<String, BoxError> {
        Ok(payload.to_uppercase())
    }

    /// Fake source: pre-encoded frames handed out in order, panicking if
    /// pulled past its end.
    fn queue_source(frames: Vec<Frame>) -> impl Source {
        let mut queued: VecDeque<*mut u8> = frames
            .iter()
            .map(|frame| emit::<Tagged>(frame).unwrap())
            .collect();
        move || queued.pop_front().expect("source pulled past its end")
    }

    #[test]
    fn test_data_frames_are_transformed_one_per_pull() {
        let source = queue_source(vec![
            Frame::Data("one".into()),
            Frame::Data("two".into()),
            Frame::EndOfStream,
        ]);
        let mut stream = PullStream::<Tagged, _>::new(source);

        for expected in ["ONE", "TWO"] {
            let out = unsafe { stream.pull_once(&shout) }.unwrap();
            let frame = unsafe { take_frame::<Tagged>(Lease::new(out)) }.unwrap();
            assert_eq!(frame, Frame::Data(expected.into()));
            assert!(!stream.is_finished());
        }

        let out = unsafe { stream.pull_once(&shout) }.unwrap();
        let frame = unsafe { take_frame::<Tagged>(Lease::new(out)) }.unwrap();
        assert!(frame.is_end_of_stream());
        assert!(stream.is_finished());
    }

    #[test]
    fn test_pull_after_end_of_stream_does_not_touch_the_source() {
        // The fake panics if next() is called again, so reaching the error
        // proves no further pull happened.
        let source = queue_source(vec![Frame::EndOfStream]);
        let mut stream = PullStream::<Tagged, _>::new(source);

        let out = unsafe { stream.pull_once(&shout) }.unwrap();
        unsafe { take_frame::<Tagged>(Lease::new(out)) }.unwrap();

        let err = unsafe { stream.pull_once(&shout) }.unwrap_err();
        assert!(matches!(err, VecwireError::StreamFinished));
    }

    #[test]
    fn test_each_pulled_input_is_freed() {
        let input = emit::<Tagged>(&Frame::Data("item".into())).unwrap();
        let mut handed = Some(input);
        let mut stream = PullStream::<Tagged, _>::new(move || handed.take().unwrap());

        let out = unsafe { stream.pull_once(&shout) }.unwrap();
        assert!(!memory::is_live(input));
        assert!(memory::is_live(out));
        unsafe { memory::free(out, 9) }; // tag + len + "ITEM"
    }

    #[test]
    fn test_resume_restores_the_terminal_flag() {
        let mut stream = PullStream::<Tagged, _>::resume(|| -> *mut u8 { unreachable!() }, true);
        let err = unsafe { stream.pull_once(&shout) }.unwrap_err();
        assert!(matches!(err, VecwireError::StreamFinished));
    }
}
