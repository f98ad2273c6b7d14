//! # vecwire
//!
//! Guest-side SDK for the transport-vector calling convention: a host
//! runtime and a sandboxed guest compute module exchange variable-length,
//! typed payloads across a linear-memory boundary with no shared pointers
//! and no garbage collector spanning the boundary. The guest receives raw
//! byte ranges, decodes them into frames, applies a user-supplied
//! transform, re-encodes the result and hands ownership of a new byte
//! range back to the host.
//!
//! ## Architecture
//!
//! - **Allocator shim** ([`memory`]): the guest-side `alloc`/`free`
//!   primitives every transport buffer goes through, plus the [`Lease`]
//!   guard enforcing that a host-supplied address is consumed exactly once.
//! - **Frame codec** ([`codec`]): the wire framing, in two variants behind
//!   one trait ([`Tagged`] with an end-of-stream tag, [`Untagged`] without).
//! - **Entry points** ([`entry`]): the single-shot and pull-streaming call
//!   shapes composing codec, allocator and transform.
//! - **ABI macros** ([`export_single_shot!`], [`export_streaming!`]): the
//!   exported function surface of a deployed wasm module; the only place
//!   an error becomes a trap.
//!
//! ## Example
//!
//! A complete streaming guest module:
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use vecwire::entry::BoxError;
//! use vecwire::typed::typed_transform;
//!
//! #[derive(Deserialize, Serialize)]
//! struct Person {
//!     #[serde(rename = "Age")]
//!     age: u64,
//! }
//!
//! vecwire::export_streaming!(typed_transform(|mut p: Person| -> Result<Person, BoxError> {
//!     p.age += 10;
//!     Ok(p)
//! }));
//! ```
//!
//! ## Ownership contract
//!
//! Every address the guest hands to the host transfers ownership to the
//! host, which must eventually call `free`; every address the host hands
//! to the guest transfers ownership to the guest, which frees it before
//! returning. Each address has exactly one owner at any time; debug builds
//! back this up with a liveness registry that turns double-free and
//! use-after-free into loud failures.

pub mod codec;
pub mod entry;
pub mod error;
pub mod memory;
pub mod typed;

mod exports;

pub use codec::{Frame, FrameCodec, Tagged, Untagged};
pub use entry::{PullStream, Source, Transform};
pub use error::{Result, VecwireError};
pub use memory::Lease;
