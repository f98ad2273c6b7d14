//! Typed payload helpers.
//!
//! Payloads on the wire are plain UTF-8 text; in practice most transforms
//! work on structured JSON documents. These helpers bridge the two with
//! `serde`, so a transform can be written against typed values and adapted
//! into a payload-level [`Transform`] with [`typed_transform`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entry::{BoxError, Transform};

/// Deserialize a payload string into a typed value.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if the payload does not parse
/// as a `T`.
pub fn from_payload<T: DeserializeOwned>(payload: &str) -> serde_json::Result<T> {
    serde_json::from_str(payload)
}

/// Serialize a typed value into a payload string.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if the value cannot be
/// serialized.
pub fn to_payload<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Adapt a typed function into a payload [`Transform`].
///
/// A parse or serialize failure surfaces as a transform failure, fatal for
/// the call like any other.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use vecwire::entry::{BoxError, Transform};
/// use vecwire::typed::typed_transform;
///
/// #[derive(Deserialize, Serialize)]
/// struct Person {
///     #[serde(rename = "Age")]
///     age: u64,
/// }
///
/// let grow = typed_transform(|mut person: Person| -> Result<Person, BoxError> {
///     person.age += 10;
///     Ok(person)
/// });
/// assert_eq!(grow.apply(r#"{"Age":30}"#).unwrap(), r#"{"Age":40}"#);
/// ```
pub fn typed_transform<I, O, F>(f: F) -> impl Transform
where
    I: DeserializeOwned,
    O: Serialize,
    F: Fn(I) -> std::result::Result<O, BoxError>,
{
    move |payload: &str| -> std::result::Result<String, BoxError> {
        let input: I = from_payload(payload)?;
        let output = f(input)?;
        Ok(to_payload(&output)?)
    }
}
