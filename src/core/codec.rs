//! Response body decoding shared by every exchange.
//!
//! A body is first checked for the exchange's `{code, msg}` error envelope and
//! only then decoded into the endpoint's response type.

use crate::core::errors::{ApiErrorKind, BodyError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use tracing::trace;

/// Exchange-owned mapping from numeric error codes to semantic causes.
pub trait ErrorCodeTable: Send + Sync {
    /// Codes that mean "no error", e.g. `0` or `200`.
    fn is_success(&self, code: i64) -> bool;

    /// Cause for a documented failure code, `None` when unmapped.
    fn kind(&self, code: i64) -> Option<ApiErrorKind>;
}

/// Minimal error envelope. Some exchanges call the text `msg`, others `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default, alias = "message")]
    pub msg: String,
}

/// Checks a body for an error envelope.
///
/// Bodies that are not JSON objects, or that fail to parse as an envelope, are
/// not envelopes and pass.
pub fn check_envelope<C>(table: &C, body: &[u8]) -> Result<(), BodyError>
where
    C: ErrorCodeTable + ?Sized,
{
    let first = body.iter().find(|b| !b.is_ascii_whitespace());
    if first != Some(&b'{') {
        return Ok(());
    }
    let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) else {
        return Ok(());
    };

    let ErrorEnvelope { code, msg } = envelope;
    if table.is_success(code) {
        return Ok(());
    }
    if code > 0 {
        return Err(BodyError::UnexpectedCode { code, message: msg });
    }

    trace!(code, msg = %msg, "error envelope");
    Err(BodyError::Exchange {
        code,
        kind: table.kind(code),
        message: msg,
    })
}

/// Envelope check followed by the payload decoder.
pub fn decode_with_envelope<C, R, F>(table: &C, body: &[u8], payload: F) -> Result<R, BodyError>
where
    C: ErrorCodeTable + ?Sized,
    F: FnOnce(&[u8]) -> Result<R, BodyError>,
{
    check_envelope(table, body)?;
    payload(body)
}

/// Response types that know how to build themselves from raw bytes.
pub trait FromBody: Sized {
    fn from_body(body: &[u8]) -> Result<Self, BodyError>;
}

/// Marker for response types decoded as JSON.
pub trait JsonBody: DeserializeOwned {}

impl<T: JsonBody> FromBody for T {
    fn from_body(body: &[u8]) -> Result<Self, BodyError> {
        serde_json::from_slice(body).map_err(BodyError::decode)
    }
}

/// Passed through verbatim.
impl FromBody for String {
    fn from_body(body: &[u8]) -> Result<Self, BodyError> {
        Self::from_utf8(body.to_vec()).map_err(BodyError::decode)
    }
}

impl JsonBody for Value {}
impl<T: DeserializeOwned> JsonBody for Vec<T> {}
impl<K: DeserializeOwned + Ord, V: DeserializeOwned> JsonBody for BTreeMap<K, V> {}
impl<K, V, S> JsonBody for HashMap<K, V, S>
where
    K: DeserializeOwned + Eq + Hash,
    V: DeserializeOwned,
    S: BuildHasher + Default,
{
}

/// Plain decoder without envelope handling, usable as a [`BodyDecoder`](crate::core::endpoint::BodyDecoder).
pub fn decode<R: FromBody>(body: &[u8]) -> Result<R, BodyError> {
    R::from_body(body)
}

/// Decodes rows encoded as JSON arrays into named structs.
///
/// Position `i` of each row is renamed to `fields[i]` before deserializing.
/// Positions past the end of `fields` are dropped.
pub fn decode_positional_rows<T: DeserializeOwned>(
    body: &[u8],
    fields: &[&str],
) -> Result<Vec<T>, BodyError> {
    let rows: Vec<Vec<Value>> = serde_json::from_slice(body).map_err(BodyError::decode)?;
    rows.into_iter()
        .map(|row| {
            let object: Map<String, Value> = fields
                .iter()
                .zip(row)
                .map(|(name, value)| ((*name).to_string(), value))
                .collect();
            serde_json::from_value(Value::Object(object)).map_err(BodyError::decode)
        })
        .collect()
}
