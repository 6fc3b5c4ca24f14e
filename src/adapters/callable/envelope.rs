//! Callable response envelopes.
//!
//! Success bodies carry the payload under `data` (or `result` for older
//! deployments); failures carry `{ "error": { "message": .. } }`.

use crate::domain::DomainError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Payload keys, in lookup order.
const PAYLOAD_KEYS: [&str; 2] = ["data", "result"];

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract `T` from the success envelope.
///
/// Each payload key is tried in order; a key that is absent or `null` is
/// skipped. Fails with `MalformedEnvelope` when no key holds a payload and
/// with `TransportDecode` when the body is not JSON or the payload does not
/// match `T`.
pub fn decode_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, DomainError> {
    let envelope: Value = serde_json::from_slice(body)
        .map_err(|e| DomainError::TransportDecode(format!("invalid JSON body: {}", e)))?;

    let object = envelope.as_object().ok_or_else(|| {
        DomainError::TransportDecode("response body is not a JSON object".to_string())
    })?;

    let mut last_error = None;
    for key in PAYLOAD_KEYS {
        let Some(payload) = object.get(key).filter(|v| !v.is_null()) else {
            continue;
        };
        match T::deserialize(payload) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = Some(format!("{}: {}", key, e)),
        }
    }

    Err(match last_error {
        Some(detail) => DomainError::TransportDecode(detail),
        None => DomainError::MalformedEnvelope,
    })
}

/// Message from an error envelope, if the body is one.
pub fn decode_error(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}

/// Decode a callable response: the typed payload, else the server's error
/// message as `Remote`, else the payload decode failure.
pub fn decode_response<T: DeserializeOwned>(body: &[u8]) -> Result<T, DomainError> {
    decode_payload(body).map_err(|err| match decode_error(body) {
        Some(message) => DomainError::Remote(message),
        None => err,
    })
}
