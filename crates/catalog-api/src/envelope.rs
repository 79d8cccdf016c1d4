// Response envelope handling
//
// The backend wraps success payloads as `{ data: T | T[] }` and failures as
// `{ error: "..." }` or `{ message: "..." }`. A few endpoints (brands, users)
// answer with the bare payload instead. Everything is normalized here so the
// clients only ever see typed payloads or a single error message.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

/// Keys checked, in order, for a human-readable failure message.
const ERROR_KEYS: [&str; 2] = ["error", "message"];

/// Pull the server-supplied message out of an error body.
///
/// Returns `None` for non-JSON bodies or bodies without a usable message.
pub(crate) fn error_message(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    ERROR_KEYS.iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
            .map(str::to_owned)
    })
}

/// Unwrap a collection response.
///
/// A missing or `null` `data` field yields an empty list rather than an error.
pub(crate) fn list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let items = match parse(body)? {
        value @ Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Array(_)) => data,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    decode(items, body)
}

/// Unwrap a single-entity response.
///
/// Prefers `data`; when it is absent the whole body is tried as the entity.
pub(crate) fn single<T: DeserializeOwned>(body: &str, resource: &str) -> Result<T, Error> {
    match parse(body)? {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Null) | None => serde_json::from_value(Value::Object(map)).map_err(|_| {
                Error::EnvelopeMismatch {
                    resource: resource.to_owned(),
                }
            }),
            Some(data) => decode(data, body),
        },
        _ => Err(Error::EnvelopeMismatch {
            resource: resource.to_owned(),
        }),
    }
}

/// Parse any JSON body, keeping a preview of it on failure.
pub(crate) fn parse(body: &str) -> Result<Value, Error> {
    serde_json::from_str(body).map_err(|e| deserialization(&e, body))
}

fn decode<T: DeserializeOwned>(value: Value, body: &str) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| deserialization(&e, body))
}

fn deserialization(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u64,
    }

    #[test]
    fn list_reads_data_array() {
        let items: Vec<Item> = list(r#"{"success":true,"data":[{"id":1},{"id":2}]}"#).unwrap();
        assert_eq!(items, vec![Item { id: 1 }, Item { id: 2 }]);
    }

    #[test]
    fn list_accepts_bare_array() {
        let items: Vec<Item> = list(r#"[{"id":7}]"#).unwrap();
        assert_eq!(items, vec![Item { id: 7 }]);
    }

    #[test]
    fn list_without_data_is_empty() {
        assert!(list::<Item>(r#"{"success":true}"#).unwrap().is_empty());
        assert!(list::<Item>(r#"{"data":null}"#).unwrap().is_empty());
        assert!(list::<Item>("").unwrap().is_empty());
    }

    #[test]
    fn list_with_malformed_items_is_a_deserialization_error() {
        let err = list::<Item>(r#"{"data":[{"id":"nope"}]}"#).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn single_prefers_data_then_bare_body() {
        let wrapped: Item = single(r#"{"data":{"id":3}}"#, "pricings").unwrap();
        assert_eq!(wrapped, Item { id: 3 });

        let bare: Item = single(r#"{"id":4}"#, "brands").unwrap();
        assert_eq!(bare, Item { id: 4 });
    }

    #[test]
    fn single_without_entity_is_envelope_mismatch() {
        let err = single::<Item>(r#"{"success":true}"#, "pricings").unwrap_err();
        assert!(matches!(err, Error::EnvelopeMismatch { ref resource } if resource == "pricings"));
    }

    #[test]
    fn error_message_prefers_error_key() {
        assert_eq!(
            error_message(r#"{"error":"Title is required","message":"Bad Request"}"#).as_deref(),
            Some("Title is required")
        );
        assert_eq!(
            error_message(r#"{"message":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(r#"{"error":""}"#), None);
    }
}
