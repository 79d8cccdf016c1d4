// Request body codecs
//
// JSON resources send the serialized payload as-is. Multipart resources
// flatten the same serialized payload into text parts and attach the image
// file as the `image` part, so both codecs share one sparse field set.

use reqwest::RequestBuilder;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::{BodyCodec, Payload};
use crate::error::Error;

/// Multipart field name for the uploaded file.
pub(crate) const IMAGE_FIELD: &str = "image";

pub(crate) enum EncodedBody {
    Json(Value),
    Multipart(Form),
}

impl EncodedBody {
    pub(crate) fn apply(self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Json(value) => builder.json(&value),
            Self::Multipart(form) => builder.multipart(form),
        }
    }
}

pub(crate) fn encode<P: Payload>(codec: BodyCodec, payload: &P) -> Result<EncodedBody, Error> {
    let value = serde_json::to_value(payload).map_err(|e| Error::Encoding(e.to_string()))?;

    match codec {
        BodyCodec::Json => Ok(EncodedBody::Json(value)),
        BodyCodec::Multipart => {
            let mut form = Form::new();
            for (name, text) in form_fields(value)? {
                form = form.text(name, text);
            }
            if let Some(image) = payload.image() {
                let part = Part::bytes(image.bytes.clone())
                    .file_name(image.file_name.clone())
                    .mime_str(&image.mime)
                    .map_err(|e| Error::Encoding(format!("invalid image MIME type: {e}")))?;
                form = form.part(IMAGE_FIELD, part);
            }
            Ok(EncodedBody::Multipart(form))
        }
    }
}

/// Flatten a serialized payload into `(name, text)` form fields.
///
/// Scalars become their string form, nested values are sent as JSON text,
/// and nulls are dropped.
pub(crate) fn form_fields(value: Value) -> Result<Vec<(String, String)>, Error> {
    let Value::Object(map) = value else {
        return Err(Error::Encoding("multipart payload must be an object".into()));
    };

    Ok(map
        .into_iter()
        .filter_map(|(name, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
            };
            Some((name, text))
        })
        .collect())
}
