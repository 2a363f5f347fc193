use relay_primitives::types::TransientMap;
use serde::Serialize;

#[derive(Debug, thiserror::Error, Serialize, PartialEq, Eq, Clone)]
pub enum TransientPayloadError {
    #[error("Transient data is required")]
    Missing,
    #[error("Transient data is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Transient data must be a JSON object")]
    NotAnObject,
    #[error("Transient data must have exactly one top-level key, found {0}")]
    KeyCount(usize),
    #[error("Expected transient document {expected}, found {found}")]
    UnexpectedDocument { expected: String, found: String },
}

/// Turns a `{"<document>": {...}}` payload into a transient map holding the
/// serialized nested document under `<document>`.
pub fn extract_document(
    raw: Option<&str>,
    document: &str,
) -> Result<TransientMap, TransientPayloadError> {
    let raw = raw.ok_or(TransientPayloadError::Missing)?;
    let payload: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| TransientPayloadError::InvalidJson(e.to_string()))?;
    let serde_json::Value::Object(object) = payload else {
        return Err(TransientPayloadError::NotAnObject);
    };
    if object.len() != 1 {
        return Err(TransientPayloadError::KeyCount(object.len()));
    }

    let (key, value) = object
        .into_iter()
        .next()
        .ok_or(TransientPayloadError::KeyCount(0))?;
    if key != document {
        return Err(TransientPayloadError::UnexpectedDocument {
            expected: document.to_string(),
            found: key,
        });
    }

    let bytes =
        serde_json::to_vec(&value).map_err(|e| TransientPayloadError::InvalidJson(e.to_string()))?;
    Ok(TransientMap::from([(key, bytes)]))
}
