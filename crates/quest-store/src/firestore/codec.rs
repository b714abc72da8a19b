//! Firestore REST wire format.
//!
//! Every field value travels as a single-key object naming its kind, e.g.
//! `{"stringValue": "u1"}` or `{"integerValue": "42"}` (64-bit integers are sent as strings).

use quest_model::{ChallengeId, Document, FieldValue, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::StoreError;

/// Document as returned by `get`, `create` and `runQuery`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireDocument {
    /// Full resource name, ending in `/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// One element of the `runQuery` response stream.
///
/// Elements without a document only carry read metadata.
#[derive(Debug, Deserialize)]
pub(crate) struct RunQueryItem {
    #[serde(default)]
    pub document: Option<WireDocument>,
}

/// Body of `create` and `patch` requests.
#[derive(Debug, Serialize)]
pub(crate) struct WriteDocument {
    pub fields: Map<String, Value>,
}

impl WriteDocument {
    pub fn from_record(fields: &Record) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(name, value)| (name.clone(), encode_value(value)))
                .collect(),
        }
    }
}

pub(crate) fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Integer(n) => json!({ "integerValue": n.to_string() }),
        FieldValue::Double(x) => json!({ "doubleValue": x }),
        FieldValue::Boolean(b) => json!({ "booleanValue": b }),
        FieldValue::Null | FieldValue::Unsupported(_) => json!({ "nullValue": null }),
    }
}

pub(crate) fn decode_value(value: &Value) -> Result<FieldValue, StoreError> {
    let Some((kind, inner)) = value.as_object().and_then(|obj| obj.iter().next()) else {
        return Err(StoreError::Decode(format!("expected typed value, got {value}")));
    };

    let bad = || StoreError::Decode(format!("invalid {kind}: {inner}"));
    match kind.as_str() {
        "stringValue" => inner
            .as_str()
            .map(|s| FieldValue::String(s.to_string()))
            .ok_or_else(bad),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse().ok())
            .or_else(|| inner.as_i64())
            .map(FieldValue::Integer)
            .ok_or_else(bad),
        "doubleValue" => inner
            .as_f64()
            .or_else(|| inner.as_str().and_then(|s| s.parse().ok()))
            .map(FieldValue::Double)
            .ok_or_else(bad),
        "booleanValue" => inner.as_bool().map(FieldValue::Boolean).ok_or_else(bad),
        "nullValue" => Ok(FieldValue::Null),
        other => Ok(FieldValue::Unsupported(other.to_string())),
    }
}

/// Id is the last segment of the resource name.
pub(crate) fn document_id(name: &str) -> Result<ChallengeId, StoreError> {
    match name.rsplit('/').next() {
        Some(id) if !id.is_empty() => Ok(ChallengeId::from(id)),
        _ => Err(StoreError::Decode(format!("invalid document name: {name}"))),
    }
}

pub(crate) fn decode_document(doc: WireDocument) -> Result<Document, StoreError> {
    let id = document_id(&doc.name)?;
    let fields = doc
        .fields
        .iter()
        .map(|(name, value)| decode_value(value).map(|v| (name.clone(), v)))
        .collect::<Result<Record, _>>()?;
    Ok(Document { id, fields })
}

/// `runQuery` body selecting documents of `collection` where `field == value`.
pub(crate) fn equality_query(collection: &str, field: &str, value: &FieldValue) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": encode_value(value),
                }
            }
        }
    })
}
