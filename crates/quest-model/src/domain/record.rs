use std::collections::BTreeMap;

use crate::ChallengeId;

/// A single value of a stored document field.
///
/// Mirrors the scalar kinds document databases hand back; the service never trusts
/// a record to match the challenge schema until it has been mapped.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Null,
    /// A value kind the service has no use for (timestamps, maps, arrays, ...), by name.
    Unsupported(String),
}

impl FieldValue {
    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Integer(_) => "integer",
            FieldValue::Double(_) => "double",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Null => "null",
            FieldValue::Unsupported(kind) => kind,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// Loosely-typed field map of a stored document.
pub type Record = BTreeMap<String, FieldValue>;

/// A stored document: its id plus raw fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: ChallengeId,
    pub fields: Record,
}

impl Document {
    pub fn new(id: impl Into<ChallengeId>, fields: Record) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}
