//! Conversion between stored documents and [`Challenge`] values.
//!
//! Documents are untrusted: every required field is checked for presence and kind, and
//! numeric fields are coerced to non-negative integers. Integral doubles are accepted
//! because document databases may return whole numbers in floating-point form.

use quest_model::{
    Challenge, ChallengeId, Count, Document, FIELD_DESCRIPTION, FIELD_NAME, FIELD_PROGRESS,
    FIELD_TARGET, FIELD_USER_ID, FieldValue, Record,
};

use crate::error::CoreError;

/// Largest count representable by a stored integer.
const MAX_COUNT: Count = i64::MAX as Count;

/// Map a stored document to a challenge.
pub fn to_challenge(doc: &Document) -> Result<Challenge, CoreError> {
    let fields = &doc.fields;
    let id = &doc.id;

    Ok(Challenge {
        id: id.clone(),
        user_id: string_field(id, fields, FIELD_USER_ID)?,
        name: string_field(id, fields, FIELD_NAME)?,
        description: string_field(id, fields, FIELD_DESCRIPTION)?,
        target: count_field(id, fields, FIELD_TARGET)?,
        progress: count_field(id, fields, FIELD_PROGRESS)?,
    })
}

/// Fields of a freshly created challenge. Progress always starts at zero.
pub fn new_record(user_id: &str, name: &str, description: &str, target: Count) -> Record {
    let mut fields = Record::new();
    fields.insert(FIELD_USER_ID.to_string(), FieldValue::from(user_id));
    fields.insert(FIELD_NAME.to_string(), FieldValue::from(name));
    fields.insert(FIELD_DESCRIPTION.to_string(), FieldValue::from(description));
    fields.insert(FIELD_TARGET.to_string(), count_value(target));
    fields.insert(FIELD_PROGRESS.to_string(), count_value(0));
    fields
}

/// Partial update writing only `progress`.
pub fn progress_patch(progress: Count) -> Record {
    let mut fields = Record::new();
    fields.insert(FIELD_PROGRESS.to_string(), count_value(progress));
    fields
}

fn count_value(n: Count) -> FieldValue {
    FieldValue::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}

fn malformed(id: &ChallengeId, field: &'static str, reason: impl Into<String>) -> CoreError {
    CoreError::MalformedRecord {
        id: id.clone(),
        field,
        reason: reason.into(),
    }
}

fn required<'a>(
    id: &ChallengeId,
    fields: &'a Record,
    field: &'static str,
) -> Result<&'a FieldValue, CoreError> {
    fields
        .get(field)
        .ok_or_else(|| malformed(id, field, "is missing"))
}

fn string_field(
    id: &ChallengeId,
    fields: &Record,
    field: &'static str,
) -> Result<String, CoreError> {
    match required(id, fields, field)? {
        FieldValue::String(s) => Ok(s.clone()),
        other => Err(malformed(
            id,
            field,
            format!("expected string, got {}", other.kind()),
        )),
    }
}

fn count_field(
    id: &ChallengeId,
    fields: &Record,
    field: &'static str,
) -> Result<Count, CoreError> {
    match required(id, fields, field)? {
        FieldValue::Integer(n) => Count::try_from(*n)
            .map_err(|_| malformed(id, field, format!("is negative ({n})"))),
        FieldValue::Double(x) if x.is_finite() && x.fract() == 0.0 => {
            if *x < 0.0 {
                Err(malformed(id, field, format!("is negative ({x})")))
            } else if *x >= MAX_COUNT as f64 {
                Err(malformed(id, field, format!("is out of range ({x})")))
            } else {
                Ok(*x as Count)
            }
        }
        FieldValue::Double(x) => Err(malformed(id, field, format!("is not a whole number ({x})"))),
        other => Err(malformed(
            id,
            field,
            format!("expected integer, got {}", other.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(fields: Record) -> Document {
        Document::new("c1", fields)
    }

    fn valid_fields() -> Record {
        new_record("u1", "Run 5k", "three runs", 5)
    }

    fn assert_malformed(result: Result<Challenge, CoreError>, expected_field: &str) {
        match result {
            Err(CoreError::MalformedRecord { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected malformed record for {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn maps_complete_document() {
        let challenge = to_challenge(&doc(valid_fields())).unwrap();

        assert_eq!(challenge.id, ChallengeId::from("c1"));
        assert_eq!(challenge.user_id, "u1");
        assert_eq!(challenge.name, "Run 5k");
        assert_eq!(challenge.description, "three runs");
        assert_eq!(challenge.target, 5);
        assert_eq!(challenge.progress, 0);
    }

    #[test]
    fn new_record_forces_zero_progress() {
        let fields = new_record("u1", "n", "d", 9);
        assert_eq!(fields.get(FIELD_PROGRESS), Some(&FieldValue::Integer(0)));
        assert_eq!(fields.get(FIELD_TARGET), Some(&FieldValue::Integer(9)));
    }

    #[test]
    fn every_required_field_is_checked() {
        for field in [
            FIELD_USER_ID,
            FIELD_NAME,
            FIELD_DESCRIPTION,
            FIELD_TARGET,
            FIELD_PROGRESS,
        ] {
            let mut fields = valid_fields();
            fields.remove(field);
            assert_malformed(to_challenge(&doc(fields)), field);
        }
    }

    #[test]
    fn wrong_kinds_are_rejected() {
        let mut fields = valid_fields();
        fields.insert(FIELD_NAME.to_string(), FieldValue::Integer(3));
        assert_malformed(to_challenge(&doc(fields)), FIELD_NAME);

        let mut fields = valid_fields();
        fields.insert(FIELD_TARGET.to_string(), FieldValue::from("5"));
        assert_malformed(to_challenge(&doc(fields)), FIELD_TARGET);

        let mut fields = valid_fields();
        fields.insert(
            FIELD_PROGRESS.to_string(),
            FieldValue::Unsupported("mapValue".into()),
        );
        assert_malformed(to_challenge(&doc(fields)), FIELD_PROGRESS);
    }

    #[test]
    fn negative_counts_are_rejected() {
        let mut fields = valid_fields();
        fields.insert(FIELD_PROGRESS.to_string(), FieldValue::Integer(-1));
        assert_malformed(to_challenge(&doc(fields)), FIELD_PROGRESS);
    }

    #[test]
    fn integral_doubles_are_coerced() {
        let mut fields = valid_fields();
        fields.insert(FIELD_TARGET.to_string(), FieldValue::Double(10.0));
        fields.insert(FIELD_PROGRESS.to_string(), FieldValue::Double(4.0));

        let challenge = to_challenge(&doc(fields)).unwrap();
        assert_eq!(challenge.target, 10);
        assert_eq!(challenge.progress, 4);
    }

    #[test]
    fn fractional_doubles_are_rejected() {
        let mut fields = valid_fields();
        fields.insert(FIELD_TARGET.to_string(), FieldValue::Double(2.5));
        assert_malformed(to_challenge(&doc(fields)), FIELD_TARGET);

        let mut fields = valid_fields();
        fields.insert(FIELD_TARGET.to_string(), FieldValue::Double(f64::NAN));
        assert_malformed(to_challenge(&doc(fields)), FIELD_TARGET);
    }

    #[test]
    fn progress_patch_touches_only_progress() {
        let patch = progress_patch(3);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get(FIELD_PROGRESS), Some(&FieldValue::Integer(3)));
    }
}
