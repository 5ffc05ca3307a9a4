use serde_json::{json, Map, Value};

use crate::domain::records::{FieldValue, Record};

/// Convert a domain record into the transport-safe document carried in a
/// webhook payload's `data` key.
///
/// Conversion is a dispatch over each field's semantic type:
/// dates and datetimes become ISO-8601 strings, a foreign reference
/// becomes its primary key plus a `<name>_display` sibling holding the
/// referenced record's display form (the sibling only appears when the
/// reference is non-null), a file reference becomes its public URL or is
/// omitted when null. Anything else passes through unchanged; an
/// unrecognized shape is never an error. Keys appear in field
/// declaration order, so the document is stable for a given state.
pub fn serialize_record(record: &dyn Record) -> Map<String, Value> {
    let mut document = Map::new();

    for field in record.fields() {
        let name = field.name.to_string();

        match field.value {
            FieldValue::Text(value) => {
                document.insert(name, value.map_or(Value::Null, Value::String));
            }
            FieldValue::Integer(value) => {
                document.insert(name, value.map_or(Value::Null, |v| json!(v)));
            }
            FieldValue::Decimal(value) => {
                // Decimals travel as canonical strings, never floats
                document.insert(name, value.map_or(Value::Null, Value::String));
            }
            FieldValue::Boolean(value) => {
                document.insert(name, value.map_or(Value::Null, Value::Bool));
            }
            FieldValue::Date(value) => {
                document.insert(
                    name,
                    value.map_or(Value::Null, |d| Value::String(d.to_string())),
                );
            }
            FieldValue::DateTime(value) => {
                document.insert(
                    name,
                    value.map_or(Value::Null, |t| Value::String(t.to_rfc3339())),
                );
            }
            FieldValue::Reference(Some(reference)) => {
                let display_name = format!("{}_display", field.name);
                document.insert(name, json!(reference.key));
                document.insert(display_name, Value::String(reference.display));
            }
            FieldValue::Reference(None) => {
                document.insert(name, Value::Null);
            }
            FieldValue::File(Some(url)) => {
                document.insert(name, Value::String(url));
            }
            FieldValue::File(None) => {
                // Null file references are omitted entirely
            }
            FieldValue::Json(value) => {
                document.insert(name, value);
            }
        }
    }

    document
}
