use serde_json::Value;

use crate::{ChannelError, RecordFields};

/// Decodes one `new_record` payload into displayable fields.
///
/// Only JSON objects are records. Strings are kept as-is, other scalars are
/// stringified, nested values are re-encoded as JSON and nulls are treated as
/// absent.
pub fn decode_record(payload: Value) -> Result<RecordFields, ChannelError> {
    let object = match payload {
        Value::Object(object) => object,
        other => {
            return Err(ChannelError::MalformedRecord(format!(
                "expected an object, got {}",
                kind_of(&other)
            )))
        }
    };

    Ok(object
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(text) => text,
                Value::Bool(flag) => flag.to_string(),
                Value::Number(number) => number.to_string(),
                nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
            };
            Some((key, text))
        })
        .collect())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_are_stringified_and_nulls_dropped() {
        let fields = decode_record(json!({
            "Person Name": "Ada Lovelace",
            "Verified Email": true,
            "Employees": 42,
            "Designation": null,
        }))
        .unwrap();

        assert_eq!(fields["Person Name"], "Ada Lovelace");
        assert_eq!(fields["Verified Email"], "true");
        assert_eq!(fields["Employees"], "42");
        assert!(!fields.contains_key("Designation"));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = decode_record(json!(["not", "a", "record"])).unwrap_err();
        assert!(matches!(err, ChannelError::MalformedRecord(_)));
        assert!(err.to_string().contains("an array"));
    }
}
