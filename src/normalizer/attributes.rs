//! Coercion of OTLP values and identifiers into meta strings.

use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};

/// Renders any OTLP value as a string. Absent values render as "".
pub fn value_as_string(value: Option<&AnyValue>) -> String {
    match value.and_then(|v| v.value.as_ref()) {
        Some(any_value::Value::StringValue(s)) => s.clone(),
        Some(any_value::Value::IntValue(i)) => i.to_string(),
        Some(any_value::Value::DoubleValue(d)) => d.to_string(),
        Some(any_value::Value::BoolValue(b)) => b.to_string(),
        Some(any_value::Value::BytesValue(b)) => hex::encode(b),
        Some(any_value::Value::ArrayValue(arr)) => {
            let items: Vec<String> = arr
                .values
                .iter()
                .map(|v| value_as_string(Some(v)))
                .collect();
            format!("[{}]", items.join(", "))
        }
        Some(any_value::Value::KvlistValue(kv)) => {
            let items: Vec<String> = kv
                .values
                .iter()
                .map(|kv| format!("{}={}", kv.key, value_as_string(kv.value.as_ref())))
                .collect();
            format!("{{{}}}", items.join(", "))
        }
        None => String::new(),
    }
}

/// Looks up `key` in an attribute list. A present key with an absent value
/// still counts as present.
pub fn find_attribute<'a>(attributes: &'a [KeyValue], key: &str) -> Option<&'a KeyValue> {
    attributes.iter().find(|kv| kv.key == key)
}

/// Lowercase hex of a trace or span id, or `None` when the id is empty.
///
/// An all-zero id is the OTLP encoding of "no id" and is treated as empty.
pub fn encode_id(bytes: &[u8]) -> Option<String> {
    if bytes.iter().all(|&b| b == 0) {
        return None;
    }
    Some(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::common::v1::{ArrayValue, KeyValueList};

    fn any(value: any_value::Value) -> AnyValue {
        AnyValue { value: Some(value) }
    }

    #[test]
    fn test_scalar_coercion() {
        assert_eq!(
            value_as_string(Some(&any(any_value::Value::StringValue("hello".into())))),
            "hello"
        );
        assert_eq!(value_as_string(Some(&any(any_value::Value::IntValue(42)))), "42");
        assert_eq!(value_as_string(Some(&any(any_value::Value::DoubleValue(1.5)))), "1.5");
        assert_eq!(value_as_string(Some(&any(any_value::Value::BoolValue(true)))), "true");
        assert_eq!(
            value_as_string(Some(&any(any_value::Value::BytesValue(vec![0xde, 0xad])))),
            "dead"
        );
        assert_eq!(value_as_string(None), "");
        assert_eq!(value_as_string(Some(&AnyValue { value: None })), "");
    }

    #[test]
    fn test_nested_coercion() {
        let array = any(any_value::Value::ArrayValue(ArrayValue {
            values: vec![
                any(any_value::Value::IntValue(1)),
                any(any_value::Value::StringValue("two".into())),
            ],
        }));
        assert_eq!(value_as_string(Some(&array)), "[1, two]");

        let kvlist = any(any_value::Value::KvlistValue(KeyValueList {
            values: vec![KeyValue {
                key: "k".into(),
                value: Some(any(any_value::Value::BoolValue(false))),
            }],
        }));
        assert_eq!(value_as_string(Some(&kvlist)), "{k=false}");
    }

    #[test]
    fn test_encode_id() {
        let trace_id = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
            0x0f, 0xAB,
        ];
        assert_eq!(
            encode_id(&trace_id).as_deref(),
            Some("0102030405060708090a0b0c0d0e0fab")
        );
        assert_eq!(encode_id(&[]), None);
        assert_eq!(encode_id(&[0; 8]), None);
    }
}
