//! Response body decoding.
//!
//! [`Decoding::Structured`] follows the protobuf JSON mapping the lenient way:
//! producers emit lowerCamelCase member names and may send `null` for unset
//! fields, while Rust message types use snake_case fields. Members are renamed
//! to snake_case, `null` members are dropped, and unknown members are
//! discarded by serde as usual. Map-typed fields have their keys renamed too,
//! so targets with free-form string keys should use [`Decoding::PlainJson`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::clients::http_request::Decoding;

/// Decodes `body` into `T` using exactly one decoder.
pub(crate) fn decode<T: DeserializeOwned>(
    body: &str,
    decoding: Decoding,
) -> Result<T, serde_json::Error> {
    match decoding {
        Decoding::PlainJson => serde_json::from_str(body),
        Decoding::Structured => {
            let value: Value = serde_json::from_str(body)?;
            serde_json::from_value(to_field_names(value))
        }
    }
}

fn to_field_names(value: Value) -> Value {
    match value {
        Value::Object(members) => Value::Object(
            members
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (snake_case(&k), to_field_names(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(to_field_names).collect()),
        other => other,
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Device {
        device_id: String,
        #[serde(default)]
        tenant_id: Option<String>,
        size: u64,
    }

    #[test]
    fn test_snake_case_conversion() {
        assert_eq!(snake_case("deviceId"), "device_id");
        assert_eq!(snake_case("device_id"), "device_id");
        assert_eq!(snake_case("name"), "name");
        assert_eq!(snake_case("Name"), "name");
    }

    #[test]
    fn test_plain_json_requires_exact_names() {
        let body = r#"{"deviceId":"abc","size":1}"#;
        let result: Result<Device, _> = decode(body, Decoding::PlainJson);
        assert!(result.is_err());
    }

    #[test]
    fn test_structured_accepts_camel_case_and_nulls() {
        let body = r#"{"deviceId":"abc","tenantId":null,"size":1024,"unknownField":true}"#;
        let device: Device = decode(body, Decoding::Structured).unwrap();
        assert_eq!(
            device,
            Device {
                device_id: "abc".to_string(),
                tenant_id: None,
                size: 1024,
            }
        );
    }

    #[test]
    fn test_structured_renames_nested_members() {
        #[derive(Debug, Deserialize)]
        struct Listing {
            devices: Vec<Device>,
        }

        let body = r#"{"devices":[{"deviceId":"a","size":1},{"device_id":"b","size":2}]}"#;
        let listing: Listing = decode(body, Decoding::Structured).unwrap();
        assert_eq!(listing.devices.len(), 2);
        assert_eq!(listing.devices[1].device_id, "b");
    }

    #[test]
    fn test_invalid_json_fails_in_both_modes() {
        assert!(decode::<Value>("not json", Decoding::PlainJson).is_err());
        assert!(decode::<Value>("not json", Decoding::Structured).is_err());
    }
}
