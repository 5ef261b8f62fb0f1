//! Shapes of successful response bodies.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::error::{ApiError, ApiResult};

/// Parsed body of a write operation, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ApiReply {
    /// Decode one field of the reply.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.fields
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub(crate) fn from_value(value: Value) -> ApiResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => decode(value),
            other => {
                let mut fields = Map::new();
                fields.insert("data".to_string(), other);
                Ok(Self {
                    message: None,
                    fields,
                })
            }
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a collection that may be bare or wrapped as `{<key>: [...]}` / `{data: [...]}`.
pub(crate) fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> ApiResult<Vec<T>> {
    match value {
        Value::Array(_) => decode(value),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut obj) => match obj.remove(key).or_else(|| obj.remove("data")) {
            Some(inner @ Value::Array(_)) => decode(inner),
            _ => Err(ApiError::Decode(format!("expected a list under '{}'", key))),
        },
        _ => Err(ApiError::Decode("expected a list".to_string())),
    }
}

/// Decode a single record that may be bare or wrapped as `{<key>: {...}}` / `{data: {...}}`.
pub(crate) fn decode_item<T: DeserializeOwned>(value: Value, key: &str) -> ApiResult<T> {
    if let Value::Object(obj) = &value {
        if let Some(inner @ Value::Object(_)) = obj.get(key).or_else(|| obj.get("data")) {
            return decode(inner.clone());
        }
    }
    decode(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list_shapes() {
        let bare: Vec<i32> = decode_list(json!([1, 2]), "estates").unwrap();
        assert_eq!(bare, vec![1, 2]);

        let wrapped: Vec<i32> = decode_list(json!({"estates": [3]}), "estates").unwrap();
        assert_eq!(wrapped, vec![3]);

        let data: Vec<i32> = decode_list(json!({"data": [4], "total": 1}), "estates").unwrap();
        assert_eq!(data, vec![4]);

        assert!(decode_list::<i32>(json!({"count": 0}), "estates").is_err());
    }

    #[test]
    fn test_decode_item_wrapped() {
        #[derive(Deserialize)]
        struct Named {
            name: String,
        }
        let item: Named = decode_item(json!({"estate": {"name": "Hilltop"}}), "estate").unwrap();
        assert_eq!(item.name, "Hilltop");
        let bare: Named = decode_item(json!({"name": "Lakeside"}), "estate").unwrap();
        assert_eq!(bare.name, "Lakeside");
    }

    #[test]
    fn test_reply_field() {
        let reply = ApiReply::from_value(json!({"message": "created", "id": 12})).unwrap();
        assert_eq!(reply.message.as_deref(), Some("created"));
        assert_eq!(reply.field::<i64>("id"), Some(12));
    }
}
