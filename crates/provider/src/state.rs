//! Configuration attribute trees
//!
//! The declarative side of every resource is a [`DynamicValue`]: the shape
//! the configuration runtime hands us for config, prior and planned state.
//! State files on disk are the JSON encoding of this tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tccloud_common::Result;

/// Dynamic value of a configuration attribute tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum DynamicValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<DynamicValue>),
    Map(BTreeMap<String, DynamicValue>),
}

impl DynamicValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Null)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DynamicValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DynamicValue::Float(n) => Some(*n),
            DynamicValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DynamicValue]> {
        match self {
            DynamicValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, DynamicValue>> {
        match self {
            DynamicValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, DynamicValue>> {
        match self {
            DynamicValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.as_map()?.get(key)
    }

    /// Short name of the variant, used in mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            DynamicValue::Null => "null",
            DynamicValue::Bool(_) => "bool",
            DynamicValue::Int(_) => "int",
            DynamicValue::Float(_) => "float",
            DynamicValue::String(_) => "string",
            DynamicValue::List(_) => "list",
            DynamicValue::Map(_) => "map",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            DynamicValue::Null => Value::Null,
            DynamicValue::Bool(b) => Value::Bool(*b),
            DynamicValue::Int(n) => Value::from(*n),
            DynamicValue::Float(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            DynamicValue::String(s) => Value::String(s.clone()),
            DynamicValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            DynamicValue::Map(m) => Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for DynamicValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => DynamicValue::Null,
            Value::Bool(b) => DynamicValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => DynamicValue::Int(i),
                None => n.as_f64().map(DynamicValue::Float).unwrap_or_default(),
            },
            Value::String(s) => DynamicValue::String(s.clone()),
            Value::Array(items) => DynamicValue::List(items.iter().map(Into::into).collect()),
            Value::Object(m) => DynamicValue::Map(
                m.iter()
                    .map(|(k, v)| (k.clone(), DynamicValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Decode a state document. Empty input is the null state.
pub fn decode_dynamic_value(data: &[u8]) -> Result<DynamicValue> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(DynamicValue::Null);
    }
    let value: Value = serde_json::from_slice(data)?;
    Ok(DynamicValue::from(&value))
}

/// Encode a value as a pretty JSON state document.
pub fn encode_dynamic_value(value: &DynamicValue) -> Result<Vec<u8>> {
    let bytes = serde_json::to_vec_pretty(&value.to_json())?;
    Ok(bytes)
}

/// Helper to extract an optional string attribute from a DynamicValue
pub fn get_optional_string_attr(value: &DynamicValue, key: &str) -> Option<String> {
    value.get(key).and_then(|v| match v {
        DynamicValue::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// Helper to extract a string attribute from a DynamicValue
pub fn get_string_attr(value: &DynamicValue, key: &str) -> String {
    get_optional_string_attr(value, key).unwrap_or_default()
}

/// Create a DynamicValue map with the given attributes
pub fn make_state(attrs: Vec<(&str, DynamicValue)>) -> DynamicValue {
    let mut map = BTreeMap::new();
    for (key, value) in attrs {
        map.insert(key.to_string(), value);
    }
    DynamicValue::Map(map)
}

/// Create a string DynamicValue
pub fn string_value(s: impl Into<String>) -> DynamicValue {
    DynamicValue::String(s.into())
}

/// Create a list of strings
pub fn string_list<S: AsRef<str>>(items: &[S]) -> DynamicValue {
    DynamicValue::List(items.iter().map(|s| string_value(s.as_ref())).collect())
}
