//! Typed request and response models for the services the provider calls.
//!
//! Every field is optional: an absent field in a snapshot stays `None` and is
//! never confused with a zero value.

/// Declare an API model. Fields are `Option`s named in PascalCase on the wire
/// and omitted from requests when unset.
macro_rules! model {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $field:ident: $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "PascalCase")]
        pub struct $name {
            $(
                $(#[$fmeta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }
    };
}

pub mod mps;
pub mod pts;

use serde_json::{Map, Value};

use tccloud_common::{Error, Result};

/// Parse a flattened request object into a typed request.
pub fn request_from<T: serde::de::DeserializeOwned>(fields: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| Error::InvalidConfig(format!("request does not match the API model: {}", e)))
}

/// Serialize a typed snapshot for the mapper.
pub fn snapshot_of<T: serde::Serialize>(model: &T) -> Result<Value> {
    Ok(serde_json::to_value(model)?)
}

/// A create call that answered without the identifier it owes us.
pub(crate) fn missing_field(action: &str, field: &str) -> Error {
    Error::Internal(format!("{} response has no {}", action, field))
}
