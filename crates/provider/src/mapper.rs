//! Bidirectional field mapper
//!
//! `flatten` turns a configuration tree into a remote request object keyed by
//! API field names. `unflatten` turns a remote snapshot back into a
//! configuration tree. Both are driven only by the attribute table.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::warn;

use tccloud_common::{Error, Result};

use crate::schema::{Attribute, Kind, Presence, Scalar};
use crate::state::DynamicValue;

/// Build a request object from the writable attributes of `tree`.
pub fn flatten(attrs: &[Attribute], tree: &DynamicValue) -> Result<Map<String, Value>> {
    flatten_block(attrs, tree, "")
}

/// Build a configuration tree from a remote snapshot.
pub fn unflatten(attrs: &[Attribute], snapshot: &Value) -> DynamicValue {
    DynamicValue::Map(unflatten_block(attrs, snapshot, ""))
}

/// Map a list of records independently, skipping the malformed ones.
pub fn unflatten_records(attrs: &[Attribute], records: &[Value]) -> Vec<DynamicValue> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            if record.is_object() {
                Some(unflatten(attrs, record))
            } else {
                warn!(index, "Skipping malformed record: expected an object");
                None
            }
        })
        .collect()
}

/// Flatten a single attribute value; `None` when it maps to nothing.
pub fn flatten_attribute(attr: &Attribute, value: &DynamicValue) -> Result<Option<Value>> {
    if value.is_null() {
        return Ok(None);
    }
    flatten_value(attr, value, attr.name)
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn mismatch(path: &str, expected: &str, found: &DynamicValue) -> Error {
    Error::InvalidConfig(format!(
        "`{}`: expected {}, found {}",
        path,
        expected,
        found.type_name()
    ))
}

fn flatten_block(attrs: &[Attribute], tree: &DynamicValue, path: &str) -> Result<Map<String, Value>> {
    let fields = match tree {
        DynamicValue::Map(fields) => Some(fields),
        DynamicValue::Null => None,
        other => return Err(mismatch(path, "object", other)),
    };

    let mut out = Map::new();
    for attr in attrs.iter().filter(|a| a.is_writable() && a.is_remote()) {
        let at = join(path, attr.name);
        let value = fields
            .and_then(|f| f.get(attr.name))
            .filter(|v| !v.is_null());

        let flattened = match value {
            Some(value) => flatten_value(attr, value, &at)?,
            None => None,
        };
        match flattened {
            Some(json) => {
                out.insert(attr.api_name.to_string(), json);
            }
            None if attr.presence == Presence::Required => {
                return Err(Error::InvalidConfig(format!(
                    "missing required attribute `{}`",
                    at
                )));
            }
            None => {}
        }
    }
    Ok(out)
}

fn flatten_value(attr: &Attribute, value: &DynamicValue, path: &str) -> Result<Option<Value>> {
    let json = match attr.kind {
        Kind::String => flatten_scalar(Scalar::String, value, path)?,
        Kind::Int => flatten_scalar(Scalar::Int, value, path)?,
        Kind::Bool => flatten_scalar(Scalar::Bool, value, path)?,
        Kind::Float => flatten_scalar(Scalar::Float, value, path)?,
        Kind::Json => match value {
            DynamicValue::String(text) => serde_json::from_str(text).map_err(|e| {
                Error::InvalidConfig(format!("`{}`: invalid JSON payload: {}", path, e))
            })?,
            other => other.to_json(),
        },
        Kind::List(scalar) | Kind::Set(scalar) => {
            let items = value
                .as_list()
                .ok_or_else(|| mismatch(path, "list", value))?;
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                out.push(flatten_scalar(scalar, item, &format!("{}.{}", path, index))?);
            }
            Value::Array(out)
        }
        Kind::Block(inner) => match value {
            DynamicValue::List(items) => match items.as_slice() {
                [] => return Ok(None),
                [single] => Value::Object(flatten_block(inner, single, &format!("{}.0", path))?),
                _ => {
                    return Err(Error::InvalidConfig(format!(
                        "`{}`: at most one block is allowed, found {}",
                        path,
                        items.len()
                    )))
                }
            },
            DynamicValue::Map(_) => Value::Object(flatten_block(inner, value, path)?),
            other => return Err(mismatch(path, "block", other)),
        },
        Kind::BlockList(inner) => {
            let items = value
                .as_list()
                .ok_or_else(|| mismatch(path, "list of blocks", value))?;
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                out.push(Value::Object(flatten_block(
                    inner,
                    item,
                    &format!("{}.{}", path, index),
                )?));
            }
            Value::Array(out)
        }
    };
    Ok(Some(json))
}

fn flatten_scalar(scalar: Scalar, value: &DynamicValue, path: &str) -> Result<Value> {
    match (scalar, value) {
        (Scalar::String, DynamicValue::String(s)) => Ok(Value::String(s.clone())),
        (Scalar::Bool, DynamicValue::Bool(b)) => Ok(Value::Bool(*b)),
        (Scalar::Int, DynamicValue::Int(n)) => Ok(Value::from(*n)),
        (Scalar::Int, DynamicValue::Float(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Ok(Value::from(*f as i64))
        }
        (Scalar::Float, DynamicValue::Float(_) | DynamicValue::Int(_)) => Ok(value.to_json()),
        (scalar, other) => Err(mismatch(path, scalar.name(), other)),
    }
}

fn unflatten_block(attrs: &[Attribute], snapshot: &Value, path: &str) -> BTreeMap<String, DynamicValue> {
    let mut out = BTreeMap::new();
    let Some(fields) = snapshot.as_object() else {
        return out;
    };

    for attr in attrs.iter().filter(|a| a.is_remote()) {
        let at = join(path, attr.name);
        match (attr.kind, fields.get(attr.api_name).filter(|v| !v.is_null())) {
            (Kind::Block(_), None) => {
                out.insert(attr.name.to_string(), DynamicValue::List(Vec::new()));
            }
            (_, None) => {}
            (_, Some(raw)) => match unflatten_value(attr, raw, &at) {
                Some(value) => {
                    out.insert(attr.name.to_string(), value);
                }
                None => warn!(attribute = %at, "Skipping remote value of unexpected type"),
            },
        }
    }
    out
}

fn unflatten_value(attr: &Attribute, raw: &Value, path: &str) -> Option<DynamicValue> {
    match attr.kind {
        Kind::String => unflatten_scalar(Scalar::String, raw),
        Kind::Int => unflatten_scalar(Scalar::Int, raw),
        Kind::Bool => unflatten_scalar(Scalar::Bool, raw),
        Kind::Float => unflatten_scalar(Scalar::Float, raw),
        Kind::Json => serde_json::to_string(raw).ok().map(DynamicValue::String),
        Kind::List(scalar) => raw
            .as_array()?
            .iter()
            .map(|item| unflatten_scalar(scalar, item))
            .collect::<Option<Vec<_>>>()
            .map(DynamicValue::List),
        Kind::Set(scalar) => raw
            .as_array()?
            .iter()
            .map(|item| unflatten_scalar(scalar, item))
            .collect::<Option<Vec<_>>>()
            .map(|items| DynamicValue::List(canonical_set(items))),
        Kind::Block(inner) => {
            raw.as_object()?;
            Some(DynamicValue::List(vec![DynamicValue::Map(unflatten_block(
                inner,
                raw,
                &format!("{}.0", path),
            ))]))
        }
        Kind::BlockList(inner) => {
            let items = raw.as_array()?;
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                if item.is_object() {
                    out.push(DynamicValue::Map(unflatten_block(
                        inner,
                        item,
                        &format!("{}.{}", path, index),
                    )));
                } else {
                    warn!(attribute = %path, index, "Skipping nested record that is not an object");
                }
            }
            Some(DynamicValue::List(out))
        }
    }
}

fn unflatten_scalar(scalar: Scalar, raw: &Value) -> Option<DynamicValue> {
    match scalar {
        Scalar::String => raw.as_str().map(|s| DynamicValue::String(s.to_string())),
        Scalar::Bool => raw.as_bool().map(DynamicValue::Bool),
        Scalar::Int => raw
            .as_i64()
            .or_else(|| raw.as_u64().and_then(|n| i64::try_from(n).ok()))
            .map(DynamicValue::Int),
        Scalar::Float => raw.as_f64().map(DynamicValue::Float),
    }
}

fn compare_scalars(a: &DynamicValue, b: &DynamicValue) -> Ordering {
    match (a, b) {
        (DynamicValue::String(x), DynamicValue::String(y)) => x.cmp(y),
        (DynamicValue::Int(x), DynamicValue::Int(y)) => x.cmp(y),
        (DynamicValue::Bool(x), DynamicValue::Bool(y)) => x.cmp(y),
        _ => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or_else(|| a.type_name().cmp(b.type_name())),
    }
}

/// Sort and de-duplicate the members of a set-typed attribute.
pub fn canonical_set(mut items: Vec<DynamicValue>) -> Vec<DynamicValue> {
    items.sort_by(compare_scalars);
    items.dedup();
    items
}

/// Normalise a configuration value so it compares equal to what a read
/// would produce. Sets are canonicalised, JSON text is re-encoded and empty
/// nested blocks are dropped.
pub fn normalize(attr: &Attribute, value: &DynamicValue) -> DynamicValue {
    match (attr.kind, value) {
        (Kind::Set(_), DynamicValue::List(items)) => DynamicValue::List(canonical_set(items.clone())),
        (Kind::Json, DynamicValue::String(text)) => serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|json| serde_json::to_string(&json).ok())
            .map(DynamicValue::String)
            .unwrap_or_else(|| value.clone()),
        (Kind::Block(inner), DynamicValue::List(items)) | (Kind::BlockList(inner), DynamicValue::List(items)) => {
            DynamicValue::List(items.iter().map(|item| normalize_block(inner, item)).collect())
        }
        _ => value.clone(),
    }
}

fn normalize_block(attrs: &[Attribute], value: &DynamicValue) -> DynamicValue {
    match value {
        DynamicValue::Map(fields) => DynamicValue::Map(
            fields
                .iter()
                .filter(|(_, v)| !is_absent(Some(v)))
                .map(|(key, v)| {
                    let normalized = match crate::schema::find(attrs, key) {
                        Some(attr) => normalize(attr, v),
                        None => v.clone(),
                    };
                    (key.clone(), normalized)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Treat null, missing and an empty list alike.
pub fn is_absent(value: Option<&DynamicValue>) -> bool {
    match value {
        None | Some(DynamicValue::Null) => true,
        Some(DynamicValue::List(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Top-level attributes whose configured values differ between two trees.
pub fn changed_attributes<'a>(
    attrs: &'a [Attribute],
    prior: &DynamicValue,
    planned: &DynamicValue,
) -> Vec<&'a Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.is_writable())
        .filter(|attr| {
            let before = prior.get(attr.name);
            let after = planned.get(attr.name);
            match (is_absent(before), is_absent(after)) {
                (true, true) => false,
                (false, false) => match (before, after) {
                    (Some(b), Some(a)) => normalize(attr, b) != normalize(attr, a),
                    _ => true,
                },
                _ => true,
            }
        })
        .collect()
}
