//! Composite resource identifiers
//!
//! A remote resource is re-located from one opaque id string made of its
//! natural keys joined with [`ID_SEPARATOR`], e.g. `project-1#scenario-9`.

use std::fmt;

use crate::error::{Error, Result};

/// Separator between natural keys. Never legal inside a key component.
pub const ID_SEPARATOR: &str = "#";

/// An encoded composite identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeId {
    parts: Vec<String>,
}

impl CompositeId {
    /// Join the natural keys, rejecting components that would not split back.
    pub fn encode<S: AsRef<str>>(parts: &[S]) -> Result<Self> {
        if parts.is_empty() {
            return Err(Error::InvalidIdentity(
                "an identifier needs at least one part".to_string(),
            ));
        }
        let mut owned = Vec::with_capacity(parts.len());
        for part in parts {
            let part = part.as_ref();
            if part.is_empty() {
                return Err(Error::InvalidIdentity("empty identifier part".to_string()));
            }
            if part.contains(ID_SEPARATOR) {
                return Err(Error::InvalidIdentity(format!(
                    "`{}` contains the separator `{}`",
                    part, ID_SEPARATOR
                )));
            }
            owned.push(part.to_string());
        }
        Ok(Self { parts: owned })
    }

    /// Split a stored identifier, failing fast when the part count is wrong.
    pub fn decode(raw: &str, expected: usize) -> Result<Self> {
        let parts: Vec<String> = raw.split(ID_SEPARATOR).map(str::to_string).collect();
        if parts.len() != expected || parts.iter().any(String::is_empty) {
            return Err(Error::IdentityCorrupt {
                id: raw.to_string(),
                expected,
                found: parts.len(),
            });
        }
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn part(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(String::as_str)
    }

    pub fn into_parts(self) -> Vec<String> {
        self.parts
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join(ID_SEPARATOR))
    }
}

/// The documented, fixed order of natural keys for one resource type.
#[derive(Debug, Clone, Copy)]
pub struct IdentityLayout {
    pub parts: &'static [&'static str],
}

impl IdentityLayout {
    pub const fn new(parts: &'static [&'static str]) -> Self {
        Self { parts }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn encode<S: AsRef<str>>(&self, values: &[S]) -> Result<CompositeId> {
        if values.len() != self.parts.len() {
            return Err(Error::InvalidIdentity(format!(
                "expected {} parts ({}), got {}",
                self.parts.len(),
                self.parts.join(", "),
                values.len()
            )));
        }
        CompositeId::encode(values)
    }

    pub fn decode(&self, raw: &str) -> Result<CompositeId> {
        CompositeId::decode(raw, self.parts.len())
    }

    /// Look up a key by its attribute name.
    pub fn get<'a>(&self, id: &'a CompositeId, name: &str) -> Option<&'a str> {
        let index = self.parts.iter().position(|part| *part == name)?;
        id.part(index)
    }
}
