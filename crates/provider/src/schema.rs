//! Declarative attribute descriptors
//!
//! Every resource and data source is described by a static table of
//! [`Attribute`]s. The mapper, validation, planning and the schema export all
//! walk the same table.

use serde::Serialize;

/// Scalar element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    String,
    Int,
    Bool,
    Float,
}

impl Scalar {
    pub fn name(&self) -> &'static str {
        match self {
            Scalar::String => "string",
            Scalar::Int => "int",
            Scalar::Bool => "bool",
            Scalar::Float => "float",
        }
    }
}

/// Attribute value kinds.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "type", content = "element", rename_all = "snake_case")]
pub enum Kind {
    String,
    Int,
    Bool,
    Float,
    /// Opaque payload carried as JSON text.
    Json,
    /// Ordered list of scalars.
    List(Scalar),
    /// Unordered scalars, sorted and de-duplicated on read.
    Set(Scalar),
    /// Optional nested object, represented as a list of at most one.
    Block(&'static [Attribute]),
    /// Ordered list of nested objects.
    BlockList(&'static [Attribute]),
}

impl Kind {
    pub fn nested(&self) -> Option<&'static [Attribute]> {
        match self {
            Kind::Block(attrs) | Kind::BlockList(attrs) => Some(attrs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    /// Set by the remote side only.
    Computed,
}

/// How a change to an attribute is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    /// Changed in place by Update.
    Mutable,
    /// A change replaces the resource.
    ForceNew,
    /// A change is rejected.
    Immutable,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    /// Remote field name; empty for attributes that never reach the API.
    #[serde(skip_serializing_if = "str::is_empty")]
    pub api_name: &'static str,
    pub kind: Kind,
    pub presence: Presence,
    pub mutability: Mutability,
    /// Sent on writes but never returned by reads.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub write_only: bool,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
}

impl Attribute {
    const fn new(name: &'static str, api_name: &'static str, kind: Kind, presence: Presence) -> Self {
        Self {
            name,
            api_name,
            kind,
            presence,
            mutability: Mutability::Mutable,
            write_only: false,
            description: "",
        }
    }

    pub const fn required(name: &'static str, api_name: &'static str, kind: Kind) -> Self {
        Self::new(name, api_name, kind, Presence::Required)
    }

    pub const fn optional(name: &'static str, api_name: &'static str, kind: Kind) -> Self {
        Self::new(name, api_name, kind, Presence::Optional)
    }

    pub const fn computed(name: &'static str, api_name: &'static str, kind: Kind) -> Self {
        Self::new(name, api_name, kind, Presence::Computed)
    }

    /// An optional argument handled by the provider itself.
    pub const fn local(name: &'static str, kind: Kind) -> Self {
        Self::new(name, "", kind, Presence::Optional)
    }

    pub const fn force_new(self) -> Self {
        Self {
            mutability: Mutability::ForceNew,
            ..self
        }
    }

    pub const fn immutable(self) -> Self {
        Self {
            mutability: Mutability::Immutable,
            ..self
        }
    }

    pub const fn write_only(self) -> Self {
        Self {
            write_only: true,
            ..self
        }
    }

    pub const fn doc(self, description: &'static str) -> Self {
        Self { description, ..self }
    }

    /// Whether the attribute is taken from configuration.
    pub fn is_writable(&self) -> bool {
        self.presence != Presence::Computed
    }

    pub fn is_remote(&self) -> bool {
        !self.api_name.is_empty()
    }
}

/// Whether any attribute in the table, at any depth, is write-only.
pub fn has_write_only(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .any(|attr| attr.write_only || attr.kind.nested().is_some_and(has_write_only))
}

/// Look up an attribute by configuration name.
pub fn find<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.name == name)
}

/// Exported description of a resource or data source.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDoc {
    pub type_name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identity: Vec<&'static str>,
    pub attributes: &'static [Attribute],
}

/// The whole provider: settings, resources and data sources.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: &'static [Attribute],
    pub resources: Vec<SchemaDoc>,
    pub data_sources: Vec<SchemaDoc>,
}

/// Settings accepted by `configure`.
pub const PROVIDER_ATTRIBUTES: &[Attribute] = &[
    Attribute::local("secret_id", Kind::String)
        .doc("API secret id. Falls back to TENCENTCLOUD_SECRET_ID."),
    Attribute::local("secret_key", Kind::String)
        .doc("API secret key. Falls back to TENCENTCLOUD_SECRET_KEY."),
    Attribute::local("security_token", Kind::String)
        .doc("Temporary session token. Falls back to TENCENTCLOUD_SECURITY_TOKEN."),
    Attribute::local("region", Kind::String)
        .doc("Region to operate in. Falls back to TENCENTCLOUD_REGION."),
    Attribute::local("domain", Kind::String).doc("API endpoint domain suffix."),
    Attribute::local("protocol", Kind::String).doc("`https` or `http`."),
    Attribute::local("endpoint", Kind::String).doc("Full endpoint URL override."),
    Attribute::local("request_timeout", Kind::Int).doc("Per-request timeout in seconds."),
    Attribute::local("rate_limit", Kind::Int).doc("API calls per second allowed for one action."),
];
