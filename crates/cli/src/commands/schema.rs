//! Schema Commands

use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;

use tccloud_provider::schema::{Attribute, Kind, Mutability, Presence, SchemaDoc};
use tccloud_provider::TencentCloudProvider;

use crate::output::{print_document, print_list, OutputFormat, TableDisplay};

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Show one resource or data source type instead of the whole provider
    #[arg(long = "type")]
    pub type_name: Option<String>,
}

/// One attribute row, with nested block attributes flattened to dotted names.
#[derive(Serialize)]
struct AttributeRow {
    name: String,
    kind: String,
    presence: Presence,
    mutability: Mutability,
    description: &'static str,
}

impl TableDisplay for AttributeRow {
    fn headers() -> Vec<&'static str> {
        vec!["ATTRIBUTE", "KIND", "PRESENCE", "ON CHANGE", "DESCRIPTION"]
    }

    fn row(&self) -> Vec<String> {
        let presence = match self.presence {
            Presence::Required => "required",
            Presence::Optional => "optional",
            Presence::Computed => "computed",
        };
        let mutability = match (self.presence, self.mutability) {
            (Presence::Computed, _) => "",
            (_, Mutability::Mutable) => "update",
            (_, Mutability::ForceNew) => "replace",
            (_, Mutability::Immutable) => "rejected",
        };
        vec![
            self.name.clone(),
            self.kind.clone(),
            presence.to_string(),
            mutability.to_string(),
            self.description.to_string(),
        ]
    }
}

#[derive(Serialize)]
struct TypeRow {
    kind: &'static str,
    type_name: &'static str,
    identity: String,
    description: &'static str,
}

impl TableDisplay for TypeRow {
    fn headers() -> Vec<&'static str> {
        vec!["KIND", "TYPE", "IDENTITY", "DESCRIPTION"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.kind.to_string(),
            self.type_name.to_string(),
            self.identity.clone(),
            self.description.to_string(),
        ]
    }
}

fn kind_name(kind: &Kind) -> String {
    match kind {
        Kind::String => "string".to_string(),
        Kind::Int => "int".to_string(),
        Kind::Bool => "bool".to_string(),
        Kind::Float => "float".to_string(),
        Kind::Json => "json".to_string(),
        Kind::List(scalar) => format!("list({})", scalar.name()),
        Kind::Set(scalar) => format!("set({})", scalar.name()),
        Kind::Block(_) => "block".to_string(),
        Kind::BlockList(_) => "list(block)".to_string(),
    }
}

fn attribute_rows(attrs: &[Attribute], prefix: &str, out: &mut Vec<AttributeRow>) {
    for attr in attrs {
        let name = if prefix.is_empty() {
            attr.name.to_string()
        } else {
            format!("{}.{}", prefix, attr.name)
        };
        out.push(AttributeRow {
            name: name.clone(),
            kind: kind_name(&attr.kind),
            presence: attr.presence,
            mutability: attr.mutability,
            description: attr.description,
        });
        if let Some(nested) = attr.kind.nested() {
            attribute_rows(nested, &name, out);
        }
    }
}

fn type_rows<'a>(kind: &'static str, docs: &'a [SchemaDoc]) -> impl Iterator<Item = TypeRow> + 'a {
    docs.iter().map(move |doc| TypeRow {
        kind,
        type_name: doc.type_name,
        identity: doc.identity.join("#"),
        description: doc.description,
    })
}

pub fn execute(args: SchemaArgs, format: OutputFormat) -> Result<()> {
    let schema = TencentCloudProvider::new().schema();

    let Some(type_name) = args.type_name else {
        if matches!(format, OutputFormat::Table) {
            let rows: Vec<TypeRow> = type_rows("resource", &schema.resources)
                .chain(type_rows("data source", &schema.data_sources))
                .collect();
            return print_list(&rows, format);
        }
        return print_document(&schema, format);
    };

    let doc = schema
        .resources
        .iter()
        .chain(schema.data_sources.iter())
        .find(|doc| doc.type_name == type_name)
        .ok_or_else(|| anyhow!("unknown resource or data source type `{}`", type_name))?;

    if matches!(format, OutputFormat::Table) {
        println!("{}: {}", doc.type_name, doc.description);
        if !doc.identity.is_empty() {
            println!("Identity: {}", doc.identity.join("#"));
        }
        let mut rows = Vec::new();
        attribute_rows(doc.attributes, "", &mut rows);
        return print_list(&rows, format);
    }
    print_document(doc, format)
}
