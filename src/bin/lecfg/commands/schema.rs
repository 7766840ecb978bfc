//! `lecfg schema` command

use anyhow::{bail, Result};

use super::parse_schema;
use crate::cli::SchemaArgs;
use lecfg::core::field::{CapabilityField, FieldDomain};
use lecfg::core::schema::OptionSchema;
use lecfg::SchemaVersion;

pub fn execute(args: SchemaArgs) -> Result<()> {
    let version = match &args.schema {
        Some(s) => parse_schema(s)?,
        None => SchemaVersion::default(),
    };
    let schema = OptionSchema::for_version(version);

    match args.format.as_str() {
        "text" => {
            println!("schema `{}`: {}", version, version.description());
            println!();
            for field in schema.fields() {
                println!(
                    "  {:<28} {:<18} default {:<12} {}",
                    field.name(),
                    domain_label(field.domain()),
                    field.default_value().to_string(),
                    field.description()
                );
            }
        }
        "json" => {
            let fields: Vec<_> = schema.fields().iter().map(field_json).collect();
            let doc = serde_json::json!({
                "schema": version,
                "fields": fields,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        other => bail!("unknown format `{}`, expected `text` or `json`", other),
    }

    Ok(())
}

fn domain_label(domain: &FieldDomain) -> String {
    match domain {
        FieldDomain::Integer(range) => range.to_string(),
        FieldDomain::Toggle => "true|false".to_string(),
        FieldDomain::Choice(values) => values.join("|"),
    }
}

fn field_json(field: &CapabilityField) -> serde_json::Value {
    serde_json::json!({
        "name": field.name(),
        "kind": field.kind().as_str(),
        "group": field.group().as_str(),
        "domain": domain_label(field.domain()),
        "default": field.default_value(),
        "description": field.description(),
    })
}
