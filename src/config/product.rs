//! The pakager configuration schema.

use super::{Constraint, Dependencies, Format, GroupConstraint, Schema, SchemaError, SchemaNode};
use serde_json::{Value, json};

/// Prefix for generated bundle identifiers.
pub const APP_ID_PREFIX: &str = "com.pakager.";

/// Output directory used when `pakager.outputDir` is not set.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

fn app_id(deps: &Dependencies<'_>) -> Option<Value> {
    deps.str("pakager.name")
        .map(|name| Value::String(format!("{APP_ID_PREFIX}{name}")))
}

fn copyright(deps: &Dependencies<'_>) -> Option<Value> {
    deps.str("pakager.author")
        .map(|author| Value::String(format!("Copyright © {} {}", deps.year(), author)))
}

impl Schema {
    /// Builds the schema for `package.json`-style pakager configuration.
    ///
    /// Top-level `name`/`version`/`author` act as fallbacks for the nested
    /// `pakager` section; at least one of each pair must be supplied.
    pub fn pakager() -> Result<Schema, SchemaError> {
        let formats = Format::ALL.iter().map(|f| f.as_str().to_string()).collect();

        let mac = SchemaNode::object("mac").required().fields(vec![
            SchemaNode::path("binary")
                .required()
                .constraint(Constraint::ExistingFile),
            SchemaNode::string("category")
                .advisory("no category set; LSApplicationCategoryType will be omitted"),
            SchemaNode::path("icon")
                .advisory("no icon set; the bundle will use the generic application icon")
                .constraint(Constraint::EndsWith(vec![".png".into(), ".icns".into()]))
                .constraint(Constraint::ExistingFile),
            SchemaNode::array("formats")
                .default_literal(json!([Format::App.as_str()]))
                .constraint(Constraint::OneOf(formats))
                .constraint(Constraint::Unique),
            SchemaNode::boolean("backgroundApp").default_ref("pakager.backgroundApp"),
            SchemaNode::boolean("darkModeSupport").default_literal(json!(true)),
            SchemaNode::object("customInfo").default_literal(json!({})),
        ]);

        let pakager = SchemaNode::object("pakager").required().fields(vec![
            SchemaNode::string("name").default_ref("name"),
            SchemaNode::string("version").default_ref("version"),
            SchemaNode::string("author").default_ref("author"),
            SchemaNode::string("realName")
                .default_ref("pakager.name")
                .constraint(Constraint::FileName),
            SchemaNode::string("appId").computed(&["pakager.name"], app_id),
            SchemaNode::string("copyright").computed(&["pakager.author"], copyright),
            SchemaNode::path("outputDir").default_literal(json!(DEFAULT_OUTPUT_DIR)),
            SchemaNode::boolean("backgroundApp").default_literal(json!(false)),
            mac,
        ]);

        Schema::new(
            SchemaNode::root(vec![
                SchemaNode::string("name"),
                SchemaNode::string("version"),
                SchemaNode::string("author"),
                pakager,
            ]),
            vec![
                GroupConstraint::any_of(&["name", "pakager.name"]),
                GroupConstraint::any_of(&["author", "pakager.author"]),
                GroupConstraint::any_of(&["version", "pakager.version"]),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldPath;

    #[test]
    fn product_schema_is_well_formed() {
        let schema = Schema::pakager().expect("product schema builds");
        assert!(schema.index_of(&FieldPath::parse("pakager.mac.binary")).is_some());
        assert_eq!(schema.groups().len(), 3);
    }

    #[test]
    fn app_id_waits_for_nested_name() {
        let schema = Schema::pakager().unwrap();
        let pos = |path: &str| {
            let idx = schema.index_of(&FieldPath::parse(path)).unwrap();
            schema.order().iter().position(|&i| i == idx).unwrap()
        };
        assert!(pos("name") < pos("pakager.name"));
        assert!(pos("pakager.name") < pos("pakager.appId"));
        assert!(pos("pakager.name") < pos("pakager.realName"));
        assert!(pos("pakager.author") < pos("pakager.copyright"));
        assert!(pos("pakager.backgroundApp") < pos("pakager.mac.backgroundApp"));
    }
}
