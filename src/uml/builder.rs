//! Diagram markup builder.
//!
//! Walks the entity metadata and emits one `table(...)` block per entity,
//! one line per column, and one relationship line per foreign key, wrapped
//! in `@startuml` / `@enduml` with the style preamble in between.

use super::{Connector, DiagramFlags, StyleSheet};
use crate::driver::{self, TypeDefaults};
use crate::parser::SqlDialect;
use crate::schema::{Column, Entity, ForeignKey, Schema};
use glob::Pattern;

/// A rendered diagram with its summary counts
#[derive(Debug)]
pub struct Diagram {
    pub markup: String,
    pub entity_count: usize,
    pub column_count: usize,
    pub relationship_count: usize,
}

/// Builds PlantUML markup from entity metadata
pub struct UmlBuilder<'a> {
    schema: &'a Schema,
    dialect: SqlDialect,
    flags: &'a DiagramFlags,
}

impl<'a> UmlBuilder<'a> {
    pub fn new(schema: &'a Schema, dialect: SqlDialect, flags: &'a DiagramFlags) -> Self {
        Self {
            schema,
            dialect,
            flags,
        }
    }

    /// Build the complete diagram markup
    pub fn build(&self, styles: &dyn StyleSheet) -> Diagram {
        let mut markup = String::from("@startuml\n\n");
        markup.push_str(&styles.render());

        let include = compile_patterns(&self.flags.include);
        let exclude = compile_patterns(&self.flags.exclude);

        let mut entity_count = 0;
        let mut column_count = 0;
        let mut relationships = String::new();
        let mut relationship_count = 0;

        for entity in self.schema.iter() {
            if matches_any(&exclude, entity) {
                continue;
            }
            if !include.is_empty() && !matches_any(&include, entity) {
                continue;
            }

            markup.push_str(&self.build_entity(entity));
            entity_count += 1;
            column_count += entity.columns.len();

            for fk in &entity.foreign_keys {
                relationships.push_str(&self.build_foreign_key(fk, entity));
                relationship_count += 1;
            }
        }

        if !relationships.is_empty() {
            markup.push('\n');
            markup.push_str(&relationships);
        }

        markup.push_str("\n@enduml\n");

        Diagram {
            markup,
            entity_count,
            column_count,
            relationship_count,
        }
    }

    /// Build one entity block
    fn build_entity(&self, entity: &Entity) -> String {
        let mut uml = format!("\ntable( {}, {} ) {{\n", entity.name, entity.table_name);

        for column in &entity.columns {
            uml.push_str(&self.build_column(column, entity));
        }

        uml.push_str("}\n");
        uml
    }

    /// Build one column line
    fn build_column(&self, column: &Column, entity: &Entity) -> String {
        let (key_macro, suffix) = if column.is_primary_key {
            ("pkey", "")
        } else if entity.is_foreign_key_column(&column.name) {
            ("fkey", " <<FK>>")
        } else {
            ("column", "")
        };

        let normalized = driver::normalize_type(self.dialect, &column.sql_type);

        let mut length = declared_length(column, self.flags.with_enum_values);
        if length.is_empty() {
            if let Some(defaults) = driver::data_type_defaults(self.dialect, &normalized) {
                length = default_length(defaults);
            }
        }
        if !length.is_empty() {
            length = format!("({length})");
        }

        format!(
            "  {}( {} ): {}{}{}\n",
            key_macro,
            column.name,
            normalized.to_uppercase(),
            length,
            suffix,
        )
    }

    /// Build one relationship line for a foreign key
    fn build_foreign_key(&self, fk: &ForeignKey, entity: &Entity) -> String {
        let required = fk.columns.iter().any(|name| {
            entity
                .get_column(name)
                .map_or(false, |col| !col.is_nullable)
        });
        let unique = entity.foreign_key_is_unique(fk);
        let connector = Connector::for_foreign_key(required, unique);

        format!(
            "{} {}--|| {}\n",
            entity.table_name,
            connector.as_uml(),
            fk.referenced_table,
        )
    }
}

/// A column's declared size: length first, then display width, then
/// precision (with scale), then the enum values when requested
fn declared_length(column: &Column, with_enum_values: bool) -> String {
    if let Some(length) = &column.length {
        return length.clone();
    }
    if let Some(width) = column.width {
        return width.to_string();
    }
    if let Some(precision) = column.precision {
        return match column.scale {
            Some(scale) => format!("{precision}, {scale}"),
            None => precision.to_string(),
        };
    }
    if with_enum_values && !column.enum_values.is_empty() {
        return column.enum_values.join(", ");
    }
    String::new()
}

/// Same ordering applied to the dialect's implicit type defaults
fn default_length(defaults: TypeDefaults) -> String {
    if let Some(length) = defaults.length {
        return length.to_string();
    }
    if let Some(width) = defaults.width {
        return width.to_string();
    }
    if let Some(precision) = defaults.precision {
        return match defaults.scale {
            Some(scale) => format!("{precision}, {scale}"),
            None => precision.to_string(),
        };
    }
    String::new()
}

fn compile_patterns(filters: &[String]) -> Vec<Pattern> {
    filters
        .iter()
        .filter_map(|f| Pattern::new(f.trim()).ok())
        .collect()
}

fn matches_any(patterns: &[Pattern], entity: &Entity) -> bool {
    patterns
        .iter()
        .any(|p| p.matches(&entity.name) || p.matches(&entity.table_name))
}
