//! Entity metadata model for diagram generation.
//!
//! This module provides:
//! - Data models for entities, columns, indexes, and foreign keys
//! - DDL parsing for extracting entity metadata from schema files
//!
//! The model mirrors what an ORM's metadata layer exposes: each entity has a
//! display name (standing in for the mapped class name) alongside its table
//! name, and columns carry the pieces of type information the diagram needs.

mod ddl;

pub use ddl::*;

use ahash::AHashMap;

/// Column definition within an entity
#[derive(Debug, Clone, Default)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Base SQL type, lowercased, without arguments (e.g. `varchar`)
    pub sql_type: String,
    /// Declared length for character/binary types (e.g. `255`)
    pub length: Option<String>,
    /// Display width for integer types (e.g. `11` from `int(11)`)
    pub width: Option<u32>,
    /// Declared precision for numeric types
    pub precision: Option<u32>,
    /// Declared scale for numeric types
    pub scale: Option<u32>,
    /// Possible values for ENUM/SET types
    pub enum_values: Vec<String>,
    /// Whether this column is part of the primary key
    pub is_primary_key: bool,
    /// Whether this column allows NULL values
    pub is_nullable: bool,
}

/// Index definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    /// Index name
    pub name: String,
    /// Columns in the index
    pub columns: Vec<String>,
    /// Whether this is a unique index
    pub is_unique: bool,
}

/// Foreign key constraint definition
#[derive(Debug, Clone)]
pub struct ForeignKey {
    /// Constraint name (optional)
    pub name: Option<String>,
    /// Column names in this entity that form the FK
    pub columns: Vec<String>,
    /// Referenced table name
    pub referenced_table: String,
    /// Referenced column names
    pub referenced_columns: Vec<String>,
}

/// Complete entity metadata
#[derive(Debug, Clone)]
pub struct Entity {
    /// Display name of the entity (defaults to the PascalCase table name)
    pub name: String,
    /// Database table name
    pub table_name: String,
    /// Column definitions in order
    pub columns: Vec<Column>,
    /// Index definitions
    pub indexes: Vec<IndexDef>,
    /// Foreign key constraints
    pub foreign_keys: Vec<ForeignKey>,
}

impl Entity {
    /// Create a new empty entity for a table
    pub fn new(table_name: &str) -> Self {
        Self {
            name: entity_name(table_name),
            table_name: table_name.to_string(),
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Column names that form the primary key
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Check whether a column participates in any foreign key
    pub fn is_foreign_key_column(&self, name: &str) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| fk.columns.iter().any(|c| c.eq_ignore_ascii_case(name)))
    }

    /// Check whether the FK's owning columns are guaranteed unique, which
    /// turns the relationship into one-to-one. True when the FK columns are
    /// exactly the primary key or are covered by a unique index.
    pub fn foreign_key_is_unique(&self, fk: &ForeignKey) -> bool {
        let fk_cols = normalized(&fk.columns);

        let pk: Vec<String> = self
            .primary_key()
            .iter()
            .map(|c| c.to_lowercase())
            .collect();
        if !pk.is_empty() && sorted(pk) == fk_cols {
            return true;
        }

        self.indexes
            .iter()
            .any(|idx| idx.is_unique && normalized(&idx.columns) == fk_cols)
    }
}

fn normalized(columns: &[String]) -> Vec<String> {
    sorted(columns.iter().map(|c| c.to_lowercase()).collect())
}

fn sorted(mut columns: Vec<String>) -> Vec<String> {
    columns.sort();
    columns
}

/// Derive a display name from a table name: `order_items` becomes `OrderItems`.
pub fn entity_name(table: &str) -> String {
    table
        .split(|c: char| c == '_' || c == '-' || c == '.')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Complete schema: all entities yielded by the metadata provider
#[derive(Debug, Default)]
pub struct Schema {
    entities: Vec<Entity>,
    by_table: AHashMap<String, usize>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an entity by table name (case-insensitive fallback)
    pub fn get_entity(&self, table: &str) -> Option<&Entity> {
        self.entity_index(table).map(|i| &self.entities[i])
    }

    /// Get a mutable entity by table name
    pub fn get_entity_mut(&mut self, table: &str) -> Option<&mut Entity> {
        self.entity_index(table).map(|i| &mut self.entities[i])
    }

    fn entity_index(&self, table: &str) -> Option<usize> {
        if let Some(&i) = self.by_table.get(table) {
            return Some(i);
        }
        let lower = table.to_lowercase();
        self.by_table
            .iter()
            .find(|(k, _)| k.to_lowercase() == lower)
            .map(|(_, &i)| i)
    }

    /// Add a new entity, replacing nothing: the first definition of a table
    /// wins and later duplicates are ignored.
    pub fn add_entity(&mut self, entity: Entity) {
        if self.entity_index(&entity.table_name).is_some() {
            return;
        }
        self.by_table
            .insert(entity.table_name.clone(), self.entities.len());
        self.entities.push(entity);
    }

    /// Apply entity display names from a data-source config
    pub fn apply_entity_names(&mut self, names: &std::collections::HashMap<String, String>) {
        for (table, name) in names {
            if let Some(entity) = self.get_entity_mut(table) {
                entity.name = name.clone();
            }
        }
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the schema has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over all entities in definition order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_name() {
        assert_eq!(entity_name("users"), "Users");
        assert_eq!(entity_name("order_items"), "OrderItems");
        assert_eq!(entity_name("product-reviews"), "ProductReviews");
    }

    #[test]
    fn test_schema_lookup_is_case_insensitive() {
        let mut schema = Schema::new();
        schema.add_entity(Entity::new("users"));

        assert!(schema.get_entity("users").is_some());
        assert!(schema.get_entity("USERS").is_some());
        assert!(schema.get_entity("orders").is_none());
    }

    #[test]
    fn test_first_definition_wins() {
        let mut schema = Schema::new();
        let mut first = Entity::new("users");
        first.columns.push(Column {
            name: "id".to_string(),
            ..Default::default()
        });
        schema.add_entity(first);
        schema.add_entity(Entity::new("users"));

        assert_eq!(schema.len(), 1);
        assert_eq!(schema.get_entity("users").unwrap().columns.len(), 1);
    }

    #[test]
    fn test_foreign_key_is_unique() {
        let mut entity = Entity::new("profiles");
        entity.columns.push(Column {
            name: "user_id".to_string(),
            ..Default::default()
        });
        entity.indexes.push(IndexDef {
            name: "uq_user".to_string(),
            columns: vec!["user_id".to_string()],
            is_unique: true,
        });
        let fk = ForeignKey {
            name: None,
            columns: vec!["user_id".to_string()],
            referenced_table: "users".to_string(),
            referenced_columns: vec!["id".to_string()],
        };

        assert!(entity.foreign_key_is_unique(&fk));

        entity.indexes.clear();
        assert!(!entity.foreign_key_is_unique(&fk));
    }
}
