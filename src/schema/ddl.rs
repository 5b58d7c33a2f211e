//! DDL parsing for entity metadata extraction.
//!
//! Parses CREATE TABLE, ALTER TABLE and CREATE INDEX statements to extract:
//! - Column definitions with type, length/width/precision and nullability
//! - Primary key constraints (inline and table-level)
//! - Foreign key constraints (table-level and inline REFERENCES)
//! - Unique and plain indexes

use super::{Column, Entity, ForeignKey, IndexDef, Schema};
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex to extract the table name from CREATE TABLE.
/// Supports `table` (MySQL), "table" (PostgreSQL), unquoted, and schema.table
static CREATE_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:[`"\w]+\s*\.\s*)*[`"]?([^`"\s(;]+)[`"]?"#)
        .unwrap()
});

/// Regex to extract the table name from ALTER TABLE
static ALTER_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)ALTER\s+TABLE\s+(?:ONLY\s+)?(?:[`"\w]+\s*\.\s*)*[`"]?([^`"\s;]+)[`"]?"#)
        .unwrap()
});

/// Regex for a column definition: name followed by a type with optional
/// arguments, a `varying`/`precision` second word, or a trailing `unsigned`
static COLUMN_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^\s*[`"]?([^`"\s,(]+)[`"]?\s+([a-z]\w*(?:\s+(?:varying|precision))?(?:\s*\([^)]*\))?(?:\s+unsigned)?)"#,
    )
    .unwrap()
});

/// Regex for a table-level PRIMARY KEY constraint
static PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)PRIMARY\s+KEY\s*\(([^)]+)\)").unwrap());

/// Regex for an inline PRIMARY KEY on a column
static INLINE_PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

/// Regex for a FOREIGN KEY constraint with optional constraint name
static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:CONSTRAINT\s+[`"]?([^`"\s]+)[`"]?\s+)?FOREIGN\s+KEY\s*\(([^)]+)\)\s*REFERENCES\s+(?:[`"\w]+\s*\.\s*)*[`"]?([^`"\s(]+)[`"]?\s*\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Regex for an inline `REFERENCES parent(col)` clause on a column definition
static INLINE_REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bREFERENCES\s+(?:[`"\w]+\s*\.\s*)*[`"]?([^`"\s(]+)[`"]?\s*\(([^)]+)\)"#)
        .unwrap()
});

/// Regex to detect a NOT NULL constraint
static NOT_NULL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").unwrap());

/// Regex for inline INDEX/KEY in CREATE TABLE.
/// Matches: INDEX idx_name (col1, col2), KEY idx_name (col1), UNIQUE KEY idx_name (col1)
static INLINE_INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:(UNIQUE)\s+)?(?:INDEX|KEY)\s+[`"]?(\w+)[`"]?\s*\(([^)]+)\)"#).unwrap()
});

/// Regex for a UNIQUE constraint without the INDEX/KEY keyword:
/// UNIQUE (col1, col2) or CONSTRAINT name UNIQUE (col1)
static UNIQUE_CONSTRAINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:CONSTRAINT\s+[`"]?(\w+)[`"]?\s+)?UNIQUE\s*\(([^)]+)\)"#).unwrap()
});

/// Regex for a CREATE INDEX statement
static CREATE_INDEX_STMT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)CREATE\s+(UNIQUE\s+)?INDEX\s+(?:IF\s+NOT\s+EXISTS\s+)?[`"]?(\w+)[`"]?\s+ON\s+(?:[`"\w]+\s*\.\s*)*[`"]?(\w+)[`"]?\s*(?:USING\s+\w+\s*)?\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Regex for quoted values inside ENUM(...) / SET(...)
static ENUM_VALUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']*)'").unwrap());

/// Builder for constructing entity metadata from DDL statements
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self {
            schema: Schema::new(),
        }
    }

    /// Parse a CREATE TABLE statement and add the entity to the schema
    pub fn parse_create_table(&mut self, stmt: &str) -> Option<()> {
        let table_name = extract_create_table_name(stmt)?;

        // First definition wins
        if self.schema.get_entity(&table_name).is_some() {
            return Some(());
        }

        let mut entity = Entity::new(&table_name);
        let body = extract_table_body(stmt)?;
        parse_table_body(&body, &mut entity);

        self.schema.add_entity(entity);
        Some(())
    }

    /// Parse an ALTER TABLE statement, attaching FK constraints to the
    /// already-parsed entity
    pub fn parse_alter_table(&mut self, stmt: &str) -> Option<()> {
        let table_name = extract_alter_table_name(stmt)?;
        let entity = self.schema.get_entity_mut(&table_name)?;

        for fk in parse_foreign_keys(stmt) {
            entity.foreign_keys.push(fk);
        }

        if let Some(pk_cols) = parse_primary_key_constraint(stmt) {
            mark_primary_key(entity, &pk_cols);
        }

        Some(())
    }

    /// Parse a CREATE INDEX statement and attach it to its entity
    pub fn parse_create_index(&mut self, stmt: &str) -> Option<()> {
        let caps = CREATE_INDEX_STMT_RE.captures(stmt)?;

        let is_unique = caps.get(1).is_some();
        let index_name = caps.get(2)?.as_str().to_string();
        let table_name = caps.get(3)?.as_str().to_string();
        let columns = parse_column_list(caps.get(4)?.as_str());

        let entity = self.schema.get_entity_mut(&table_name)?;
        entity.indexes.push(IndexDef {
            name: index_name,
            columns,
            is_unique,
        });

        Some(())
    }

    /// Finalize and return the schema
    pub fn build(self) -> Schema {
        self.schema
    }

    /// Get the current schema (for inspection during building)
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Extract the table name from a CREATE TABLE statement
pub fn extract_create_table_name(stmt: &str) -> Option<String> {
    CREATE_TABLE_NAME_RE
        .captures(stmt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the table name from an ALTER TABLE statement
pub fn extract_alter_table_name(stmt: &str) -> Option<String> {
    ALTER_TABLE_NAME_RE
        .captures(stmt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the body of a CREATE TABLE statement (between the first `(` and
/// its matching `)`), respecting string literals
fn extract_table_body(stmt: &str) -> Option<String> {
    let bytes = stmt.as_bytes();
    let mut depth = 0;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if b == b'\\' && in_string {
            escape_next = true;
            continue;
        }

        if b == b'\'' {
            in_string = !in_string;
            continue;
        }

        if in_string {
            continue;
        }

        if b == b'(' {
            if depth == 0 {
                start = Some(i + 1);
            }
            depth += 1;
        } else if b == b')' {
            depth -= 1;
            if depth == 0 {
                if let Some(s) = start {
                    return Some(stmt[s..i].to_string());
                }
            }
        }
    }

    None
}

/// Parse the body of a CREATE TABLE to extract columns and constraints
fn parse_table_body(body: &str, entity: &mut Entity) {
    for part in split_table_body(body) {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_table_constraint(trimmed) {
            parse_constraint(trimmed, entity);
        } else if let Some(mut col) = parse_column_def(trimmed) {
            if INLINE_PRIMARY_KEY_RE.is_match(trimmed) {
                col.is_primary_key = true;
                col.is_nullable = false;
            }

            // SQLite-style inline REFERENCES clause
            if let Some(caps) = INLINE_REFERENCES_RE.captures(trimmed) {
                entity.foreign_keys.push(ForeignKey {
                    name: None,
                    columns: vec![col.name.clone()],
                    referenced_table: caps[1].to_string(),
                    referenced_columns: parse_column_list(&caps[2]),
                });
            }

            entity.columns.push(col);
        }
    }
}

/// Check whether a table-body part is a constraint rather than a column.
/// The keyword must end at a word boundary: a column named `unique_code`
/// or `constraint_name` is still a column.
fn is_table_constraint(part: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "PRIMARY KEY",
        "CONSTRAINT",
        "FOREIGN KEY",
        "KEY",
        "INDEX",
        "UNIQUE",
        "FULLTEXT",
        "SPATIAL",
        "CHECK",
        "EXCLUDE",
    ];

    let upper = part.to_uppercase();
    KEYWORDS.iter().any(|kw| {
        upper
            .strip_prefix(kw)
            .is_some_and(|rest| {
                rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '(')
            })
    })
}

/// Parse a table-level constraint line
fn parse_constraint(part: &str, entity: &mut Entity) {
    if let Some(pk_cols) = parse_primary_key_constraint(part) {
        mark_primary_key(entity, &pk_cols);
        return;
    }

    let fks = parse_foreign_keys(part);
    if !fks.is_empty() {
        entity.foreign_keys.extend(fks);
        return;
    }

    if let Some(idx) = parse_inline_index(part) {
        entity.indexes.push(idx);
        return;
    }

    if let Some(caps) = UNIQUE_CONSTRAINT_RE.captures(part) {
        let columns = parse_column_list(&caps[2]);
        let name = caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| format!("uq_{}", columns.join("_")));
        entity.indexes.push(IndexDef {
            name,
            columns,
            is_unique: true,
        });
    }
}

/// Mark the named columns as the primary key
fn mark_primary_key(entity: &mut Entity, pk_cols: &[String]) {
    for col_name in pk_cols {
        if let Some(col) = entity
            .columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(col_name))
        {
            col.is_primary_key = true;
            col.is_nullable = false;
        }
    }
}

/// Split a table body by commas, respecting nested parentheses and strings
pub fn split_table_body(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for ch in body.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            current.push(ch);
            escape_next = true;
            continue;
        }

        if ch == '\'' {
            in_string = !in_string;
            current.push(ch);
            continue;
        }

        if in_string {
            current.push(ch);
            continue;
        }

        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Parse a single column definition
fn parse_column_def(def: &str) -> Option<Column> {
    let caps = COLUMN_DEF_RE.captures(def)?;
    let name = caps.get(1)?.as_str().to_string();
    let raw_type = caps.get(2)?.as_str();

    let mut col = parse_sql_type(raw_type);
    col.name = name;
    col.is_nullable = !NOT_NULL_RE.is_match(def);

    Some(col)
}

/// Parse a raw SQL type (e.g. `varchar(255)`, `decimal(10,2)`, `int(11) unsigned`,
/// `enum('a','b')`) into a column carrying the base type and its arguments
pub fn parse_sql_type(raw: &str) -> Column {
    let mut col = Column::default();

    let (base, args) = match raw.find('(') {
        Some(open) => match raw.rfind(')') {
            Some(close) if close > open => (&raw[..open], Some(&raw[open + 1..close])),
            // Unclosed or inverted parentheses: keep the base type only
            _ => (&raw[..open], None),
        },
        None => (raw, None),
    };

    col.sql_type = base
        .to_lowercase()
        .split_whitespace()
        .filter(|w| *w != "unsigned")
        .collect::<Vec<_>>()
        .join(" ");

    let Some(args) = args else {
        return col;
    };

    if col.sql_type == "enum" || col.sql_type == "set" {
        col.enum_values = ENUM_VALUE_RE
            .captures_iter(args)
            .map(|c| c[1].to_string())
            .collect();
        return col;
    }

    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [p, s] => {
            col.precision = p.parse().ok();
            col.scale = s.parse().ok();
        }
        [single] if !single.is_empty() => match single.parse::<u32>() {
            Ok(n) if is_integer_type(&col.sql_type) => col.width = Some(n),
            Ok(_) if is_character_type(&col.sql_type) => col.length = Some(single.to_string()),
            Ok(n) => col.precision = Some(n),
            // Non-numeric argument, e.g. varchar(max)
            Err(_) => col.length = Some(single.to_string()),
        },
        _ => {}
    }

    col
}

fn is_integer_type(base: &str) -> bool {
    matches!(
        base,
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" | "year"
    )
}

fn is_character_type(base: &str) -> bool {
    matches!(
        base,
        "char"
            | "varchar"
            | "character"
            | "character varying"
            | "nchar"
            | "nvarchar"
            | "binary"
            | "varbinary"
            | "bit"
            | "varbit"
    )
}

/// Parse a PRIMARY KEY constraint, returning the column names
fn parse_primary_key_constraint(constraint: &str) -> Option<Vec<String>> {
    let caps = PRIMARY_KEY_RE.captures(constraint)?;
    Some(parse_column_list(caps.get(1)?.as_str()))
}

/// Parse an inline INDEX/KEY constraint from a CREATE TABLE body
fn parse_inline_index(constraint: &str) -> Option<IndexDef> {
    let caps = INLINE_INDEX_RE.captures(constraint)?;

    Some(IndexDef {
        name: caps.get(2)?.as_str().to_string(),
        columns: parse_column_list(caps.get(3)?.as_str()),
        is_unique: caps.get(1).is_some(),
    })
}

/// Parse FOREIGN KEY constraints from a statement
fn parse_foreign_keys(stmt: &str) -> Vec<ForeignKey> {
    let mut fks = Vec::new();

    for caps in FOREIGN_KEY_RE.captures_iter(stmt) {
        let name = caps.get(1).map(|m| m.as_str().to_string());
        let columns = caps
            .get(2)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default();
        let referenced_table = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let referenced_columns = caps
            .get(4)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default();

        if !columns.is_empty() && !referenced_table.is_empty() && !referenced_columns.is_empty() {
            fks.push(ForeignKey {
                name,
                columns,
                referenced_table,
                referenced_columns,
            });
        }
    }

    fks
}

/// Parse a comma-separated column list, stripping quotes
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| c.trim().trim_matches('`').trim_matches('"').to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
