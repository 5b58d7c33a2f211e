//! Dialect-specific type normalization and data type defaults.
//!
//! This is the analog of an ORM driver's `normalizeType` and
//! `dataTypeDefaults`: type aliases collapse to one canonical name per
//! dialect, and well-known types carry an implicit length or precision that
//! is rendered when the column declares none.

use crate::parser::SqlDialect;

/// Implicit length/width/precision for a data type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeDefaults {
    pub length: Option<&'static str>,
    pub width: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

/// Normalize a base type name to the canonical name of the given dialect
pub fn normalize_type(dialect: SqlDialect, base: &str) -> String {
    let base = base.to_lowercase();

    let normalized = match dialect {
        SqlDialect::MySql => match base.as_str() {
            "integer" => "int",
            "dec" | "numeric" | "fixed" => "decimal",
            "bool" | "boolean" => "tinyint",
            "nvarchar" | "national varchar" => "varchar",
            "nchar" | "national char" => "char",
            other => other,
        },
        SqlDialect::Postgres => match base.as_str() {
            "int" | "int4" => "integer",
            "int2" => "smallint",
            "int8" => "bigint",
            "serial" => "integer",
            "smallserial" => "smallint",
            "bigserial" => "bigint",
            "varchar" => "character varying",
            "char" => "character",
            "decimal" => "numeric",
            "float4" | "float" => "real",
            "float8" => "double precision",
            "bool" => "boolean",
            "timestamptz" => "timestamp with time zone",
            "timetz" => "time with time zone",
            other => other,
        },
        SqlDialect::Sqlite => match base.as_str() {
            "int" => "integer",
            "bool" => "boolean",
            other => other,
        },
    };

    normalized.to_string()
}

/// Return the implicit defaults for a normalized type, if the dialect
/// defines any
pub fn data_type_defaults(dialect: SqlDialect, normalized: &str) -> Option<TypeDefaults> {
    let defaults = match dialect {
        SqlDialect::MySql => match normalized {
            "varchar" => TypeDefaults {
                length: Some("255"),
                ..Default::default()
            },
            "char" | "binary" | "varbinary" => TypeDefaults {
                length: Some("1"),
                ..Default::default()
            },
            "decimal" => TypeDefaults {
                precision: Some(10),
                scale: Some(0),
                ..Default::default()
            },
            "float" => TypeDefaults {
                precision: Some(12),
                ..Default::default()
            },
            "double" => TypeDefaults {
                precision: Some(22),
                ..Default::default()
            },
            "int" => TypeDefaults {
                width: Some(11),
                ..Default::default()
            },
            "tinyint" => TypeDefaults {
                width: Some(4),
                ..Default::default()
            },
            "smallint" => TypeDefaults {
                width: Some(6),
                ..Default::default()
            },
            "mediumint" => TypeDefaults {
                width: Some(9),
                ..Default::default()
            },
            "bigint" => TypeDefaults {
                width: Some(20),
                ..Default::default()
            },
            "year" => TypeDefaults {
                width: Some(4),
                ..Default::default()
            },
            "bit" => TypeDefaults {
                width: Some(1),
                ..Default::default()
            },
            _ => return None,
        },
        SqlDialect::Postgres => match normalized {
            "character" | "bit" => TypeDefaults {
                length: Some("1"),
                ..Default::default()
            },
            "interval" => TypeDefaults {
                precision: Some(6),
                ..Default::default()
            },
            _ => return None,
        },
        // SQLite types carry no implicit sizes
        SqlDialect::Sqlite => return None,
    };

    Some(defaults)
}
