//! Data-source resolution: config files and schema readers.
//!
//! The input is either a SQL schema file (optionally gzip-compressed) or a
//! JSON/YAML data-source config naming the dialect, the schema file(s) and
//! optional entity display names. Paths in a config resolve relative to the
//! config file's directory.

use crate::parser::{
    classify_statement, detect_dialect, strip_leading_comments, DialectDetection, SqlDialect,
    StatementReader, StatementType,
};
use crate::schema::{Schema, SchemaBuilder};
use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

const DETECTION_HEADER_SIZE: usize = 8 * 1024;

/// Data-source configuration file (the `ormconfig` analog)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DataSourceConfig {
    /// SQL dialect: mysql, postgres, or sqlite
    pub dialect: Option<String>,
    /// Schema file to load
    pub schema: Option<PathBuf>,
    /// Additional schema files, loaded in order
    pub schemas: Vec<PathBuf>,
    /// Entity display names, keyed by table name
    pub entities: HashMap<String, String>,
    /// Default include filters, overridden by the CLI flag
    pub include: Vec<String>,
    /// Default exclude filters, overridden by the CLI flag
    pub exclude: Vec<String>,
}

impl DataSourceConfig {
    /// Load a config from a JSON or YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config = match extension(path).as_str() {
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("invalid JSON config: {}", path.display()))?,
            "yaml" | "yml" => serde_yaml_ng::from_str(&contents)
                .with_context(|| format!("invalid YAML config: {}", path.display()))?,
            other => bail!(
                "Unsupported config format: .{}. Valid options: json, yaml",
                other
            ),
        };

        Ok(config)
    }

    /// All schema paths, resolved relative to the config's directory
    fn schema_paths(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.schema
            .iter()
            .chain(self.schemas.iter())
            .map(|p| {
                if p.is_absolute() {
                    p.clone()
                } else {
                    base_dir.join(p)
                }
            })
            .collect()
    }
}

/// A loaded data-source: the schema, the resolved dialect and, when the
/// dialect was auto-detected, the detection result for reporting
#[derive(Debug)]
pub struct DataSource {
    pub schema: Schema,
    pub dialect: SqlDialect,
    pub detection: Option<DialectDetection>,
    pub config: DataSourceConfig,
}

/// Load a data-source from a schema file or a config file.
///
/// The dialect flag wins over the config's dialect, which wins over
/// auto-detection from the first schema file.
pub fn load(source: &Path, dialect_flag: Option<&str>) -> Result<DataSource> {
    let (config, schema_paths) = match extension(source).as_str() {
        "json" | "yaml" | "yml" => {
            let config = DataSourceConfig::from_file(source)?;
            let base_dir = source.parent().unwrap_or_else(|| Path::new("."));
            let paths = config.schema_paths(base_dir);
            if paths.is_empty() {
                bail!(
                    "Config does not name any schema files: {}",
                    source.display()
                );
            }
            (config, paths)
        }
        _ => (DataSourceConfig::default(), vec![source.to_path_buf()]),
    };

    let mut detection = None;
    let dialect = match dialect_flag.or(config.dialect.as_deref()) {
        Some(d) => d.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => {
            let detected = detect_dialect_from_file(&schema_paths[0])?;
            detection = Some(detected);
            detected.dialect
        }
    };

    let mut builder = SchemaBuilder::new();
    for path in &schema_paths {
        let reader = open_schema_reader(path)?;
        read_schema(reader, &mut builder)
            .with_context(|| format!("failed to parse schema file: {}", path.display()))?;
    }

    let mut schema = builder.build();
    schema.apply_entity_names(&config.entities);

    Ok(DataSource {
        schema,
        dialect,
        detection,
        config,
    })
}

/// Detect the dialect from the first chunk of a schema file
pub fn detect_dialect_from_file(path: &Path) -> Result<DialectDetection> {
    let mut reader = open_schema_reader(path)?;
    let mut header = vec![0u8; DETECTION_HEADER_SIZE];

    let mut filled = 0;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    header.truncate(filled);

    Ok(detect_dialect(&header))
}

/// Open a schema file, transparently decompressing `.gz` input
fn open_schema_reader(path: &Path) -> Result<Box<dyn Read>> {
    let file =
        File::open(path).with_context(|| format!("failed to open schema file: {}", path.display()))?;

    if extension(path) == "gz" {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Feed schema statements from a reader into a builder
fn read_schema<R: Read>(reader: R, builder: &mut SchemaBuilder) -> Result<()> {
    let mut statements = StatementReader::new(reader);

    while let Some(raw) = statements.read_statement()? {
        let stmt = String::from_utf8_lossy(&raw);
        let stmt = strip_leading_comments(&stmt);

        match classify_statement(stmt) {
            StatementType::CreateTable => {
                builder.parse_create_table(stmt);
            }
            StatementType::AlterTable => {
                builder.parse_alter_table(stmt);
            }
            StatementType::CreateIndex => {
                builder.parse_create_index(stmt);
            }
            StatementType::Unknown => {}
        }
    }

    Ok(())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}
