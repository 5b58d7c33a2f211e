//! Build command implementation: metadata to markup to output.

use crate::render;
use crate::source;
use crate::uml::{styles_for, DiagramFlags, Direction, Format, UmlBuilder};
use crate::{encode, parser::DialectConfidence};
use ahash::AHashMap;
use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

/// Run the build command
#[allow(clippy::too_many_arguments)]
pub fn run(
    source: PathBuf,
    format: String,
    dialect: Option<String>,
    direction: String,
    monochrome: bool,
    handwritten: bool,
    download: Option<PathBuf>,
    exclude: Option<String>,
    include: Option<String>,
    with_enum_values: bool,
    with_entity_names_only: bool,
    with_table_names_only: bool,
    colors: Option<String>,
    plantuml_url: String,
    progress: bool,
) -> Result<()> {
    let format: Format = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let direction: Direction = direction.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    if !source.exists() {
        bail!("input file does not exist: {}", source.display());
    }

    let data_source = source::load(&source, dialect.as_deref())?;

    if let Some(detection) = &data_source.detection {
        let confidence = match detection.confidence {
            DialectConfidence::High => "high confidence",
            DialectConfidence::Medium => "medium confidence",
            DialectConfidence::Low => "low confidence",
        };
        eprintln!(
            "Auto-detected dialect: {} ({})",
            detection.dialect, confidence
        );
    }

    if data_source.schema.is_empty() {
        bail!("No entities have been found. Please, check your schema to make sure it is configured correctly.");
    }

    // CLI filters override config defaults
    let include = parse_list(include).unwrap_or_else(|| data_source.config.include.clone());
    let exclude = parse_list(exclude).unwrap_or_else(|| data_source.config.exclude.clone());

    let flags = DiagramFlags {
        format,
        direction,
        monochrome,
        handwritten,
        with_enum_values,
        entity_names_only: with_entity_names_only,
        table_names_only: with_table_names_only,
        include,
        exclude,
        colors: parse_colors(colors.as_deref()),
    };

    let styles = styles_for(&flags);
    let builder = UmlBuilder::new(&data_source.schema, data_source.dialect, &flags);
    let diagram = builder.build(styles.as_ref());

    if format.is_local() {
        match &download {
            Some(path) => {
                fs::write(path, &diagram.markup)?;
                eprintln!("Diagram written to: {}", path.display());
            }
            None => print!("{}", diagram.markup),
        }
    } else {
        let encoded = encode::encode_diagram(&diagram.markup)?;
        let url = render::diagram_url(&plantuml_url, format, &encoded);

        match &download {
            Some(path) => {
                render::download(&url, path, progress)?;
                eprintln!("Diagram downloaded to: {}", path.display());
            }
            None => println!("{url}"),
        }
    }

    eprintln!(
        "\nUML: {} entities, {} columns, {} relationships",
        diagram.entity_count, diagram.column_count, diagram.relationship_count
    );

    Ok(())
}

/// Split a comma-separated flag value into trimmed, non-empty items
fn parse_list(value: Option<String>) -> Option<Vec<String>> {
    value.map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

/// Parse `key=value` color overrides
fn parse_colors(value: Option<&str>) -> AHashMap<String, String> {
    let mut colors = AHashMap::new();

    if let Some(value) = value {
        for pair in value.split(',') {
            if let Some((key, color)) = pair.split_once('=') {
                let key = key.trim();
                let color = color.trim();
                if !key.is_empty() && !color.is_empty() {
                    colors.insert(key.to_string(), color.to_string());
                }
            }
        }
    }

    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(Some("users, orders,,".to_string())),
            Some(vec!["users".to_string(), "orders".to_string()])
        );
        assert_eq!(parse_list(None), None);
    }

    #[test]
    fn test_parse_colors() {
        let colors = parse_colors(Some("pkey=red, class.ArrowColor=#336699"));
        assert_eq!(colors.get("pkey").map(String::as_str), Some("red"));
        assert_eq!(
            colors.get("class.ArrowColor").map(String::as_str),
            Some("#336699")
        );
        assert!(parse_colors(None).is_empty());
    }
}
