//! PlantUML diagram generation: output formats, styles and the markup builder.

pub mod builder;
pub mod styles;

pub use builder::{Diagram, UmlBuilder};
pub use styles::{styles_for, DefaultStyles, MonochromeStyles, SkinParams, StyleSheet, TextStyles};

use ahash::AHashMap;
use std::fmt;
use std::str::FromStr;

/// Requested diagram output format.
///
/// `puml` is raw markup produced locally; every other format is rendered by
/// the PlantUML service and addressed through a URL path segment of the same
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Png,
    Svg,
    Txt,
    Puml,
}

impl Format {
    /// Whether this format is produced locally without the rendering service
    pub fn is_local(self) -> bool {
        matches!(self, Format::Puml)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Png => write!(f, "png"),
            Format::Svg => write!(f, "svg"),
            Format::Txt => write!(f, "txt"),
            Format::Puml => write!(f, "puml"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Format::Png),
            "svg" => Ok(Format::Svg),
            "txt" => Ok(Format::Txt),
            "puml" => Ok(Format::Puml),
            _ => Err(format!(
                "Unknown format: {}. Valid options: png, svg, txt, puml",
                s
            )),
        }
    }
}

/// Diagram arrow direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    TopToBottom,
    LeftToRight,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TopToBottom => write!(f, "tb"),
            Direction::LeftToRight => write!(f, "lr"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tb" => Ok(Direction::TopToBottom),
            "lr" => Ok(Direction::LeftToRight),
            _ => Err(format!("Unknown direction: {}. Valid options: tb, lr", s)),
        }
    }
}

/// Left-side relationship connector in PlantUML crow's foot notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    One,
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
}

impl Connector {
    /// The markup fragment for this connector
    pub fn as_uml(self) -> &'static str {
        match self {
            Connector::One => "||",
            Connector::ZeroOrOne => "|o",
            Connector::ZeroOrMore => "}o",
            Connector::OneOrMore => "}|",
        }
    }

    /// Choose the owning-side connector for a foreign key. `required` means
    /// at least one owning column is NOT NULL; `unique` means the owning
    /// columns are covered by a unique index (one-to-one).
    pub fn for_foreign_key(required: bool, unique: bool) -> Self {
        match (unique, required) {
            (true, true) => Connector::One,
            (true, false) => Connector::ZeroOrOne,
            (false, true) => Connector::OneOrMore,
            (false, false) => Connector::ZeroOrMore,
        }
    }
}

/// Options controlling diagram generation
#[derive(Debug, Clone, Default)]
pub struct DiagramFlags {
    pub format: Format,
    pub direction: Direction,
    pub monochrome: bool,
    pub handwritten: bool,
    pub with_enum_values: bool,
    pub entity_names_only: bool,
    pub table_names_only: bool,
    /// Entities to include (glob patterns against entity or table name)
    pub include: Vec<String>,
    /// Entities to exclude (glob patterns against entity or table name)
    pub exclude: Vec<String>,
    /// Style color overrides keyed by `pkey`, `fkey`, `column`, `rcolumn`,
    /// `class.BackgroundColor`, `class.ArrowColor`, `class.BorderColor`
    pub colors: AHashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_trip() {
        assert_eq!("png".parse::<Format>(), Ok(Format::Png));
        assert_eq!("PUML".parse::<Format>(), Ok(Format::Puml));
        assert!("jpeg".parse::<Format>().is_err());
        assert_eq!(Format::Svg.to_string(), "svg");
    }

    #[test]
    fn test_connector_selection() {
        assert_eq!(Connector::for_foreign_key(true, false), Connector::OneOrMore);
        assert_eq!(
            Connector::for_foreign_key(false, false),
            Connector::ZeroOrMore
        );
        assert_eq!(Connector::for_foreign_key(true, true), Connector::One);
        assert_eq!(Connector::for_foreign_key(false, true), Connector::ZeroOrOne);
    }
}
