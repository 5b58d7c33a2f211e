mod build;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-uml")]
#[command(version)]
#[command(about = "Generate PlantUML entity diagrams from SQL schema files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a UML diagram from a SQL schema file or data-source config
    Build {
        /// Input schema file (.sql, .sql.gz) or data-source config (.json, .yaml)
        source: PathBuf,

        /// Diagram format: png, svg, txt, or puml
        #[arg(short, long, default_value = "png")]
        format: String,

        /// SQL dialect: mysql, postgres, or sqlite (auto-detected if not specified)
        #[arg(long)]
        dialect: Option<String>,

        /// Arrow direction: tb (top to bottom) or lr (left to right)
        #[arg(short = 'D', long, default_value = "tb")]
        direction: String,

        /// Use monochrome colors
        #[arg(long)]
        monochrome: bool,

        /// Use handwritten mode
        #[arg(long)]
        handwritten: bool,

        /// Download the diagram to this file instead of printing
        #[arg(short, long)]
        download: Option<PathBuf>,

        /// Comma-separated entities to exclude (glob patterns allowed)
        #[arg(short, long)]
        exclude: Option<String>,

        /// Comma-separated entities to include (glob patterns allowed)
        #[arg(short, long)]
        include: Option<String>,

        /// Show possible values for enum type columns
        #[arg(long)]
        with_enum_values: bool,

        /// Show only entity names in diagram headers
        #[arg(long, conflicts_with = "with_table_names_only")]
        with_entity_names_only: bool,

        /// Show only table names in diagram headers
        #[arg(long)]
        with_table_names_only: bool,

        /// Comma-separated style color overrides (e.g. pkey=red,class.ArrowColor=blue)
        #[arg(long)]
        colors: Option<String>,

        /// Base URL of the PlantUML rendering service
        #[arg(long, default_value = crate::render::DEFAULT_PLANTUML_URL)]
        plantuml_url: String,

        /// Show progress while downloading
        #[arg(short, long)]
        progress: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Build {
            source,
            format,
            dialect,
            direction,
            monochrome,
            handwritten,
            download,
            exclude,
            include,
            with_enum_values,
            with_entity_names_only,
            with_table_names_only,
            colors,
            plantuml_url,
            progress,
        } => build::run(
            source,
            format,
            dialect,
            direction,
            monochrome,
            handwritten,
            download,
            exclude,
            include,
            with_enum_values,
            with_entity_names_only,
            with_table_names_only,
            colors,
            plantuml_url,
            progress,
        ),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sql-uml", &mut io::stdout());
            Ok(())
        }
    }
}
