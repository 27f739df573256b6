use clap::{Parser, Subcommand};
use page_analyzer::parsers::headings::HeadingLevel;
use page_analyzer::report::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-analyzer")]
#[command(about = "Analyze a web page: metadata, headings, JSON-LD, word cloud and entities")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the entity model (overrides config and environment)
    #[arg(long, global = true)]
    pub model_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one page and print the report
    Analyze {
        /// URL of the page to analyze
        url: String,

        /// Heading level to include (repeatable); defaults to the configured levels
        #[arg(short, long = "level", value_parser = parse_level)]
        levels: Vec<HeadingLevel>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },

    /// Serve the interactive dashboard
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8501
        #[arg(short, long)]
        bind: Option<String>,
    },
}

fn parse_level(value: &str) -> Result<HeadingLevel, String> {
    value.parse().map_err(|e: page_analyzer::error::ConfigError| e.to_string())
}
