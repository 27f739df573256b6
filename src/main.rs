use clap::Parser;
use page_analyzer::config::AnalyzerConfig;
use page_analyzer::fetchers::HttpTransport;
use page_analyzer::parsers::headings::HeadingLevel;
use page_analyzer::report::{self, INVALID_URL_WARNING, OutputFormat};
use page_analyzer::{Analyzer, Error};
use std::process::ExitCode;
use std::sync::Arc;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // The model must load before any request is served
    ::log::info!("Loading entity model from {}", config.model_dir.display());
    let analyzer = match Analyzer::from_config(&config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            ::log::error!("Failed to start analyzer: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Analyze {
            url,
            levels,
            format,
        } => analyze(&analyzer, &url, &levels, format).await,
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(config.bind);
            match report::server::serve(Arc::new(analyzer), &bind).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    ::log::error!("Dashboard server failed on {}: {}", bind, e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Config file, then environment, then command-line flags
fn load_config(args: &Args) -> Result<AnalyzerConfig, Error> {
    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_file(path)?,
        None => AnalyzerConfig::default(),
    };

    let mut config = config.with_env();
    if let Some(dir) = &args.model_dir {
        config.model_dir = dir.clone();
    }
    Ok(config)
}

async fn analyze(
    analyzer: &Analyzer<HttpTransport>,
    url: &str,
    levels: &[HeadingLevel],
    format: OutputFormat,
) -> ExitCode {
    let levels = if levels.is_empty() {
        analyzer.default_levels().to_vec()
    } else {
        levels.to_vec()
    };

    let start_time = std::time::Instant::now();
    let report = match analyzer.analyze(url, &levels).await {
        Ok(report) => report,
        Err(Error::InvalidUrl(input)) => {
            ::log::warn!("Rejected invalid URL: {}", input);
            eprintln!("{}", INVALID_URL_WARNING);
            return ExitCode::from(2);
        }
        Err(e) => {
            ::log::error!("Failed to analyze {}: {}", url, e);
            return ExitCode::FAILURE;
        }
    };
    ::log::info!(
        "Analysis complete in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    match report::render(&report, format) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Failed to render report: {}", e);
            ExitCode::FAILURE
        }
    }
}
