use clap::Parser;
use page_analyzer::Analyzer;
use page_analyzer::analysis::{EntityModel, WordCloudOptions};
use page_analyzer::fetchers::HttpTransport;
use page_analyzer::parsers::headings::HeadingLevel;
use page_analyzer::report::{OutputFormat, render};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL to analyze
    #[arg(short, long)]
    url: String,

    /// Directory holding model.json
    #[arg(short, long, default_value = "./models/entities")]
    model_dir: PathBuf,

    /// Maximum number of word cloud terms
    #[arg(short = 'w', long)]
    max_words: Option<usize>,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    println!("Loading entity model from: {}", args.model_dir.display());
    let model = EntityModel::load(&args.model_dir)?;

    let transport = match args.timeout {
        Some(secs) => HttpTransport::with_timeout(Duration::from_secs(secs))?,
        None => HttpTransport::new(),
    };

    // Create an Analyzer builder with the transport and model
    let mut options = WordCloudOptions::default();
    if let Some(max_words) = args.max_words {
        options.max_words = max_words;
    }
    let analyzer = Analyzer::new(transport, Arc::new(model))
        .with_wordcloud_options(options)
        .with_default_levels(vec![HeadingLevel::H2, HeadingLevel::H3]);

    // Analyze twice; the second run is served from the cache
    let levels = analyzer.default_levels().to_vec();
    let report = analyzer.analyze(&args.url, &levels).await?;
    let again = analyzer.analyze(&args.url, &levels).await?;
    println!(
        "Cached pages: {}, reports identical: {}",
        analyzer.cache().len().await,
        report == again
    );

    println!("{}", render(&report, OutputFormat::Markdown)?);
    Ok(())
}
