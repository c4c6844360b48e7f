//! Postdex: StackExchange posts loader and report generator
//!
//! Two pipelines over one MongoDB collection: `load` fills it from a
//! Posts.xml export, `report` renders PDF summaries of what was loaded.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use postdex::{
    config::Config,
    import::{Loader, PostsSource},
    report::{mean_view_count, titles_above, titles_matching, PdfRenderer},
    store::Store,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "postdex")]
#[command(about = "Loads a StackExchange posts export into MongoDB and renders PDF reports")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "postdex.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress output and summaries
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a posts export and load the most viewed questions
    Load {
        /// Path to the Posts.xml export
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// How many questions to keep
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Render the PDF reports from the loaded collection
    Report {
        /// Directory the PDFs are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file is a startup error and fails the process;
    // a missing one just means defaults.
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    let _guard = postdex::logging::init(&config.logging, cli.verbose)?;
    if !cli.config.exists() {
        warn!(
            "Config file '{}' not found, using defaults",
            cli.config.display()
        );
    }

    let result = match cli.command {
        Commands::Load { input, top } => load_posts(config, input, top, cli.quiet).await,
        Commands::Report { output_dir } => render_reports(config, output_dir, cli.quiet).await,
    };

    // Pipeline failures are logged, not signalled through the exit code
    if let Err(e) = result {
        error!("{:#}", e);
    }
    Ok(())
}

async fn load_posts(
    config: Config,
    input: Option<PathBuf>,
    top: Option<usize>,
    quiet: bool,
) -> Result<()> {
    let posts_path = input.unwrap_or_else(|| config.loader.posts_path.clone());
    let top_n = top.unwrap_or(config.loader.top_n);

    if !posts_path.exists() {
        anyhow::bail!("Posts file not found: {}", posts_path.display());
    }

    info!("Loading posts from: {}", posts_path.display());

    let source = PostsSource::open(&posts_path)
        .with_context(|| format!("Failed to open posts file '{}'", posts_path.display()))?;
    let store = Store::connect(&config.store)
        .await
        .context("Failed to connect to the store")?;

    let result = Loader::new(top_n).with_quiet(quiet).run(&store, source).await;
    store.close().await;
    let stats = result.context("Load failed")?;

    if !quiet {
        stats.print_summary();
    }
    info!("Load complete: {} questions stored", stats.documents_inserted);
    Ok(())
}

const ABOVE_AVERAGE_HEADING: &str = "Questions with above-average view count";
const KEYWORD_HEADING: &str = "Questions with short words in the title";

struct ReportOutput {
    above_path: PathBuf,
    above_count: usize,
    keyword_path: PathBuf,
    keyword_count: usize,
}

async fn render_reports(config: Config, output_dir: Option<PathBuf>, quiet: bool) -> Result<()> {
    let output_dir = output_dir.unwrap_or_else(|| config.report.output_dir.clone());
    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!(
            "Failed to create output directory '{}'",
            output_dir.display()
        )
    })?;

    let store = Store::connect(&config.store)
        .await
        .context("Failed to connect to the store")?;

    let result = run_queries(&store, &config, &output_dir).await;
    store.close().await;
    let output = result?;

    if !quiet {
        println!("\nReport Summary");
        println!("==============");
        println!(
            "Above-average titles: {:>6}  {}",
            output.above_count,
            output.above_path.display()
        );
        println!(
            "Keyword titles:       {:>6}  {}",
            output.keyword_count,
            output.keyword_path.display()
        );
    }
    Ok(())
}

async fn run_queries(store: &Store, config: &Config, output_dir: &Path) -> Result<ReportOutput> {
    let mean = mean_view_count(store)
        .await
        .context("Mean view count aggregation failed")?;
    info!("Mean view count: {:.2}", mean);

    let above = titles_above(store, mean)
        .await
        .context("Above-average title query failed")?;
    let matching = titles_matching(store, &config.report.keywords)
        .await
        .context("Keyword title query failed")?;

    let renderer = PdfRenderer::new(output_dir);
    let above_path = renderer
        .render(
            &config.report.above_average_file,
            ABOVE_AVERAGE_HEADING,
            &above,
        )
        .context("Failed to render the above-average report")?;
    let keyword_path = renderer
        .render(&config.report.keyword_file, KEYWORD_HEADING, &matching)
        .context("Failed to render the keyword report")?;

    Ok(ReportOutput {
        above_path,
        above_count: above.len(),
        keyword_path,
        keyword_count: matching.len(),
    })
}
