//! YTGraphX command line tool

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ytgraph_app::{analyze_channel, charts, display};
use ytgraph_common::{Result, YouTubeClient, YouTubeConfig};
use ytgraph_config::ConfigLoader;
use ytgraph_stats::{to_rows, CsvExporter, TrendSynthesizer};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ytgraph", author, version, about = "YouTube channel statistics tracker", long_about = None)]
struct Args {
    /// YouTube channel ID, handle or username (e.g. @google or UC_x5XG1OV2P6uZZ5FSM9Ttw)
    channel: String,

    /// Number of recent videos to display
    #[arg(short, long, default_value_t = 5)]
    videos: usize,

    /// Save trend charts as PNG files
    #[arg(short = 's', long)]
    save_charts: bool,

    /// Output directory for charts and exports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip video information
    #[arg(long)]
    no_videos: bool,

    /// Export current stats, history and videos as CSV files
    #[arg(long)]
    export_csv: bool,

    /// Lookback window length in months
    #[arg(short, long)]
    months: Option<u32>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    if let Err(error) = run(args).await {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let client = YouTubeClient::new(
        YouTubeConfig::new(&config.youtube.api_key)
            .with_base_url(&config.youtube.base_url)
            .with_timeout(config.youtube.timeout_seconds),
    )?;
    let synthesizer =
        TrendSynthesizer::new(config.history.monthly_growth, config.history.variation);

    let months = args.months.unwrap_or(config.history.months);
    let video_limit = if args.no_videos { 0 } else { args.videos };

    info!("Fetching data for channel: {}", args.channel);
    let report =
        analyze_channel(&client, &synthesizer, &args.channel, months, video_limit).await?;

    print!("{}", display::format_channel_info(&report.snapshot));
    if !args.no_videos {
        print!("{}", display::format_recent_videos(&report.videos));
    }

    if args.save_charts {
        let chart_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("charts"));
        let written = charts::save_charts(&report, &config.chart, &chart_dir).await?;
        println!(
            "\nSaved {} charts to {}",
            written.len(),
            chart_dir.display()
        );
    }

    if args.export_csv {
        let export_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.export.output_dir));
        let rows = to_rows(Some(&report.snapshot), &report.series, &report.videos)?;
        let written = CsvExporter::new(&export_dir).write_all(&report.snapshot.title, &rows)?;
        println!(
            "\nExported {} CSV files to {}",
            written.len(),
            export_dir.display()
        );
    }

    print!("{}", display::format_summary(&report, client.quota_used()));
    Ok(())
}
