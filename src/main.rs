use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use bazaar_rs::config::Settings;
use bazaar_rs::engine::margin::calculate_all;
use bazaar_rs::engine::ranking::{count_matching, rank};
use bazaar_rs::engine::types::{ProfitRecord, RankMethod, RankQuery};
use bazaar_rs::market_data::adapters::file::{FileSource, LoadedSnapshot};
use bazaar_rs::market_data::normaliser::Normaliser;
use bazaar_rs::market_data::router::{RouterError, SourceRouter};
use bazaar_rs::persist::files::FileReportStore;
use bazaar_rs::persist::ReportStore;
use bazaar_rs::{report, telemetry};

/// Analyze the bazaar for profit opportunities
#[derive(Parser, Debug)]
#[command(name = "bazaar-rs", version, about)]
struct Cli {
    /// Minimum buy or sell volume to consider
    #[arg(short = 'v', long, default_value_t = 1000)]
    min_volume: u64,

    /// Number of top items to display
    #[arg(short = 'n', long, default_value_t = 20)]
    top_n: usize,

    /// Profit calculation method to use for ranking
    #[arg(short, long, value_enum, default_value_t = RankMethod::BuySellOrderPercent)]
    method: RankMethod,

    /// Minimum buy price to consider
    #[arg(short = 'p', long, default_value_t = 0.0)]
    min_price: f64,

    /// Load data from a previously saved JSON file instead of the network
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Settings file (defaults to ./bazaar.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the result JSON (CSV goes next to it)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    telemetry::init_tracing(&settings.log_filter);
    telemetry::init_metrics();

    let store = FileReportStore::new(settings.output_dir());

    // 1) Get profit records, either from a saved file or from the network
    let records: Vec<ProfitRecord> = match &cli.file {
        Some(path) => match FileSource::new(path).load(&Normaliser::for_saved_files())? {
            LoadedSnapshot::Records(records) => {
                println!("Loaded {} profit opportunities from {}", records.len(), path.display());
                records
            }
            LoadedSnapshot::OrderBooks(snapshot) => {
                println!(
                    "Loaded {} items from {} ({} without liquidity, {} errors)",
                    snapshot.books.len(),
                    path.display(),
                    snapshot.excluded,
                    snapshot.errors
                );
                calculate_all(&snapshot.books)
            }
        },
        None => {
            let sources = settings.build_sources().context("building snapshot sources")?;
            let router = SourceRouter::new(sources, settings.normaliser())
                .with_raw_response_path(settings.raw_response_path());
            println!("Attempting to fetch bazaar data from {} sources...", router.source_count());

            match router.fetch_first_available().await {
                Ok(routed) => {
                    print!("{}", report::render_attempts(&routed.attempts));
                    println!("Successfully fetched data from {}", routed.source);

                    // keep a copy so the same snapshot can be re-analysed with -f
                    let raw_path = store
                        .save_order_books(&routed.snapshot.books)
                        .context("saving normalised bazaar data")?;
                    println!("Saved raw bazaar data to {}", raw_path.display());
                    calculate_all(&routed.snapshot.books)
                }
                Err(RouterError::AllSourcesFailed { attempts }) => {
                    print!("{}", report::render_attempts(&attempts));
                    println!("\n{}", report::remediation_message(env!("CARGO_PKG_NAME")));
                    anyhow::bail!("all {} snapshot sources failed", attempts.len());
                }
            }
        }
    };
    println!("Calculated profit margins for {} items", records.len());

    // 2) Rank
    let query = RankQuery {
        method: cli.method,
        min_volume: cli.min_volume,
        min_price: cli.min_price,
        top_n: cli.top_n,
    };
    println!("Found {} items meeting volume/price criteria", count_matching(&records, &query));
    let best = rank(&records, &query);
    info!(method = %query.method, shown = best.len(), "Ranked profit opportunities");

    // 3) Report
    println!("\n{}", report::render_table(&best, query.method));
    let saved = store
        .persist(&best, cli.output.as_deref())
        .context("saving profit analysis")?;
    println!("Saved profit analysis to {}", saved.json_path.display());
    println!("Also saved results as CSV to {}", saved.csv_path.display());

    Ok(())
}
