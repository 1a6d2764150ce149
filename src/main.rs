use tracing_subscriber::EnvFilter;

use lendscore::config::Config;
use lendscore::ingest::loader::load_ledger;
use lendscore::pipeline::ScoringPipeline;
use lendscore::report::writer;

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path)?;

    // Initialize structured logging (set RUST_LOG=debug for per-record detail)
    init_logging(config.logging.json);
    tracing::info!("Configuration loaded from {}", config_path);

    let (records, load_stats) = load_ledger(&config.input.path)?;
    if load_stats.accepted == 0 {
        tracing::warn!("Ledger contains no usable transactions");
    }

    let run = ScoringPipeline::new().run(&records);

    writer::write_outputs(&config.output, &run)?;
    writer::log_summary(&run, config.output.top_n, config.output.band_width);

    tracing::info!(wallets = run.wallets_scored(), "Wallet scoring finished");
    Ok(())
}
