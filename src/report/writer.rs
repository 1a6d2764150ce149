use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::config::OutputConfig;
use crate::pipeline::ScoringRun;
use crate::scoring::scorer::{ScoredWallet, MAX_SCORE};

/// Number of wallets whose score falls in `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBand {
    pub lower: u16,
    pub upper: u16,
    pub count: usize,
}

/// Bucket scores into bands of `width`. The last band also holds `MAX_SCORE`,
/// so a width of 100 gives `0-99, ..., 800-899, 900-1000`.
pub fn score_bands(scores: &[ScoredWallet], width: u16) -> Vec<ScoreBand> {
    if width == 0 {
        return Vec::new();
    }
    let band_count = usize::from(MAX_SCORE.div_ceil(width)).max(1);

    let mut bands: Vec<ScoreBand> = (0..band_count)
        .map(|i| {
            let lower = i as u16 * width;
            let upper = if i + 1 == band_count {
                MAX_SCORE
            } else {
                lower + width - 1
            };
            ScoreBand {
                lower,
                upper,
                count: 0,
            }
        })
        .collect();

    for scored in scores {
        let index = usize::from(scored.score / width).min(band_count - 1);
        bands[index].count += 1;
    }
    bands
}

/// Write ranked scores as `wallet,score` CSV.
pub fn write_scores_csv<W: Write>(writer: W, scores: &[ScoredWallet]) -> eyre::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for scored in scores {
        csv_writer.serialize(scored)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the full feature table, one row per wallet in wallet order.
pub fn write_features_csv<W: Write>(writer: W, run: &ScoringRun) -> eyre::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for features in run.features.values() {
        csv_writer.serialize(features)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_scores_json<W: Write>(writer: W, scores: &[ScoredWallet]) -> eyre::Result<()> {
    serde_json::to_writer_pretty(writer, scores)?;
    Ok(())
}

fn create_file(path: &str) -> eyre::Result<BufWriter<File>> {
    let file = File::create(path)
        .map_err(|e| eyre::eyre!("Failed to create output file '{}': {}", path, e))?;
    Ok(BufWriter::new(file))
}

/// Write every configured output file for a finished run.
pub fn write_outputs(config: &OutputConfig, run: &ScoringRun) -> eyre::Result<()> {
    write_scores_csv(create_file(&config.scores_csv)?, &run.scores)?;
    tracing::info!(wallets = run.scores.len(), "Scores written to {}", config.scores_csv);

    if let Some(ref path) = config.features_csv {
        write_features_csv(create_file(path)?, run)?;
        tracing::info!(wallets = run.features.len(), "Features written to {}", path);
    }

    if let Some(ref path) = config.scores_json {
        let mut writer = create_file(path)?;
        write_scores_json(&mut writer, &run.scores)?;
        writer.flush()?;
        tracing::info!("Scores JSON written to {}", path);
    }

    Ok(())
}

/// Log the top and bottom `top_n` wallets and the score distribution.
pub fn log_summary(run: &ScoringRun, top_n: usize, band_width: u16) {
    if run.scores.is_empty() {
        tracing::warn!("No wallets scored");
        return;
    }

    for (rank, scored) in run.scores.iter().take(top_n).enumerate() {
        tracing::info!(
            rank = rank + 1,
            wallet = %scored.wallet,
            score = scored.score,
            "Top wallet"
        );
    }

    for scored in run.scores.iter().rev().take(top_n) {
        tracing::info!(wallet = %scored.wallet, score = scored.score, "Bottom wallet");
    }

    for band in score_bands(&run.scores, band_width) {
        tracing::info!(
            lower = band.lower,
            upper = band.upper,
            wallets = band.count,
            "Score band"
        );
    }
}
