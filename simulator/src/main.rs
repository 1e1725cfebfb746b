use anyhow::{Context, Result};
use clap::Parser;
use dlspins_simulator::{Config, Report, Simulator, ValidatedConfig};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    rounds: Option<u64>,

    /// Seed for a reproducible run.
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    json: bool,

    /// Write the report as JSON to this path instead of printing a table.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn load_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn build_config(args: &Args) -> Result<ValidatedConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if args.json {
        config.json_logs = true;
    }
    config.validate().context("invalid config")
}

fn init_tracing(config: &ValidatedConfig) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.log_level).into())
        .from_env_lossy();
    if config.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn print_report(report: &Report) {
    println!("seed={} rounds={}", report.seed, report.rounds);
    println!(
        "{:<6} {:>10} {:>14} {:>14} {:>9} {:>8} {:>11} {:>9}",
        "game", "trials", "wagered", "won", "big_wins", "rtp", "house_edge", "stderr"
    );
    for game in &report.games {
        println!(
            "{:<6} {:>10} {:>14} {:>14} {:>9} {:>8.4} {:>11.4} {:>9.4}",
            game.game.to_string(),
            game.trials,
            game.wagered,
            game.won,
            game.big_wins,
            game.rtp,
            game.house_edge,
            game.stderr
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;
    init_tracing(&config);

    let simulator = Simulator::new(config);
    info!(seed = simulator.seed(), "starting simulator");
    let report = simulator.run().context("simulation failed")?;

    match &args.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write(path, json)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print_report(&report),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "dlspins-simulator",
            "--rounds",
            "10",
            "--seed",
            "7",
            "--log-level",
            "warn",
        ]);
        let config = build_config(&args).expect("config should parse");
        assert_eq!(config.rounds, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_level, tracing::Level::WARN);
    }

    #[test]
    fn rejects_zero_rounds() {
        let args = Args::parse_from(["dlspins-simulator", "--rounds", "0"]);
        let err = build_config(&args).unwrap_err();
        assert!(
            format!("{err:#}").contains("rounds"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from(["dlspins-simulator", "--config", "/nonexistent/dlspins.yaml"]);
        assert!(build_config(&args).is_err());
    }
}
