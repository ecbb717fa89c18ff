use chrono::NaiveDate;
use clap::Parser;
use heatwave_baseline_core::core_types::CelsiusDelta;
use heatwave_baseline_core::output::{daily_csv, to_csv_bytes};
use heatwave_baseline_core::{pipeline, BaselineConfig, BaselineError, HeatwaveEvent};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Counterfactual climate baseline generator
#[derive(Parser, Debug)]
#[command(name = "demo-headless")]
#[command(
    about = "Synthetic daily climate baseline with injected and detected heatwaves",
    long_about = None
)]
struct Args {
    /// JSON configuration file (missing fields take the built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Master random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// First simulated day (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last simulated day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Daily table output path
    #[arg(short, long, default_value = "baseline_daily.csv")]
    output: PathBuf,

    /// Also write monthly aggregates to this path
    #[arg(long)]
    monthly: Option<PathBuf>,

    /// Also write annual aggregates to this path
    #[arg(long)]
    annual: Option<PathBuf>,

    /// Also write the heatwave episode catalogue to this path
    #[arg(long)]
    episodes: Option<PathBuf>,

    /// Explicit heatwave as START:DAYS:PEAK, e.g. 2015-07-01:7:8.0 (repeatable)
    #[arg(short, long, value_parser = parse_event)]
    inject: Vec<HeatwaveEvent>,

    /// Disable the randomized yearly heatwave schedule
    #[arg(long)]
    no_schedule: bool,
}

fn parse_event(s: &str) -> Result<HeatwaveEvent, String> {
    let mut parts = s.split(':');
    let (Some(start), Some(days), Some(peak), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected START:DAYS:PEAK, got '{s}'"));
    };
    let start = start
        .parse::<NaiveDate>()
        .map_err(|e| format!("invalid start date '{start}': {e}"))?;
    let days = days
        .parse::<u32>()
        .map_err(|e| format!("invalid duration '{days}': {e}"))?;
    let peak = peak
        .parse::<f64>()
        .map_err(|e| format!("invalid peak anomaly '{peak}': {e}"))?;
    Ok(HeatwaveEvent::new(start, days, CelsiusDelta::new(peak)))
}

fn build_config(args: &Args) -> Result<BaselineConfig, BaselineError> {
    let mut config = match &args.config {
        Some(path) => BaselineConfig::load(path)?,
        None => BaselineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(start) = args.start {
        config.start = start;
    }
    if let Some(end) = args.end {
        config.end = end;
    }
    if args.no_schedule {
        config.injection.schedule = None;
    }
    config.injection.events.extend(args.inject.iter().copied());
    Ok(config)
}

fn run(args: &Args) -> Result<(), BaselineError> {
    let config = build_config(args)?;

    println!("=== Heatwave Baseline ===\n");
    println!(
        "Period: {} .. {}, seed {}",
        config.start, config.end, config.seed
    );

    let result = pipeline::run(&config)?;

    // Render every table before touching the filesystem
    let mut tables = vec![(args.output.clone(), daily_csv(&result.records)?)];
    if let Some(path) = &args.monthly {
        tables.push((path.clone(), to_csv_bytes(&result.monthly())?));
    }
    if let Some(path) = &args.annual {
        tables.push((path.clone(), to_csv_bytes(&result.annual())?));
    }
    let episodes = result.episodes();
    if let Some(path) = &args.episodes {
        tables.push((path.clone(), to_csv_bytes(&episodes)?));
    }

    let forced_days = result.records.iter().filter(|r| r.is_forced_heatwave).count();
    let heatwave_days = result.records.iter().filter(|r| r.is_heatwave).count();
    println!("Days simulated:     {}", result.records.len());
    println!(
        "Injected events:    {} applied, {} discarded",
        result.injection.applied.len(),
        result.injection.discarded.len()
    );
    println!("Forced days:        {forced_days}");
    println!(
        "Detected days:      {}",
        result.detection.is_detected.iter().filter(|&&d| d).count()
    );
    println!("Heatwave days:      {heatwave_days} in {} episodes", episodes.len());
    if let Some(longest) = episodes.iter().max_by_key(|e| e.length_days) {
        println!(
            "Longest episode:    {} .. {} ({} days, peak {})",
            longest.start, longest.end, longest.length_days, longest.peak_temperature
        );
    }
    println!();

    for (path, bytes) in tables {
        std::fs::write(&path, bytes)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
