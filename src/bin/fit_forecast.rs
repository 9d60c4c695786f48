use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use courtcast::service::{ForecastService, ServiceConfig};
use courtcast::{Stat, player};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let roster_path = positional_arg()
        .ok_or_else(|| anyhow!("usage: fit_forecast <roster.json> [--out model.json] [--report report.json] [--top N] [--threshold PCT] [--seed N]"))?;
    let out_path = parse_path_arg("--out").unwrap_or_else(|| PathBuf::from("forecast_model.json"));
    let report_path = parse_path_arg("--report");
    let top_n = parse_num_arg("--top").map(|v| v as usize).unwrap_or(10);
    let threshold = parse_num_arg("--threshold").unwrap_or(5.0);

    let raw = fs::read_to_string(&roster_path)
        .with_context(|| format!("read roster {}", roster_path.display()))?;
    let roster = player::parse_roster_json(&raw)
        .with_context(|| format!("parse roster {}", roster_path.display()))?;

    let mut config = ServiceConfig {
        default_top_n: top_n,
        breakout_threshold_pct: threshold,
        ..ServiceConfig::default()
    };
    if let Some(seed) = parse_num_arg("--seed") {
        config.train.target.seed = seed as u64;
        config.train.split_seed = seed as u64;
        config.train.init_seed = seed as u64;
    }

    let mut service = ForecastService::new(config);
    service.load_players(roster);
    service.train().context("train forecast model")?;

    service
        .save_artifact(&out_path)
        .with_context(|| format!("write artifact {}", out_path.display()))?;

    if let Some(model) = service.model() {
        println!(
            "fit complete: train={} val={} train_loss={:.4} val_loss={:.4}",
            model.metrics.train_samples,
            model.metrics.val_samples,
            model.metrics.train_loss,
            model.metrics.val_loss
        );
    }
    println!();

    for stat in Stat::ALL {
        println!("Top {top_n} predicted {}:", stat.label());
        for row in service.top_performers(stat, top_n)? {
            println!(
                "  {:>2}. {:24} {:4} {:6.1}",
                row.rank, row.name, row.team, row.predicted
            );
        }
        println!();
    }

    println!("Breakout candidates (> {threshold:.1}% in any stat):");
    let breakout_rows = service.breakout_players(threshold, top_n)?;
    if breakout_rows.is_empty() {
        println!("  none");
    }
    for row in &breakout_rows {
        println!(
            "  {:>2}. {:24} {:4} +{:.1} total ({:+.1}%)",
            row.rank, row.name, row.team, row.total_stat_increase, row.total_improvement_pct
        );
    }

    if let Some(path) = report_path {
        let report = service.generate_report()?;
        fs::write(&path, report.to_json_pretty()?)
            .with_context(|| format!("write report {}", path.display()))?;
        println!();
        println!("report written: {}", path.display());
    }

    println!();
    println!("artifact written: {}", out_path.display());
    Ok(())
}

fn positional_arg() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            // `--flag value` consumes the next token; `--flag=value` does not.
            skip_next = !arg.contains('=');
            continue;
        }
        return Some(PathBuf::from(arg));
    }
    None
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_str_arg(flag).map(PathBuf::from)
}

fn parse_num_arg(flag: &str) -> Option<f64> {
    parse_str_arg(flag).and_then(|s| s.parse().ok())
}

fn parse_str_arg(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(v) = arg.strip_prefix(&prefix) {
            if !v.trim().is_empty() {
                return Some(v.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.to_string());
        }
    }
    None
}
