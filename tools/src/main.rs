//! generate-sample: writes the sample cohort CSV for the analysis tool.
//!
//! Usage:
//!   generate-sample
//!   generate-sample --seed 7 --out /tmp/cohorts.csv
//!   generate-sample --config sample.json --report report.json
//!
//! Without `--out`, the CSV lands in `public/` at the workspace root.

use anyhow::{Context, Result};
use cohort_sample_core::{
    config::{GeneratorConfig, DEFAULT_SEED},
    generator::Generator,
};
use std::env;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = arg_value(&args, "--config");
    let out = arg_value(&args, "--out");
    let report_path = arg_value(&args, "--report");

    let mut config = match config_path {
        Some(path) => GeneratorConfig::load(Path::new(path))?,
        None => GeneratorConfig::default(),
    };
    let seed = parse_arg(&args, "--seed", config.seed)?;
    if seed != DEFAULT_SEED {
        log::info!("seed override: {seed}");
    }
    config = config.with_seed(seed);

    let output_path = match out {
        Some(path) => PathBuf::from(path),
        None => workspace_relative(&config.output_path),
    };
    config = config.with_output_path(output_path);

    let generator = Generator::new(config)?;
    let report = generator.run()?;

    for line in report.summary_lines() {
        println!("{line}");
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).with_context(|| format!("Cannot write report to {path}"))?;
    }
    Ok(())
}

/// Relative paths resolve against the workspace root, mirroring a script
/// that writes next to itself rather than into the caller's cwd.
fn workspace_relative(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(path)
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Value of `flag`, or `default` when absent. A present but unparsable
/// value is an error rather than a silent fallback.
fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match arg_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {flag}: {raw:?} ({e})")),
        None => Ok(default),
    }
}
