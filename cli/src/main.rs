//! Command-line driver for the random engine
//!
//! ```text
//! random-engine [--config FILE] [--algorithm NAME] [--seed SEED] [--skip N]
//!               [--count N] [--below N] [--snapshot]
//! ```
//!
//! Prints `count` raw 64-bit draws in hex, or bounded draws in decimal when
//! `--below` is given. `--snapshot` prints the final state as JSON.

use random_engine_core::{
    Algorithm, BitSource, ConfigError, EngineConfig, RandomEngine, RangeExt, SeedConfig,
};
use std::process::ExitCode;

struct Options {
    config: EngineConfig,
    count: usize,
    below: Option<u64>,
    snapshot: bool,
}

fn usage() -> String {
    "usage: random-engine [--config FILE] [--algorithm mix64|xor128|xoro128|xor1024] \
     [--seed SEED] [--skip N] [--count N] [--below N] [--snapshot]"
        .to_string()
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, value))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options {
        config: EngineConfig::new(Algorithm::Xor128),
        count: 10,
        below: None,
        snapshot: false,
    };

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read {}: {}", path, e))?;
                options.config = EngineConfig::from_json(&json).map_err(|e| e.to_string())?;
            }
            "--algorithm" => {
                let name = args.next().ok_or("--algorithm needs a name")?;
                options.config.algorithm = name.parse().map_err(|e: ConfigError| e.to_string())?;
            }
            "--seed" => {
                let seed = args.next().ok_or("--seed needs a value")?;
                options.config.seed = Some(match seed.parse::<u64>() {
                    Ok(value) => SeedConfig::Int(value),
                    Err(_) => SeedConfig::Text(seed),
                });
            }
            "--skip" => options.config.skip_ahead = parse_number("--skip", args.next())?,
            "--count" => options.count = parse_number("--count", args.next())?,
            "--below" => options.below = Some(parse_number("--below", args.next())?),
            "--snapshot" => options.snapshot = true,
            "--help" | "-h" => return Err(usage()),
            other => return Err(format!("unknown argument '{}'\n{}", other, usage())),
        }
    }

    Ok(options)
}

fn run(options: Options) -> Result<(), String> {
    let mut engine = options.config.build().map_err(|e| e.to_string())?;

    for _ in 0..options.count {
        match options.below {
            Some(upper) => {
                let value = engine.less_than_u64(upper).map_err(|e| e.to_string())?;
                println!("{}", value);
            }
            None => println!("{:#018x}", engine.next64()),
        }
    }

    if options.snapshot {
        let json = engine.snapshot().to_json().map_err(|e| e.to_string())?;
        println!("{}", json);
    }

    Ok(())
}

fn main() -> ExitCode {
    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
