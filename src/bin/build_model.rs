//! Train a price model from a listing CSV and report its quality.
//!
//! Usage:
//!   cargo run --bin build_model -- --data data/otomoto.csv [options]
//!
//! Options:
//!   --data PATH            Listing CSV (required)
//!   --out PATH             Model artifact (default: model.oto)
//!   --svg PATH             Scatter artifact (default: regression_distribution.svg)
//!   --seed N               Session seed (default: 1)
//!   --test-fraction F      Held-out fraction (default: 0.2)
//!   --iterations N         Boosting rounds (default: 50)
//!   --verbose              Per-round training output

use std::path::PathBuf;
use std::process::ExitCode;

use otoprice::plot::{write_scatter_svg, PlotOptions, RegressionLine};
use otoprice::report::format_regression_metrics;
use otoprice::{
    default_columns, load_csv, LoaderOptions, TrainerConfig, TrainingSession, Verbosity,
};

struct Args {
    data: PathBuf,
    out: PathBuf,
    svg: PathBuf,
    seed: u64,
    test_fraction: f32,
    iterations: u32,
    verbose: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut data = None;
    let mut out = PathBuf::from("model.oto");
    let mut svg = PathBuf::from("regression_distribution.svg");
    let mut seed = 1u64;
    let mut test_fraction = 0.2f32;
    let mut iterations = 50u32;
    let mut verbose = false;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = |name: &str| {
            it.next()
                .ok_or_else(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "--data" => data = Some(PathBuf::from(value("--data")?)),
            "--out" => out = PathBuf::from(value("--out")?),
            "--svg" => svg = PathBuf::from(value("--svg")?),
            "--seed" => {
                seed = value("--seed")?
                    .parse()
                    .map_err(|e| format!("--seed: {e}"))?
            }
            "--test-fraction" => {
                test_fraction = value("--test-fraction")?
                    .parse()
                    .map_err(|e| format!("--test-fraction: {e}"))?
            }
            "--iterations" => {
                iterations = value("--iterations")?
                    .parse()
                    .map_err(|e| format!("--iterations: {e}"))?
            }
            "--verbose" => verbose = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(Args {
        data: data.ok_or("--data is required")?,
        out,
        svg,
        seed,
        test_fraction,
        iterations,
        verbose,
    })
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_csv(&args.data, &LoaderOptions::default())?;
    println!("loaded {} listings from {}", table.n_rows(), args.data.display());

    let config = TrainerConfig::builder()
        .number_of_iterations(args.iterations)
        .build()?;
    let session = TrainingSession::new(args.seed)
        .with_test_fraction(args.test_fraction)
        .with_verbosity(if args.verbose {
            Verbosity::Info
        } else {
            Verbosity::Silent
        });

    println!("=============== Training the model ===============");
    let model = session.fit(&table, &default_columns(), &config)?;

    let metrics = session.evaluate(&model, &table)?;
    print!("{}", format_regression_metrics(&metrics));

    model.save(&args.out)?;
    println!("The model is saved to {}", args.out.display());

    let pairs = session.holdout_pairs(&model, &table);
    let line = match RegressionLine::fit(&pairs) {
        Ok(line) => Some(line),
        Err(e) => {
            eprintln!("skipping regression line: {e}");
            None
        }
    };
    write_scatter_svg(&args.svg, &pairs, line.as_ref(), &PlotOptions::default())?;
    println!("The chart is saved to {}", args.svg.display());

    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(error) = run(&args) {
        eprintln!("error: {error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
