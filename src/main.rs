use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use plan_compare::compare::{Options, compare};
use plan_compare::report::{render, write_csv};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Compares residential power plans for a set of power consumption profiles.
#[derive(Parser)]
#[command(name = "plan_compare", version)]
#[command(about = "Ranks residential power plans for each consumption profile", long_about = None)]
struct Cli {
    /// CSV of power plans
    #[arg(value_name = "PLANS_FILE")]
    plans_file: PathBuf,

    /// CSV of power consumption profiles
    #[arg(value_name = "PROFILES_FILE")]
    profiles_file: PathBuf,

    /// Billing intervals per day (default: taken from the header width)
    #[arg(short = 'n', long)]
    intervals: Option<usize>,

    /// Header rows to skip at the top of each file
    #[arg(long, default_value_t = 1)]
    header_rows: usize,

    /// Also write the ranked scores to this CSV file
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
}

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", diagnostic(&err));
            ExitCode::FAILURE
        }
    }
}

/// Single-line message for a fatal error, context first.
fn diagnostic(err: &anyhow::Error) -> String {
    format!("{err:#}")
}

fn run(cli: &Cli) -> Result<()> {
    let options = Options {
        intervals: cli.intervals,
        header_rows: cli.header_rows,
    };

    let comparison = compare(&cli.plans_file, &cli.profiles_file, options).with_context(|| {
        format!(
            "comparing {} against {}",
            cli.plans_file.display(),
            cli.profiles_file.display()
        )
    })?;

    if !comparison.rejected.is_empty() {
        warn!(count = comparison.rejected.len(), "Some inputs were left out of the results");
    }

    for (profile, ranked) in &comparison.rankings {
        print!("{}", render(profile, ranked));
    }

    if let Some(path) = &cli.csv {
        let rankings = comparison
            .rankings
            .iter()
            .map(|(profile, ranked)| (profile.as_str(), ranked.as_slice()));
        write_csv(path, rankings).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Wrote scores");
    }

    Ok(())
}
