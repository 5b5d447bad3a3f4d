//! Birthday Paradox CLI
//!
//! Runs the timer-driven simulation in the terminal and answers
//! theoretical-probability queries.

use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bday_core::{
    headline, pair_count, probability_table, shared_birthday_probability, SimConfig,
    SimulationDriver, Speed, TickReport, MAX_GROUP_SIZE, MIN_GROUP_SIZE,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bday")]
#[command(about = "Birthday paradox simulation", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run trials on a timer and print running statistics
    Run {
        /// People per trial (18-50)
        #[arg(long)]
        group_size: Option<u32>,

        /// Tick speed preset: slow, normal, fast
        #[arg(long, value_parser = parse_speed)]
        speed: Option<Speed>,

        /// Tick interval in milliseconds (overrides --speed)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Stop after this many trials
        #[arg(long)]
        trials: Option<u64>,

        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// JSON config file (defaults to $BDAY_SIM_CONFIG_PATH)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print one JSON snapshot per tick
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Theoretical chance of a shared birthday
    Probability {
        #[arg(long, default_value_t = 23)]
        group_size: u32,
    },

    /// Theoretical chance for a range of group sizes
    Table {
        #[arg(long, default_value_t = MIN_GROUP_SIZE)]
        from: u32,

        #[arg(long, default_value_t = MAX_GROUP_SIZE)]
        to: u32,
    },

    /// Why the chance is so high: number of pairs in the group
    Explain {
        #[arg(long, default_value_t = 23)]
        group_size: u32,
    },
}

fn parse_speed(s: &str) -> std::result::Result<Speed, String> {
    Speed::parse(s).ok_or_else(|| format!("unknown speed '{}': expected slow, normal or fast", s))
}

/// Used when `RUST_LOG` is unset. The binary logs under its own target, `bday`.
const DEFAULT_LOG_FILTER: &str = "bday_core=warn,bday=info";

fn init_logging(use_json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match cli.command {
        Commands::Run { group_size, speed, interval_ms, trials, seed, config, json } => {
            let mut config = match config {
                Some(path) => SimConfig::load(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => SimConfig::from_env().context("failed to load config from environment")?,
            };
            if let Some(n) = group_size {
                config.group_size = n;
            }
            if let Some(speed) = speed {
                config.speed = speed;
            }
            if interval_ms.is_some() {
                config.interval_ms = interval_ms;
            }
            if trials.is_some() {
                config.max_trials = trials;
            }
            if seed.is_some() {
                config.seed = seed;
            }

            run_simulation(config, json)?;
        }

        Commands::Probability { group_size } => {
            println!("{}", headline(group_size));
            println!(
                "   Exact probability: {:.4} ({:.1}%)",
                shared_birthday_probability(group_size),
                shared_birthday_probability(group_size) * 100.0
            );
        }

        Commands::Table { from, to } => {
            anyhow::ensure!(from <= to, "--from ({}) must not exceed --to ({})", from, to);
            println!("{:>6} {:>8} {:>10}", "people", "pairs", "chance");
            for row in probability_table(from, to) {
                println!(
                    "{:>6} {:>8} {:>9.1}%",
                    row.group_size,
                    row.pairs,
                    row.probability * 100.0
                );
            }
        }

        Commands::Explain { group_size } => {
            println!("{}", headline(group_size));
            println!(
                "   {} people form {} distinct pairs, and every pair is a chance to match.",
                group_size,
                pair_count(group_size)
            );
            println!(
                "   Chance that all {} birthdays differ: {:.1}%",
                group_size,
                (1.0 - shared_birthday_probability(group_size)) * 100.0
            );
        }
    }

    Ok(())
}

fn run_simulation(config: SimConfig, json: bool) -> Result<()> {
    let mut driver = SimulationDriver::new(config).context("invalid simulation config")?;

    tracing::info!(
        group_size = driver.group_size(),
        interval_ms = (driver.interval().as_millis() as u64),
        seed = driver.seed(),
        "Starting simulation"
    );

    let theoretical = shared_birthday_probability(driver.group_size());
    if !json {
        println!("🎂 {}", headline(driver.group_size()));
        println!("   Theoretical chance: {:.1}%\n", theoretical * 100.0);
    }

    let mut write_error = None;
    let summary = driver.run(|report| {
        if !json {
            print_line(report, theoretical);
            return ControlFlow::Continue(());
        }
        match print_json(report) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                write_error = Some(e);
                ControlFlow::Break(())
            }
        }
    });
    if let Some(e) = write_error {
        return Err(e);
    }

    if !json {
        let s = summary.snapshot;
        println!("\n✅ {} trials", summary.ticks);
        println!("   Successes:         {}", s.successes);
        println!("   Failures:          {}", s.failures);
        if let Some(rate) = s.observed_rate() {
            println!("   Observed chance:   {:.1}%", rate * 100.0);
        }
        println!("   Theoretical:       {:.1}%", summary.theoretical * 100.0);
        println!("   Avg matched pairs: {:.2}", s.average_matched_pairs);
    }
    Ok(())
}

fn print_line(report: &TickReport, theoretical: f64) {
    let s = &report.snapshot;
    let outcome = &report.outcome;

    let verdict = if outcome.matched() {
        let pairs: Vec<String> = outcome
            .collision_pairs()
            .iter()
            .map(|p| {
                format!(
                    "{} & {} ({})",
                    outcome.individuals()[p.first].label,
                    outcome.individuals()[p.second].label,
                    p.birthday
                )
            })
            .collect();
        format!("✔ {}", pairs.join(", "))
    } else {
        "✘ no shared birthday".to_string()
    };

    let observed = s.observed_rate().map(|r| format!("{:5.1}%", r * 100.0)).unwrap_or_default();
    println!(
        "#{:<5} observed {} | theoretical {:5.1}% | {}",
        s.trial_count,
        observed,
        theoretical * 100.0,
        verdict
    );
}

fn print_json(report: &TickReport) -> Result<()> {
    let line = serde_json::to_string(&serde_json::json!({
        "snapshot": report.snapshot,
        "point": report.point,
        "matched_individuals": report.outcome.matched_individuals(),
    }))?;
    println!("{}", line);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn test_default_filter_enables_binary_target() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).expect("default filter parses");
        let subscriber = tracing_subscriber::registry().with(filter);

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: env!("CARGO_CRATE_NAME"), tracing::Level::INFO));
            assert!(!tracing::enabled!(target: env!("CARGO_CRATE_NAME"), tracing::Level::DEBUG));
            assert!(tracing::enabled!(target: "bday_core", tracing::Level::WARN));
            assert!(!tracing::enabled!(target: "bday_core", tracing::Level::INFO));
        });
    }
}
