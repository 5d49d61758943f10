//! `lambdabt-cli` – LambdaBT sentry demo.
//!
//! Builds the sentry behavior tree from [`demo`], ticks it the configured
//! number of times and prints each outcome.
//!
//! 1. Loads `~/.lambdabt/config.toml` (or the file given with
//!    `--config <path>`); writes the defaults there when the file is absent.
//!    `LAMBDABT_TICKS` and `LAMBDABT_SEED` override whatever was resolved.
//! 2. Builds the tree, failing fast on an invalid selection policy.
//! 3. Ticks the root once per simulated frame. Exits with status 1 if any
//!    tick ended in `ERROR`.

mod config;
mod demo;

use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use lambdabt_runtime::Outcome;

#[derive(Debug, Parser)]
#[command(name = "lambdabt", version, about = "Tick the LambdaBT sentry demo tree")]
struct Cli {
    /// Config file to load instead of ~/.lambdabt/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let guard = lambdabt_runtime::init_tracing("lambdabt");

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let path = cli.config.unwrap_or_else(config::config_path);
    let cfg = resolve_config(&path, |key| std::env::var(key).ok());
    info!(?cfg, "configuration resolved");

    // ── Tree ──────────────────────────────────────────────────────────────
    let world = demo::World::new();
    let tree = match demo::build_sentry(&world, &cfg) {
        Ok(tree) => tree,
        Err(e) => {
            println!("{}: {}", "Cannot build tree".red().bold(), e);
            drop(guard);
            std::process::exit(2);
        }
    };

    // ── Tick loop ─────────────────────────────────────────────────────────
    println!();
    let mut errored = false;
    for _ in 0..cfg.ticks {
        let tick = world.advance();
        let outcome = tree.tick();
        errored |= outcome == Outcome::Error;
        println!(
            "  tick {:>3}  {}  {}",
            tick,
            paint(outcome),
            format!(
                "ammo={} steps={} shots={} glances={}",
                world.ammo(),
                world.steps(),
                world.shots(),
                world.glances()
            )
            .dimmed()
        );
    }
    println!();

    if errored {
        println!("{}", "  At least one tick ended in ERROR.".red().bold());
        // `exit` skips destructors; flush pending spans first.
        drop(guard);
        std::process::exit(1);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Load `path`, falling back to (and persisting) defaults, then apply the
/// `LAMBDABT_*` overrides from `lookup` whichever way the file resolved.
fn resolve_config(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> config::Config {
    let mut cfg = match config::load_from(path) {
        Ok(Some(cfg)) => {
            println!("  Config loaded from {}", path.display().to_string().bold());
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save_to(&cfg, path) {
                Ok(()) => println!(
                    "  {} Default config written to {}",
                    "✓".green().bold(),
                    path.display().to_string().bold()
                ),
                Err(e) => warn!(error = %e, "could not write default config"),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };
    config::apply_overrides(&mut cfg, lookup);
    cfg
}

fn paint(outcome: Outcome) -> colored::ColoredString {
    let label = format!("{:<7}", outcome.to_string());
    match outcome {
        Outcome::Success => label.green(),
        Outcome::Failure => label.yellow(),
        Outcome::Running => label.cyan(),
        Outcome::Error => label.red().bold(),
    }
}

fn print_banner() {
    let version = format!("v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("  {} {}", "LambdaBT".bold().cyan(), version.dimmed());
    println!("  Behavior tree combinators – sentry demo");
    println!();
}
