use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use thermowidget_lib::telemetry::replay::{replay_trace, Trace};
use thermowidget_lib::WidgetConfig;

#[derive(Debug, Parser)]
#[command(name = "thermowidget")]
#[command(about = "Drag and petting engine of the weather overlay widget")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a recorded pointer trace and print the emitted widget events.
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
struct ReplayArgs {
    trace: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => replay(args),
    }
}

fn replay(args: ReplayArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => WidgetConfig::load(path).context("loading widget config")?,
        None => WidgetConfig::default(),
    };
    let trace = Trace::load(&args.trace).context("loading trace")?;

    let report = replay_trace(&trace, &config);
    for timed in &report.events {
        println!("{}", serde_json::to_string(timed)?);
    }
    println!(
        "{}",
        serde_json::to_string(&serde_json::json!({ "finalPosition": report.final_position }))?
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}
