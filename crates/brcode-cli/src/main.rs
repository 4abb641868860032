use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;
mod output;

#[derive(Parser)]
#[command(name = "brcode", version, about = "BR Code (Pix) payment-code generator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a payment code for a merchant
    Generate(cmd::generate::GenerateArgs),
    /// Serve a checkout request from a JSON file
    Checkout(cmd::checkout::CheckoutArgs),
    /// Decode and verify a payload
    Inspect(cmd::inspect::InspectArgs),
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match cli.command {
        Commands::Generate(args) => cmd::generate::run(args),
        Commands::Checkout(args) => cmd::checkout::run(args),
        Commands::Inspect(args) => cmd::inspect::run(args),
    };
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
