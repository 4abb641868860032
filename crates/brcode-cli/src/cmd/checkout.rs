//! `brcode checkout` -- Serve a checkout request from a JSON file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use brcode_core::{checkout, CheckoutRequest, CodeOptions};

#[derive(Args)]
pub struct CheckoutArgs {
    /// Request file: {"payeeKey", "amount", "payeeName", "payeeCity", "referenceId"}
    #[arg(short, long)]
    request: PathBuf,
    /// Write the response here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

pub fn run(args: CheckoutArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.request)
        .with_context(|| format!("reading {}", args.request.display()))?;
    let request: CheckoutRequest = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.request.display()))?;

    let response = checkout(&request, &CodeOptions::default())?;

    match &args.out {
        Some(path) => {
            let json = serde_json::to_string_pretty(&response)?;
            crate::output::write_file(path, &json)?;
            tracing::info!(path = %path.display(), "wrote checkout response");
        }
        None => crate::output::print_json(&response),
    }
    Ok(())
}
