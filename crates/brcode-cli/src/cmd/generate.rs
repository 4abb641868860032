//! `brcode generate` -- Generate a payment code for a merchant.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context};
use clap::Args;

use brcode_core::text::order_reference;
use brcode_core::{
    render_ascii, Amount, CodeOptions, EcLevel, GeneratorConfig, MerchantConfig,
    PaymentCodeGenerator,
};

#[derive(Args)]
pub struct GenerateArgs {
    /// Merchant file: a merchant object, or {"merchant": ..., "options": ...}
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Amount, e.g. 10.00
    #[arg(short, long)]
    amount: Amount,
    /// Transaction reference (default: P<epoch millis>)
    #[arg(short, long)]
    reference: Option<String>,
    /// Override the payee key
    #[arg(long)]
    key: Option<String>,
    /// Override the merchant name
    #[arg(long)]
    name: Option<String>,
    /// Override the merchant city
    #[arg(long)]
    city: Option<String>,
    /// Minimum error-correction level (L, M, Q, H)
    #[arg(long)]
    ec: Option<EcLevel>,
    /// Write the SVG to this path
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Symbol width in pixels
    #[arg(long)]
    pixel_size: Option<f64>,
    /// Quiet zone in modules
    #[arg(long)]
    margin: Option<u32>,
    /// Print the symbol to the terminal
    #[arg(long)]
    ascii: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(path: &Path) -> anyhow::Result<GeneratorConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    let config = if value.get("merchant").is_some() {
        GeneratorConfig::from_json_str(&text)?
    } else {
        GeneratorConfig {
            merchant: MerchantConfig::from_json_str(&text)?,
            options: CodeOptions::default(),
        }
    };
    Ok(config)
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let (merchant, mut options) = match &args.config {
        Some(path) => {
            let config = load_config(path)?;
            (Some(config.merchant), config.options)
        }
        None => (None, CodeOptions::default()),
    };

    let merchant = match (merchant, &args.key, &args.name, &args.city) {
        (Some(mut m), key, name, city) => {
            if let Some(key) = key {
                m.payee_key = key.clone();
            }
            if let Some(name) = name {
                m.name = name.clone();
            }
            if let Some(city) = city {
                m.city = city.clone();
            }
            m
        }
        (None, Some(key), Some(name), Some(city)) => MerchantConfig::new(key, name, city),
        (None, ..) => bail!("either --config or all of --key, --name and --city are required"),
    };

    if let Some(level) = args.ec {
        options.symbol.min_ec_level = level;
    }
    if let Some(pixel_size) = args.pixel_size {
        options.render.pixel_size = pixel_size;
    }
    if let Some(margin) = args.margin {
        options.render.margin_modules = margin;
    }

    let reference = args
        .reference
        .unwrap_or_else(|| order_reference("P", epoch_millis()));
    let generator = PaymentCodeGenerator::new(merchant, options)?;
    let code = generator.generate(args.amount, &reference)?;
    let merchant = generator.merchant();
    let min_ec_level = generator.options().symbol.min_ec_level;

    if let Some(path) = &args.svg {
        crate::output::write_file(path, &code.svg_markup)?;
    }

    if args.json {
        crate::output::print_json(&serde_json::json!({
            "text": code.text,
            "reference": reference,
            "amount": args.amount.to_string(),
            "amount_value": args.amount.as_f64(),
            "merchant": {
                "name": merchant.name,
                "city": merchant.city,
                "payee_key": merchant.payee_key,
            },
            "min_ec_level": min_ec_level.to_string(),
            "version": code.symbol.version(),
            "ec_level": code.symbol.ec_level().to_string(),
            "mask": code.symbol.mask(),
            "size": code.symbol.size(),
            "svg_path": args.svg.as_ref().map(|p| p.display().to_string()),
        }));
    } else {
        println!("{}", code.text);
        println!();
        crate::output::print_kv("Merchant:", &format!("{} ({})", merchant.name, merchant.city));
        crate::output::print_kv("Reference:", &reference);
        crate::output::print_kv("Amount:", &args.amount.to_string());
        crate::output::print_kv(
            "Symbol:",
            &format!(
                "version {} ({}x{}), level {} (min {}), mask {}",
                code.symbol.version(),
                code.symbol.size(),
                code.symbol.size(),
                code.symbol.ec_level(),
                min_ec_level,
                code.symbol.mask()
            ),
        );
        if let Some(path) = &args.svg {
            crate::output::print_kv("SVG:", &path.display().to_string());
        }
    }

    if args.ascii {
        println!();
        println!("{}", render_ascii(&code.symbol, 2));
    }
    Ok(())
}
