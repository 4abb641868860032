//! `brcode inspect` -- Decode and verify a payload.

use clap::Args;

use brcode_core::decode_payload;

#[derive(Args)]
pub struct InspectArgs {
    /// Payload text
    payload: String,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let decoded = decode_payload(args.payload.trim())?;

    if args.json {
        crate::output::print_json(&decoded);
        return Ok(());
    }

    println!("Payload ({} chars, checksum OK)", args.payload.trim().len());
    crate::output::print_kv("Format:", &decoded.format_indicator);
    if let Some(initiation) = &decoded.initiation {
        let kind = if initiation == "12" { "static" } else { "dynamic" };
        crate::output::print_kv("Initiation:", &format!("{initiation} ({kind})"));
    }
    crate::output::print_kv("GUI:", &decoded.gui);
    crate::output::print_kv("Payee key:", &decoded.payee_key);
    crate::output::print_kv("Category:", &decoded.category);
    crate::output::print_kv("Currency:", &decoded.currency);
    crate::output::print_kv("Amount:", decoded.amount.as_deref().unwrap_or("(open)"));
    crate::output::print_kv("Country:", &decoded.country_code);
    crate::output::print_kv("Name:", &decoded.payee_name);
    crate::output::print_kv("City:", &decoded.payee_city);
    crate::output::print_kv("Reference:", decoded.reference_id.as_deref().unwrap_or("-"));
    crate::output::print_kv("CRC:", &decoded.checksum);
    Ok(())
}
