//! Shared output formatting helpers.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

/// Emit a `--json` report on stdout, indented; prints an empty line if the
/// value cannot be serialized.
pub fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// One line of a human-readable report, label left-aligned in 20 columns.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<20} {}", key, value);
}

/// Write `contents` to `path`, naming the path on failure.
pub fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
