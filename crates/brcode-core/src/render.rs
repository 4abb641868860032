//! Symbol rendering: SVG markup for display and half-block text for terminals.

use std::fmt::Write;

use crate::qr::Symbol;

/// Render `symbol` as a standalone SVG document.
///
/// The symbol itself spans `pixel_size` pixels, so each module is
/// `pixel_size / symbol.size()` wide; a light border of `margin_modules`
/// modules surrounds it. Every dark module is one `<rect>`.
pub fn render_svg(symbol: &Symbol, pixel_size: f64, margin_modules: u32) -> String {
    let size = symbol.size();
    let module = pixel_size / size as f64;
    let margin = margin_modules as usize;
    let total = module * (size + 2 * margin) as f64;
    let total_str = fmt_num(total);
    let module_str = fmt_num(module);

    let dark = symbol.modules().iter().filter(|&&d| d).count();
    let mut svg = String::with_capacity(256 + dark * 64);
    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
         width=\"{total_str}\" height=\"{total_str}\" \
         viewBox=\"0 0 {total_str} {total_str}\" shape-rendering=\"crispEdges\">\
         <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>"
    );
    for (row, line) in symbol.rows().enumerate() {
        for (col, _) in line.iter().enumerate().filter(|(_, d)| **d) {
            let x = fmt_num((col + margin) as f64 * module);
            let y = fmt_num((row + margin) as f64 * module);
            let _ = write!(
                svg,
                "<rect x=\"{x}\" y=\"{y}\" width=\"{module_str}\" height=\"{module_str}\" fill=\"#000000\"/>"
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

/// Render `symbol` as text, two module rows per line, using half blocks.
/// Dark modules are drawn, so the output reads best on a light background.
pub fn render_ascii(symbol: &Symbol, margin_modules: u32) -> String {
    let margin = margin_modules as usize;
    let total = symbol.size() + 2 * margin;
    // Quiet-zone coordinates fall outside the symbol and read as light.
    let dark = |r: usize, c: usize| {
        r >= margin && c >= margin && symbol.is_dark(r - margin, c - margin)
    };

    let mut lines = Vec::with_capacity(total.div_ceil(2));
    for row in (0..total).step_by(2) {
        let line: String = (0..total)
            .map(|col| match (dark(row, col), dark(row + 1, col)) {
                (false, false) => ' ',
                (true, false) => '\u{2580}',
                (false, true) => '\u{2584}',
                (true, true) => '\u{2588}',
            })
            .collect();
        lines.push(line);
    }
    lines.join("\n")
}

/// Shortest decimal form with at most four fractional digits.
fn fmt_num(value: f64) -> String {
    let s = format!("{value:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
