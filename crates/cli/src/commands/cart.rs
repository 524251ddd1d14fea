//! Cart display.

use std::fmt::Write as _;

use rocketshoes_core::Cart;

/// Longest product title shown before truncation.
const TITLE_WIDTH: usize = 40;

/// Print the cart to stdout as a table.
pub fn show(cart: &Cart) {
    print(&render(cart));
}

/// Print the persisted snapshot to stdout.
///
/// A snapshot that is valid JSON is pretty-printed; anything else is shown
/// as stored.
pub fn show_snapshot(raw: Option<&str>) {
    print(&snapshot(raw));
}

#[allow(clippy::print_stdout)]
fn print(output: &str) {
    println!("{output}");
}

/// Text for a stored snapshot, or `[]` when nothing has been saved yet.
#[must_use]
pub fn snapshot(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "[]".to_string();
    };
    serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| raw.to_string())
}

/// Render the cart as a plain-text table with totals.
#[must_use]
pub fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Carrinho vazio".to_string();
    }

    let summary = cart.summary();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:>4}  {:<TITLE_WIDTH$}  {:>4}  {:>14}  {:>14}",
        "ID", "PRODUTO", "QTD", "PREÇO", "SUBTOTAL"
    );
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "{:>4}  {:<TITLE_WIDTH$}  {:>4}  {:>14}  {:>14}",
            line.product_id,
            truncate(&line.title, TITLE_WIDTH),
            line.amount,
            line.unit_price.display(),
            line.subtotal.display()
        );
    }
    let _ = write!(
        out,
        "\n{} produto(s), {} unidade(s), total {}",
        summary.product_count,
        summary.total_quantity,
        summary.subtotal.display()
    );

    out
}

fn truncate(title: &str, width: usize) -> String {
    if title.chars().count() <= width {
        return title.to_string();
    }
    let mut short: String = title.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
