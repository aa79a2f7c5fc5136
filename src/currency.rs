pub const CURRENCY_SYMBOL: &str = "£";

/// Render an amount in minor units (pence) as pounds, e.g. `320` as `£3.20`.
pub fn format_minor(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{CURRENCY_SYMBOL}{}.{:02}", abs / 100, abs % 100)
}
