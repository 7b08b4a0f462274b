use crate::model::{Category, Token};

const HOUR_MS: u64 = 3_600_000;

pub fn price(value: f64) -> String {
    format!("${value:.6}")
}

/// 24h change with its direction carried by the arrow. Zero counts as up.
pub fn price_change(change: f64) -> String {
    let arrow = if change >= 0.0 { '▲' } else { '▼' };
    format!("{arrow} {:.2}%", change.abs())
}

/// Volume and liquidity cells, in thousands.
pub fn thousands(value: f64) -> String {
    format!("${:.1}K", value / 1_000.0)
}

pub fn market_cap(value: f64) -> String {
    format!("${:.2}M", value / 1_000_000.0)
}

pub fn holders(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Progress bar of `width` cells followed by the raw percentage. The bar is
/// capped at 100%; the label is not.
pub fn progress(value: f64, width: usize) -> String {
    let filled_ratio = value.clamp(0.0, 100.0) / 100.0;
    let filled = (filled_ratio * width as f64).round() as usize;
    format!(
        "{}{} {:.1}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        value
    )
}

pub fn age(created_at_ms: u64, now_ms: u64) -> String {
    format!("{}h ago", now_ms.saturating_sub(created_at_ms) / HOUR_MS)
}

/// Direction a price cell flashes after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFlash {
    Up,
    Down,
    Unchanged,
}

impl PriceFlash {
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            PriceFlash::Up
        } else if current < previous {
            PriceFlash::Down
        } else {
            PriceFlash::Unchanged
        }
    }

    pub fn marker(self) -> char {
        match self {
            PriceFlash::Up => '+',
            PriceFlash::Down => '-',
            PriceFlash::Unchanged => ' ',
        }
    }
}

/// Fixed-width table of a derived view. The progress column only exists on
/// the Final Stretch tab.
///
/// `previous` is the prior generation of the same rows, used for flash markers.
pub fn render_table(
    rows: &[Token],
    category: Category,
    previous: Option<&[Token]>,
    now_ms: u64,
) -> String {
    let show_progress = category == Category::FinalStretch;
    let mut out = String::new();

    out.push_str(&format!(
        "{:<16} {:>14} {:>10} {:>12} {:>10} {:>8}",
        "Token", "Price", "24h", "Volume 24h", "Market Cap", "Holders"
    ));
    if show_progress {
        out.push_str(&format!(" {:<18}", "Progress"));
    }
    out.push_str(&format!(" {:>9}\n", "Age"));

    for token in rows {
        let flash = previous
            .and_then(|prev| prev.iter().find(|old| old.id == token.id))
            .map(|old| PriceFlash::between(old.price, token.price))
            .unwrap_or(PriceFlash::Unchanged);

        let badge = if token.is_hot { "*" } else { "" };
        out.push_str(&format!(
            "{:<16} {}{:>13} {:>10} {:>12} {:>10} {:>8}",
            format!("{}{badge}", token.symbol),
            flash.marker(),
            price(token.price),
            price_change(token.price_change_24h),
            thousands(token.volume_24h),
            market_cap(token.market_cap),
            holders(token.holders)
        ));
        if show_progress {
            out.push_str(&format!(" {:<18}", progress(token.progress, 10)));
        }
        out.push_str(&format!(" {:>9}\n", age(token.created_at, now_ms)));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::fixtures::token;

    #[test]
    fn numeric_cells_match_listing_format() {
        assert_eq!(price(1.5), "$1.500000");
        assert_eq!(price_change(-3.456), "▼ 3.46%");
        assert_eq!(price_change(0.0), "▲ 0.00%");
        assert_eq!(thousands(123_456.0), "$123.5K");
        assert_eq!(market_cap(2_345_678.0), "$2.35M");
    }

    #[test]
    fn holders_use_thousands_separators() {
        assert_eq!(holders(0), "0");
        assert_eq!(holders(999), "999");
        assert_eq!(holders(1_000), "1,000");
        assert_eq!(holders(9_876_543), "9,876,543");
    }

    #[test]
    fn progress_bar_caps_at_full_width() {
        assert_eq!(progress(150.0, 4), "████ 150.0%");
        assert_eq!(progress(50.0, 4), "██░░ 50.0%");
        assert_eq!(progress(-5.0, 4), "░░░░ -5.0%");
    }

    #[test]
    fn age_rounds_down_to_hours() {
        assert_eq!(age(0, 3 * HOUR_MS + 59_000), "3h ago");
        assert_eq!(age(10, 5), "0h ago");
    }

    #[test]
    fn flash_tracks_price_direction() {
        assert_eq!(PriceFlash::between(1.0, 1.1), PriceFlash::Up);
        assert_eq!(PriceFlash::between(1.0, 0.9), PriceFlash::Down);
        assert_eq!(PriceFlash::between(1.0, 1.0), PriceFlash::Unchanged);
    }

    #[test]
    fn progress_column_only_on_final_stretch() {
        let rows = vec![token("1", "PEPE", Category::FinalStretch, 10.0)];
        let stretch = render_table(&rows, Category::FinalStretch, None, 0);
        assert!(stretch.lines().next().unwrap_or_default().contains("Progress"));

        let rows = vec![token("1", "PEPE", Category::New, 10.0)];
        let fresh = render_table(&rows, Category::New, None, 0);
        assert!(!fresh.contains("Progress"));
        assert!(fresh.contains("PEPE1"));
        assert_eq!(fresh.lines().count(), 2);
    }

    #[test]
    fn rows_end_with_age_and_newline() {
        let mut row = token("7", "WIF", Category::Migrated, 10.0);
        row.created_at = 0;
        let table = render_table(&[row], Category::Migrated, None, 2 * HOUR_MS);
        assert!(table.ends_with("2h ago\n"));
        assert!(table.lines().next().unwrap_or_default().ends_with("Age"));
    }
}
