use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Error,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Error => style(text).red(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(na_cell(), |v| {
        Cell::new(format_fn(v)).set_alignment(CellAlignment::Right)
    })
}

/// Creates a right-aligned cell for a signed value, green when non-negative.
pub fn change_cell(change: f64, suffix: &str) -> Cell {
    let text = format!("{change:.2}{suffix}");
    let color = if change >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

/// Formats a number rounded to an integer with `,` as thousands separator.
pub fn format_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && grouped.chars().any(|c| c != '0' && c != ',') {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Red to yellow to green, as xterm-256 color indices.
const DIVERGING_PALETTE: [u8; 11] = [196, 202, 208, 214, 220, 226, 190, 154, 118, 82, 46];

/// Picks a color for `value` on a diverging scale centered at zero, where
/// `max_abs` maps to the ends of the scale.
pub fn diverging_color(value: f64, max_abs: f64) -> u8 {
    let center = (DIVERGING_PALETTE.len() / 2) as f64;
    let position = if max_abs > 0.0 && value.is_finite() {
        center + center * (value / max_abs).clamp(-1.0, 1.0)
    } else {
        center
    };
    DIVERGING_PALETTE[position.round() as usize]
}

/// Creates a spinner shown while waiting on the network.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.4), "1,234,567");
        assert_eq!(format_thousands(2_950_000_000_000.0), "2,950,000,000,000");
        assert_eq!(format_thousands(-45210.6), "-45,211");
        assert_eq!(format_thousands(-0.2), "0");
    }

    #[test]
    fn test_diverging_color_scale() {
        assert_eq!(diverging_color(0.0, 1.0), 226);
        assert_eq!(diverging_color(1.0, 1.0), 46);
        assert_eq!(diverging_color(-1.0, 1.0), 196);
        assert_eq!(diverging_color(-0.6, 1.0), 208);
        assert_eq!(diverging_color(5.0, 1.0), 46);
        // nothing to scale against
        assert_eq!(diverging_color(0.0, 0.0), 226);
    }

    #[test]
    fn test_change_cell_text() {
        assert_eq!(change_cell(0.5, "%").content(), "0.50%");
        assert_eq!(change_cell(-1.234, "").content(), "-1.23");
        assert_eq!(na_cell().content(), "N/A");
    }
}
