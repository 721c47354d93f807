use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

use crate::{config::Config, layout::DisplayKind};

const HEADER_FILL: u32 = 0x1F4E78;
const SECTION_FILL: u32 = 0xDDEBF7;
const TITLE_COLOR: u32 = 0x1F4E78;

/// Cell formats shared by every sheet, built once per emit.
pub(crate) struct Palette {
    pub title: Format,
    pub header: Format,
    section: Format,
    currency: Format,
    percentage: Format,
    date: Format,
    plain: Format,
    total_label: Format,
    total_value: Format,
}

impl Palette {
    pub fn new(config: &Config) -> Self {
        let currency_pattern = currency_pattern(&config.currency_symbol, config.currency_decimals);
        let bordered = Format::new().set_border(FormatBorder::Thin);

        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_font_color(Color::RGB(TITLE_COLOR))
                .set_align(FormatAlign::Left),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            section: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(SECTION_FILL))
                .set_border(FormatBorder::Thin),
            currency: bordered.clone().set_num_format(&currency_pattern),
            percentage: bordered.clone().set_num_format("0.00%"),
            date: bordered.clone().set_num_format("dd-mmm-yyyy"),
            plain: bordered,
            total_label: Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_border_top(FormatBorder::Double),
            total_value: Format::new()
                .set_bold()
                .set_num_format(&currency_pattern)
                .set_border(FormatBorder::Thin)
                .set_border_top(FormatBorder::Double),
        }
    }

    /// Format for a label cell of a row with the given role.
    pub fn label(&self, kind: DisplayKind) -> &Format {
        match kind {
            DisplayKind::Header => &self.section,
            DisplayKind::Total => &self.total_label,
            _ => &self.plain,
        }
    }

    pub fn value(&self, kind: DisplayKind) -> &Format {
        match kind {
            DisplayKind::Currency => &self.currency,
            DisplayKind::Percentage => &self.percentage,
            DisplayKind::Date => &self.date,
            DisplayKind::Plain => &self.plain,
            DisplayKind::Header => &self.section,
            DisplayKind::Total => &self.total_value,
        }
    }
}

/// Symbols Excel accepts bare inside a number format.
const BARE_SYMBOLS: [&str; 4] = ["$", "€", "£", "¥"];

/// Quotes currency symbols; letters such as `s`, `h` or `d` would otherwise
/// be read as date codes.
fn literal_prefix(symbol: &str) -> String {
    if symbol.is_empty() || BARE_SYMBOLS.contains(&symbol) {
        symbol.to_string()
    } else {
        format!("\"{}\"", symbol.replace('"', "\"\""))
    }
}

/// `#,##0.00`-style pattern with a currency prefix and red negatives.
pub(crate) fn currency_pattern(symbol: &str, decimals: u8) -> String {
    let number = if decimals == 0 {
        "#,##0".to_string()
    } else {
        format!("#,##0.{}", "0".repeat(decimals as usize))
    };
    let positive = format!("{}{}", literal_prefix(symbol), number);
    format!("{positive};[Red]-{positive}")
}
