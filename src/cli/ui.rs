use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const LIGHT_GREEN: Color = Color::Rgb {
    r: 144,
    g: 238,
    b: 144,
};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Subtitle,
    Link,
    Success,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Subtitle => style(text).cyan().bold(),
        StyleType::Link => style(text).blue().underlined(),
        StyleType::Success => style(text).green().bold(),
        StyleType::Error => style(text).red(),
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

pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

/// Percentage change since acquisition; gains are highlighted green.
pub fn change_cell(change: Option<f64>) -> Cell {
    match change {
        Some(change) if change > 0.0 => Cell::new(format!("{change:.2}%"))
            .bg(Color::Green)
            .fg(Color::Black)
            .set_alignment(CellAlignment::Right),
        Some(change) => Cell::new(format!("{change:.2}%")).set_alignment(CellAlignment::Right),
        None => na_cell(),
    }
}

/// A percentage cell, highlighted when it is the larger value of its row.
pub fn weight_cell(value: Option<f64>, is_row_max: bool) -> Cell {
    let cell = format_optional_cell(value, |v| format!("{v:.2}"));
    if is_row_max {
        cell.bg(LIGHT_GREEN).fg(Color::Black)
    } else {
        cell
    }
}

/// Distribution count with heat highlighting: above 10 green, above 0 light green.
pub fn count_cell(count: usize) -> Cell {
    let cell = Cell::new(count).set_alignment(CellAlignment::Right);
    match count {
        c if c > 10 => cell.bg(Color::Green).fg(Color::Black),
        c if c > 0 => cell.bg(LIGHT_GREEN).fg(Color::Black),
        _ => cell.fg(Color::DarkGrey),
    }
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(bar_style) = ProgressStyle::default_bar().template(
        "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    ) {
        pb.set_style(bar_style.progress_chars("#>-"));
    }
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
