//! Output formatting utilities for CLI commands

use chrono::{DateTime, Local, Utc};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::io::{self, Write};
use tracing::warn;

/// `println!` for command output; see [`print_text`].
macro_rules! outln {
    ($($arg:tt)*) => {
        $crate::cli::output::print_text(&format!($($arg)*))
    };
}
pub(crate) use outln;

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    write_line(&mut io::stdout().lock(), &rendered)?;
    Ok(())
}

/// Write one line and flush. A reader that went away (`filedock list | head`)
/// ends output quietly instead of failing.
fn write_line<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    match writeln!(out, "{}", text).and_then(|()| out.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

/// Print text plus a newline on stdout, tolerating a closed pipe.
pub fn print_text(text: &str) {
    if let Err(err) = write_line(&mut io::stdout().lock(), text) {
        warn!(error = %err, "Failed to write to stdout");
    }
}

/// Print a table with headers and rows
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    print_text(&table.to_string());
}

/// Two-column key/value table.
pub fn print_fields(fields: Vec<(&str, String)>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (key, value) in fields {
        table.add_row(vec![Cell::new(key).fg(Color::Cyan), Cell::new(value)]);
    }

    print_text(&table.to_string());
}

/// Local wall-clock time, minute precision
pub fn format_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Render an optional field, `-` when unset.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Render a sync check result.
pub fn format_path_check(check: Option<bool>) -> &'static str {
    match check {
        Some(true) => "present",
        Some(false) => "MISSING",
        None => "unchecked",
    }
}

/// Shorten long text for table cells, keeping whole characters.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
