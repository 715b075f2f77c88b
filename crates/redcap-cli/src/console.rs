//! CLI console utilities

use colored::*;
use console::{Alignment, measure_text_width, pad_str};
use redcap_core::client::Instrument;
use redcap_core::export::{ExportResult, ExportStatus};

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
    json: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.verbose {
            eprintln!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print one result, as a JSON line or a colored summary
    pub fn print_result(&self, result: &ExportResult) {
        if self.json {
            match serde_json::to_string(result) {
                Ok(line) => println!("{line}"),
                Err(e) => self.error(&format!("Could not render result: {}", e)),
            }
            return;
        }
        println!("{}", format_result(result));
    }

    /// Print the instrument table
    pub fn print_instruments(&self, instruments: &[Instrument]) {
        let rows: Vec<[&str; 2]> = instruments
            .iter()
            .map(|i| [i.instrument_label.as_str(), i.instrument_name.as_str()])
            .collect();
        println!("{}", format_table(["Instrument label", "Instrument name"], &rows));
    }
}

/// `action(status): path [message]`
pub fn format_result(result: &ExportResult) -> String {
    let status = match result.status {
        ExportStatus::Ok => "ok".green().bold(),
        ExportStatus::Error => "error".red().bold(),
        ExportStatus::Impossible => "impossible".yellow().bold(),
    };
    let mut line = format!("{}({})", result.action, status);
    if let Some(path) = &result.path {
        line.push_str(&format!(": {}", path.display()));
    }
    if let Some(message) = &result.message {
        line.push_str(&format!(" [{}]", message.dimmed()));
    }
    line
}

/// Left-aligned table with ASCII borders
pub fn format_table(headers: [&str; 2], rows: &[[&str; 2]]) -> String {
    let mut widths = headers.map(measure_text_width);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let line = |cells: &[&str; 2]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!(" {} ", pad_str(cell, w, Alignment::Left, None)))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut out = vec![border.clone(), line(&headers), border.clone()];
    out.extend(rows.iter().map(&line));
    out.push(border);
    out.join("\n")
}
