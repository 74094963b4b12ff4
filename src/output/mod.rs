//! Output formatting for CLI results

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod csv;
pub mod json;
pub mod table;

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat) -> Result<String>;
}

impl<T: Tabled + Serialize> Formattable for Vec<T> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(table::format_table(self)),
            OutputFormat::Pretty => Ok(table::format_pretty(self)),
            OutputFormat::Json => Ok(json::format_json(self)?),
        }
    }
}

/// Format and print data to stdout
pub fn print<T: Formattable>(data: &T, format: OutputFormat) -> Result<()> {
    let output = data.format(format)?;
    println!("{}", output);
    Ok(())
}

/// Colour of a summary figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Good,
    Warn,
    Bad,
}

/// One labelled count in a summary line
#[derive(Debug, Clone)]
pub struct SummaryItem {
    pub label: String,
    pub count: usize,
    pub tone: Tone,
}

impl SummaryItem {
    pub fn new(label: impl Into<String>, count: usize, tone: Tone) -> Self {
        Self {
            label: label.into(),
            count,
            tone,
        }
    }
}

/// `Label: n · Label: n` with zero counts left uncoloured
pub fn summary_line(items: &[SummaryItem]) -> String {
    items
        .iter()
        .map(|item| {
            let count = item.count.to_string();
            let count = match item.tone {
                _ if item.count == 0 => count.normal(),
                Tone::Neutral => count.bold(),
                Tone::Good => count.green(),
                Tone::Warn => count.yellow(),
                Tone::Bad => count.red().bold(),
            };
            format!("{}: {}", item.label.dimmed(), count)
        })
        .collect::<Vec<_>>()
        .join(" · ")
}
