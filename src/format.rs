//! Text rendering for search listings and detail sections.
//!
//! The engine only relies on the [`Formatter`] contract: column headers, rows
//! of cells, and a format string with one mode character per column (`w` to
//! wrap, `t` to truncate). [`Grid`] is the bundled implementation.

use crate::grouper::LogicalSearchRecord;
use crate::sentinel;

pub trait Formatter: Send + Sync {
    fn render(&self, headers: &[&str], rows: &[Vec<String>], format: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Wrap,
    Truncate,
}

impl Mode {
    fn parse(format: &str, columns: usize) -> Vec<Mode> {
        let mut modes: Vec<Mode> = format
            .chars()
            .map(|c| match c {
                't' | 'T' => Mode::Truncate,
                _ => Mode::Wrap,
            })
            .collect();
        modes.resize(columns, Mode::Wrap);
        modes
    }
}

const ELLIPSIS: &str = "...";

/// Plain text grid: a header line, a dash rule under each column, then the
/// rows. Columns are separated by a single space and capped at `max_width`
/// characters (never narrower than their header).
#[derive(Debug, Clone)]
pub struct Grid {
    max_width: usize,
}

impl Grid {
    pub const DEFAULT_WIDTH: usize = 40;

    pub fn new(max_width: usize) -> Self {
        Self { max_width: max_width.max(ELLIPSIS.len() + 1) }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH)
    }
}

impl Formatter for Grid {
    fn render(&self, headers: &[&str], rows: &[Vec<String>], format: &str) -> String {
        let modes = Mode::parse(format, headers.len());
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                let natural = rows
                    .iter()
                    .filter_map(|row| row.get(column))
                    .flat_map(|cell| cell.lines())
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0);
                natural.min(self.max_width).max(header.chars().count())
            })
            .collect();

        let mut lines = Vec::with_capacity(rows.len() + 2);
        let header_cells: Vec<Vec<String>> = headers.iter().map(|h| vec![h.to_string()]).collect();
        lines.extend(join_cells(&header_cells, &widths));
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join(" "),
        );
        for row in rows {
            let cells: Vec<Vec<String>> = widths
                .iter()
                .zip(&modes)
                .enumerate()
                .map(|(column, (width, mode))| {
                    let cell = row.get(column).map(String::as_str).unwrap_or("");
                    match mode {
                        Mode::Wrap => wrap(cell, *width),
                        Mode::Truncate => vec![truncate(cell, *width)],
                    }
                })
                .collect();
            lines.extend(join_cells(&cells, &widths));
        }
        lines.join("\n")
    }
}

// Lays out pre-split cells side by side, padding short columns.
fn join_cells(cells: &[Vec<String>], widths: &[usize]) -> Vec<String> {
    let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
    (0..height)
        .map(|line| {
            let padded: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| {
                    let text = cell.get(line).map(String::as_str).unwrap_or("");
                    format!("{text:<width$}")
                })
                .collect();
            padded.join(" ").trim_end().to_string()
        })
        .collect()
}

fn wrap(cell: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in cell.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                out.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() || paragraph.trim().is_empty() {
            out.push(current);
        }
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn truncate(cell: &str, width: usize) -> String {
    let flat = cell.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return flat;
    }
    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = flat.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Drops a header line that only repeats the section title: the first line
/// must be plain words and the second a bare dash rule.
pub fn strip_duplicate_header(block: &str) -> String {
    let lines: Vec<&str> = block.split('\n').collect();
    if lines.len() > 1
        && lines[0].chars().all(|c| c.is_alphanumeric() || c.is_whitespace())
        && !lines[1].is_empty()
        && lines[1].chars().all(|c| c == '-')
    {
        return lines[1..].join("\n");
    }
    block.to_string()
}

/// Renders a search listing with its object count.
pub fn render_results(records: &[LogicalSearchRecord], formatter: &dyn Formatter) -> String {
    if records.is_empty() {
        return sentinel::NO_RESULTS.to_string();
    }
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                record.id.to_string(),
                record.label.clone(),
                record.date.clone(),
                record.producers.join("\n"),
                record.classifications.join("\n"),
            ]
        })
        .collect();
    let table = formatter.render(
        &["ID", "Label", "Date", "Produced By", "Classified As"],
        &rows,
        "wwwww",
    );
    format!("Search produced {} objects.\n\n{}", records.len(), table)
}
