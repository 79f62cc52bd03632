//! Rendering of record lists.
//!
//! A list of records becomes either a table of rows or the "no records"
//! indicator. The same [`View`] value is printed as a text table, as plain
//! lines, or serialized to JSON by the CLI.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::error::Result;
use crate::record::{RecordId, StudentRecord};

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Id keying the edit and delete actions for this row.
    pub id: RecordId,
    /// Roll number column.
    pub roll_no: String,
    /// Name column.
    pub name: String,
    /// Class/grade column.
    pub class_grade: String,
    /// CGPA column, with the placeholder substituted when absent.
    pub cgpa: String,
}

/// What the record list should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// Nothing to show; display the message instead of the table.
    Empty {
        /// The "no records" indicator text.
        message: String,
    },
    /// One row per record, in order.
    Table {
        /// The rows.
        rows: Vec<Row>,
    },
}

const HEADERS: [&str; 5] = ["ID", "Roll No", "Name", "Class", "CGPA"];

impl View {
    /// Build the view for `records`.
    #[must_use]
    pub fn render<'a, I>(records: I, display: &DisplayConfig) -> Self
    where
        I: IntoIterator<Item = &'a StudentRecord>,
    {
        let rows: Vec<Row> = records
            .into_iter()
            .map(|r| Row {
                id: r.id,
                roll_no: r.roll_no.clone(),
                name: r.name.clone(),
                class_grade: r.class_grade.clone(),
                cgpa: r
                    .cgpa
                    .clone()
                    .unwrap_or_else(|| display.cgpa_placeholder.clone()),
            })
            .collect();

        if rows.is_empty() {
            Self::Empty {
                message: display.empty_message.clone(),
            }
        } else {
            Self::Table { rows }
        }
    }

    /// The rendered rows; empty for [`View::Empty`].
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Empty { .. } => &[],
            Self::Table { rows } => rows,
        }
    }

    /// Whether the "no records" indicator is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Aligned text table with a header row.
    #[must_use]
    pub fn to_table(&self) -> String {
        let rows = match self {
            Self::Empty { message } => return format!("{message}\n"),
            Self::Table { rows } => rows,
        };

        let cells: Vec<[String; 5]> = rows
            .iter()
            .map(|r| {
                [
                    r.id.to_string(),
                    r.roll_no.clone(),
                    r.name.clone(),
                    r.class_grade.clone(),
                    r.cgpa.clone(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &HEADERS.map(str::to_string), &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &cells {
            push_line(&mut out, row, &widths);
        }
        out
    }

    /// One tab-separated line per row, no header.
    #[must_use]
    pub fn to_plain(&self) -> String {
        match self {
            Self::Empty { message } => format!("{message}\n"),
            Self::Table { rows } => rows.iter().fold(String::new(), |mut out, r| {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    r.id, r.roll_no, r.name, r.class_grade, r.cgpa
                );
                out
            }),
        }
    }

    /// Pretty-printed JSON, tagged with `kind` so the empty indicator
    /// survives.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
