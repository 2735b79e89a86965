//! Plain-text and JSON report for the `summary` command.
//!
//! Same data the dashboard draws, without a terminal: status and alert
//! tallies followed by the server table in snapshot order.

use std::fmt::Write as _;

use serde::Serialize;

use crate::aggregate::{AlertTally, StatusTally};
use crate::fetch::Snapshot;
use crate::model::ServerRecord;
use crate::view::{table_rows, TABLE_COLUMNS, TITLE};

/// Serializable one-shot report.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub servers: usize,
    pub rejected: usize,
    pub status: StatusTally,
    pub alerts: AlertTally,
    pub records: &'a [ServerRecord],
}

impl<'a> Report<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            servers: snapshot.records.len(),
            rejected: snapshot.rejected.len(),
            status: StatusTally::from_records(&snapshot.records),
            alerts: AlertTally::from_records(&snapshot.records),
            records: &snapshot.records,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as an aligned text table.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");
        let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));
        let _ = writeln!(out, "Servers:  {}", self.servers);
        if self.rejected > 0 {
            let _ = writeln!(out, "Skipped:  {} malformed rows", self.rejected);
        }
        let _ = writeln!(
            out,
            "Status:   online {}  offline {}",
            self.status.online, self.status.offline
        );
        let _ = writeln!(
            out,
            "Alerts:   low {}  medium {}  critical {}",
            self.alerts.low, self.alerts.medium, self.alerts.critical
        );

        let rows = table_rows(self.records);
        if rows.is_empty() {
            return out;
        }

        let mut widths: Vec<usize> = TABLE_COLUMNS.iter().map(|c| c.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.cells.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        out.push('\n');
        push_line(&mut out, TABLE_COLUMNS.iter().copied(), &widths);
        let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
        push_line(&mut out, rule.iter().map(String::as_str), &widths);
        for row in &rows {
            push_line(&mut out, row.cells.iter().map(String::as_str), &widths);
        }
        out
    }
}

fn push_line<'s>(out: &mut String, cells: impl Iterator<Item = &'s str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
