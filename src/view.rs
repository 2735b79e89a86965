//! View model: pure mapping from dashboard state to what each widget shows.
//!
//! Charts bind by position, so every list built here is in snapshot order
//! and `labels[i]` always pairs with `values[i]`. Nothing in this module
//! depends on the terminal backend.

use serde::Serialize;

use crate::aggregate::{AlertTally, Projection, StatusTally, Summary};
use crate::fetch::{Dashboard, FetchPhase};
use crate::model::{AlertLevel, ServerRecord};

/// Page title shown in the header
pub const TITLE: &str = "Server Monitoring Dashboard";

/// Detail table columns, in record field order.
pub const TABLE_COLUMNS: [&str; 9] = [
    "Server Name",
    "Status",
    "IP Address",
    "CPU Usage (%)",
    "RAM Usage (%)",
    "Disk Usage (%)",
    "Network Traffic (MB)",
    "Alert Level",
    "Created At",
];

/// Placeholder for a missing value.
pub const MISSING: &str = "-";

/// Badge styling class for an alert level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Danger,
    Warning,
    Success,
    Plain,
}

impl BadgeTone {
    /// Fixed lookup: critical, medium, low; everything else is unstyled.
    pub fn for_alert(level: Option<&AlertLevel>) -> Self {
        match level {
            Some(AlertLevel::Critical) => BadgeTone::Danger,
            Some(AlertLevel::Medium) => BadgeTone::Warning,
            Some(AlertLevel::Low) => BadgeTone::Success,
            _ => BadgeTone::Plain,
        }
    }
}

/// What the header banner says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Loading,
    Error { message: String, stale: bool },
    Ready { servers: usize, rejected: usize },
    Idle,
}

impl Banner {
    pub fn for_dashboard(dashboard: &Dashboard) -> Self {
        if dashboard.is_loading() {
            return Banner::Loading;
        }
        if let Some(message) = dashboard.error() {
            return Banner::Error {
                message: message.to_string(),
                stale: dashboard.is_stale(),
            };
        }
        match dashboard.phase() {
            FetchPhase::Success => Banner::Ready {
                servers: dashboard.records().len(),
                rejected: dashboard.rejected(),
            },
            _ => Banner::Idle,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Banner::Loading => "Loading servers...".to_string(),
            Banner::Error { message, stale } => {
                if *stale {
                    format!("{message} (showing previous data)")
                } else {
                    message.clone()
                }
            }
            Banner::Ready { servers, rejected } => {
                if *rejected > 0 {
                    format!("{servers} servers ({rejected} malformed rows skipped)")
                } else {
                    format!("{servers} servers")
                }
            }
            Banner::Idle => String::new(),
        }
    }
}

/// One group of the resource usage bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageGroup {
    pub label: String,
    pub cpu: Option<f64>,
    pub ram: Option<f64>,
    pub disk: Option<f64>,
}

/// Zip the three percentage projections into per-server groups.
pub fn usage_groups(summary: &Summary) -> Vec<UsageGroup> {
    summary
        .cpu
        .points()
        .zip(summary.ram.values.iter())
        .zip(summary.disk.values.iter())
        .map(|(((label, cpu), ram), disk)| UsageGroup {
            label: label.to_string(),
            cpu,
            ram: *ram,
            disk: *disk,
        })
        .collect()
}

/// Online share of the recognized statuses; unknown statuses are left out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusShare {
    pub online: usize,
    pub offline: usize,
}

impl From<&StatusTally> for StatusShare {
    fn from(tally: &StatusTally) -> Self {
        Self {
            online: tally.online,
            offline: tally.offline,
        }
    }
}

impl StatusShare {
    /// Fraction online in [0.0, 1.0]; 0 when nothing is recognized.
    pub fn online_ratio(&self) -> f64 {
        let total = self.online + self.offline;
        if total == 0 {
            0.0
        } else {
            self.online as f64 / total as f64
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{} online / {} offline ({:.0}%)",
            self.online,
            self.offline,
            self.online_ratio() * 100.0
        )
    }
}

/// Bars of the alert level distribution chart, in Low/Medium/Critical order.
pub fn alert_bars(tally: &AlertTally) -> [(&'static str, BadgeTone, usize); 3] {
    [
        ("Low", BadgeTone::Success, tally.low),
        ("Medium", BadgeTone::Warning, tally.medium),
        ("Critical", BadgeTone::Danger, tally.critical),
    ]
}

/// Contiguous runs of `(position, value)` chart points.
///
/// A missing datapoint ends the current run, so a line chart draws a gap
/// instead of bridging over it.
pub fn line_segments(projection: &Projection) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, value) in projection.values.iter().enumerate() {
        match value {
            Some(v) => current.push((i as f64, *v)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// One row of the detail table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: [String; 9],
    pub tone: BadgeTone,
}

impl TableRow {
    pub fn from_record(record: &ServerRecord) -> Self {
        let text = |v: Option<&str>| v.unwrap_or(MISSING).to_string();
        Self {
            cells: [
                record.name.clone(),
                text(record.status.as_ref().map(|s| s.as_str())),
                text(record.ip_address.as_deref()),
                format_value(record.cpu_usage),
                format_value(record.ram_usage),
                format_value(record.disk_usage),
                format_value(record.network_traffic),
                text(record.alert_level.as_ref().map(|a| a.as_str())),
                text(record.created_on.as_deref()),
            ],
            tone: BadgeTone::for_alert(record.alert_level.as_ref()),
        }
    }
}

pub fn table_rows(records: &[ServerRecord]) -> Vec<TableRow> {
    records.iter().map(TableRow::from_record).collect()
}

/// Render a metric: integers without decimals, others with up to two.
pub fn format_value(value: Option<f64>) -> String {
    let Some(v) = value else {
        return MISSING.to_string();
    };
    let s = if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    };
    // Negative zero and tiny negatives that round to it
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashError;
    use crate::fetch::{FetchOutcome, Snapshot};

    #[test]
    fn test_badge_tone_lookup() {
        assert_eq!(
            BadgeTone::for_alert(Some(&AlertLevel::Critical)),
            BadgeTone::Danger
        );
        assert_eq!(
            BadgeTone::for_alert(Some(&AlertLevel::Medium)),
            BadgeTone::Warning
        );
        assert_eq!(BadgeTone::for_alert(Some(&AlertLevel::Low)), BadgeTone::Success);
        assert_eq!(
            BadgeTone::for_alert(Some(&AlertLevel::parse("severe"))),
            BadgeTone::Plain
        );
        assert_eq!(BadgeTone::for_alert(None), BadgeTone::Plain);
    }

    #[test]
    fn test_usage_groups_positional() {
        let records = vec![
            ServerRecord::new("1", "b").with_usage(1.0, 2.0, 3.0),
            ServerRecord::new("2", "a"),
        ];
        let groups = usage_groups(&Summary::from_records(&records));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "b");
        assert_eq!(groups[0].ram, Some(2.0));
        assert_eq!(groups[0].disk, Some(3.0));
        assert_eq!(groups[1].label, "a");
        assert_eq!(groups[1].cpu, None);
    }

    #[test]
    fn test_status_share_excludes_unknown() {
        let records = vec![
            ServerRecord::new("1", "a").with_status("online"),
            ServerRecord::new("2", "b").with_status("unknown"),
            ServerRecord::new("3", "c").with_status("offline"),
            ServerRecord::new("4", "d").with_status("online"),
        ];
        let share = StatusShare::from(&StatusTally::from_records(&records));
        assert_eq!(share.online + share.offline, 3);
        assert!((share.online_ratio() - 2.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(share.label(), "2 online / 1 offline (67%)");

        let empty = StatusShare::from(&StatusTally::default());
        assert_eq!(empty.online_ratio(), 0.0);
    }

    #[test]
    fn test_alert_bars_order() {
        let tally = AlertTally {
            low: 1,
            medium: 0,
            critical: 2,
        };
        let bars = alert_bars(&tally);
        assert_eq!(bars[0], ("Low", BadgeTone::Success, 1));
        assert_eq!(bars[1], ("Medium", BadgeTone::Warning, 0));
        assert_eq!(bars[2], ("Critical", BadgeTone::Danger, 2));
    }

    #[test]
    fn test_line_segments_break_on_gaps() {
        let records = vec![
            ServerRecord::new("1", "a").with_network_traffic(10.0),
            ServerRecord::new("2", "b").with_network_traffic(20.0),
            ServerRecord::new("3", "c"),
            ServerRecord::new("4", "d").with_network_traffic(40.0),
        ];
        let summary = Summary::from_records(&records);
        assert_eq!(
            line_segments(&summary.network),
            vec![vec![(0.0, 10.0), (1.0, 20.0)], vec![(3.0, 40.0)]]
        );
        assert!(line_segments(&Summary::default().network).is_empty());
    }

    #[test]
    fn test_table_row_cells() {
        let mut record = ServerRecord::new("9", "web-9")
            .with_status("online")
            .with_alert_level("critical")
            .with_usage(12.5, 40.0, 99.999)
            .with_network_traffic(1024.0);
        record.ip_address = Some("10.0.0.9".to_string());

        let row = TableRow::from_record(&record);
        assert_eq!(
            row.cells,
            [
                "web-9".to_string(),
                "online".to_string(),
                "10.0.0.9".to_string(),
                "12.5".to_string(),
                "40".to_string(),
                "100".to_string(),
                "1024".to_string(),
                "critical".to_string(),
                "-".to_string(),
            ]
        );
        assert_eq!(row.tone, BadgeTone::Danger);
        assert_eq!(TABLE_COLUMNS.len(), row.cells.len());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(None), "-");
        assert_eq!(format_value(Some(50.0)), "50");
        assert_eq!(format_value(Some(12.34)), "12.34");
        assert_eq!(format_value(Some(12.30)), "12.3");
        assert_eq!(format_value(Some(-0.001)), "0");
        assert_eq!(format_value(Some(-0.0)), "0");
        assert_eq!(format_value(Some(-2.5)), "-2.5");
    }

    #[test]
    fn test_banner_states() {
        let mut dashboard = Dashboard::new();
        assert_eq!(Banner::for_dashboard(&dashboard), Banner::Idle);

        dashboard.begin();
        assert_eq!(Banner::for_dashboard(&dashboard), Banner::Loading);

        dashboard.complete(FetchOutcome::Failed(DashError::fetch("network down")));
        let banner = Banner::for_dashboard(&dashboard);
        assert_eq!(banner.text(), "Error fetching servers data: network down");

        let mut ok = Dashboard::new();
        ok.begin();
        ok.complete(FetchOutcome::Loaded(Snapshot {
            records: vec![ServerRecord::new("1", "a")],
            rejected: Vec::new(),
        }));
        assert_eq!(Banner::for_dashboard(&ok).text(), "1 servers");
    }
}
