//! Reductions from a record snapshot to chart-ready structures.
//!
//! Everything here is a pure function of the input slice: tallies are
//! recomputed from scratch, and projections keep the input order so that
//! `labels[i]` and `values[i]` always describe the i-th record.

use serde::Serialize;

use crate::model::{AlertLevel, ServerRecord, ServerStatus};

/// Online/offline counts. Records with any other status are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub online: usize,
    pub offline: usize,
}

impl StatusTally {
    pub fn from_records(records: &[ServerRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            match record.status {
                Some(ServerStatus::Online) => acc.online += 1,
                Some(ServerStatus::Offline) => acc.offline += 1,
                _ => {}
            }
            acc
        })
    }

    /// Number of records with a recognized status.
    pub fn total(&self) -> usize {
        self.online + self.offline
    }
}

/// Low/medium/critical counts. Records with any other level are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertTally {
    pub low: usize,
    pub medium: usize,
    pub critical: usize,
}

impl AlertTally {
    pub fn from_records(records: &[ServerRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            match record.alert_level {
                Some(AlertLevel::Low) => acc.low += 1,
                Some(AlertLevel::Medium) => acc.medium += 1,
                Some(AlertLevel::Critical) => acc.critical += 1,
                _ => {}
            }
            acc
        })
    }

    /// Number of records with a recognized alert level.
    pub fn total(&self) -> usize {
        self.low + self.medium + self.critical
    }
}

/// A per-server numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Cpu,
    Ram,
    Disk,
    NetworkTraffic,
}

impl Metric {
    /// All metrics in display order.
    pub fn all() -> &'static [Metric] {
        &[Metric::Cpu, Metric::Ram, Metric::Disk, Metric::NetworkTraffic]
    }

    /// Series label as shown in chart legends.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Cpu => "CPU Usage (%)",
            Metric::Ram => "RAM Usage (%)",
            Metric::Disk => "Disk Usage (%)",
            Metric::NetworkTraffic => "Network Traffic (MB)",
        }
    }

    /// Read this metric from a record.
    pub fn value(&self, record: &ServerRecord) -> Option<f64> {
        match self {
            Metric::Cpu => record.cpu_usage,
            Metric::Ram => record.ram_usage,
            Metric::Disk => record.disk_usage,
            Metric::NetworkTraffic => record.network_traffic,
        }
    }
}

/// Parallel `(name, value)` arrays for one metric, in input order.
///
/// A `None` value is a missing datapoint; it keeps its slot so positions
/// stay aligned with `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub metric: Metric,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl Projection {
    pub fn of(records: &[ServerRecord], metric: Metric) -> Self {
        let (labels, values): (Vec<String>, Vec<Option<f64>>) = records
            .iter()
            .map(|record| (record.name.clone(), metric.value(record)))
            .unzip();
        Self {
            metric,
            labels,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate `(label, value)` pairs by position.
    pub fn points(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Largest present value, if any.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().flatten().copied().reduce(f64::max)
    }
}

/// Everything the view needs, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub records: usize,
    pub status: StatusTally,
    pub alerts: AlertTally,
    pub cpu: Projection,
    pub ram: Projection,
    pub disk: Projection,
    pub network: Projection,
}

impl Summary {
    pub fn from_records(records: &[ServerRecord]) -> Self {
        Self {
            records: records.len(),
            status: StatusTally::from_records(records),
            alerts: AlertTally::from_records(records),
            cpu: Projection::of(records, Metric::Cpu),
            ram: Projection::of(records, Metric::Ram),
            disk: Projection::of(records, Metric::Disk),
            network: Projection::of(records, Metric::NetworkTraffic),
        }
    }

    pub fn projection(&self, metric: Metric) -> &Projection {
        match metric {
            Metric::Cpu => &self.cpu,
            Metric::Ram => &self.ram,
            Metric::Disk => &self.disk,
            Metric::NetworkTraffic => &self.network,
        }
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::from_records(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, status: &str, alert: &str) -> ServerRecord {
        ServerRecord::new(name, name)
            .with_status(status)
            .with_alert_level(alert)
    }

    #[test]
    fn test_mixed_fleet_tallies() {
        let records = vec![
            record("a", "online", "low"),
            record("b", "offline", "critical"),
            record("c", "online", "critical"),
        ];

        let summary = Summary::from_records(&records);
        assert_eq!(
            summary.status,
            StatusTally {
                online: 2,
                offline: 1
            }
        );
        assert_eq!(
            summary.alerts,
            AlertTally {
                low: 1,
                medium: 0,
                critical: 2
            }
        );
    }

    #[test]
    fn test_unknown_status_not_counted() {
        let records = vec![record("a", "online", "low"), record("b", "unknown", "low")];
        let tally = StatusTally::from_records(&records);
        assert_eq!(tally.online, 1);
        assert_eq!(tally.offline, 0);
        assert_eq!(tally.total(), 1);
        // Still part of every projection
        assert_eq!(Projection::of(&records, Metric::Cpu).len(), 2);
    }

    #[test]
    fn test_missing_status_and_alert_not_counted() {
        let records = vec![ServerRecord::new("1", "bare")];
        assert_eq!(StatusTally::from_records(&records).total(), 0);
        assert_eq!(AlertTally::from_records(&records).total(), 0);
    }

    #[test]
    fn test_empty_input() {
        let summary = Summary::from_records(&[]);
        assert_eq!(summary.records, 0);
        assert_eq!(summary.status, StatusTally::default());
        assert_eq!(summary.alerts, AlertTally::default());
        for metric in Metric::all() {
            assert!(summary.projection(*metric).is_empty());
        }
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_projection_keeps_order_and_gaps() {
        let records = vec![
            ServerRecord::new("1", "zeta").with_usage(10.0, 20.0, 30.0),
            ServerRecord::new("2", "alpha"),
            ServerRecord::new("3", "mid").with_network_traffic(512.0),
        ];

        let cpu = Projection::of(&records, Metric::Cpu);
        assert_eq!(cpu.labels, vec!["zeta", "alpha", "mid"]);
        assert_eq!(cpu.values, vec![Some(10.0), None, None]);

        let net = Projection::of(&records, Metric::NetworkTraffic);
        assert_eq!(net.values, vec![None, None, Some(512.0)]);
        assert_eq!(net.max(), Some(512.0));
    }

    #[test]
    fn test_projection_points() {
        let records = vec![ServerRecord::new("1", "a").with_usage(1.0, 2.0, 3.0)];
        let ram = Projection::of(&records, Metric::Ram);
        let points: Vec<_> = ram.points().collect();
        assert_eq!(points, vec![("a", Some(2.0))]);
        assert_eq!(Projection::of(&[], Metric::Ram).max(), None);
    }

    #[test]
    fn test_metric_labels() {
        assert_eq!(Metric::Cpu.label(), "CPU Usage (%)");
        assert_eq!(Metric::Ram.label(), "RAM Usage (%)");
        assert_eq!(Metric::Disk.label(), "Disk Usage (%)");
        assert_eq!(Metric::NetworkTraffic.label(), "Network Traffic (MB)");
        assert_eq!(Metric::all().len(), 4);
    }
}
