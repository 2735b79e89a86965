//! Server records and the boundary schema that produces them.
//!
//! Rows arrive from the data store as untyped JSON. [`RawServerRow`] decodes
//! them with every column optional, and [`RawServerRow::validate`] turns a
//! row into a typed [`ServerRecord`] or a [`RowRejection`]. Nothing past this
//! module sees raw JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Online/offline state reported for a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ServerStatus {
    Online,
    Offline,
    /// Any other string the store held, kept verbatim.
    Unrecognized(String),
}

impl ServerStatus {
    /// Map a raw column value. Only the exact lowercase literals are recognized.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "online" => ServerStatus::Online,
            "offline" => ServerStatus::Offline,
            other => ServerStatus::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
            ServerStatus::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ServerStatus> for String {
    fn from(status: ServerStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Alert severity attached to a server row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum AlertLevel {
    Low,
    Medium,
    Critical,
    /// Any other string the store held, kept verbatim.
    Unrecognized(String),
}

impl AlertLevel {
    /// Map a raw column value. Only the exact lowercase literals are recognized.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "low" => AlertLevel::Low,
            "medium" => AlertLevel::Medium,
            "critical" => AlertLevel::Critical,
            other => AlertLevel::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AlertLevel::Low => "low",
            AlertLevel::Medium => "medium",
            AlertLevel::Critical => "critical",
            AlertLevel::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AlertLevel> for String {
    fn from(level: AlertLevel) -> Self {
        level.as_str().to_string()
    }
}

/// One validated row of the server-records table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerRecord {
    pub id: String,
    pub name: String,
    pub status: Option<ServerStatus>,
    pub ip_address: Option<String>,
    // Percentages, 0-100 expected but not enforced
    pub cpu_usage: Option<f64>,
    pub ram_usage: Option<f64>,
    pub disk_usage: Option<f64>,
    // In MB
    pub network_traffic: Option<f64>,
    pub alert_level: Option<AlertLevel>,
    pub created_on: Option<String>,
}

impl ServerRecord {
    /// A record with only identity set; the `with_*` builders fill the rest.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: None,
            ip_address: None,
            cpu_usage: None,
            ram_usage: None,
            disk_usage: None,
            network_traffic: None,
            alert_level: None,
            created_on: None,
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(ServerStatus::parse(status));
        self
    }

    pub fn with_alert_level(mut self, level: &str) -> Self {
        self.alert_level = Some(AlertLevel::parse(level));
        self
    }

    pub fn with_usage(mut self, cpu: f64, ram: f64, disk: f64) -> Self {
        self.cpu_usage = Some(cpu);
        self.ram_usage = Some(ram);
        self.disk_usage = Some(disk);
        self
    }

    pub fn with_network_traffic(mut self, mb: f64) -> Self {
        self.network_traffic = Some(mb);
        self
    }
}

/// A row as delivered by the store, before validation.
///
/// The legacy backend model's column names (`server_name`, `ipaddress`) are
/// read as fallbacks for `name` and `ip_address`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawServerRow {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub server_name: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub ip_address: Option<Value>,
    #[serde(default)]
    pub ipaddress: Option<Value>,
    #[serde(default)]
    pub cpu_usage: Option<Value>,
    #[serde(default)]
    pub ram_usage: Option<Value>,
    #[serde(default)]
    pub disk_usage: Option<Value>,
    #[serde(default)]
    pub network_traffic: Option<Value>,
    #[serde(default)]
    pub alert_level: Option<Value>,
    #[serde(default)]
    pub created_on: Option<Value>,
}

/// Why a row was kept out of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    /// The row is not a JSON object.
    NotAnObject { index: usize },
    /// The row has no usable `id`.
    MissingId { index: usize },
    /// An object that still failed to decode.
    Undecodable { index: usize, reason: String },
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::NotAnObject { index } => write!(f, "row {index} is not an object"),
            RowRejection::MissingId { index } => write!(f, "row {index} has no id"),
            RowRejection::Undecodable { index, reason } => {
                write!(f, "row {index} could not be decoded: {reason}")
            }
        }
    }
}

impl RawServerRow {
    /// Decode one JSON row. `index` is the row position, used in rejections.
    pub fn from_value(index: usize, value: Value) -> Result<Self, RowRejection> {
        if !value.is_object() {
            return Err(RowRejection::NotAnObject { index });
        }
        serde_json::from_value(value).map_err(|e| RowRejection::Undecodable {
            index,
            reason: e.to_string(),
        })
    }

    /// Validate and coerce into a typed record.
    pub fn validate(self, index: usize) -> Result<ServerRecord, RowRejection> {
        let id = self
            .id
            .as_ref()
            .and_then(scalar_text)
            .filter(|id| !id.is_empty())
            .ok_or(RowRejection::MissingId { index })?;

        let name = fallback_text(&self.name, &self.server_name).unwrap_or_else(|| id.clone());

        Ok(ServerRecord {
            name,
            status: self
                .status
                .as_ref()
                .and_then(scalar_text)
                .map(|s| ServerStatus::parse(&s)),
            ip_address: fallback_text(&self.ip_address, &self.ipaddress),
            cpu_usage: self.cpu_usage.as_ref().and_then(number),
            ram_usage: self.ram_usage.as_ref().and_then(number),
            disk_usage: self.disk_usage.as_ref().and_then(number),
            network_traffic: self.network_traffic.as_ref().and_then(number),
            alert_level: self
                .alert_level
                .as_ref()
                .and_then(scalar_text)
                .map(|s| AlertLevel::parse(&s)),
            created_on: self.created_on.as_ref().and_then(scalar_text),
            id,
        })
    }
}

/// Validate a whole row set, keeping input order for the accepted rows.
pub fn validate_rows(rows: Vec<Value>) -> (Vec<ServerRecord>, Vec<RowRejection>) {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (index, value) in rows.into_iter().enumerate() {
        match RawServerRow::from_value(index, value).and_then(|raw| raw.validate(index)) {
            Ok(record) => records.push(record),
            Err(rejection) => rejected.push(rejection),
        }
    }

    (records, rejected)
}

/// Text form of a JSON scalar. Null, arrays and objects yield `None`.
/// Text of `primary`, or of `legacy` when the primary column is absent or null.
fn fallback_text(primary: &Option<Value>, legacy: &Option<Value>) -> Option<String> {
    primary
        .as_ref()
        .and_then(scalar_text)
        .or_else(|| legacy.as_ref().and_then(scalar_text))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numeric metric from a JSON number or numeric string; anything else is a gap.
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
