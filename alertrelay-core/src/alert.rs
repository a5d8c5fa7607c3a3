// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! The alert record threaded through every hook pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Default alert timeout in seconds (one day).
pub const DEFAULT_TIMEOUT_SECS: u64 = 86_400;

/// Free-form alert attributes. Keys are unique; a `null` value asks the
/// store to drop the key on resync.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Alert severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Security,
    Critical,
    Major,
    Minor,
    Warning,
    Indeterminate,
    Informational,
    #[default]
    Normal,
    Ok,
    Cleared,
    Debug,
    Trace,
    Unknown,
}

impl Severity {
    /// Numeric level; lower is more severe.
    pub fn level(&self) -> u8 {
        match self {
            Severity::Security => 0,
            Severity::Critical => 1,
            Severity::Major => 2,
            Severity::Minor => 3,
            Severity::Warning => 4,
            Severity::Indeterminate => 5,
            Severity::Informational => 6,
            Severity::Normal | Severity::Ok | Severity::Cleared => 7,
            Severity::Debug => 8,
            Severity::Trace => 9,
            Severity::Unknown => 10,
        }
    }

    /// Whether this severity means the underlying condition went away.
    pub fn is_cleared(&self) -> bool {
        matches!(self, Severity::Normal | Severity::Ok | Severity::Cleared)
    }
}

/// Alert workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Open,
    Assign,
    Ack,
    Closed,
    Expired,
    Blackout,
    Shelved,
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Assign => "assign",
            Status::Ack => "ack",
            Status::Closed => "closed",
            Status::Expired => "expired",
            Status::Blackout => "blackout",
            Status::Shelved => "shelved",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = AlertParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Status::Open),
            "assign" => Ok(Status::Assign),
            "ack" => Ok(Status::Ack),
            "closed" => Ok(Status::Closed),
            "expired" => Ok(Status::Expired),
            "blackout" => Ok(Status::Blackout),
            "shelved" => Ok(Status::Shelved),
            "unknown" => Ok(Status::Unknown),
            other => Err(AlertParseError::InvalidStatus(other.to_string())),
        }
    }
}

/// Direction of a severity change between correlated alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    MoreSevere,
    LessSevere,
    NoChange,
}

impl Trend {
    pub fn between(previous: Severity, current: Severity) -> Self {
        match current.level().cmp(&previous.level()) {
            std::cmp::Ordering::Less => Trend::MoreSevere,
            std::cmp::Ordering::Greater => Trend::LessSevere,
            std::cmp::Ordering::Equal => Trend::NoChange,
        }
    }
}

/// What kind of change a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    New,
    Severity,
    Status,
    Action,
    Note,
}

/// One entry in an alert's change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub event: String,
    pub severity: Option<Severity>,
    pub status: Option<Status>,
    pub value: String,
    pub text: String,
    pub change_type: ChangeType,
    pub update_time: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(change_type: ChangeType, alert: &Alert) -> Self {
        Self {
            event: alert.event.clone(),
            severity: Some(alert.severity),
            status: Some(alert.status),
            value: alert.value.clone(),
            text: alert.text.clone(),
            change_type,
            update_time: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AlertParseError {
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

/// An alert as received from a source and as stored afterwards.
///
/// Field names serialize in camelCase so inbound JSON payloads from
/// existing senders deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub resource: String,
    pub event: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub correlate: Vec<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub service: Vec<String>,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub origin: String,
    #[serde(default = "default_event_type")]
    pub event_type: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub duplicate_count: u32,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub previous_severity: Option<Severity>,
    #[serde(default)]
    pub trend_indication: Option<Trend>,
    #[serde(default = "Utc::now")]
    pub create_time: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub receive_time: DateTime<Utc>,
    #[serde(default)]
    pub last_receive_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

fn default_environment() -> String {
    "Production".to_string()
}

fn default_event_type() -> String {
    "exceptionAlert".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Alert {
    /// Create a new alert for `event` on `resource` with default fields.
    pub fn new(resource: impl Into<String>, event: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            resource: resource.into(),
            event: event.into(),
            environment: default_environment(),
            severity: Severity::default(),
            correlate: Vec::new(),
            status: Status::default(),
            service: Vec::new(),
            group: String::new(),
            value: String::new(),
            text: String::new(),
            tags: BTreeSet::new(),
            attributes: Attributes::new(),
            origin: String::new(),
            event_type: default_event_type(),
            timeout: DEFAULT_TIMEOUT_SECS,
            customer: None,
            duplicate_count: 0,
            repeat: false,
            previous_severity: None,
            trend_indication: None,
            create_time: now,
            receive_time: now,
            last_receive_time: None,
            history: Vec::new(),
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service.push(service.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_correlate<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.correlate = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    /// Suppressed alerts are excluded from normal hook processing.
    pub fn is_suppressed(&self) -> bool {
        self.status == Status::Blackout
    }

    /// Record a change in the alert's history log.
    pub fn record(&mut self, change_type: ChangeType) {
        let entry = HistoryEntry::new(change_type, self);
        self.history.push(entry);
    }
}
