//! Data models for dashboard datasets.
//!
//! This module contains the core data structures shared by the filter,
//! bucketing, aggregation and export stages: records, risk levels and
//! the display palette used by label tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Discrete risk level produced by the risk bucketer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Within normal operating range
    Low,
    /// Worth watching
    Medium,
    /// Needs review
    High,
    /// Needs immediate action
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}

impl RiskLevel {
    /// Returns the stored (lowercase) form used in record fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Returns an emoji representation of the level.
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::Medium => "🟡",
            RiskLevel::High => "🟠",
            RiskLevel::Critical => "🔴",
        }
    }

    /// Parse a stored risk level, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }
}

/// Palette color attached to an enum label.
///
/// Mirrors the chip colors of the dashboard theme; `Default` is the gray
/// used for any value not present in a label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Default,
    Primary,
    Secondary,
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Default => "default",
            Color::Primary => "primary",
            Color::Secondary => "secondary",
            Color::Info => "info",
            Color::Success => "success",
            Color::Warning => "warning",
            Color::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Keys consulted, in order, for a record's date when `date` is absent.
const DATE_FALLBACK_KEYS: [&str; 2] = ["timestamp", "createdAt"];

/// A single entity row from a dashboard dataset.
///
/// `id` and the date are lifted out because every page filters on them;
/// everything else lands in `fields` untouched. Records without a `date`
/// key take their date from `timestamp`, then `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct Record {
    /// Entity identifier (e.g. `AGT-0012`).
    pub id: String,
    /// ISO date or timestamp of the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// All remaining fields, keyed by their dataset name.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct RawRecord {
    id: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        let mut record = Record {
            id: raw.id,
            date: raw.date,
            fields: raw.fields,
        };
        if record.date.is_none() {
            record.date = DATE_FALLBACK_KEYS.iter().find_map(|key| record.text(key));
        }
        record
    }
}

impl Record {
    /// Creates a record with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: None,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style date setter.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Returns a field rendered as text.
    ///
    /// `id` and `date` resolve to the lifted fields. Strings, numbers and
    /// booleans are rendered as stored; nulls, arrays and objects are not text.
    pub fn text(&self, name: &str) -> Option<String> {
        match name {
            "id" => return Some(self.id.clone()),
            "date" => return self.date.clone(),
            _ => {}
        }

        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Returns a field as a number. Numeric strings are parsed.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Sets a string field, returning the previous value.
    pub fn set_text(&mut self, name: &str, value: &str) -> Option<Value> {
        self.fields
            .insert(name.to_string(), Value::String(value.to_string()))
    }

    /// Returns the record's risk level, if it carries a recognizable one.
    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.text("riskLevel").and_then(|s| RiskLevel::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_parse() {
        assert_eq!(RiskLevel::parse("HIGH"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse(" low "), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::parse("severe"), None);
        assert_eq!(RiskLevel::Critical.as_str(), "critical");
    }

    #[test]
    fn test_record_date_falls_back_to_timestamp() {
        let record: Record = serde_json::from_value(json!({
            "id": "AGT-001",
            "timestamp": "2024-01-12T09:30:00",
            "name": "Adebayo Okafor",
            "disputeRate": 3.4
        }))
        .unwrap();

        assert_eq!(record.id, "AGT-001");
        assert_eq!(record.date.as_deref(), Some("2024-01-12T09:30:00"));
        assert_eq!(record.text("name").as_deref(), Some("Adebayo Okafor"));
        assert_eq!(record.number("disputeRate"), Some(3.4));
        assert!(record.fields.contains_key("timestamp"));
    }

    #[test]
    fn test_record_with_several_date_keys() {
        let records: Vec<Record> = serde_json::from_str(
            r#"[
                {"id": "A-1", "timestamp": "2024-01-12T09:30:00", "createdAt": "2024-01-01"},
                {"id": "A-2", "date": "2024-02-03", "timestamp": "2024-01-12T09:30:00"},
                {"id": "A-3", "createdAt": "2024-01-01"},
                {"id": "A-4"}
            ]"#,
        )
        .unwrap();

        let dates: Vec<_> = records.iter().map(|r| r.date.as_deref()).collect();
        assert_eq!(
            dates,
            vec![
                Some("2024-01-12T09:30:00"),
                Some("2024-02-03"),
                Some("2024-01-01"),
                None
            ]
        );
        assert_eq!(records[0].text("createdAt").as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_record_text_and_number() {
        let record = Record::new("TX-9")
            .with("amount", "1200.50")
            .with("verified", true)
            .with("tags", json!(["a", "b"]));

        assert_eq!(record.text("id").as_deref(), Some("TX-9"));
        assert_eq!(record.number("amount"), Some(1200.5));
        assert_eq!(record.text("verified").as_deref(), Some("true"));
        assert_eq!(record.text("tags"), None);
        assert_eq!(record.number("missing"), None);
    }

    #[test]
    fn test_set_text_returns_previous() {
        let mut record = Record::new("W-1").with("status", "active");
        let previous = record.set_text("status", "frozen");
        assert_eq!(previous, Some(json!("active")));
        assert_eq!(record.text("status").as_deref(), Some("frozen"));
    }
}
