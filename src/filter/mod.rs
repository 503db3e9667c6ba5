//! Record filtering.
//!
//! A [`FilterCriteria`] holds optional per-field checks that are combined
//! with logical AND. Absent checks match everything, so the default
//! criteria accept every record.

pub mod dates;

use crate::error::CriteriaError;
use crate::models::Record;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Inclusive numeric bounds. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Filter criteria for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring searched across the page's text fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact, case-sensitive equality on enum-like fields.
    pub equals: BTreeMap<String, String>,
    /// Inclusive lower bound on the record date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDateTime>,
    /// Inclusive upper bound on the record date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDateTime>,
    /// Inclusive numeric ranges.
    pub ranges: BTreeMap<String, NumericRange>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none()
            && self.equals.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.ranges.is_empty()
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }

    pub fn with_equals(mut self, field: &str, value: &str) -> Self {
        self.equals.insert(field.to_string(), value.to_string());
        self
    }

    /// Set the lower date bound from a date or timestamp string.
    pub fn with_date_from(mut self, from: &str) -> Result<Self, CriteriaError> {
        let bound =
            dates::lower_bound(from).ok_or_else(|| CriteriaError::InvalidDate(from.to_string()))?;
        self.date_from = Some(bound);
        Ok(self)
    }

    /// Set the upper date bound. A bare date includes the whole day.
    pub fn with_date_to(mut self, to: &str) -> Result<Self, CriteriaError> {
        let bound =
            dates::upper_bound(to).ok_or_else(|| CriteriaError::InvalidDate(to.to_string()))?;
        self.date_to = Some(bound);
        Ok(self)
    }

    pub fn with_range(
        mut self,
        field: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Self, CriteriaError> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(CriteriaError::InvertedRange {
                    field: field.to_string(),
                    min: lo,
                    max: hi,
                });
            }
        }
        self.ranges
            .insert(field.to_string(), NumericRange { min, max });
        Ok(self)
    }

    /// Add a `field=value` equality condition.
    pub fn with_condition(self, condition: &str) -> Result<Self, CriteriaError> {
        let (field, value) = condition
            .split_once('=')
            .filter(|(f, _)| !f.trim().is_empty())
            .ok_or_else(|| CriteriaError::InvalidCondition(condition.to_string()))?;
        Ok(self.with_equals(field.trim(), value))
    }

    /// Add a `field=min..max` range. Either side may be left empty.
    pub fn with_range_expr(self, expr: &str) -> Result<Self, CriteriaError> {
        let invalid = || CriteriaError::InvalidRange(expr.to_string());

        let (field, bounds) = expr.split_once('=').ok_or_else(invalid)?;
        let (lo, hi) = bounds.split_once("..").ok_or_else(invalid)?;
        let field = field.trim();
        if field.is_empty() {
            return Err(invalid());
        }

        let parse = |s: &str| -> Result<Option<f64>, CriteriaError> {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<f64>().map(Some).map_err(|_| invalid())
            }
        };

        let (min, max) = (parse(lo)?, parse(hi)?);
        self.with_range(field, min, max)
    }

    /// The effective search term, ignoring blank input.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns true iff every present criterion matches the record.
    ///
    /// `search_fields` lists the text fields the search term is matched
    /// against; the record id is always included.
    pub fn matches(&self, record: &Record, search_fields: &[&str]) -> bool {
        self.matches_search(record, search_fields)
            && self.matches_equals(record)
            && self.matches_dates(record)
            && self.matches_ranges(record)
    }

    /// Filter a collection, keeping input order.
    pub fn apply<'a>(&self, records: &'a [Record], search_fields: &[&str]) -> Vec<&'a Record> {
        records
            .iter()
            .filter(|r| self.matches(r, search_fields))
            .collect()
    }

    fn matches_search(&self, record: &Record, search_fields: &[&str]) -> bool {
        let Some(term) = self.search_term() else {
            return true;
        };
        let needle = term.to_lowercase();

        std::iter::once("id")
            .chain(search_fields.iter().copied())
            .filter_map(|field| record.text(field))
            .any(|text| text.to_lowercase().contains(&needle))
    }

    fn matches_equals(&self, record: &Record) -> bool {
        self.equals
            .iter()
            .all(|(field, expected)| record.text(field).as_deref() == Some(expected.as_str()))
    }

    fn matches_dates(&self, record: &Record) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }

        let Some(at) = record
            .date
            .as_deref()
            .and_then(dates::parse_timestamp)
            .map(|p| p.at)
        else {
            return false;
        };

        self.date_from.map_or(true, |from| at >= from) && self.date_to.map_or(true, |to| at <= to)
    }

    fn matches_ranges(&self, record: &Record) -> bool {
        self.ranges.iter().all(|(field, range)| {
            record
                .number(field)
                .map_or(false, |value| range.contains(value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, name: &str) -> Record {
        Record::new(id).with("name", name)
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        let criteria = FilterCriteria::new();
        assert!(criteria.is_empty());
        assert!(criteria.matches(&Record::new("A"), &[]));
        assert!(criteria.matches(&named("B", "Chidi").with("riskLevel", "high"), &["name"]));
    }

    #[test]
    fn test_equality_on_own_value_matches() {
        let record = Record::new("AGT-1")
            .with("status", "approved")
            .with("riskLevel", "low");

        for field in ["status", "riskLevel"] {
            let value = record.text(field).unwrap();
            let criteria = FilterCriteria::new().with_equals(field, &value);
            assert!(criteria.matches(&record, &[]));
        }
    }

    #[test]
    fn test_equality_is_case_sensitive_and_needs_field() {
        let record = Record::new("AGT-1").with("status", "approved");
        assert!(!FilterCriteria::new()
            .with_equals("status", "Approved")
            .matches(&record, &[]));
        assert!(!FilterCriteria::new()
            .with_equals("category", "pricing")
            .matches(&record, &[]));
    }

    #[test]
    fn test_filter_by_risk_level() {
        let records = vec![
            Record::new("1").with("riskLevel", "low"),
            Record::new("2").with("riskLevel", "high"),
            Record::new("3").with("riskLevel", "high"),
        ];
        let criteria = FilterCriteria::new().with_equals("riskLevel", "high");
        assert_eq!(criteria.apply(&records, &[]).len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = vec![
            named("A1", "Adebayo"),
            named("A2", "Chidi"),
            named("A3", "Ngozi"),
        ];
        let criteria = FilterCriteria::new().with_search("ade");
        let hits = criteria.apply(&records, &["name"]);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text("name").as_deref(), Some("Adebayo"));
    }

    #[test]
    fn test_search_covers_id_and_email() {
        let record = named("AGT-0042", "Ngozi").with("email", "ngozi@recycle.ng");
        assert!(FilterCriteria::new()
            .with_search("agt-0042")
            .matches(&record, &["name"]));
        assert!(FilterCriteria::new()
            .with_search("RECYCLE.NG")
            .matches(&record, &["name", "email"]));
        assert!(!FilterCriteria::new()
            .with_search("RECYCLE.NG")
            .matches(&record, &["name"]));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let criteria = FilterCriteria::new().with_search("   ");
        assert!(criteria.is_empty());
        assert!(criteria.matches(&named("A", "Chidi"), &["name"]));
    }

    #[test]
    fn test_date_range_inclusive_through_end_of_day() {
        let records = vec![
            Record::new("1").with_date("2024-01-09"),
            Record::new("2").with_date("2024-01-12"),
            Record::new("3").with_date("2024-01-20"),
        ];
        let criteria = FilterCriteria::new()
            .with_date_from("2024-01-10")
            .unwrap()
            .with_date_to("2024-01-15")
            .unwrap();

        let hits = criteria.apply(&records, &[]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].date.as_deref(), Some("2024-01-12"));

        let late = Record::new("4").with_date("2024-01-15T18:45:00");
        assert!(criteria.matches(&late, &[]));
    }

    #[test]
    fn test_date_criterion_rejects_missing_or_bad_dates() {
        let criteria = FilterCriteria::new().with_date_from("2024-01-10").unwrap();
        assert!(!criteria.matches(&Record::new("1"), &[]));
        assert!(!criteria.matches(&Record::new("2").with_date("soon"), &[]));
    }

    #[test]
    fn test_invalid_date_bound() {
        let err = FilterCriteria::new().with_date_to("15/01/2024").unwrap_err();
        assert_eq!(err, CriteriaError::InvalidDate("15/01/2024".to_string()));
    }

    #[test]
    fn test_numeric_range_inclusive() {
        let criteria = FilterCriteria::new()
            .with_range("riskScore", Some(40.0), Some(80.0))
            .unwrap();
        assert!(criteria.matches(&Record::new("a").with("riskScore", 40.0), &[]));
        assert!(criteria.matches(&Record::new("b").with("riskScore", 80.0), &[]));
        assert!(!criteria.matches(&Record::new("c").with("riskScore", 80.5), &[]));
        assert!(!criteria.matches(&Record::new("d"), &[]));
    }

    #[test]
    fn test_range_expression_parsing() {
        let criteria = FilterCriteria::new()
            .with_range_expr("balance=..5000")
            .unwrap()
            .with_range_expr("riskScore=60..")
            .unwrap();

        assert_eq!(
            criteria.ranges.get("balance"),
            Some(&NumericRange {
                min: None,
                max: Some(5000.0)
            })
        );
        assert_eq!(criteria.ranges.get("riskScore").unwrap().min, Some(60.0));

        assert!(FilterCriteria::new().with_range_expr("balance").is_err());
        assert!(FilterCriteria::new().with_range_expr("balance=a..b").is_err());
        assert!(matches!(
            FilterCriteria::new().with_range_expr("x=9..1"),
            Err(CriteriaError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_condition_parsing() {
        let criteria = FilterCriteria::new()
            .with_condition("status=under_review")
            .unwrap();
        assert_eq!(
            criteria.equals.get("status").map(String::as_str),
            Some("under_review")
        );
        assert!(FilterCriteria::new().with_condition("=x").is_err());
        assert!(FilterCriteria::new().with_condition("status").is_err());
    }
}
