//! Summary aggregation and grouping.
//!
//! This module reduces a (usually already filtered) collection of records
//! into the values shown on summary cards, plus the grouping helpers used
//! for breakdown tables.

use crate::filter::FilterCriteria;
use crate::format;
use crate::models::Record;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The reduction a summary card performs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricKind {
    /// Number of records.
    Count,
    /// Sum of a numeric field; records without the field are skipped.
    Sum { field: String, currency: bool },
    /// Number of records whose field equals a value.
    CountWhere { field: String, value: String },
}

impl MetricKind {
    pub fn count_where(field: &str, value: &str) -> Self {
        MetricKind::CountWhere {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// A named aggregation backing one summary card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub kind: MetricKind,
}

impl Metric {
    pub fn new(label: &str, kind: MetricKind) -> Self {
        Self {
            label: label.to_string(),
            kind,
        }
    }

    /// The `field = value` predicate clicking this card applies, if any.
    pub fn predicate(&self) -> Option<(&str, &str)> {
        match &self.kind {
            MetricKind::CountWhere { field, value } => Some((field.as_str(), value.as_str())),
            _ => None,
        }
    }

    /// Evaluate the metric over a collection.
    pub fn evaluate<'a, I>(&self, records: I) -> MetricValue
    where
        I: IntoIterator<Item = &'a Record>,
    {
        match &self.kind {
            MetricKind::Count => MetricValue::Count(records.into_iter().count()),
            MetricKind::Sum { field, currency } => MetricValue::Sum {
                total: records.into_iter().filter_map(|r| r.number(field)).sum(),
                currency: *currency,
            },
            MetricKind::CountWhere { field, value } => {
                let criteria = FilterCriteria::new().with_equals(field, value);
                MetricValue::Count(
                    records
                        .into_iter()
                        .filter(|r| criteria.matches(r, &[]))
                        .count(),
                )
            }
        }
    }
}

/// A computed metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(usize),
    Sum { total: f64, currency: bool },
}

impl MetricValue {
    /// Render for card display.
    pub fn display(&self, currency_symbol: &str) -> String {
        match self {
            MetricValue::Count(n) => n.to_string(),
            MetricValue::Sum {
                total,
                currency: true,
            } => format::currency(*total, currency_symbol),
            MetricValue::Sum { total, .. } => format::number(*total),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            MetricValue::Count(n) => *n == 0,
            MetricValue::Sum { total, .. } => *total == 0.0,
        }
    }
}

/// One evaluated summary card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub label: String,
    pub value: MetricValue,
    pub display: String,
    /// Whether the card's predicate is part of the active filter.
    pub active: bool,
}

/// Evaluate every metric, preserving metric order.
pub fn aggregate(records: &[&Record], metrics: &[Metric], currency_symbol: &str) -> Vec<SummaryCard> {
    metrics
        .iter()
        .map(|metric| {
            let value = metric.evaluate(records.iter().copied());
            SummaryCard {
                label: metric.label.clone(),
                display: value.display(currency_symbol),
                value,
                active: false,
            }
        })
        .collect()
}

/// Label -> display value mapping for a set of cards.
pub fn display_map(cards: &[SummaryCard]) -> BTreeMap<String, String> {
    cards
        .iter()
        .map(|c| (c.label.clone(), c.display.clone()))
        .collect()
}

/// Group records by the text value of a field. Records without it are skipped.
pub fn group_by<'a>(records: &[&'a Record], field: &str) -> BTreeMap<String, Vec<&'a Record>> {
    let mut grouped: BTreeMap<String, Vec<&'a Record>> = BTreeMap::new();

    for record in records {
        if let Some(key) = record.text(field) {
            grouped.entry(key).or_default().push(*record);
        }
    }

    grouped
}

/// Count records by the text value of a field.
pub fn count_by(records: &[&Record], field: &str) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        if let Some(key) = record.text(field) {
            *counts.entry(key).or_default() += 1;
        }
    }

    counts
}

/// Sort direction for [`sort_records`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Sort records by a field.
///
/// Numeric values compare numerically, everything else as text. Records
/// missing the field always sort last. The sort is stable.
pub fn sort_records(records: &mut [&Record], field: &str, direction: Direction) {
    records.sort_by(|a, b| match (sort_key(a, field), sort_key(b, field)) {
        (Some(x), Some(y)) => match direction {
            Direction::Asc => x.cmp_with(&y),
            Direction::Desc => x.cmp_with(&y).reverse(),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// The `n` records with the highest numeric value in a field.
pub fn top_by<'a>(records: &[&'a Record], field: &str, n: usize) -> Vec<&'a Record> {
    let mut with_values: Vec<&'a Record> = records
        .iter()
        .copied()
        .filter(|r| r.number(field).is_some())
        .collect();
    sort_records(&mut with_values, field, Direction::Desc);
    with_values.truncate(n);
    with_values
}

enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn cmp_with(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        }
    }
}

fn sort_key(record: &Record, field: &str) -> Option<SortKey> {
    if field != "id" && field != "date" {
        if let Some(n) = record.fields.get(field).and_then(|v| v.as_f64()) {
            return Some(SortKey::Number(n));
        }
    }
    record.text(field).map(SortKey::Text)
}
