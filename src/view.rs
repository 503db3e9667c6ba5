//! Per-page view state.
//!
//! A [`PageView`] owns one page's records and its filter state. Every
//! query recomputes from the full collection, so the visible rows always
//! reflect the current criteria and nothing is cached between calls.
//!
//! The filter state is `NoFilter -> Filtered(criteria) -> NoFilter`:
//! summary-card clicks toggle criteria on and off, and `clear` resets.

use crate::analysis::{self, Direction, Metric, SummaryCard};
use crate::filter::FilterCriteria;
use crate::models::{Record, RiskLevel};
use crate::pages::{Page, RiskMetric};
use crate::risk::{self, ThresholdTable};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Filter state of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "criteria")]
pub enum FilterState {
    #[default]
    NoFilter,
    Filtered(FilterCriteria),
}

impl FilterState {
    fn from_criteria(criteria: FilterCriteria) -> Self {
        if criteria.is_empty() {
            FilterState::NoFilter
        } else {
            FilterState::Filtered(criteria)
        }
    }

    pub fn criteria(&self) -> Option<&FilterCriteria> {
        match self {
            FilterState::NoFilter => None,
            FilterState::Filtered(c) => Some(c),
        }
    }
}

/// Risk tables used when deriving `riskLevel`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskTables {
    pub dispute_rate: ThresholdTable,
    pub risk_score: ThresholdTable,
}

impl Default for RiskTables {
    fn default() -> Self {
        Self {
            dispute_rate: ThresholdTable::default(),
            risk_score: ThresholdTable::risk_score(&risk::RISK_SCORE_BOUNDS)
                .unwrap_or_default(),
        }
    }
}

/// Sorting applied to visible rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: Direction,
}

impl SortSpec {
    /// Parse `field` or `field:asc|desc`.
    pub fn parse(s: &str) -> Option<Self> {
        let (field, direction) = match s.split_once(':') {
            Some((f, "desc")) => (f, Direction::Desc),
            Some((f, "asc")) => (f, Direction::Asc),
            Some(_) => return None,
            None => (s, Direction::Asc),
        };
        let field = field.trim();
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// A dashboard page's records plus its filter state.
#[derive(Debug, Clone)]
pub struct PageView {
    page: Page,
    records: Vec<Record>,
    state: FilterState,
    metrics: Vec<Metric>,
    sort: Option<SortSpec>,
}

impl PageView {
    /// Create a view, deriving `riskLevel` for pages that bucket a metric.
    pub fn new(page: Page, mut records: Vec<Record>, tables: &RiskTables) -> Self {
        if let Some(metric) = page.profile().risk_metric {
            let derived = derive_risk_levels(&mut records, metric, tables);
            debug!("Derived risk level for {} {} records", derived, page.slug());
        }

        Self {
            page,
            records,
            state: FilterState::NoFilter,
            metrics: page.default_metrics(),
            sort: None,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<Record> {
        &mut self.records
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Replace the criteria wholesale.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.state = FilterState::from_criteria(criteria);
    }

    /// The "Clear Filters" action.
    pub fn clear(&mut self) {
        self.state = FilterState::NoFilter;
    }

    /// Click a summary card by label.
    ///
    /// Returns `true` when the card carries a predicate and the filter
    /// changed. Clicking the same card again removes its predicate.
    pub fn toggle_card(&mut self, label: &str) -> bool {
        let Some((field, value)) = self
            .metrics
            .iter()
            .find(|m| m.label.eq_ignore_ascii_case(label))
            .and_then(|m| m.predicate())
            .map(|(f, v)| (f.to_string(), v.to_string()))
        else {
            debug!("Card '{}' has no filter predicate", label);
            return false;
        };

        let mut criteria = self.state.criteria().cloned().unwrap_or_default();
        if criteria.equals.get(&field) == Some(&value) {
            criteria.equals.remove(&field);
        } else {
            criteria.equals.insert(field, value);
        }

        self.state = FilterState::from_criteria(criteria);
        true
    }

    /// Rows passing the current filter, in sort order.
    pub fn visible(&self) -> Vec<&Record> {
        let search_fields = self.page.profile().search_fields;
        let mut rows: Vec<&Record> = match &self.state {
            FilterState::NoFilter => self.records.iter().collect(),
            FilterState::Filtered(criteria) => criteria.apply(&self.records, search_fields),
        };

        if let Some(sort) = &self.sort {
            analysis::sort_records(&mut rows, &sort.field, sort.direction);
        }

        rows
    }

    /// Summary cards over the visible rows.
    pub fn summary(&self, currency_symbol: &str) -> Vec<SummaryCard> {
        let rows = self.visible();
        let mut cards = analysis::aggregate(&rows, &self.metrics, currency_symbol);

        if let Some(criteria) = self.state.criteria() {
            for (card, metric) in cards.iter_mut().zip(&self.metrics) {
                card.active = metric
                    .predicate()
                    .is_some_and(|(f, v)| criteria.equals.get(f).map(String::as_str) == Some(v));
            }
        }

        cards
    }

    /// Look up a record by id.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Highest risk level among visible rows.
    pub fn max_visible_risk(&self) -> Option<RiskLevel> {
        self.visible().iter().filter_map(|r| r.risk_level()).max()
    }

    /// Simulated refresh: wait, then recompute from the same records.
    pub async fn refresh(&self, delay: Duration) -> Vec<&Record> {
        debug!("Refreshing {} after {:?}", self.page.slug(), delay);
        tokio::time::sleep(delay).await;
        self.visible()
    }
}

/// Fill in `riskLevel` where a record lacks the key. Returns how many were set.
///
/// A stored level is never replaced, even one that does not parse.
pub fn derive_risk_levels(records: &mut [Record], metric: RiskMetric, tables: &RiskTables) -> usize {
    let mut derived = 0;

    for record in records.iter_mut() {
        if record.fields.contains_key("riskLevel") {
            continue;
        }

        let level = match metric {
            RiskMetric::DisputeRate => dispute_rate_of(record).map(|r| tables.dispute_rate.bucket(r)),
            RiskMetric::RiskScore => record.number("riskScore").map(|s| tables.risk_score.bucket(s)),
        };

        if let Some(level) = level {
            record.set_text("riskLevel", level.as_str());
            derived += 1;
        }
    }

    derived
}

fn dispute_rate_of(record: &Record) -> Option<f64> {
    if let Some(rate) = record.number("disputeRate") {
        return Some(rate);
    }
    let disputes = record.number("disputes")?;
    let completed = record.number("completedTransactions")?;
    if disputes < 0.0 || completed < 0.0 {
        return None;
    }
    Some(risk::dispute_rate(disputes, completed))
}
