//! Markdown and JSON rendering of page views.
//!
//! This module turns a filtered page view (summary cards, visible rows,
//! breakdowns) and record detail views into printable documents.

use crate::analysis::{count_by, SummaryCard};
use crate::detail::{render_value, DetailView};
use crate::filter::FilterCriteria;
use crate::models::{Record, RiskLevel};
use crate::pages::Page;
use crate::view::{FilterState, PageView};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything rendered for one page.
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport<'a> {
    pub page: Page,
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub visible_records: usize,
    pub filter: &'a FilterState,
    pub summary: Vec<SummaryCard>,
    pub rows: Vec<&'a Record>,
}

impl<'a> ViewReport<'a> {
    pub fn build(view: &'a PageView, rows: Vec<&'a Record>, currency_symbol: &str) -> Self {
        Self {
            page: view.page(),
            generated_at: Utc::now(),
            total_records: view.records().len(),
            visible_records: rows.len(),
            filter: view.state(),
            summary: view.summary(currency_symbol),
            rows,
        }
    }
}

/// Generate the Markdown rendering of a page view.
///
/// `limit` caps the number of table rows (0 shows all).
pub fn generate_markdown_view(report: &ViewReport<'_>, currency_symbol: &str, limit: usize) -> String {
    let page = report.page;
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", page.profile().title));
    output.push_str(&format!(
        "*Generated {} | Showing {} of {} records*\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.visible_records,
        report.total_records
    ));

    output.push_str(&generate_filter_section(report.filter));
    output.push_str(&generate_summary_section(&report.summary));
    output.push_str(&generate_risk_breakdown(&report.rows));
    output.push_str(&generate_rows_section(page, &report.rows, currency_symbol, limit));

    output
}

/// Describe the active filter.
fn generate_filter_section(state: &FilterState) -> String {
    let mut section = String::new();
    section.push_str("## Filters\n\n");

    match state {
        FilterState::NoFilter => section.push_str("No filters applied.\n\n"),
        FilterState::Filtered(criteria) => {
            for line in describe_criteria(criteria) {
                section.push_str(&format!("- {}\n", line));
            }
            section.push('\n');
        }
    }

    section
}

fn describe_criteria(criteria: &FilterCriteria) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(term) = criteria.search_term() {
        lines.push(format!("Search: \"{}\"", term));
    }
    for (field, value) in &criteria.equals {
        lines.push(format!("`{}` = `{}`", field, value));
    }
    if let Some(from) = criteria.date_from {
        lines.push(format!("From: {}", from.format("%Y-%m-%d %H:%M:%S")));
    }
    if let Some(to) = criteria.date_to {
        lines.push(format!("To: {}", to.format("%Y-%m-%d %H:%M:%S")));
    }
    for (field, range) in &criteria.ranges {
        let lo = range.min.map(|v| v.to_string()).unwrap_or_default();
        let hi = range.max.map(|v| v.to_string()).unwrap_or_default();
        lines.push(format!("`{}` in [{}..{}]", field, lo, hi));
    }

    lines
}

/// Generate the summary-card table.
fn generate_summary_section(cards: &[SummaryCard]) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Card | Value |\n");
    section.push_str("|:---|---:|\n");

    for card in cards {
        let marker = if card.active { " ✅" } else { "" };
        section.push_str(&format!("| {}{} | {} |\n", card.label, marker, card.display));
    }
    section.push('\n');

    section
}

/// Risk-level breakdown of visible rows, when any carry a level.
fn generate_risk_breakdown(rows: &[&Record]) -> String {
    let counts = count_by(rows, "riskLevel");
    if counts.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("### By Risk Level\n\n");
    section.push_str("| Level | Records |\n");
    section.push_str("|:---|:---:|\n");

    for level in [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
    ] {
        if let Some(count) = counts.get(level.as_str()) {
            section.push_str(&format!("| {} {} | {} |\n", level.emoji(), level, count));
        }
    }
    section.push('\n');

    section
}

/// Generate the rows table.
fn generate_rows_section(page: Page, rows: &[&Record], currency_symbol: &str, limit: usize) -> String {
    let columns = page.profile().columns;
    let mut section = String::new();

    section.push_str("## Records\n\n");

    if rows.is_empty() {
        section.push_str("No records match the current filters.\n\n");
        return section;
    }

    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    section.push_str(&format!("| {} |\n", headers.join(" | ")));
    section.push_str(&format!("|{}\n", ":---|".repeat(columns.len())));

    let shown = if limit == 0 { rows.len() } else { limit.min(rows.len()) };
    for row in &rows[..shown] {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| {
                render_value(c, row, currency_symbol)
                    .unwrap_or_default()
                    .replace('|', "\\|")
            })
            .collect();
        section.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    if shown < rows.len() {
        section.push_str(&format!("\n*… {} more rows*\n", rows.len() - shown));
    }
    section.push('\n');

    section
}

/// Generate the Markdown rendering of a detail view.
pub fn generate_markdown_detail(detail: &DetailView) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", detail.title));

    for section in &detail.sections {
        output.push_str(&format!("## {}\n\n", section.name));
        for field in &section.fields {
            output.push_str(&format!("- **{}:** {}\n", field.label, field.value));
        }
        output.push('\n');
    }

    output
}

/// Generate a JSON rendering of any serializable view.
pub fn generate_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
