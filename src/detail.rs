//! Section-keyed detail view of a single record.

use crate::models::{Color, Record};
use crate::pages::{Column, ColumnKind, Page};
use crate::format;
use serde::Serialize;

/// One labelled value in a detail section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailField {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSection {
    pub name: String,
    pub fields: Vec<DetailField>,
}

/// Detail model for a record, built from its page's section layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub sections: Vec<DetailSection>,
}

impl DetailView {
    /// Build the view. Fields the record lacks are left out, and sections
    /// that end up empty are dropped.
    pub fn build(page: Page, record: &Record, currency_symbol: &str) -> Self {
        let sections = page
            .profile()
            .sections
            .iter()
            .map(|section| DetailSection {
                name: section.name.to_string(),
                fields: section
                    .columns
                    .iter()
                    .filter_map(|c| detail_field(c, record, currency_symbol))
                    .collect(),
            })
            .filter(|s| !s.fields.is_empty())
            .collect();

        Self {
            id: record.id.clone(),
            title: format!("{} {}", page.profile().title, record.id),
            sections,
        }
    }

    pub fn section(&self, name: &str) -> Option<&DetailSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Render a column's value for display. `None` when the record lacks it.
pub fn render_value(column: &Column, record: &Record, currency_symbol: &str) -> Option<String> {
    match column.kind {
        ColumnKind::Currency => record
            .number(column.field)
            .map(|n| format::currency(n, currency_symbol)),
        ColumnKind::Percent => record.number(column.field).map(format::percent),
        ColumnKind::Number => record.number(column.field).map(format::number),
        ColumnKind::Enum(table) => record.text(column.field).map(|v| table.label(&v)),
        ColumnKind::Text | ColumnKind::Date => record.text(column.field),
    }
}

fn detail_field(column: &Column, record: &Record, currency_symbol: &str) -> Option<DetailField> {
    let value = render_value(column, record, currency_symbol)?;
    let color = match column.kind {
        ColumnKind::Enum(table) => record.text(column.field).map(|v| table.lookup(&v).color),
        _ => None,
    };

    Some(DetailField {
        label: column.header.to_string(),
        value,
        color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_detail_sections() {
        let record = Record::new("W-7")
            .with("agentName", "Chidi Eze")
            .with("availableBalance", 1500.5)
            .with("escrowBalance", 250000.0)
            .with("status", "frozen")
            .with_date("2024-01-12");

        let view = DetailView::build(Page::AgentWallets, &record, "₦");
        assert_eq!(view.title, "Agent Wallets W-7");

        let balances = view.section("Balances").unwrap();
        let values: Vec<_> = balances.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["₦1,500.5", "₦250,000"]);

        let overview = view.section("Overview").unwrap();
        let status = overview
            .fields
            .iter()
            .find(|f| f.label == "Status")
            .unwrap();
        assert_eq!(status.value, "Frozen");
        assert_eq!(status.color, Some(Color::Error));
    }

    #[test]
    fn test_empty_sections_dropped() {
        let record = Record::new("F-1").with("name", "Pickup fee");
        let view = DetailView::build(Page::RiskDisputes, &record, "₦");
        assert!(view.section("Timeline").is_none());
        assert_eq!(view.sections.len(), 1);
    }
}
