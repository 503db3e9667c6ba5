//! Adminsift - dataset pipeline for the recycling-logistics admin dashboard.
//!
//! Records are filtered with [`filter::FilterCriteria`], risk metrics are
//! bucketed with [`risk::ThresholdTable`], summary cards are computed by
//! [`analysis`], and [`view::PageView`] ties them together with the
//! card-toggle filter state. [`export`] writes the page CSVs.

pub mod actions;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod detail;
pub mod error;
pub mod export;
pub mod filter;
pub mod format;
pub mod labels;
pub mod models;
pub mod pages;
pub mod report;
pub mod risk;
pub mod view;

pub use filter::FilterCriteria;
pub use models::{Record, RiskLevel};
pub use pages::Page;
pub use view::PageView;
