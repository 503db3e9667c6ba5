//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and conversion into filter criteria.

use crate::error::CriteriaError;
use crate::filter::FilterCriteria;
use crate::models::RiskLevel;
use crate::pages::Page;
use crate::view::SortSpec;
use clap::Parser;
use std::path::PathBuf;

/// Adminsift - filter, bucket, summarize and export dashboard datasets
///
/// Loads a page's records from JSON, applies the same search, filter and
/// risk bucketing the admin dashboard does, and prints the summary cards
/// and visible rows. Optionally writes the page's CSV export.
///
/// Examples:
///   adminsift --data ./data --page referral-fraud --card "High-Risk Cases"
///   adminsift --data ./data --page risk-disputes --from 2024-01-10 --to 2024-01-15 --export
///   adminsift --data wallets.json --page agent-wallets --action freeze-wallet:W-001
///   adminsift --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset file or directory of `<page>.json` files
    #[arg(short, long, value_name = "PATH", required_unless_present = "init_config")]
    pub data: Option<PathBuf>,

    /// Dashboard page the dataset belongs to
    #[arg(short, long, value_name = "PAGE", required_unless_present = "init_config")]
    pub page: Option<Page>,

    /// Case-insensitive search across the page's text fields
    #[arg(short, long, value_name = "TERM")]
    pub search: Option<String>,

    /// Exact-match condition (repeatable)
    ///
    /// Example: --where status=under_review --where region=Lagos
    #[arg(long = "where", value_name = "FIELD=VALUE")]
    pub conditions: Vec<String>,

    /// Earliest record date (inclusive)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Latest record date (inclusive; a bare date covers the whole day)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Inclusive numeric range (repeatable); either bound may be omitted
    ///
    /// Example: --range riskScore=60.. --range amount=..5000
    #[arg(long, value_name = "FIELD=MIN..MAX")]
    pub range: Vec<String>,

    /// Click a summary card by label (repeatable; clicking twice clears it)
    #[arg(long, value_name = "LABEL")]
    pub card: Vec<String>,

    /// Sort visible rows by a field
    #[arg(long, value_name = "FIELD[:desc]")]
    pub sort: Option<String>,

    /// Output format for the view (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the view to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the page's CSV export for the visible rows
    #[arg(long)]
    pub export: bool,

    /// Directory for CSV exports
    #[arg(long, value_name = "DIR", env = "ADMINSIFT_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Currency symbol for amounts
    #[arg(long, value_name = "SYMBOL")]
    pub currency: Option<String>,

    /// Show the detail view of one record
    #[arg(long, value_name = "ID")]
    pub show: Option<String>,

    /// Apply an admin action before rendering (repeatable)
    ///
    /// Format: kind:id[:reason], e.g. freeze-wallet:W-001
    #[arg(long, value_name = "KIND:ID")]
    pub action: Vec<String>,

    /// Simulate a refresh before rendering
    #[arg(long)]
    pub refresh: bool,

    /// Refresh delay in milliseconds
    #[arg(long, value_name = "MS")]
    pub refresh_delay_ms: Option<u64>,

    /// Maximum rows shown in the Markdown view (0 = all)
    #[arg(long, value_name = "ROWS")]
    pub limit: Option<usize>,

    /// Exit with code 2 if a visible record is at or above this risk level
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<FailOnLevel>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .adminsift.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .adminsift.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Risk level for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum FailOnLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl From<FailOnLevel> for RiskLevel {
    fn from(level: FailOnLevel) -> Self {
        match level {
            FailOnLevel::Low => RiskLevel::Low,
            FailOnLevel::Medium => RiskLevel::Medium,
            FailOnLevel::High => RiskLevel::High,
            FailOnLevel::Critical => RiskLevel::Critical,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Dataset path does not exist: {}", data.display()));
            }
        }

        if let Some(ref sort) = self.sort {
            if SortSpec::parse(sort).is_none() {
                return Err(format!(
                    "Invalid sort '{}': expected field, field:asc or field:desc",
                    sort
                ));
            }
        }

        if let Some(ref currency) = self.currency {
            if currency.is_empty() {
                return Err("Currency symbol must not be empty".to_string());
            }
        }

        self.criteria().map(|_| ()).map_err(|e| e.to_string())
    }

    /// Build filter criteria from the filtering flags.
    pub fn criteria(&self) -> Result<FilterCriteria, CriteriaError> {
        let mut criteria = FilterCriteria::new();

        if let Some(ref term) = self.search {
            criteria = criteria.with_search(term);
        }
        for condition in &self.conditions {
            criteria = criteria.with_condition(condition)?;
        }
        if let Some(ref from) = self.from {
            criteria = criteria.with_date_from(from)?;
        }
        if let Some(ref to) = self.to {
            criteria = criteria.with_date_to(to)?;
        }
        for range in &self.range {
            criteria = criteria.with_range_expr(range)?;
        }

        Ok(criteria)
    }

    /// Parsed sort flag.
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort.as_deref().and_then(SortSpec::parse)
    }

    /// The `--fail-on` level reached by the highest visible risk, if any.
    ///
    /// `Some` means the run should exit with code 2.
    pub fn breached_fail_level(&self, max_visible: Option<RiskLevel>) -> Option<RiskLevel> {
        let threshold = RiskLevel::from(self.fail_on?);
        max_visible.filter(|level| *level >= threshold).map(|_| threshold)
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args::parse_from(["adminsift", "--data", ".", "--page", "risk-disputes"])
    }

    #[test]
    fn test_parse_page_and_defaults() {
        let args = make_args();
        assert_eq!(args.page, Some(Page::RiskDisputes));
        assert_eq!(args.format, OutputFormat::Markdown);
        assert!(!args.export);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_init_config_needs_no_data() {
        let args = Args::try_parse_from(["adminsift", "--init-config"]).unwrap();
        assert!(args.init_config);
        assert!(args.validate().is_ok());

        assert!(Args::try_parse_from(["adminsift", "--page", "agent-wallets"]).is_err());
    }

    #[test]
    fn test_criteria_from_flags() {
        let args = Args::parse_from([
            "adminsift",
            "--data",
            ".",
            "--page",
            "referral-fraud",
            "--search",
            "ade",
            "--where",
            "status=flagged",
            "--from",
            "2024-01-10",
            "--to",
            "2024-01-15",
            "--range",
            "riskScore=60..",
        ]);

        let criteria = args.criteria().unwrap();
        assert_eq!(criteria.search.as_deref(), Some("ade"));
        assert_eq!(criteria.equals.len(), 1);
        assert!(criteria.date_from.is_some() && criteria.date_to.is_some());
        assert_eq!(criteria.ranges.get("riskScore").unwrap().min, Some(60.0));
    }

    #[test]
    fn test_validation_bad_inputs() {
        let mut args = make_args();
        args.from = Some("last tuesday".to_string());
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.sort = Some("amount:up".to_string());
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.data = Some(PathBuf::from("/definitely/not/here.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_breached_fail_level() {
        let args = make_args();
        assert_eq!(args.breached_fail_level(Some(RiskLevel::Critical)), None);

        let mut args = make_args();
        args.fail_on = Some(FailOnLevel::High);
        assert_eq!(args.breached_fail_level(Some(RiskLevel::Critical)), Some(RiskLevel::High));
        assert_eq!(args.breached_fail_level(Some(RiskLevel::High)), Some(RiskLevel::High));
        assert_eq!(args.breached_fail_level(Some(RiskLevel::Medium)), None);
        assert_eq!(args.breached_fail_level(None), None);
    }

    #[test]
    fn test_fail_on_checks_visible_rows_only() {
        use crate::models::Record;
        use crate::view::{PageView, RiskTables};

        let records = vec![
            Record::new("RF-1").with("riskScore", 95.0).with("status", "confirmed"),
            Record::new("RF-2").with("riskScore", 20.0).with("status", "dismissed"),
        ];
        let mut view = PageView::new(Page::ReferralFraud, records, &RiskTables::default());
        let args = Args::parse_from([
            "adminsift",
            "--data",
            ".",
            "--page",
            "referral-fraud",
            "--fail-on",
            "high",
        ]);

        assert_eq!(
            args.breached_fail_level(view.max_visible_risk()),
            Some(RiskLevel::High)
        );

        view.set_criteria(FilterCriteria::new().with_equals("status", "dismissed"));
        assert_eq!(args.breached_fail_level(view.max_visible_risk()), None);
    }

    #[test]
    fn test_fail_on_maps_to_risk_level() {
        assert_eq!(RiskLevel::from(FailOnLevel::High), RiskLevel::High);
        assert!(FailOnLevel::Medium < FailOnLevel::Critical);
    }
}
