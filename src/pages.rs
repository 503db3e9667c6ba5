//! Dashboard page profiles.
//!
//! Every page filters, buckets, summarizes and exports its dataset the
//! same way; the differences live here as static data: which fields are
//! searched, which enum tables label which columns, what gets exported
//! and under which filename.

use crate::analysis::{Metric, MetricKind};
use crate::labels::{self, LabelTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dashboard page backed by one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    AccountActivity,
    AgentCommissions,
    AgentVerification,
    AgentWallets,
    ServiceFees,
    PerformanceDisputes,
    ReferralFraud,
    RiskDisputes,
}

/// How a column's raw value is rendered for display and export.
#[derive(Debug, Clone, Copy)]
pub enum ColumnKind {
    Text,
    Date,
    Number,
    Currency,
    Percent,
    Enum(LabelTable),
}

/// An exported/displayed column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub field: &'static str,
    pub kind: ColumnKind,
}

const fn col(header: &'static str, field: &'static str, kind: ColumnKind) -> Column {
    Column {
        header,
        field,
        kind,
    }
}

/// The metric a page buckets into `riskLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskMetric {
    /// Dispute rate in percent; falls back to `disputes / completedTransactions`.
    DisputeRate,
    /// Fraud risk score, 0-100.
    RiskScore,
}

/// A named group of fields shown together in a detail view.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub name: &'static str,
    pub columns: &'static [Column],
}

/// Static description of a page.
#[derive(Debug, Clone, Copy)]
pub struct PageProfile {
    pub title: &'static str,
    pub search_fields: &'static [&'static str],
    pub columns: &'static [Column],
    pub export_filename: &'static str,
    pub risk_metric: Option<RiskMetric>,
    pub sections: &'static [Section],
    pub actions: &'static [crate::actions::ActionKind],
}

const DATE: Column = col("Date", "date", ColumnKind::Date);
const ID: Column = col("ID", "id", ColumnKind::Text);
const RISK: Column = col("Risk Level", "riskLevel", ColumnKind::Enum(labels::RISK_LEVEL));

mod profiles {
    use super::*;
    use crate::actions::ActionKind;

    const ACTIVITY_COLUMNS: &[Column] = &[
        ID,
        col("User", "userName", ColumnKind::Text),
        col("Email", "email", ColumnKind::Text),
        col("Activity", "activityType", ColumnKind::Enum(labels::ACTIVITY_TYPE)),
        col("Status", "status", ColumnKind::Enum(labels::ACCOUNT_STATUS)),
        col("IP Address", "ipAddress", ColumnKind::Text),
        DATE,
    ];

    pub const ACCOUNT_ACTIVITY: PageProfile = PageProfile {
        title: "Account Activity",
        search_fields: &["userName", "email", "ipAddress", "description"],
        columns: ACTIVITY_COLUMNS,
        export_filename: "account-activity.csv",
        risk_metric: None,
        sections: &[
            Section {
                name: "Overview",
                columns: ACTIVITY_COLUMNS,
            },
            Section {
                name: "Timeline",
                columns: &[DATE, col("Description", "description", ColumnKind::Text)],
            },
        ],
        actions: &[ActionKind::SuspendAccount],
    };

    const COMMISSION_COLUMNS: &[Column] = &[
        ID,
        col("Agent", "agentName", ColumnKind::Text),
        col("Region", "region", ColumnKind::Text),
        col("Amount", "amount", ColumnKind::Currency),
        col("Rate", "commissionRate", ColumnKind::Percent),
        col("Status", "status", ColumnKind::Enum(labels::COMMISSION_STATUS)),
        DATE,
    ];

    pub const AGENT_COMMISSIONS: PageProfile = PageProfile {
        title: "Agent Commissions",
        search_fields: &["agentName", "agentId", "region"],
        columns: COMMISSION_COLUMNS,
        export_filename: "agent-commissions.csv",
        risk_metric: None,
        sections: &[Section {
            name: "Overview",
            columns: COMMISSION_COLUMNS,
        }],
        actions: &[ActionKind::HoldCommission, ActionKind::ReleaseCommission],
    };

    const VERIFICATION_COLUMNS: &[Column] = &[
        ID,
        col("Agent", "agentName", ColumnKind::Text),
        col("Email", "email", ColumnKind::Text),
        col("Document", "documentType", ColumnKind::Text),
        col("Status", "status", ColumnKind::Enum(labels::VERIFICATION_STATUS)),
        DATE,
    ];

    pub const AGENT_VERIFICATION: PageProfile = PageProfile {
        title: "Agent Verification",
        search_fields: &["agentName", "email", "phone"],
        columns: VERIFICATION_COLUMNS,
        export_filename: "agent-verification.csv",
        risk_metric: None,
        sections: &[
            Section {
                name: "Overview",
                columns: VERIFICATION_COLUMNS,
            },
            Section {
                name: "Documents",
                columns: &[
                    col("Document", "documentType", ColumnKind::Text),
                    col("Document Number", "documentNumber", ColumnKind::Text),
                    col("Reviewer", "reviewer", ColumnKind::Text),
                ],
            },
        ],
        actions: &[ActionKind::ApproveAgent, ActionKind::RejectAgent],
    };

    const WALLET_COLUMNS: &[Column] = &[
        ID,
        col("Agent", "agentName", ColumnKind::Text),
        col("Available", "availableBalance", ColumnKind::Currency),
        col("Escrow", "escrowBalance", ColumnKind::Currency),
        col("On Hold", "onHoldBalance", ColumnKind::Currency),
        col("Status", "status", ColumnKind::Enum(labels::WALLET_STATUS)),
        DATE,
    ];

    pub const AGENT_WALLETS: PageProfile = PageProfile {
        title: "Agent Wallets",
        search_fields: &["agentName", "agentId", "email"],
        columns: WALLET_COLUMNS,
        export_filename: "agent-wallets.csv",
        risk_metric: None,
        sections: &[
            Section {
                name: "Overview",
                columns: WALLET_COLUMNS,
            },
            Section {
                name: "Balances",
                columns: &[
                    col("Available", "availableBalance", ColumnKind::Currency),
                    col("Escrow", "escrowBalance", ColumnKind::Currency),
                    col("On Hold", "onHoldBalance", ColumnKind::Currency),
                ],
            },
        ],
        actions: &[ActionKind::FreezeWallet, ActionKind::UnfreezeWallet],
    };

    const FEE_COLUMNS: &[Column] = &[
        ID,
        col("Name", "name", ColumnKind::Text),
        col("Category", "category", ColumnKind::Enum(labels::FEE_CATEGORY)),
        col("Scope", "scope", ColumnKind::Enum(labels::FEE_SCOPE)),
        col("Amount", "amount", ColumnKind::Currency),
        col("Status", "status", ColumnKind::Enum(labels::FEE_STATUS)),
        DATE,
    ];

    pub const SERVICE_FEES: PageProfile = PageProfile {
        title: "Service Fees",
        search_fields: &["name", "description"],
        columns: FEE_COLUMNS,
        export_filename: "service-fees.csv",
        risk_metric: None,
        sections: &[Section {
            name: "Overview",
            columns: FEE_COLUMNS,
        }],
        actions: &[],
    };

    const PERFORMANCE_COLUMNS: &[Column] = &[
        ID,
        col("Agent", "agentName", ColumnKind::Text),
        col("Category", "category", ColumnKind::Enum(labels::DISPUTE_CATEGORY)),
        col("Dispute Rate", "disputeRate", ColumnKind::Percent),
        RISK,
        col("Status", "status", ColumnKind::Enum(labels::DISPUTE_STATUS)),
        DATE,
    ];

    pub const PERFORMANCE_DISPUTES: PageProfile = PageProfile {
        title: "Performance Disputes",
        search_fields: &["agentName", "agentId", "description"],
        columns: PERFORMANCE_COLUMNS,
        export_filename: "performance-disputes.csv",
        risk_metric: Some(RiskMetric::DisputeRate),
        sections: &[
            Section {
                name: "Overview",
                columns: PERFORMANCE_COLUMNS,
            },
            Section {
                name: "Risk",
                columns: &[
                    col("Disputes", "disputes", ColumnKind::Number),
                    col("Completed", "completedTransactions", ColumnKind::Number),
                    col("Dispute Rate", "disputeRate", ColumnKind::Percent),
                    RISK,
                ],
            },
        ],
        actions: &[ActionKind::ResolveDispute, ActionKind::Escalate],
    };

    const FRAUD_COLUMNS: &[Column] = &[
        ID,
        col("Referrer", "referrerName", ColumnKind::Text),
        col("Signal", "signalType", ColumnKind::Enum(labels::FRAUD_SIGNAL)),
        col("Risk Score", "riskScore", ColumnKind::Number),
        RISK,
        col("Rewards", "rewardAmount", ColumnKind::Currency),
        col("Status", "status", ColumnKind::Enum(labels::FRAUD_CASE_STATUS)),
        DATE,
    ];

    pub const REFERRAL_FRAUD: PageProfile = PageProfile {
        title: "Referral Fraud Review",
        search_fields: &["referrerName", "referrerEmail", "refereeName"],
        columns: FRAUD_COLUMNS,
        export_filename: "referral-fraud-cases.csv",
        risk_metric: Some(RiskMetric::RiskScore),
        sections: &[
            Section {
                name: "Overview",
                columns: FRAUD_COLUMNS,
            },
            Section {
                name: "Risk",
                columns: &[
                    col("Risk Score", "riskScore", ColumnKind::Number),
                    RISK,
                    col("Signal", "signalType", ColumnKind::Enum(labels::FRAUD_SIGNAL)),
                ],
            },
        ],
        actions: &[
            ActionKind::AcknowledgeSignal,
            ActionKind::BlockRewards,
            ActionKind::SuspendAccount,
            ActionKind::Escalate,
        ],
    };

    const RISK_DISPUTE_COLUMNS: &[Column] = &[
        ID,
        col("Title", "title", ColumnKind::Text),
        col("Agent", "agentName", ColumnKind::Text),
        col("Severity", "severity", ColumnKind::Enum(labels::SEVERITY)),
        col("Amount", "amount", ColumnKind::Currency),
        col("Status", "status", ColumnKind::Enum(labels::DISPUTE_STATUS)),
        DATE,
    ];

    pub const RISK_DISPUTES: PageProfile = PageProfile {
        title: "Risk Disputes",
        search_fields: &["title", "agentName", "customerName", "description"],
        columns: RISK_DISPUTE_COLUMNS,
        export_filename: "risk-disputes.csv",
        risk_metric: None,
        sections: &[
            Section {
                name: "Overview",
                columns: RISK_DISPUTE_COLUMNS,
            },
            Section {
                name: "Timeline",
                columns: &[
                    DATE,
                    col("Resolved", "resolvedAt", ColumnKind::Date),
                    col("Description", "description", ColumnKind::Text),
                ],
            },
        ],
        actions: &[ActionKind::ResolveDispute, ActionKind::Escalate],
    };
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::AccountActivity,
        Page::AgentCommissions,
        Page::AgentVerification,
        Page::AgentWallets,
        Page::ServiceFees,
        Page::PerformanceDisputes,
        Page::ReferralFraud,
        Page::RiskDisputes,
    ];

    pub fn profile(&self) -> &'static PageProfile {
        match self {
            Page::AccountActivity => &profiles::ACCOUNT_ACTIVITY,
            Page::AgentCommissions => &profiles::AGENT_COMMISSIONS,
            Page::AgentVerification => &profiles::AGENT_VERIFICATION,
            Page::AgentWallets => &profiles::AGENT_WALLETS,
            Page::ServiceFees => &profiles::SERVICE_FEES,
            Page::PerformanceDisputes => &profiles::PERFORMANCE_DISPUTES,
            Page::ReferralFraud => &profiles::REFERRAL_FRAUD,
            Page::RiskDisputes => &profiles::RISK_DISPUTES,
        }
    }

    /// Dataset file stem, e.g. `agent-wallets`.
    pub fn slug(&self) -> &'static str {
        match self {
            Page::AccountActivity => "account-activity",
            Page::AgentCommissions => "agent-commissions",
            Page::AgentVerification => "agent-verification",
            Page::AgentWallets => "agent-wallets",
            Page::ServiceFees => "service-fees",
            Page::PerformanceDisputes => "performance-disputes",
            Page::ReferralFraud => "referral-fraud",
            Page::RiskDisputes => "risk-disputes",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.slug() == slug)
    }

    /// The summary cards shown above the page's table.
    pub fn default_metrics(&self) -> Vec<Metric> {
        let count = |label: &str| Metric::new(label, MetricKind::Count);
        let count_where =
            |label: &str, field: &str, value: &str| Metric::new(label, MetricKind::count_where(field, value));
        let currency_sum = |label: &str, field: &str| {
            Metric::new(
                label,
                MetricKind::Sum {
                    field: field.to_string(),
                    currency: true,
                },
            )
        };

        match self {
            Page::AccountActivity => vec![
                count("Total Events"),
                count_where("Failed Logins", "activityType", "failed_login"),
                count_where("Suspended Accounts", "status", "suspended"),
            ],
            Page::AgentCommissions => vec![
                count("Total Commissions"),
                currency_sum("Total Amount", "amount"),
                count_where("Pending", "status", "pending"),
                count_where("Paid", "status", "paid"),
            ],
            Page::AgentVerification => vec![
                count("Total Applications"),
                count_where("Pending Review", "status", "pending"),
                count_where("Approved", "status", "approved"),
                count_where("Rejected", "status", "rejected"),
            ],
            Page::AgentWallets => vec![
                count("Total Wallets"),
                currency_sum("Available Balance", "availableBalance"),
                currency_sum("Escrow Balance", "escrowBalance"),
                currency_sum("On Hold", "onHoldBalance"),
                count_where("Frozen Wallets", "status", "frozen"),
            ],
            Page::ServiceFees => vec![
                count("Total Fees"),
                count_where("Active", "status", "active"),
                count_where("Scheduled", "status", "scheduled"),
            ],
            Page::PerformanceDisputes => vec![
                count("Total Disputes"),
                count_where("High-Risk Agents", "riskLevel", "high"),
                count_where("Open", "status", "open"),
                count_where("Escalated", "status", "escalated"),
            ],
            Page::ReferralFraud => vec![
                count("Total Cases"),
                count_where("Critical", "riskLevel", "critical"),
                count_where("High-Risk Cases", "riskLevel", "high"),
                count_where("Under Review", "status", "under_review"),
                currency_sum("Rewards at Risk", "rewardAmount"),
            ],
            Page::RiskDisputes => vec![
                count("Total Disputes"),
                count_where("Critical", "severity", "critical"),
                count_where("Open", "status", "open"),
                currency_sum("Amount in Dispute", "amount"),
            ],
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.profile().title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slugs_round_trip_and_are_unique() {
        let slugs: HashSet<_> = Page::ALL.iter().map(|p| p.slug()).collect();
        assert_eq!(slugs.len(), Page::ALL.len());
        for page in Page::ALL {
            assert_eq!(Page::from_slug(page.slug()), Some(page));
        }
        assert_eq!(Page::from_slug("dashboard"), None);
    }

    #[test]
    fn test_export_filenames_are_fixed_and_unique() {
        let names: HashSet<_> = Page::ALL
            .iter()
            .map(|p| p.profile().export_filename)
            .collect();
        assert_eq!(names.len(), Page::ALL.len());
        assert!(names.iter().all(|n| n.ends_with(".csv")));
        assert_eq!(
            Page::ReferralFraud.profile().export_filename,
            "referral-fraud-cases.csv"
        );
    }

    #[test]
    fn test_every_page_has_overview_and_cards() {
        for page in Page::ALL {
            let profile = page.profile();
            assert_eq!(profile.sections[0].name, "Overview");
            assert!(!profile.columns.is_empty());
            assert!(!page.default_metrics().is_empty());
        }
    }

    #[test]
    fn test_bucketed_pages_export_risk_level() {
        for page in Page::ALL {
            let profile = page.profile();
            if profile.risk_metric.is_some() {
                assert!(profile.columns.iter().any(|c| c.field == "riskLevel"));
            }
        }
    }
}
