//! Display label and color tables for domain enums.
//!
//! Each dashboard enum (status, severity, category, ...) has exactly one
//! table here. Lookups never fail: an unmapped value is shown as-is with
//! the default gray.

use crate::models::Color;
use serde::Serialize;

/// Display style resolved for an enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelStyle {
    pub label: String,
    pub color: Color,
}

/// A static `value -> {label, color}` mapping.
#[derive(Debug, Clone, Copy)]
pub struct LabelTable {
    pub name: &'static str,
    entries: &'static [(&'static str, &'static str, Color)],
}

impl LabelTable {
    pub const fn new(
        name: &'static str,
        entries: &'static [(&'static str, &'static str, Color)],
    ) -> Self {
        Self { name, entries }
    }

    /// Resolve a stored value to its display style.
    pub fn lookup(&self, value: &str) -> LabelStyle {
        match self.entries.iter().find(|(v, _, _)| *v == value) {
            Some((_, label, color)) => LabelStyle {
                label: (*label).to_string(),
                color: *color,
            },
            None => LabelStyle {
                label: value.to_string(),
                color: Color::Default,
            },
        }
    }

    /// Resolve only the label.
    pub fn label(&self, value: &str) -> String {
        self.lookup(value).label
    }

    /// Whether the value belongs to the table's closed set.
    pub fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|(v, _, _)| *v == value)
    }

    /// Stored values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(v, _, _)| *v)
    }
}

pub const RISK_LEVEL: LabelTable = LabelTable::new(
    "riskLevel",
    &[
        ("low", "Low", Color::Success),
        ("medium", "Medium", Color::Warning),
        ("high", "High", Color::Error),
        ("critical", "Critical", Color::Error),
    ],
);

pub const SEVERITY: LabelTable = LabelTable::new(
    "severity",
    &[
        ("low", "Low", Color::Info),
        ("medium", "Medium", Color::Warning),
        ("high", "High", Color::Error),
        ("critical", "Critical", Color::Error),
    ],
);

pub const ACCOUNT_STATUS: LabelTable = LabelTable::new(
    "status",
    &[
        ("active", "Active", Color::Success),
        ("inactive", "Inactive", Color::Default),
        ("suspended", "Suspended", Color::Error),
        ("pending", "Pending", Color::Warning),
    ],
);

pub const ACTIVITY_TYPE: LabelTable = LabelTable::new(
    "activityType",
    &[
        ("login", "Login", Color::Info),
        ("logout", "Logout", Color::Default),
        ("password_change", "Password Change", Color::Warning),
        ("profile_update", "Profile Update", Color::Primary),
        ("failed_login", "Failed Login", Color::Error),
        ("transaction", "Transaction", Color::Success),
    ],
);

pub const COMMISSION_STATUS: LabelTable = LabelTable::new(
    "status",
    &[
        ("paid", "Paid", Color::Success),
        ("pending", "Pending", Color::Warning),
        ("processing", "Processing", Color::Info),
        ("failed", "Failed", Color::Error),
        ("on_hold", "On Hold", Color::Secondary),
    ],
);

pub const VERIFICATION_STATUS: LabelTable = LabelTable::new(
    "status",
    &[
        ("pending", "Pending Review", Color::Warning),
        ("in_review", "In Review", Color::Info),
        ("approved", "Approved", Color::Success),
        ("rejected", "Rejected", Color::Error),
        ("resubmission_required", "Resubmission Required", Color::Secondary),
    ],
);

pub const WALLET_STATUS: LabelTable = LabelTable::new(
    "status",
    &[
        ("active", "Active", Color::Success),
        ("frozen", "Frozen", Color::Error),
        ("under_review", "Under Review", Color::Warning),
        ("closed", "Closed", Color::Default),
    ],
);

pub const FEE_CATEGORY: LabelTable = LabelTable::new(
    "category",
    &[
        ("collection", "Collection Fee", Color::Primary),
        ("delivery", "Delivery Fee", Color::Info),
        ("processing", "Processing Fee", Color::Secondary),
        ("withdrawal", "Withdrawal Fee", Color::Warning),
    ],
);

pub const FEE_STATUS: LabelTable = LabelTable::new(
    "status",
    &[
        ("active", "Active", Color::Success),
        ("scheduled", "Scheduled", Color::Info),
        ("inactive", "Inactive", Color::Default),
    ],
);

pub const FEE_SCOPE: LabelTable = LabelTable::new(
    "scope",
    &[
        ("global", "Global", Color::Primary),
        ("regional", "Regional", Color::Info),
        ("agent", "Agent-Specific", Color::Secondary),
    ],
);

pub const DISPUTE_STATUS: LabelTable = LabelTable::new(
    "status",
    &[
        ("open", "Open", Color::Warning),
        ("investigating", "Investigating", Color::Info),
        ("escalated", "Escalated", Color::Error),
        ("resolved", "Resolved", Color::Success),
        ("closed", "Closed", Color::Default),
    ],
);

pub const DISPUTE_CATEGORY: LabelTable = LabelTable::new(
    "category",
    &[
        ("weight_mismatch", "Weight Mismatch", Color::Warning),
        ("payment_delay", "Payment Delay", Color::Info),
        ("no_show", "No Show", Color::Error),
        ("quality", "Material Quality", Color::Secondary),
        ("pricing", "Pricing", Color::Primary),
    ],
);

pub const FRAUD_CASE_STATUS: LabelTable = LabelTable::new(
    "status",
    &[
        ("flagged", "Flagged", Color::Warning),
        ("under_review", "Under Review", Color::Info),
        ("confirmed", "Confirmed Fraud", Color::Error),
        ("dismissed", "Dismissed", Color::Default),
        ("actioned", "Action Taken", Color::Success),
    ],
);

pub const FRAUD_SIGNAL: LabelTable = LabelTable::new(
    "signalType",
    &[
        ("self_referral", "Self Referral", Color::Error),
        ("device_overlap", "Shared Device", Color::Warning),
        ("ip_cluster", "IP Cluster", Color::Warning),
        ("velocity", "Signup Velocity", Color::Info),
        ("fake_account", "Fake Account", Color::Error),
    ],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_mapped_value() {
        let style = WALLET_STATUS.lookup("frozen");
        assert_eq!(style.label, "Frozen");
        assert_eq!(style.color, Color::Error);
    }

    #[test]
    fn test_lookup_unmapped_falls_back_to_default() {
        let style = DISPUTE_STATUS.lookup("archived");
        assert_eq!(style.label, "archived");
        assert_eq!(style.color, Color::Default);
        assert!(!DISPUTE_STATUS.contains("archived"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(RISK_LEVEL.lookup("HIGH").color, Color::Default);
        assert_eq!(RISK_LEVEL.lookup("high").color, Color::Error);
    }

    #[test]
    fn test_values_in_declaration_order() {
        let values: Vec<_> = RISK_LEVEL.values().collect();
        assert_eq!(values, vec!["low", "medium", "high", "critical"]);
    }
}
