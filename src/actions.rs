//! Admin actions on records.
//!
//! Mutations on the dashboard (acknowledge a signal, freeze a wallet,
//! approve an agent, ...) are modelled as [`AdminAction`] commands. They
//! are applied optimistically to the in-memory collection; the returned
//! [`Applied`] receipt lets a caller reconcile by rolling back when the
//! backing service rejects the command. Enforcement actions are recorded
//! in the record's `enforcementActions` list and can never be rolled back.

use crate::error::ActionError;
use crate::models::Record;
use crate::pages::Page;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// The kinds of admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    AcknowledgeSignal,
    FreezeWallet,
    UnfreezeWallet,
    ApproveAgent,
    RejectAgent,
    HoldCommission,
    ReleaseCommission,
    ResolveDispute,
    BlockRewards,
    SuspendAccount,
    Escalate,
}

impl ActionKind {
    const ALL: [ActionKind; 11] = [
        ActionKind::AcknowledgeSignal,
        ActionKind::FreezeWallet,
        ActionKind::UnfreezeWallet,
        ActionKind::ApproveAgent,
        ActionKind::RejectAgent,
        ActionKind::HoldCommission,
        ActionKind::ReleaseCommission,
        ActionKind::ResolveDispute,
        ActionKind::BlockRewards,
        ActionKind::SuspendAccount,
        ActionKind::Escalate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::AcknowledgeSignal => "acknowledge-signal",
            ActionKind::FreezeWallet => "freeze-wallet",
            ActionKind::UnfreezeWallet => "unfreeze-wallet",
            ActionKind::ApproveAgent => "approve-agent",
            ActionKind::RejectAgent => "reject-agent",
            ActionKind::HoldCommission => "hold-commission",
            ActionKind::ReleaseCommission => "release-commission",
            ActionKind::ResolveDispute => "resolve-dispute",
            ActionKind::BlockRewards => "block-rewards",
            ActionKind::SuspendAccount => "suspend-account",
            ActionKind::Escalate => "escalate",
        }
    }

    /// The field and value this action writes.
    fn effect(&self) -> (&'static str, &'static str) {
        match self {
            ActionKind::AcknowledgeSignal => ("status", "under_review"),
            ActionKind::FreezeWallet => ("status", "frozen"),
            ActionKind::UnfreezeWallet => ("status", "active"),
            ActionKind::ApproveAgent => ("status", "approved"),
            ActionKind::RejectAgent => ("status", "rejected"),
            ActionKind::HoldCommission => ("status", "on_hold"),
            ActionKind::ReleaseCommission => ("status", "pending"),
            ActionKind::ResolveDispute => ("status", "resolved"),
            ActionKind::BlockRewards => ("rewardStatus", "blocked"),
            ActionKind::SuspendAccount => ("status", "suspended"),
            ActionKind::Escalate => ("status", "escalated"),
        }
    }

    /// Irreversible enforcement actions.
    pub fn is_enforcement(&self) -> bool {
        matches!(
            self,
            ActionKind::BlockRewards | ActionKind::SuspendAccount | ActionKind::Escalate
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        ActionKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ActionError::UnknownAction(s.to_string()))
    }
}

/// A command against one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAction {
    pub kind: ActionKind,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AdminAction {
    pub fn new(kind: ActionKind, target_id: &str) -> Self {
        Self {
            kind,
            target_id: target_id.to_string(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    /// Parse `kind:id` or `kind:id:reason`.
    pub fn parse(s: &str) -> Result<Self, ActionError> {
        let mut parts = s.splitn(3, ':');
        let kind: ActionKind = parts.next().unwrap_or_default().parse()?;
        let id = parts
            .next()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ActionError::InvalidAction(s.to_string()))?;

        let action = Self::new(kind, id);
        Ok(match parts.next().map(str::trim).filter(|r| !r.is_empty()) {
            Some(reason) => action.with_reason(reason),
            None => action,
        })
    }
}

/// Receipt of an optimistically applied action.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub action: AdminAction,
    field: &'static str,
    previous: Option<Value>,
    previous_reason: Option<Value>,
}

/// Apply an action to the collection in place.
pub fn apply(page: Page, records: &mut [Record], action: &AdminAction) -> Result<Applied, ActionError> {
    if !page.profile().actions.contains(&action.kind) {
        return Err(ActionError::Unsupported {
            action: action.kind.to_string(),
            page: page.slug().to_string(),
        });
    }

    let record = records
        .iter_mut()
        .find(|r| r.id == action.target_id)
        .ok_or_else(|| ActionError::RecordNotFound(action.target_id.clone()))?;

    if action.kind.is_enforcement() {
        record_enforcement(record, action)?;
    }

    let (field, value) = action.kind.effect();
    let previous = record.set_text(field, value);
    let previous_reason = match &action.reason {
        Some(reason) => record.set_text("actionReason", reason),
        None => None,
    };

    info!(
        "Applied {} to {} ({} -> {})",
        action.kind, action.target_id, field, value
    );

    Ok(Applied {
        action: action.clone(),
        field,
        previous,
        previous_reason,
    })
}

/// Undo an optimistic action after the backing service rejected it.
pub fn rollback(records: &mut [Record], applied: &Applied) -> Result<(), ActionError> {
    if applied.action.kind.is_enforcement() {
        return Err(ActionError::Irreversible(applied.action.kind.to_string()));
    }

    let record = records
        .iter_mut()
        .find(|r| r.id == applied.action.target_id)
        .ok_or_else(|| ActionError::RecordNotFound(applied.action.target_id.clone()))?;

    restore(record, applied.field, applied.previous.as_ref());
    if applied.action.reason.is_some() {
        restore(record, "actionReason", applied.previous_reason.as_ref());
    }

    warn!(
        "Rolled back {} on {}",
        applied.action.kind, applied.action.target_id
    );
    Ok(())
}

fn restore(record: &mut Record, field: &str, previous: Option<&Value>) {
    match previous {
        Some(value) => {
            record.fields.insert(field.to_string(), value.clone());
        }
        None => {
            record.fields.remove(field);
        }
    }
}

fn record_enforcement(record: &mut Record, action: &AdminAction) -> Result<(), ActionError> {
    let name = action.kind.name();
    let entry = record
        .fields
        .entry("enforcementActions".to_string())
        .or_insert_with(|| Value::Array(Vec::new()));

    if !entry.is_array() {
        *entry = Value::Array(Vec::new());
    }
    if let Value::Array(list) = entry {
        if list.iter().any(|v| v.as_str() == Some(name)) {
            return Err(ActionError::AlreadyEnforced {
                action: name.to_string(),
                id: record.id.clone(),
            });
        }
        list.push(Value::String(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallets() -> Vec<Record> {
        vec![
            Record::new("W-1").with("status", "active"),
            Record::new("W-2").with("status", "under_review"),
        ]
    }

    #[test]
    fn test_parse_action() {
        let action = AdminAction::parse("freeze-wallet:W-1").unwrap();
        assert_eq!(action, AdminAction::new(ActionKind::FreezeWallet, "W-1"));

        let action = AdminAction::parse("reject_agent:AGT-3:blurred ID photo").unwrap();
        assert_eq!(action.kind, ActionKind::RejectAgent);
        assert_eq!(action.reason.as_deref(), Some("blurred ID photo"));

        assert_eq!(
            AdminAction::parse("launch:W-1"),
            Err(ActionError::UnknownAction("launch".to_string()))
        );
        assert_eq!(
            AdminAction::parse("freeze-wallet"),
            Err(ActionError::InvalidAction("freeze-wallet".to_string()))
        );
        assert_eq!(
            AdminAction::parse("freeze-wallet: "),
            Err(ActionError::InvalidAction("freeze-wallet: ".to_string()))
        );
    }

    #[test]
    fn test_apply_and_rollback() {
        let mut records = wallets();
        let action = AdminAction::new(ActionKind::FreezeWallet, "W-1");

        let applied = apply(Page::AgentWallets, &mut records, &action).unwrap();
        assert_eq!(records[0].text("status").as_deref(), Some("frozen"));

        rollback(&mut records, &applied).unwrap();
        assert_eq!(records[0].text("status").as_deref(), Some("active"));
    }

    #[test]
    fn test_rollback_removes_field_that_did_not_exist() {
        let mut records = vec![Record::new("W-9")];
        let applied = apply(
            Page::AgentWallets,
            &mut records,
            &AdminAction::new(ActionKind::FreezeWallet, "W-9").with_reason("chargeback"),
        )
        .unwrap();
        assert_eq!(records[0].text("actionReason").as_deref(), Some("chargeback"));

        rollback(&mut records, &applied).unwrap();
        assert!(records[0].fields.is_empty());
    }

    #[test]
    fn test_rollback_restores_earlier_reason() {
        let mut records = vec![Record::new("W-5")
            .with("status", "active")
            .with("actionReason", "earlier review note")];
        let applied = apply(
            Page::AgentWallets,
            &mut records,
            &AdminAction::new(ActionKind::FreezeWallet, "W-5").with_reason("chargeback"),
        )
        .unwrap();
        assert_eq!(records[0].text("actionReason").as_deref(), Some("chargeback"));

        rollback(&mut records, &applied).unwrap();
        assert_eq!(
            records[0].text("actionReason").as_deref(),
            Some("earlier review note")
        );
        assert_eq!(records[0].text("status").as_deref(), Some("active"));
    }

    #[test]
    fn test_rollback_keeps_reason_when_action_had_none() {
        let mut records = vec![Record::new("W-6")
            .with("status", "active")
            .with("actionReason", "earlier review note")];
        let applied = apply(
            Page::AgentWallets,
            &mut records,
            &AdminAction::new(ActionKind::FreezeWallet, "W-6"),
        )
        .unwrap();

        rollback(&mut records, &applied).unwrap();
        assert_eq!(
            records[0].text("actionReason").as_deref(),
            Some("earlier review note")
        );
    }

    #[test]
    fn test_unsupported_and_missing() {
        let mut records = wallets();
        assert!(matches!(
            apply(
                Page::AgentWallets,
                &mut records,
                &AdminAction::new(ActionKind::ApproveAgent, "W-1")
            ),
            Err(ActionError::Unsupported { .. })
        ));
        assert_eq!(
            apply(
                Page::AgentWallets,
                &mut records,
                &AdminAction::new(ActionKind::FreezeWallet, "W-404")
            ),
            Err(ActionError::RecordNotFound("W-404".to_string()))
        );
    }

    #[test]
    fn test_enforcement_is_recorded_once_and_irreversible() {
        let mut records = vec![Record::new("RF-1").with("status", "confirmed")];
        let block = AdminAction::new(ActionKind::BlockRewards, "RF-1");

        let applied = apply(Page::ReferralFraud, &mut records, &block).unwrap();
        assert_eq!(records[0].text("rewardStatus").as_deref(), Some("blocked"));
        assert_eq!(
            records[0].fields.get("enforcementActions"),
            Some(&serde_json::json!(["block-rewards"]))
        );

        assert!(matches!(
            apply(Page::ReferralFraud, &mut records, &block),
            Err(ActionError::AlreadyEnforced { .. })
        ));
        assert_eq!(
            rollback(&mut records, &applied),
            Err(ActionError::Irreversible("block-rewards".to_string()))
        );
        assert_eq!(records[0].text("rewardStatus").as_deref(), Some("blocked"));
    }
}
