//! Approval action buttons.
//!
//! The backend owns transition legality. Buttons here only mirror the
//! flags it returns alongside an entity; no rule is evaluated locally.

use serde::{Deserialize, Serialize};

/// Flags returned by the backend for the signed-in user. Missing flags are
/// treated as "not allowed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFlags {
    #[serde(default)]
    pub can_advance: bool,
    #[serde(default)]
    pub can_return: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    Advance,
    Return,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Advance => "Approve",
            ActionKind::Return => "Return for Revision",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub kind: ActionKind,
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalActions {
    pub buttons: Vec<ActionButton>,
}

impl ApprovalActions {
    pub fn from_flags(flags: ActionFlags) -> Self {
        let button = |kind: ActionKind, enabled: bool| ActionButton {
            kind,
            label: kind.label(),
            enabled,
        };

        Self {
            buttons: vec![
                button(ActionKind::Advance, flags.can_advance),
                button(ActionKind::Return, flags.can_return),
            ],
        }
    }

    pub fn is_enabled(&self, kind: ActionKind) -> bool {
        self.buttons
            .iter()
            .any(|button| button.kind == kind && button.enabled)
    }

    pub fn render_text(&self) -> String {
        self.buttons
            .iter()
            .map(|button| {
                if button.enabled {
                    format!("[{}]", button.label)
                } else {
                    format!("({} - unavailable)", button.label)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}
