//! Row formatting for the history panel.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::WorkflowHistoryItem;
use crate::workflow::StatusTone;

pub const UNKNOWN_USER: &str = "Unknown User";

/// One rendered transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub from_label: &'static str,
    pub from_tone: StatusTone,
    pub to_label: &'static str,
    pub to_tone: StatusTone,
    pub relative_time: String,
    /// Shown on hover.
    pub exact_time: String,
    pub actor_name: String,
    pub actor_role: Option<String>,
    pub comment: Option<String>,
}

impl HistoryRow {
    pub fn from_item(item: &WorkflowHistoryItem, now: DateTime<Utc>) -> Self {
        let (actor_name, actor_role) = match &item.user {
            Some(user) if !user.full_name.trim().is_empty() => {
                (user.full_name.clone(), Some(user.role.clone()))
            }
            Some(user) => (UNKNOWN_USER.to_string(), Some(user.role.clone())),
            None => (UNKNOWN_USER.to_string(), None),
        };

        Self {
            id: item.id.clone(),
            from_label: item.from_status.label(),
            from_tone: item.from_status.tone(),
            to_label: item.to_status.label(),
            to_tone: item.to_status.tone(),
            relative_time: format_relative(item.created_at, now),
            exact_time: format_exact(item.created_at),
            actor_name,
            actor_role: actor_role.filter(|role| !role.trim().is_empty()),
            comment: item
                .comment
                .as_ref()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(
            "{} → {}  ·  {} ({})\n  {}",
            self.from_label, self.to_label, self.relative_time, self.exact_time, self.actor_name
        );
        if let Some(role) = &self.actor_role {
            out.push_str(&format!(" ({role})"));
        }
        if let Some(comment) = &self.comment {
            for line in comment.lines() {
                out.push_str(&format!("\n  > {line}"));
            }
        }
        out
    }
}

pub fn format_exact(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Coarse "time ago" text. Timestamps in the future read as "just now".
pub fn format_relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let seconds = elapsed.num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    let (amount, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else if days < 30 {
        (days, "day")
    } else if days < 365 {
        // 360..365 days would otherwise read "12 months".
        ((days / 30).min(11), "month")
    } else {
        (days / 365, "year")
    };

    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}
