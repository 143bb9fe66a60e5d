use crate::shared::{
    entity::{Entity, ID},
    metadata::{keys, Metadata},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    Schedule,
    Todo,
    Smart,
}

/// `Pending` is the only state a `Reminder` can leave
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Cancelled,
    Failed,
}

impl ReminderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        write!(f, "{}", status)
    }
}

impl std::str::FromStr for ReminderStatus {
    type Err = ReminderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "cancelled" => Ok(Self::Cancelled),
            "failed" => Ok(Self::Failed),
            _ => Err(ReminderError::UnknownStatus(s.to_string())),
        }
    }
}

/// Named delivery transport such as `app`, `email` or `webhook`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Channel(String);

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_lowercase())
    }

    pub fn app() -> Self {
        Self::new("app")
    }

    pub fn email() -> Self {
        Self::new("email")
    }

    pub fn webhook() -> Self {
        Self::new("webhook")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReminderError {
    #[error("cannot move reminder from status {from} to {to}")]
    InvalidTransition {
        from: ReminderStatus,
        to: ReminderStatus,
    },
    #[error("unknown reminder status: {0}")]
    UnknownStatus(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ID,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: ReminderType,
    /// The schedule or todo that produced this `Reminder`. `None` for ad-hoc reminders.
    pub target_id: Option<String>,
    pub trigger_at: DateTime<Utc>,
    pub message: String,
    pub channels: Vec<Channel>,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub metadata: Metadata,
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Reminder {
    pub fn new(
        user_id: i64,
        kind: ReminderType,
        trigger_at: DateTime<Utc>,
        message: String,
        channels: Vec<Channel>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ID::new(),
            user_id,
            kind,
            target_id: None,
            trigger_at,
            message,
            channels,
            status: ReminderStatus::Pending,
            created_at,
            sent_at: None,
            metadata: Metadata::new(),
        }
    }

    pub fn is_due(&self, now: &DateTime<Utc>) -> bool {
        self.status == ReminderStatus::Pending && self.trigger_at <= *now
    }

    pub fn targets(&self, target_id: &str) -> bool {
        self.target_id.as_deref() == Some(target_id)
    }

    fn transition(&mut self, to: ReminderStatus) -> Result<(), ReminderError> {
        if self.status.is_terminal() || to == ReminderStatus::Pending {
            return Err(ReminderError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), ReminderError> {
        self.transition(ReminderStatus::Cancelled)
    }

    pub fn mark_sent(&mut self, at: DateTime<Utc>) -> Result<(), ReminderError> {
        self.transition(ReminderStatus::Sent)?;
        self.sent_at = Some(at);
        Ok(())
    }

    pub fn mark_failed(&mut self, reason: &str) -> Result<(), ReminderError> {
        self.transition(ReminderStatus::Failed)?;
        self.metadata
            .insert(keys::FAILURE_REASON.to_string(), reason.to_string());
        Ok(())
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.metadata.get(keys::FAILURE_REASON).map(|r| r.as_str())
    }
}

/// Snapshot of a schedule handed over by the schedule domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ScheduleInfo {
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }

    pub fn reminder_message(&self, lead_minutes: i64) -> String {
        let mut message = format!("\"{}\" starts in {} minutes", self.title, lead_minutes);
        if let Some(location) = self.location() {
            message.push_str(&format!(" at {}", location));
        }
        message
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    High,
    Medium,
    Low,
}

/// Snapshot of a todo handed over by the todo domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoInfo {
    pub id: String,
    pub title: String,
    pub due_time: Option<DateTime<Utc>>,
    pub priority: Option<TodoPriority>,
}

impl TodoInfo {
    pub fn reminder_message(&self, lead_minutes: i64) -> String {
        let message = format!("Todo \"{}\" is due in {} minutes", self.title, lead_minutes);
        match self.priority {
            Some(TodoPriority::High) => format!("[Important] {}", message),
            _ => message,
        }
    }
}

/// Reminder proposed by an assistant rather than derived from a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartSuggestion {
    pub related_entity_id: Option<String>,
    pub suggested_time: DateTime<Utc>,
    pub message: String,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    #[serde(rename = "type", default = "default_reminder_type")]
    pub kind: ReminderType,
    #[serde(default)]
    pub target_id: Option<String>,
    pub trigger_at: DateTime<Utc>,
    pub message: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub metadata: Metadata,
}

fn default_reminder_type() -> ReminderType {
    ReminderType::Smart
}
