use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Todo identifier. Assigned once at creation and never reused.
pub type TodoId = i64;

/// Todo priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse_priority(s: &str) -> Option<Priority> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Sort rank when ordering by priority (high first)
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// A single todo record.
///
/// Field names serialize in camelCase so a persisted list reads the same as
/// the blob the web front end keeps under the `todos` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    /// Task text (never empty after trimming when created through a form)
    pub text: String,
    /// Free-form notes; empty when none were given
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date. `""` and `null` both load as `None`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub due_date: Option<NaiveDate>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create an active todo stamped with `now` for both timestamps
    pub fn new(
        id: TodoId,
        text: String,
        priority: Priority,
        due_date: Option<NaiveDate>,
        notes: String,
        now: DateTime<Utc>,
    ) -> Self {
        Todo {
            id,
            text,
            notes,
            completed: false,
            priority,
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`, never letting it fall behind `created_at`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Overdue: has a due date, is still active, and the due date (read as
    /// midnight UTC) lies strictly before `now`.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        match self.due_date {
            Some(date) => date.and_hms_opt(0, 0, 0).is_some_and(|due| due.and_utc() < now),
            None => false,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_due_date(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid due date: {s}"))),
    }
}

/// Parse a due date as written by a date input (`2025-05-14`), also
/// accepting a full RFC 3339 timestamp.
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}
