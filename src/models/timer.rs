//! Session timers for billed-by-time services (tables, rooms, rentals).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant::{has_status, tenant_scoped};
use super::Dated;

/// State of a session timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// Time is accruing.
    Running,
    /// Time is suspended.
    Paused,
    /// Closed and charged.
    Stopped,
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerStatus::Running => write!(f, "running"),
            TimerStatus::Paused => write!(f, "paused"),
            TimerStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// A pausable usage timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimer {
    /// Unique identifier for the timer.
    pub id: Uuid,
    /// The owning tenant.
    pub client_identifier: String,
    /// What is being timed (e.g. "Billiards Table 2").
    pub label: String,
    /// Price per billable hour, if the session is charged.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Timer state.
    pub status: TimerStatus,
    /// When the timer was started.
    pub started_at: DateTime<Utc>,
    /// Start of the current pause, if paused.
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
    /// Total length of all closed pauses.
    #[serde(default)]
    pub total_paused_seconds: i64,
    /// When the timer was stopped.
    #[serde(default)]
    pub stopped_at: Option<DateTime<Utc>>,
    /// Billable seconds, fixed when stopped.
    #[serde(default)]
    pub billed_seconds: Option<i64>,
    /// Amount charged, fixed when stopped.
    #[serde(default)]
    pub charge: Option<Decimal>,
}

impl Dated for SessionTimer {
    fn record_date(&self) -> NaiveDate {
        self.started_at.date_naive()
    }
}

tenant_scoped!(SessionTimer);
has_status!(SessionTimer => TimerStatus);
