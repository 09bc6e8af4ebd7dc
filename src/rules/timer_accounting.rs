//! Session timer state transitions and billing.
//!
//! ```text
//! running --pause--> paused --resume--> running
//!    \                  |
//!     +-----stop--------+--> stopped
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};
use crate::models::{SessionTimer, TimerStatus};
use crate::pricing::{MAX_AMOUNT, checked_product, ensure_at_most, round_money};

const SECONDS_PER_HOUR: i64 = 3600;

fn illegal(timer: &SessionTimer, action: &str) -> PlatformError {
    PlatformError::business_rule(format!("Cannot {} a {} timer", action, timer.status))
}

/// Starts a new running timer.
pub fn start_timer(
    client_identifier: &str,
    label: &str,
    hourly_rate: Option<Decimal>,
    now: DateTime<Utc>,
) -> PlatformResult<SessionTimer> {
    if label.trim().is_empty() {
        return Err(PlatformError::validation("label", "must not be empty"));
    }
    if let Some(rate) = hourly_rate {
        if rate < Decimal::ZERO {
            return Err(PlatformError::validation("hourly_rate", "must not be negative"));
        }
        ensure_at_most("hourly_rate", rate, MAX_AMOUNT)?;
    }

    Ok(SessionTimer {
        id: Uuid::new_v4(),
        client_identifier: client_identifier.to_string(),
        label: label.to_string(),
        hourly_rate,
        status: TimerStatus::Running,
        started_at: now,
        paused_at: None,
        total_paused_seconds: 0,
        stopped_at: None,
        billed_seconds: None,
        charge: None,
    })
}

/// Pauses a running timer.
pub fn pause_timer(timer: &mut SessionTimer, now: DateTime<Utc>) -> PlatformResult<()> {
    if timer.status != TimerStatus::Running {
        return Err(illegal(timer, "pause"));
    }
    timer.status = TimerStatus::Paused;
    timer.paused_at = Some(now);
    Ok(())
}

/// Resumes a paused timer, closing the open pause.
pub fn resume_timer(timer: &mut SessionTimer, now: DateTime<Utc>) -> PlatformResult<()> {
    if timer.status != TimerStatus::Paused {
        return Err(illegal(timer, "resume"));
    }
    close_pause(timer, now);
    timer.status = TimerStatus::Running;
    Ok(())
}

/// Stops a running or paused timer and fixes its billable time and charge.
///
/// # Example
///
/// ```
/// use bizhub::rules::{pause_timer, resume_timer, start_timer, stop_timer};
/// use chrono::{Duration, Utc};
/// use rust_decimal::Decimal;
///
/// let t0 = Utc::now();
/// let mut timer = start_timer("corner-bistro", "Table 2", Some(Decimal::from(120)), t0).unwrap();
/// pause_timer(&mut timer, t0 + Duration::minutes(30)).unwrap();
/// resume_timer(&mut timer, t0 + Duration::minutes(45)).unwrap();
/// stop_timer(&mut timer, t0 + Duration::minutes(105)).unwrap();
///
/// // 105 minutes on the clock, 15 paused: 1.5 hours at 120.00
/// assert_eq!(timer.billed_seconds, Some(5400));
/// assert_eq!(timer.charge, Some(Decimal::from(180)));
/// ```
pub fn stop_timer(timer: &mut SessionTimer, now: DateTime<Utc>) -> PlatformResult<()> {
    if timer.status == TimerStatus::Stopped {
        return Err(illegal(timer, "stop"));
    }
    let mut stopped = timer.clone();
    if stopped.status == TimerStatus::Paused {
        close_pause(&mut stopped, now);
    }

    let seconds = billable_seconds(&stopped, now);
    stopped.charge = stopped
        .hourly_rate
        .map(|rate| timer_charge(rate, seconds))
        .transpose()?;
    stopped.status = TimerStatus::Stopped;
    stopped.stopped_at = Some(now);
    stopped.billed_seconds = Some(seconds);
    *timer = stopped;
    Ok(())
}

/// Seconds of billable time as of `now`.
///
/// Wall time since start, minus closed pauses, minus any open pause.
/// A stopped timer reports its fixed billed time.
pub fn billable_seconds(timer: &SessionTimer, now: DateTime<Utc>) -> i64 {
    if let Some(billed) = timer.billed_seconds {
        return billed;
    }
    let end = timer.stopped_at.unwrap_or(now);
    let wall = (end - timer.started_at).num_seconds();
    let open_pause = timer
        .paused_at
        .map(|paused| (end - paused).num_seconds().max(0))
        .unwrap_or(0);
    (wall - timer.total_paused_seconds - open_pause).max(0)
}

/// Charge for `seconds` at `hourly_rate`, at money precision.
///
/// Fails with a validation error on `hourly_rate` if the product overflows.
pub fn timer_charge(hourly_rate: Decimal, seconds: i64) -> PlatformResult<Decimal> {
    let rate_seconds = checked_product("hourly_rate", hourly_rate, Decimal::from(seconds))?;
    Ok(round_money(rate_seconds / Decimal::from(SECONDS_PER_HOUR)))
}

fn close_pause(timer: &mut SessionTimer, now: DateTime<Utc>) {
    if let Some(paused) = timer.paused_at.take() {
        timer.total_paused_seconds += (now - paused).num_seconds().max(0);
    }
}
