//! When to run the next check.
//!
//! The check interval is either a cron expression or a plain interval:
//!
//! - `*/5 * * * *` - five-field cron (minute precision), read the way
//!   node-cron and most cron daemons read it: day-of-week 0-7 with both 0
//!   and 7 meaning Sunday
//! - `0 */5 * * * *` - six or seven fields, with seconds (and year), passed
//!   to the `cron` crate as is; numeric day-of-week there is 1-7 with
//!   1 = Sunday
//! - `90s`, `5m`, `1h` - a fixed delay between the end of one check and the
//!   start of the next
//!
//! Day names (`MON-FRI`) mean the same in every form.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone};
use cron::Schedule;
use thiserror::Error;

use crate::duration::parse_duration;

#[derive(Debug, Error)]
#[error("Invalid check interval {expr:?}: {reason}")]
pub struct ScheduleError {
    expr: String,
    reason: String,
}

impl ScheduleError {
    fn new(expr: &str, reason: impl Into<String>) -> Self {
        Self {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
enum Kind {
    Cron(Schedule),
    Every(Duration),
}

/// A validated check interval.
#[derive(Debug, Clone)]
pub struct CheckSchedule {
    expr: String,
    kind: Kind,
}

impl CheckSchedule {
    /// Parse a cron expression or an interval like `"5m"`.
    pub fn parse(expr: &str) -> Result<Self, ScheduleError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::new(expr, "empty expression"));
        }

        if let Ok(every) = parse_duration(trimmed) {
            if every.is_zero() {
                return Err(ScheduleError::new(expr, "interval must be greater than zero"));
            }
            return Ok(Self {
                expr: trimmed.to_string(),
                kind: Kind::Every(every),
            });
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let normalized = match fields.len() {
            5 => {
                let day_of_week =
                    five_field_day_of_week(fields[4]).map_err(|e| ScheduleError::new(expr, e))?;
                format!("0 {} {}", fields[..4].join(" "), day_of_week)
            }
            6 | 7 => trimmed.to_string(),
            n => {
                return Err(ScheduleError::new(
                    expr,
                    format!("expected 5 to 7 cron fields or an interval, got {} fields", n),
                ))
            }
        };

        let schedule =
            Schedule::from_str(&normalized).map_err(|e| ScheduleError::new(expr, e.to_string()))?;

        Ok(Self {
            expr: trimmed.to_string(),
            kind: Kind::Cron(schedule),
        })
    }

    /// The expression this schedule was parsed from.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// When the next check should start.
    ///
    /// `last` is the tick that fired most recently, if any. A cron tick is
    /// always strictly after both `now` and `last`, so a wall clock running
    /// slightly behind the timer cannot fire the same tick twice. Returns
    /// `None` when a cron expression has no future occurrence.
    pub fn next_tick<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        last: Option<&DateTime<Tz>>,
    ) -> Option<DateTime<Tz>> {
        match &self.kind {
            Kind::Every(every) => now
                .clone()
                .checked_add_signed(TimeDelta::from_std(*every).ok()?),
            Kind::Cron(schedule) => {
                let from = match last {
                    Some(last) if last > now => last,
                    _ => now,
                };
                schedule.after(from).next()
            }
        }
    }

    /// Delay from `now` until the next check should start.
    pub fn until_next<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<Duration> {
        let next = self.next_tick(now, None)?;
        Some((next - now.clone()).to_std().unwrap_or(Duration::ZERO))
    }
}

/// Rewrite a five-field day-of-week into `cron` crate numbering.
///
/// Numeric values follow node-cron (0-7, 0 and 7 = Sunday) and are expanded
/// to an explicit list, which also handles ranges ending on Sunday.
fn five_field_day_of_week(field: &str) -> Result<String, String> {
    if field == "*" || field == "?" || field.chars().any(|c| c.is_ascii_alphabetic()) {
        return Ok(field.to_string());
    }

    let mut days = BTreeSet::new();
    for part in field.split(',') {
        let (range, step) = match part.split_once('/') {
            Some((range, step)) => {
                let step: u32 = step
                    .parse()
                    .map_err(|_| format!("invalid day-of-week step {:?}", part))?;
                if step == 0 {
                    return Err(format!("invalid day-of-week step {:?}", part));
                }
                (range, Some(step))
            }
            None => (part, None),
        };

        let (start, end) = match range {
            "*" => (0, 7),
            _ => match range.split_once('-') {
                Some((start, end)) => (day_number(start)?, day_number(end)?),
                None => {
                    let day = day_number(range)?;
                    (day, if step.is_some() { 7 } else { day })
                }
            },
        };
        if start > end {
            return Err(format!("invalid day-of-week range {:?}", part));
        }

        for day in (start..=end).step_by(step.unwrap_or(1) as usize) {
            days.insert(day % 7);
        }
    }

    Ok(days
        .iter()
        .map(|day| (day + 1).to_string())
        .collect::<Vec<_>>()
        .join(","))
}

fn day_number(text: &str) -> Result<u32, String> {
    match text.parse::<u32>() {
        Ok(day) if day <= 7 => Ok(day),
        _ => Err(format!("invalid day of week {:?}", text)),
    }
}

impl FromStr for CheckSchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CheckSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}
