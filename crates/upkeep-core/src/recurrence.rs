use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{RecurrencePattern, Task};

/// Computes the occurrence following `base`.
///
/// Month-based patterns use calendar month arithmetic. When the target month
/// is shorter than `base`'s day, chrono clamps to its last day, so
/// 2024-01-31 + 1 month is 2024-02-29 and 2024-02-29 + 1 year is 2025-02-28.
///
/// Returns `None` for `RecurrencePattern::None`, a zero interval, or a date
/// outside chrono's range.
pub fn next_date(base: NaiveDate, pattern: RecurrencePattern, interval: u32) -> Option<NaiveDate> {
    if interval == 0 {
        return None;
    }
    let months = |per_period: u32| {
        per_period
            .checked_mul(interval)
            .and_then(|n| base.checked_add_months(Months::new(n)))
    };
    match pattern {
        RecurrencePattern::None => None,
        RecurrencePattern::Weekly => 7u64
            .checked_mul(u64::from(interval))
            .and_then(|n| base.checked_add_days(Days::new(n))),
        RecurrencePattern::Monthly => months(1),
        RecurrencePattern::Quarterly => months(3),
        RecurrencePattern::SemiAnnual => months(6),
        RecurrencePattern::Yearly => months(12),
    }
}

/// Same as [`next_date`] for a pattern stored as text. Unknown patterns have
/// no next occurrence.
pub fn next_date_for_raw(base: NaiveDate, pattern: &str, interval: u32) -> Option<NaiveDate> {
    pattern
        .parse::<RecurrencePattern>()
        .ok()
        .and_then(|pattern| next_date(base, pattern, interval))
}

/// A pattern plus its interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub pattern: RecurrencePattern,
    pub interval: u32,
}

impl RecurrenceRule {
    pub fn new(pattern: RecurrencePattern, interval: u32) -> Result<Self, CoreError> {
        if pattern == RecurrencePattern::None {
            return Err(CoreError::InvalidRecurrence("pattern 'none' never repeats".to_string()));
        }
        if interval == 0 {
            return Err(CoreError::InvalidRecurrence("interval must be at least 1".to_string()));
        }
        Ok(Self { pattern, interval })
    }

    /// The rule carried by a recurring task.
    pub fn for_task(task: &Task) -> Result<Self, CoreError> {
        Self::new(task.recurrence_pattern, task.recurrence_interval)
    }

    #[inline]
    pub fn next_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        next_date(date, self.pattern, self.interval)
    }

    /// Walks the rule from `from` (inclusive) up to `until` (inclusive).
    pub fn occurrences(&self, from: NaiveDate, until: NaiveDate) -> Occurrences {
        Occurrences {
            rule: *self,
            cursor: Some(from),
            until,
        }
    }
}

/// Iterator over the dates of a rule within a closed range.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: RecurrenceRule,
    cursor: Option<NaiveDate>,
    until: NaiveDate,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.cursor.filter(|date| *date <= self.until)?;
        // A rule always moves forward; guard anyway so a stalled date ends the walk.
        self.cursor = self.rule.next_after(current).filter(|next| *next > current);
        Some(current)
    }
}

/// Instances planned for one series, plus whether the per-run cap cut the
/// plan short.
#[derive(Debug, Clone, Default)]
pub struct PlannedInstances {
    pub instances: Vec<Task>,
    /// More dates were missing in the range than the cap allowed.
    pub truncated: bool,
}

/// Builds the instances missing from a series between `from` and `until`.
///
/// `occupied` holds the due dates already claimed in the series and is
/// updated with every planned date, so repeated calls never plan the same
/// day twice. At most `limit` instances are planned; `truncated` is set when
/// dates beyond the limit were left out.
#[allow(clippy::too_many_arguments)]
pub fn plan_missing_instances(
    template: &Task,
    root_id: Uuid,
    rule: RecurrenceRule,
    from: NaiveDate,
    until: NaiveDate,
    occupied: &mut HashSet<NaiveDate>,
    limit: usize,
    created_at: DateTime<Utc>,
) -> PlannedInstances {
    let (dates, truncated) = {
        let mut missing = rule.occurrences(from, until).filter(|date| !occupied.contains(date));
        let dates: Vec<NaiveDate> = missing.by_ref().take(limit).collect();
        (dates, missing.next().is_some())
    };

    let instances = dates
        .into_iter()
        .map(|date| {
            occupied.insert(date);
            template.spawn_instance(root_id, date, rule.next_after(date), created_at)
        })
        .collect();

    PlannedInstances { instances, truncated }
}
