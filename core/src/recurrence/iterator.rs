// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::SignedDuration;
use jiff::civil::{DateTime, Time};
use jiff::tz::TimeZone;
use recurcal_ical::{DateTimeKind, RecurrenceRule, RuleUntil, ValueDuration};

use crate::datetime::util::{end_of_day, start_of_day};
use crate::recurrence::expand::{Expander, Matcher};
use crate::recurrence::period::{Period, add_units, estimate_periods, select_positions};
use crate::recurrence::window::{ViewEnd, ViewWindow};
use crate::{Config, Error, LooseDateTime};

/// An RDATE entry: an extra occurrence, optionally with its own duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitDate {
    /// The instant of the extra occurrence.
    pub date: LooseDateTime,

    /// Duration of this occurrence, overriding the event's.
    pub duration: Option<SignedDuration>,
}

impl ExplicitDate {
    /// An explicit date without its own duration.
    #[must_use]
    pub fn new(date: impl Into<LooseDateTime>) -> Self {
        Self {
            date: date.into(),
            duration: None,
        }
    }
}

/// One occurrence, by key and wall-clock time in the anchor's zone.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    key: String,
    wall: DateTime,
}

#[derive(Debug, Clone)]
struct Explicit {
    date: LooseDateTime,
    duration: Option<SignedDuration>,
    slot: Slot,
}

#[derive(Debug, Clone)]
struct Excluded {
    date: LooseDateTime,
    slot: Slot,
}

/// Wall-clock bounds of one calculation.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    view_start: DateTime,
    view_end: DateTime,
    limit_before: DateTime,
    limit_after: DateTime,
    max_occurrences: usize,
}

/// Expands a recurrence rule, plus explicit and excluded dates, into the
/// sorted occurrences inside a view window.
///
/// Occurrences are identified by their stable key: `YYYYMMDD` for all-day
/// anchors, `YYYYMMDDTHHMMSS` for floating ones and the UTC form
/// `YYYYMMDDTHHMMSSZ` for zoned ones. Keys of one iterator share a form, so
/// they order chronologically.
///
/// Changing the rule, anchor or window recomputes the occurrences before the
/// setter returns. Adding or removing single dates patches the occurrences in
/// place. Either way the cursor goes back to the first occurrence.
#[derive(Debug, Clone)]
pub struct RecurrenceIterator {
    rule: RecurrenceRule,
    anchor: LooseDateTime,
    window: ViewWindow,
    config: Config,
    kind: DateTimeKind,
    tz: TimeZone,
    bounds: Bounds,
    occurrences: Vec<Slot>,
    rule_only: Vec<Slot>,
    explicit_dates: Vec<Explicit>,
    excluded_dates: Vec<Excluded>,
    cursor: usize,
}

impl RecurrenceIterator {
    /// Expand `rule` from `anchor` over `window`.
    ///
    /// The anchor decides the iterator's kind: a date makes it all-day, a
    /// floating time makes it floating and a zoned time makes it absolute in
    /// that time zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when a bound of the window cannot be
    /// placed on the calendar.
    pub fn new(
        rule: RecurrenceRule,
        anchor: LooseDateTime,
        window: ViewWindow,
        config: Config,
    ) -> Result<Self, Error> {
        Self::with_dates(rule, anchor, window, config, Vec::new(), Vec::new())
    }

    /// Expand `rule` from `anchor` over `window`, together with explicit
    /// and excluded dates. See [`RecurrenceIterator::new`] and
    /// [`RecurrenceIterator::set_dates`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when a bound of the window or one of
    /// the dates cannot be placed on the calendar.
    #[tracing::instrument(level = "debug", skip_all, fields(rule = %rule, anchor = %anchor))]
    pub fn with_dates(
        rule: RecurrenceRule,
        anchor: LooseDateTime,
        window: ViewWindow,
        config: Config,
        explicit: Vec<ExplicitDate>,
        excluded: Vec<LooseDateTime>,
    ) -> Result<Self, Error> {
        let (kind, tz) = kind_of(&anchor);
        let wall = to_wall(&anchor, &anchor, kind, &tz);
        let bounds = Bounds {
            view_start: wall,
            view_end: wall,
            limit_before: wall,
            limit_after: wall,
            max_occurrences: 0,
        };
        let mut iter = Self {
            rule,
            anchor,
            window,
            config,
            kind,
            tz,
            bounds,
            occurrences: Vec::new(),
            rule_only: Vec::new(),
            explicit_dates: Vec::new(),
            excluded_dates: Vec::new(),
            cursor: 0,
        };
        iter.store_dates(explicit, excluded)?;
        iter.recompute()?;
        Ok(iter)
    }

    /// Replace the explicit and excluded dates and recompute.
    ///
    /// Dates outside the view window are kept, though they only take effect
    /// once the window covers them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when a date cannot be placed in the
    /// anchor's time zone.
    pub fn set_dates(
        &mut self,
        explicit: Vec<ExplicitDate>,
        excluded: Vec<LooseDateTime>,
    ) -> Result<(), Error> {
        self.store_dates(explicit, excluded)?;
        self.recompute()
    }

    fn store_dates(
        &mut self,
        explicit: Vec<ExplicitDate>,
        excluded: Vec<LooseDateTime>,
    ) -> Result<(), Error> {
        self.explicit_dates = explicit
            .into_iter()
            .map(|e| {
                let slot = self.slot_of(&e.date)?;
                Ok(Explicit {
                    date: e.date,
                    duration: e.duration,
                    slot,
                })
            })
            .collect::<Result<_, Error>>()?;
        self.excluded_dates = excluded
            .into_iter()
            .map(|date| Ok(Excluded {
                slot: self.slot_of(&date)?,
                date,
            }))
            .collect::<Result<_, Error>>()?;
        Ok(())
    }

    /// Replace the rule. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// See [`RecurrenceIterator::new`].
    pub fn set_rule(&mut self, rule: RecurrenceRule) -> Result<bool, Error> {
        if rule == self.rule {
            return Ok(false);
        }
        self.rule = rule;
        self.recompute()?;
        Ok(true)
    }

    /// Replace the anchor. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// See [`RecurrenceIterator::new`].
    pub fn set_anchor(&mut self, anchor: LooseDateTime) -> Result<bool, Error> {
        if anchor == self.anchor {
            return Ok(false);
        }
        self.anchor = anchor;
        (self.kind, self.tz) = kind_of(&self.anchor);
        self.recompute()?;
        Ok(true)
    }

    /// Replace the view window. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// See [`RecurrenceIterator::new`].
    pub fn set_view_window(&mut self, window: ViewWindow) -> Result<bool, Error> {
        if window == self.window {
            return Ok(false);
        }
        self.window = window;
        self.recompute()?;
        Ok(true)
    }

    /// Add a single occurrence. Returns whether it is now part of the
    /// occurrences.
    ///
    /// Instants outside the view window, or already present, are left alone.
    /// Adding a previously removed occurrence of the rule restores it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when the instant cannot be placed in
    /// the anchor's time zone.
    pub fn add(
        &mut self,
        at: &LooseDateTime,
        duration: Option<SignedDuration>,
    ) -> Result<bool, Error> {
        self.cursor = 0;
        let slot = self.slot_of(at)?;
        if !self.in_view(slot.wall) || self.search(&slot.key).is_some() {
            return Ok(false);
        }

        let was_excluded = match self.excluded_dates.iter().position(|e| e.slot.key == slot.key) {
            Some(i) => {
                self.excluded_dates.remove(i);
                true
            }
            None => false,
        };
        let natural = self
            .rule_only
            .binary_search_by(|s| s.key.cmp(&slot.key))
            .is_ok();
        if !(was_excluded && natural) {
            self.explicit_dates.push(Explicit {
                date: at.clone(),
                duration,
                slot: slot.clone(),
            });
            self.bounds.max_occurrences = self.bounds.max_occurrences.saturating_add(1);
        }

        tracing::debug!(key = %slot.key, "adding occurrence");
        Ok(self.record(slot))
    }

    /// Remove a single occurrence. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when the instant cannot be placed in
    /// the anchor's time zone.
    pub fn remove(&mut self, at: &LooseDateTime) -> Result<bool, Error> {
        self.cursor = 0;
        let slot = self.slot_of(at)?;

        if let Some(i) = self.explicit_dates.iter().position(|e| e.slot.key == slot.key) {
            self.explicit_dates.remove(i);
        }
        let natural = self
            .rule_only
            .binary_search_by(|s| s.key.cmp(&slot.key))
            .is_ok();
        if natural && !self.excluded_dates.iter().any(|e| e.slot.key == slot.key) {
            self.excluded_dates.push(Excluded {
                date: at.clone(),
                slot: slot.clone(),
            });
        }

        tracing::debug!(key = %slot.key, "removing occurrence");
        match self.search(&slot.key) {
            Some(i) => {
                self.occurrences.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The occurrence under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the cursor is past the last
    /// occurrence.
    pub fn current(&self) -> Result<LooseDateTime, Error> {
        self.get(self.cursor)
    }

    /// The key of the occurrence under the cursor.
    #[must_use]
    pub fn current_key(&self) -> Option<&str> {
        self.occurrences.get(self.cursor).map(|s| s.key.as_str())
    }

    /// The occurrence at `index`, without moving the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when `index` is out of range.
    pub fn get(&self, index: usize) -> Result<LooseDateTime, Error> {
        let slot = self.occurrences.get(index).ok_or(Error::NotFound)?;
        self.loose_of(slot.wall)
    }

    /// Position of the cursor.
    #[must_use]
    pub fn key(&self) -> usize {
        self.cursor
    }

    /// Whether the cursor is on an occurrence.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.cursor < self.occurrences.len()
    }

    /// Move the cursor forward, stopping one past the last occurrence.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        self.cursor = (self.cursor + 1).min(self.occurrences.len());
    }

    /// Move the cursor back, stopping at the first occurrence.
    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor to the first occurrence.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the last occurrence.
    pub fn end(&mut self) {
        self.cursor = self.occurrences.len().saturating_sub(1);
    }

    /// Move the cursor to `index`, clamped to the last occurrence, and
    /// return where it landed. An empty iterator lands on 0.
    pub fn set_key(&mut self, index: usize) -> usize {
        self.cursor = index.min(self.occurrences.len().saturating_sub(1));
        self.cursor
    }

    /// Move the cursor to the occurrence with `key`, returning its index.
    /// The cursor stays put when there is none.
    pub fn seek(&mut self, key: &str) -> Option<usize> {
        let index = self.search(key)?;
        self.cursor = index;
        Some(index)
    }

    /// Index of the occurrence with `key`.
    #[must_use]
    pub fn search(&self, key: &str) -> Option<usize> {
        self.occurrences
            .binary_search_by(|s| s.key.as_str().cmp(key))
            .ok()
    }

    /// Number of occurrences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    /// Whether there are no occurrences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Keys of all occurrences, ascending.
    #[must_use]
    pub fn occurrences(&self) -> Vec<&str> {
        self.occurrences.iter().map(|s| s.key.as_str()).collect()
    }

    /// Keys of the occurrences produced by the rule alone, before explicit and
    /// excluded dates were applied.
    #[must_use]
    pub fn rule_only_occurrences(&self) -> Vec<&str> {
        self.rule_only.iter().map(|s| s.key.as_str()).collect()
    }

    /// Keys of the explicit dates, in insertion order.
    #[must_use]
    pub fn explicit_dates(&self) -> Vec<&str> {
        self.explicit_dates.iter().map(|e| e.slot.key.as_str()).collect()
    }

    /// Keys of the excluded dates, in insertion order.
    #[must_use]
    pub fn excluded_dates(&self) -> Vec<&str> {
        self.excluded_dates.iter().map(|e| e.slot.key.as_str()).collect()
    }

    /// The explicit dates as an RDATE value, `key[/duration]` joined by commas.
    #[must_use]
    pub fn explicit_dates_value(&self) -> String {
        self.explicit_dates
            .iter()
            .map(|e| match e.duration {
                Some(d) => format!("{}/{}", e.slot.key, ValueDuration::from_signed_duration(d)),
                None => e.slot.key.clone(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The excluded dates as an EXDATE value, keys joined by commas.
    #[must_use]
    pub fn excluded_dates_value(&self) -> String {
        self.excluded_dates().join(",")
    }

    /// The explicit dates with their original values.
    pub fn explicit_entries(&self) -> impl Iterator<Item = ExplicitDate> + '_ {
        self.explicit_dates.iter().map(|e| ExplicitDate {
            date: e.date.clone(),
            duration: e.duration,
        })
    }

    /// The excluded dates with their original values.
    pub fn excluded_entries(&self) -> impl Iterator<Item = &LooseDateTime> {
        self.excluded_dates.iter().map(|e| &e.date)
    }

    /// The custom duration of the explicit date with `key`.
    #[must_use]
    pub fn explicit_duration(&self, key: &str) -> Option<SignedDuration> {
        self.explicit_dates
            .iter()
            .find(|e| e.slot.key == key)
            .and_then(|e| e.duration)
    }

    /// Whether `at` lies within the calculation limits and satisfies the
    /// rule's BY parts.
    #[must_use]
    pub fn limit(&self, at: &LooseDateTime) -> bool {
        let wall = self.wall_of(at);
        wall >= self.bounds.limit_before
            && wall <= self.bounds.limit_after
            && Matcher::new(&self.rule, self.is_all_day()).matches(wall)
    }

    /// How the occurrences relate to the time line.
    #[must_use]
    pub fn kind(&self) -> DateTimeKind {
        self.kind
    }

    /// The rule being expanded.
    #[must_use]
    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    /// The first instant of the recurrence.
    #[must_use]
    pub fn anchor(&self) -> &LooseDateTime {
        &self.anchor
    }

    /// The requested view window.
    #[must_use]
    pub fn view_window(&self) -> &ViewWindow {
        &self.window
    }

    /// First wall-clock instant of the resolved view, in the anchor's zone.
    #[must_use]
    pub fn view_start(&self) -> DateTime {
        self.bounds.view_start
    }

    /// Last wall-clock instant of the resolved view, in the anchor's zone.
    #[must_use]
    pub fn view_end(&self) -> DateTime {
        self.bounds.view_end
    }

    /// The most occurrences the iterator will hold.
    #[must_use]
    pub fn max_occurrences(&self) -> usize {
        self.bounds.max_occurrences
    }

    /// The configuration the iterator was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn is_all_day(&self) -> bool {
        self.kind == DateTimeKind::AllDay
    }

    fn recompute(&mut self) -> Result<(), Error> {
        self.bounds = self.compute_bounds()?;
        self.calculate();
        self.rule_only.clone_from(&self.occurrences);

        for e in &mut self.explicit_dates {
            e.slot = slot_with(&e.date, &self.anchor, self.kind, &self.tz)?;
        }
        for e in &mut self.excluded_dates {
            e.slot = slot_with(&e.date, &self.anchor, self.kind, &self.tz)?;
        }

        let explicit: Vec<Slot> = self
            .explicit_dates
            .iter()
            .filter(|e| self.in_view(e.slot.wall))
            .map(|e| e.slot.clone())
            .collect();
        for slot in explicit {
            if self.search(&slot.key).is_none() {
                self.bounds.max_occurrences = self.bounds.max_occurrences.saturating_add(1);
                self.record(slot);
            }
        }

        let excluded: Vec<String> = self.excluded_dates.iter().map(|e| e.slot.key.clone()).collect();
        self.occurrences.retain(|s| !excluded.contains(&s.key));

        self.cursor = 0;
        Ok(())
    }

    fn compute_bounds(&self) -> Result<Bounds, Error> {
        let rule = &self.rule;
        let anchor = self.wall_of(&self.anchor);
        let view_start = match &self.window.start {
            Some(LooseDateTime::DateOnly(d)) => d.to_datetime(start_of_day()),
            Some(start) => self.wall_of(start),
            None => anchor,
        };

        let mut view_end = match &self.window.end {
            ViewEnd::At(LooseDateTime::DateOnly(d)) => d.to_datetime(end_of_day()),
            ViewEnd::At(end) => self.wall_of(end),
            ViewEnd::After(length) => view_start.checked_add(*length).unwrap_or(DateTime::MAX),
            ViewEnd::Open if rule.count().is_some() => DateTime::MAX,
            ViewEnd::Open => {
                let periods = i64::from(self.config.default_counts.get(rule.freq))
                    * i64::from(rule.interval);
                add_units(view_start, rule.freq, periods).unwrap_or(DateTime::MAX)
            }
        };
        if let Some(until) = rule.until() {
            let until = self.until_wall(until)?;
            if until < view_end {
                view_end = until;
            }
        }

        let limit_after =
            add_units(view_end, rule.freq, i64::from(rule.interval)).unwrap_or(DateTime::MAX);
        let max_occurrences = match rule.count() {
            Some(count) => usize::try_from(count).unwrap_or(usize::MAX),
            None => self.config.max_occurrences(rule.freq),
        };

        Ok(Bounds {
            view_start,
            view_end,
            limit_before: anchor,
            limit_after,
            max_occurrences,
        })
    }

    /// UNTIL as a wall-clock instant in the anchor's zone. A date bound
    /// covers the whole day.
    fn until_wall(&self, until: &RuleUntil) -> Result<DateTime, Error> {
        Ok(match until.kind {
            DateTimeKind::AllDay => until.datetime.date().to_datetime(end_of_day()),
            DateTimeKind::Floating => until.datetime,
            DateTimeKind::Absolute if self.kind == DateTimeKind::Absolute => until
                .datetime
                .to_zoned(TimeZone::UTC)?
                .with_time_zone(self.tz.clone())
                .datetime(),
            DateTimeKind::Absolute => until.datetime,
        })
    }

    #[tracing::instrument(level = "debug", skip(self), fields(rule = %self.rule))]
    fn calculate(&mut self) {
        self.occurrences.clear();
        let rule = self.rule.clone();
        let anchor = self.wall_of(&self.anchor);
        let bounds = self.bounds;
        let expander = Expander::new(&rule, anchor, self.is_all_day());
        let has_set_pos = !rule.by_set_pos.is_empty();

        let mut k = 0;
        if rule.count().is_none() && !rule.is_multi_valued() && bounds.view_start > anchor {
            k = (estimate_periods(&rule, anchor, bounds.view_start) - 1).max(0);
            tracing::trace!(periods = k, "skipping periods before the view");
        }

        let mut walked = 0;
        while walked < self.config.max_periods {
            let Some(period) = Period::nth(&rule, anchor, k) else {
                tracing::debug!(periods = walked, "calendar range exhausted");
                break;
            };
            if period.start() > bounds.limit_after {
                break;
            }

            let mut candidates = expander.candidates(&period);
            if has_set_pos {
                candidates = select_positions(&candidates, &rule.by_set_pos);
            }
            for wall in candidates {
                if wall < bounds.limit_before || wall > bounds.limit_after {
                    continue;
                }
                match self.key_of(wall) {
                    Ok(key) => {
                        self.record(Slot { key, wall });
                    }
                    Err(err) => tracing::trace!(%wall, %err, "skipping unplaceable instant"),
                }
            }
            if self.occurrences.len() >= bounds.max_occurrences {
                break;
            }

            k += 1;
            walked += 1;
        }
        if walked >= self.config.max_periods {
            tracing::debug!(periods = walked, "period limit reached");
        }

        self.occurrences
            .retain(|s| s.wall >= bounds.view_start && s.wall <= bounds.view_end);
        self.occurrences.truncate(bounds.max_occurrences);
        tracing::debug!(count = self.occurrences.len(), "calculated occurrences");
    }

    /// Insert an occurrence in key order. Returns whether it was inserted and
    /// survived truncation to the occurrence cap.
    fn record(&mut self, slot: Slot) -> bool {
        if slot.wall > self.bounds.limit_after {
            return false;
        }
        let Err(pos) = self.occurrences.binary_search_by(|s| s.key.cmp(&slot.key)) else {
            return false;
        };
        self.occurrences.insert(pos, slot);
        let max = self.bounds.max_occurrences;
        if self.occurrences.len() > max {
            self.occurrences.truncate(max);
            return pos < max;
        }
        true
    }

    fn in_view(&self, wall: DateTime) -> bool {
        wall >= self.bounds.view_start && wall <= self.bounds.view_end
    }

    fn wall_of(&self, at: &LooseDateTime) -> DateTime {
        to_wall(at, &self.anchor, self.kind, &self.tz)
    }

    fn slot_of(&self, at: &LooseDateTime) -> Result<Slot, Error> {
        slot_with(at, &self.anchor, self.kind, &self.tz)
    }

    fn key_of(&self, wall: DateTime) -> Result<String, Error> {
        Ok(self.loose_of(wall)?.format_stable())
    }

    fn loose_of(&self, wall: DateTime) -> Result<LooseDateTime, Error> {
        loose_with(wall, self.kind, &self.tz)
    }
}

/// `at` placed in the frame of a recurrence anchored at `anchor`: same kind,
/// same time zone. Its stable form is the occurrence key.
pub(crate) fn normalize_instant(
    at: &LooseDateTime,
    anchor: &LooseDateTime,
) -> Result<LooseDateTime, Error> {
    let (kind, tz) = kind_of(anchor);
    loose_with(to_wall(at, anchor, kind, &tz), kind, &tz)
}

fn kind_of(anchor: &LooseDateTime) -> (DateTimeKind, TimeZone) {
    match anchor {
        LooseDateTime::Zoned(zoned) => (DateTimeKind::Absolute, zoned.time_zone().clone()),
        _ => (anchor.kind(), TimeZone::UTC),
    }
}

/// Wall-clock time of `at` in the iterator's frame. Dates take the anchor's
/// time of day and zoned times are converted into the anchor's zone.
fn to_wall(at: &LooseDateTime, anchor: &LooseDateTime, kind: DateTimeKind, tz: &TimeZone) -> DateTime {
    match (kind, at) {
        (DateTimeKind::AllDay, _) => at.date().to_datetime(Time::midnight()),
        (_, LooseDateTime::DateOnly(d)) => d.to_datetime(anchor.time().unwrap_or(Time::midnight())),
        (_, LooseDateTime::Floating(dt)) => *dt,
        (DateTimeKind::Floating, LooseDateTime::Zoned(zoned)) => zoned.datetime(),
        (DateTimeKind::Absolute, LooseDateTime::Zoned(zoned)) => {
            zoned.with_time_zone(tz.clone()).datetime()
        }
    }
}

fn loose_with(wall: DateTime, kind: DateTimeKind, tz: &TimeZone) -> Result<LooseDateTime, Error> {
    Ok(match kind {
        DateTimeKind::AllDay => LooseDateTime::DateOnly(wall.date()),
        DateTimeKind::Floating => LooseDateTime::Floating(wall),
        DateTimeKind::Absolute => LooseDateTime::Zoned(wall.to_zoned(tz.clone())?),
    })
}

fn slot_with(
    at: &LooseDateTime,
    anchor: &LooseDateTime,
    kind: DateTimeKind,
    tz: &TimeZone,
) -> Result<Slot, Error> {
    let wall = to_wall(at, anchor, kind, tz);
    let key = loose_with(wall, kind, tz)?.format_stable();
    Ok(Slot { key, wall })
}
