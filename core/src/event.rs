// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::ops::Bound;

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};
use recurcal_ical::{
    DateTimeKind, RecurrenceBound, RecurrenceRule, RuleUntil, ValueDateListEntry, parse_date_list,
};

use crate::occurrence::Inherited;
use crate::recurrence::normalize_instant;
use crate::{
    Config, Error, ExplicitDate, LooseDateTime, Occurrence, OccurrenceOverride,
    RecurrenceIterator, ViewEnd, ViewWindow,
};

/// Draft of a recurring event, used for creating new events.
#[derive(Debug, Clone)]
pub struct RecurringEventDraft {
    /// The unique identifier, generated when missing.
    pub uid: Option<String>,

    /// Identifier assigned by the storage layer, if any.
    pub id: Option<i64>,

    /// The title of the event.
    pub title: String,

    /// The location of the event, if available.
    pub location: Option<String>,

    /// Start of the first occurrence.
    pub start: LooseDateTime,

    /// Length of each occurrence. Defaults to one day for all-day events and
    /// one hour otherwise.
    pub duration: Option<SignedDuration>,

    /// The RRULE value, if the event recurs.
    pub rule: Option<String>,

    /// The RDATE value, `instant[/duration]` joined by commas.
    pub rdate: Option<String>,

    /// The EXDATE value, instants joined by commas.
    pub exdate: Option<String>,

    /// The range the occurrences are expanded over.
    pub window: ViewWindow,
}

impl RecurringEventDraft {
    /// Creates a draft of a single, untitled event.
    #[must_use]
    pub fn new(start: impl Into<LooseDateTime>) -> Self {
        Self {
            uid: None,
            id: None,
            title: String::new(),
            location: None,
            start: start.into(),
            duration: None,
            rule: None,
            rdate: None,
            exdate: None,
            window: ViewWindow::default(),
        }
    }

    /// Builds the event, expanding its recurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the rule or a date list is malformed,
    /// and [`Error::Construction`] when dates are given for an event without
    /// a rule.
    pub fn build(self, config: Config) -> Result<RecurringEvent, Error> {
        let duration = self.duration.unwrap_or(match self.start {
            LooseDateTime::DateOnly(_) => SignedDuration::from_hours(24),
            _ => SignedDuration::from_hours(1),
        });

        let explicit = match &self.rdate {
            Some(value) => parse_date_list(value)?
                .iter()
                .map(explicit_date)
                .collect::<Result<Vec<_>, Error>>()?,
            None => Vec::new(),
        };
        let excluded = match &self.exdate {
            Some(value) => parse_date_list(value)?
                .iter()
                .map(|e| Ok(LooseDateTime::try_from(&e.instant)?))
                .collect::<Result<Vec<_>, Error>>()?,
            None => Vec::new(),
        };

        let iterator = match &self.rule {
            Some(rule) => {
                let rule = RecurrenceRule::parse(rule)?;
                Some(RecurrenceIterator::with_dates(
                    rule,
                    self.start.clone(),
                    self.window.clone(),
                    config,
                    explicit,
                    excluded,
                )?)
            }
            None if explicit.is_empty() && excluded.is_empty() => None,
            None => {
                return Err(Error::Construction(
                    "explicit or excluded dates need a recurrence rule".to_string(),
                ));
            }
        };

        Ok(RecurringEvent {
            uid: self.uid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            id: self.id,
            start: self.start,
            duration,
            title: self.title,
            location: self.location,
            window: self.window,
            iterator,
            overrides: BTreeMap::new(),
            config,
        })
    }
}

fn explicit_date(entry: &ValueDateListEntry) -> Result<ExplicitDate, Error> {
    Ok(ExplicitDate {
        date: LooseDateTime::try_from(&entry.instant)?,
        duration: entry.duration.map(|d| d.to_signed_duration()),
    })
}

/// An event that may recur, with per-occurrence overrides.
#[derive(Debug, Clone)]
pub struct RecurringEvent {
    uid: String,
    id: Option<i64>,
    start: LooseDateTime,
    duration: SignedDuration,
    title: String,
    location: Option<String>,
    window: ViewWindow,
    iterator: Option<RecurrenceIterator>,
    overrides: BTreeMap<String, OccurrenceOverride>,
    config: Config,
}

impl RecurringEvent {
    /// The unique identifier for the event.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Identifier assigned by the storage layer, if any.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Start of the first occurrence.
    #[must_use]
    pub fn start(&self) -> &LooseDateTime {
        &self.start
    }

    #[must_use]
    pub fn duration(&self) -> SignedDuration {
        self.duration
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Whether the event spans whole days.
    #[must_use]
    pub fn is_all_day(&self) -> bool {
        self.kind() == DateTimeKind::AllDay
    }

    /// How the event relates to the time line.
    #[must_use]
    pub fn kind(&self) -> DateTimeKind {
        self.start.kind()
    }

    /// The recurrence rule, if the event recurs.
    #[must_use]
    pub fn rule(&self) -> Option<&RecurrenceRule> {
        self.iterator.as_ref().map(RecurrenceIterator::rule)
    }

    /// The RRULE value, if the event recurs.
    #[must_use]
    pub fn rule_text(&self) -> Option<String> {
        self.rule().map(ToString::to_string)
    }

    /// The iterator expanding the recurrence.
    #[must_use]
    pub fn iterator(&self) -> Option<&RecurrenceIterator> {
        self.iterator.as_ref()
    }

    /// The overrides, ordered by recurrence id.
    pub fn overrides(&self) -> impl Iterator<Item = &OccurrenceOverride> {
        self.overrides.values()
    }

    /// The occurrence starting at `at`, with the nearest applicable override.
    ///
    /// An override applies when it is keyed on this occurrence, or when it
    /// affects future occurrences and is the closest earlier one that does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when `at` or its adjusted start cannot
    /// be placed on the calendar.
    pub fn resolve(&self, at: &LooseDateTime) -> Result<Occurrence<'_>, Error> {
        let unadjusted_start = normalize_instant(at, &self.start)?;
        let recurrence_id = unadjusted_start.format_stable();

        let applied = self
            .overrides
            .range::<str, _>((Bound::Unbounded, Bound::Included(recurrence_id.as_str())))
            .rev()
            .find(|(key, o)| **key == recurrence_id || o.affects_future)
            .map(|(_, o)| o);

        let start = match applied.and_then(|o| o.offset) {
            Some(offset) => unadjusted_start.checked_add(offset)?,
            None => unadjusted_start.clone(),
        };
        let base_duration = self
            .iterator
            .as_ref()
            .and_then(|it| it.explicit_duration(&recurrence_id))
            .unwrap_or(self.duration);
        let duration = applied.and_then(|o| o.duration).unwrap_or(base_duration);

        Ok(Occurrence {
            event: self,
            recurrence_id,
            unadjusted_start,
            start,
            duration,
            applied,
        })
    }

    /// The occurrence with `recurrence_id`. Leaves the cursor alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no occurrence in the view has that key.
    pub fn get_occurrence(&self, recurrence_id: &str) -> Result<Occurrence<'_>, Error> {
        match &self.iterator {
            Some(it) => {
                let index = it.search(recurrence_id).ok_or(Error::NotFound)?;
                self.resolve(&it.get(index)?)
            }
            None => {
                let occurrence = self.resolve(&self.start)?;
                if occurrence.recurrence_id() == recurrence_id {
                    Ok(occurrence)
                } else {
                    Err(Error::NotFound)
                }
            }
        }
    }

    /// The first occurrence starting at or after `after`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when there is none in the view.
    pub fn get_upcoming(&mut self, after: &LooseDateTime) -> Result<Occurrence<'_>, Error> {
        let after = normalize_instant(after, &self.start)?.format_stable();
        let Some(it) = self.iterator.as_mut() else {
            return match self.resolve(&self.start)? {
                o if o.recurrence_id() >= after.as_str() => Ok(o),
                _ => Err(Error::NotFound),
            };
        };

        if !it.valid() || it.current_key().is_some_and(|k| k > after.as_str()) {
            it.rewind();
        }
        while it.current_key().is_some_and(|k| k < after.as_str()) {
            it.next();
        }
        let current = it.current()?;
        self.resolve(&current)
    }

    /// All occurrences in the view, in order.
    ///
    /// # Errors
    ///
    /// See [`RecurringEvent::resolve`].
    pub fn occurrences(&self) -> Result<Vec<Occurrence<'_>>, Error> {
        match &self.iterator {
            Some(it) => (0..it.len())
                .map(|i| self.resolve(&it.get(i)?))
                .collect(),
            None => Ok(vec![self.resolve(&self.start)?]),
        }
    }

    /// Add an occurrence outside the rule. Returns whether it was added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for events without a rule.
    pub fn add_date(
        &mut self,
        at: &LooseDateTime,
        duration: Option<SignedDuration>,
    ) -> Result<bool, Error> {
        self.iterator
            .as_mut()
            .ok_or(Error::NotFound)?
            .add(at, duration)
    }

    /// Remove an occurrence. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for events without a rule.
    pub fn remove_date(&mut self, at: &LooseDateTime) -> Result<bool, Error> {
        self.iterator.as_mut().ok_or(Error::NotFound)?.remove(at)
    }

    /// Replace the rule, or stop recurring with `None`. Returns whether
    /// anything changed.
    ///
    /// # Errors
    ///
    /// See [`RecurrenceIterator::new`].
    pub fn set_rule(&mut self, rule: Option<RecurrenceRule>) -> Result<bool, Error> {
        let Some(rule) = rule else {
            return Ok(self.iterator.take().is_some());
        };
        if let Some(it) = self.iterator.as_mut() {
            return it.set_rule(rule);
        }
        self.iterator = Some(RecurrenceIterator::new(
            rule,
            self.start.clone(),
            self.window.clone(),
            self.config,
        )?);
        Ok(true)
    }

    /// Move the first occurrence. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// See [`RecurrenceIterator::new`].
    pub fn set_start(&mut self, start: LooseDateTime) -> Result<bool, Error> {
        if start == self.start {
            return Ok(false);
        }
        if let Some(it) = self.iterator.as_mut() {
            it.set_anchor(start.clone())?;
        }
        self.start = start;
        Ok(true)
    }

    /// Change the range occurrences are expanded over. Returns whether
    /// anything changed.
    ///
    /// # Errors
    ///
    /// See [`RecurrenceIterator::new`].
    pub fn set_view_window(&mut self, window: ViewWindow) -> Result<bool, Error> {
        if window == self.window {
            return Ok(false);
        }
        if let Some(it) = self.iterator.as_mut() {
            it.set_view_window(window.clone())?;
        }
        self.window = window;
        Ok(true)
    }

    /// Store an override, replacing the one with the same recurrence id.
    ///
    /// The recurrence id is normalized to the event's key form, so a zoned
    /// `TZID=` value is accepted too.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when the recurrence id is not a
    /// date or date-time.
    pub fn set_override(
        &mut self,
        mut o: OccurrenceOverride,
    ) -> Result<Option<OccurrenceOverride>, Error> {
        let at = LooseDateTime::parse_stable(&o.recurrence_id).ok_or_else(|| {
            Error::Construction(format!("invalid recurrence id: {}", o.recurrence_id))
        })?;
        o.recurrence_id = normalize_instant(&at, &self.start)?.format_stable();
        Ok(self.overrides.insert(o.recurrence_id.clone(), o))
    }

    /// Remove the override with `recurrence_id`.
    pub fn remove_override(&mut self, recurrence_id: &str) -> Option<OccurrenceOverride> {
        self.overrides.remove(recurrence_id)
    }

    /// End the recurrence at `until`, inclusive, replacing any COUNT.
    ///
    /// The explicit and excluded dates and the view window are kept. On
    /// error the event is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBound`] when `until` is before the start and
    /// [`Error::NotFound`] for events without a rule.
    pub fn change_until(&mut self, until: &LooseDateTime) -> Result<(), Error> {
        let it = self.iterator.as_ref().ok_or(Error::NotFound)?;
        let normalized = normalize_instant(until, &self.start)?;
        let start = normalize_instant(&self.start, &self.start)?;
        if normalized.format_stable() < start.format_stable() {
            return Err(Error::InvalidBound {
                until: until.format_stable(),
                start: self.start.format_stable(),
            });
        }

        let datetime = match &normalized {
            LooseDateTime::DateOnly(d) => d.to_datetime(Time::midnight()),
            LooseDateTime::Floating(dt) => *dt,
            LooseDateTime::Zoned(zoned) => zoned.with_time_zone(TimeZone::UTC).datetime(),
        };
        let mut rule = it.rule().clone();
        rule.bound = RecurrenceBound::Until(RuleUntil::new(datetime, normalized.kind()));
        // round trip through the text form, as stored
        let rule = RecurrenceRule::parse(&rule.to_string())?;

        let rebuilt = RecurrenceIterator::with_dates(
            rule,
            self.start.clone(),
            self.window.clone(),
            self.config,
            it.explicit_entries().collect(),
            it.excluded_entries().cloned().collect(),
        )?;
        tracing::debug!(uid = %self.uid, rule = %rebuilt.rule(), "changed recurrence end");
        self.iterator = Some(rebuilt);
        Ok(())
    }

    /// The last instant the recurrence can produce.
    ///
    /// UNTIL gives one second before it, or its date for date bounds. COUNT
    /// gives the last counted occurrence. Without either the recurrence ends
    /// at the end of the calendar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when the end cannot be placed on the
    /// calendar.
    #[tracing::instrument(level = "debug", skip(self), fields(uid = %self.uid))]
    pub fn recurrence_end(&self) -> Result<LooseDateTime, Error> {
        let Some(it) = &self.iterator else {
            return Ok(self.start.clone());
        };
        let rule = it.rule();

        if let Some(until) = rule.until() {
            return self.until_end(until);
        }

        match rule.count() {
            Some(0 | 1) => Ok(self.start.clone()),
            Some(_) => {
                let window = ViewWindow {
                    start: Some(self.start.clone()),
                    end: ViewEnd::At(LooseDateTime::DateOnly(Date::MAX)),
                };
                let full =
                    RecurrenceIterator::new(rule.clone(), self.start.clone(), window, self.config)?;
                tracing::debug!(count = full.len(), "expanded full recurrence");
                match full.len().checked_sub(1) {
                    Some(last) => full.get(last),
                    None => Ok(self.start.clone()),
                }
            }
            None => Ok(match &self.start {
                LooseDateTime::DateOnly(_) => LooseDateTime::DateOnly(Date::MAX),
                LooseDateTime::Floating(_) => {
                    LooseDateTime::Floating(Date::MAX.to_datetime(Time::constant(23, 59, 59, 0)))
                }
                LooseDateTime::Zoned(zoned) => {
                    LooseDateTime::Zoned(Timestamp::MAX.to_zoned(zoned.time_zone().clone()))
                }
            }),
        }
    }

    fn until_end(&self, until: &RuleUntil) -> Result<LooseDateTime, Error> {
        let second = SignedDuration::from_secs(1);
        Ok(match until.kind {
            DateTimeKind::AllDay => LooseDateTime::DateOnly(until.datetime.date()),
            DateTimeKind::Floating => LooseDateTime::Floating(until.datetime.checked_sub(second)?),
            DateTimeKind::Absolute => {
                let end = until.datetime.to_zoned(TimeZone::UTC)?.checked_sub(second)?;
                match &self.start {
                    LooseDateTime::Zoned(zoned) => {
                        LooseDateTime::Zoned(end.with_time_zone(zoned.time_zone().clone()))
                    }
                    _ => LooseDateTime::Zoned(end),
                }
            }
        })
    }

    /// Key of the last occurrence the recurrence can produce. An UNTIL
    /// bound is inclusive here.
    fn last_key(&self) -> Result<String, Error> {
        let end = match self.rule().and_then(RecurrenceRule::until) {
            Some(until) => {
                let datetime: DateTime = until.datetime;
                match until.kind {
                    DateTimeKind::AllDay => LooseDateTime::DateOnly(datetime.date()),
                    DateTimeKind::Floating => LooseDateTime::Floating(datetime),
                    DateTimeKind::Absolute => {
                        LooseDateTime::Zoned(datetime.to_zoned(TimeZone::UTC)?)
                    }
                }
            }
            None => self.recurrence_end()?,
        };
        match (&end, self.kind()) {
            // date bounds cover the whole day
            (LooseDateTime::DateOnly(d), DateTimeKind::Floating | DateTimeKind::Absolute) => {
                let end_of_day = LooseDateTime::Floating(d.to_datetime(Time::MAX));
                Ok(normalize_instant(&end_of_day, &self.start)?.format_stable())
            }
            _ => Ok(normalize_instant(&end, &self.start)?.format_stable()),
        }
    }

    /// Drop the overrides past the end of the recurrence and those that
    /// change nothing, compared with the override that would apply in their
    /// place. Run before the event is stored.
    ///
    /// # Errors
    ///
    /// See [`RecurringEvent::recurrence_end`].
    #[tracing::instrument(level = "debug", skip(self), fields(uid = %self.uid))]
    pub fn normalize_overrides(&mut self) -> Result<(), Error> {
        let last = self.last_key()?;
        let before = self.overrides.len();
        let iterator = self.iterator.as_ref();
        let duration_varies =
            iterator.is_some_and(|it| it.explicit_entries().any(|e| e.duration.is_some()));

        let mut kept = BTreeMap::new();
        let mut carried: Option<String> = None;
        for (key, o) in std::mem::take(&mut self.overrides) {
            if key.as_str() > last.as_str() {
                continue;
            }
            let base = Inherited {
                duration: iterator
                    .and_then(|it| it.explicit_duration(&key))
                    .unwrap_or(self.duration),
                duration_varies,
                title: &self.title,
                location: self.location.as_deref(),
            };
            let previous = carried.as_ref().and_then(|k| kept.get(k));
            if o.changes_nothing(previous, &base) {
                continue;
            }
            if o.affects_future {
                carried = Some(key.clone());
            }
            kept.insert(key, o);
        }
        self.overrides = kept;
        tracing::debug!(
            dropped = before - self.overrides.len(),
            kept = self.overrides.len(),
            "normalized overrides"
        );
        Ok(())
    }
}
