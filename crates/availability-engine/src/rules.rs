//! Operating-hour rules and per-day precedence.
//!
//! A resource's calendar is a list of weekly rules in the resource's own time
//! zone. Each rule may carry per-date closures and per-date special hours. For
//! any one calendar day the rules that apply are reduced to a single
//! [`DayPlan`] with the precedence closure > override > base.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::{parse_timezone, DstPolicy};
use crate::error::AvailabilityError;

/// A local opening/closing pair.
///
/// A closing time of `00:00` is midnight at the end of the day, so
/// `22:00`–`00:00` is a two-hour evening session and `00:00`–`00:00` is the
/// whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

impl OpeningHours {
    pub fn new(opens: NaiveTime, closes: NaiveTime) -> Self {
        Self { opens, closes }
    }

    /// The local wall-clock bounds of these hours on `date`.
    pub fn on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(self.opens);
        let end = if self.closes == NaiveTime::MIN {
            (date + Duration::days(1)).and_time(NaiveTime::MIN)
        } else {
            date.and_time(self.closes)
        };
        (start, end)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        if self.closes != NaiveTime::MIN && self.closes <= self.opens {
            return Err(format!(
                "closing time {} is not after opening time {}",
                self.closes, self.opens
            ));
        }
        Ok(())
    }
}

/// Inclusive date range during which a rule is in force. Both ends are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectiveRange {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub until: Option<NaiveDate>,
}

impl EffectiveRange {
    pub fn between(from: NaiveDate, until: NaiveDate) -> Self {
        Self {
            from: Some(from),
            until: Some(until),
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| from <= date) && self.until.is_none_or(|until| date <= until)
    }
}

/// Special hours replacing a rule's regular hours on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursOverride {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub hours: OpeningHours,
}

/// A recurring weekly opening pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingRule {
    pub weekdays: Vec<Weekday>,
    #[serde(flatten)]
    pub hours: OpeningHours,
    #[serde(default)]
    pub effective: EffectiveRange,
    /// Dates on which the resource is closed.
    #[serde(default)]
    pub closures: Vec<NaiveDate>,
    /// Dates with special hours.
    #[serde(default)]
    pub overrides: Vec<HoursOverride>,
}

/// What a single rule says about a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEffect {
    Base(OpeningHours),
    Override(OpeningHours),
    Closure,
}

/// The resolved plan for one calendar day across every applicable rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayPlan {
    /// No rule applies, or a closure applies.
    Closed,
    /// At least one override applies; base hours are ignored.
    Special(Vec<OpeningHours>),
    /// Regular weekly hours.
    Regular(Vec<OpeningHours>),
}

impl DayPlan {
    pub fn hours(&self) -> &[OpeningHours] {
        match self {
            DayPlan::Closed => &[],
            DayPlan::Special(hours) | DayPlan::Regular(hours) => hours,
        }
    }
}

impl OperatingRule {
    /// A rule open on `weekdays` from `opens` to `closes`, with no date limits.
    pub fn weekly(weekdays: &[Weekday], opens: NaiveTime, closes: NaiveTime) -> Self {
        Self {
            weekdays: weekdays.to_vec(),
            hours: OpeningHours::new(opens, closes),
            effective: EffectiveRange::default(),
            closures: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn effective(mut self, range: EffectiveRange) -> Self {
        self.effective = range;
        self
    }

    pub fn with_closure(mut self, date: NaiveDate) -> Self {
        self.closures.push(date);
        self
    }

    pub fn with_override(mut self, date: NaiveDate, opens: NaiveTime, closes: NaiveTime) -> Self {
        self.overrides.push(HoursOverride {
            date,
            hours: OpeningHours::new(opens, closes),
        });
        self
    }

    /// True when `date` is one of the rule's weekdays inside its effective range.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.weekdays.contains(&date.weekday()) && self.effective.covers(date)
    }

    /// What this rule contributes on `date`, or `None` if it does not apply.
    ///
    /// Overrides only take effect on days the rule applies to; `validate`
    /// rejects any other override date.
    pub fn effect_on(&self, date: NaiveDate) -> Option<RuleEffect> {
        if !self.applies_on(date) {
            return None;
        }
        if self.closures.contains(&date) {
            return Some(RuleEffect::Closure);
        }
        match self.overrides.iter().find(|o| o.date == date) {
            Some(special) => Some(RuleEffect::Override(special.hours)),
            None => Some(RuleEffect::Base(self.hours)),
        }
    }

    /// Check the rule, reporting every problem found.
    pub fn validate(&self, index: usize) -> Vec<AvailabilityError> {
        let mut reasons = Vec::new();

        if self.weekdays.is_empty() {
            reasons.push("rule applies to no weekdays".to_string());
        }
        if let Err(reason) = self.hours.check() {
            reasons.push(reason);
        }
        if let (Some(from), Some(until)) = (self.effective.from, self.effective.until) {
            if from > until {
                reasons.push(format!("effective range {} .. {} is inverted", from, until));
            }
        }
        for (i, special) in self.overrides.iter().enumerate() {
            if let Err(reason) = special.hours.check() {
                reasons.push(format!("override for {}: {}", special.date, reason));
            }
            if self.overrides[..i].iter().any(|o| o.date == special.date) {
                reasons.push(format!("duplicate override for {}", special.date));
            }
            if !self.applies_on(special.date) {
                reasons.push(format!(
                    "override for {} falls on a day the rule never applies",
                    special.date
                ));
            }
        }

        reasons
            .into_iter()
            .map(|reason| AvailabilityError::InvalidRule { index, reason })
            .collect()
    }
}

/// Reduce every rule applying on `date` to one plan.
///
/// Precedence is closure > override > base: a single closure closes the day,
/// otherwise any override replaces the regular hours of all rules.
pub fn plan_for(rules: &[OperatingRule], date: NaiveDate) -> DayPlan {
    let effects: Vec<RuleEffect> = rules.iter().filter_map(|r| r.effect_on(date)).collect();

    if effects.is_empty() || effects.contains(&RuleEffect::Closure) {
        return DayPlan::Closed;
    }

    let special: Vec<OpeningHours> = effects
        .iter()
        .filter_map(|e| match e {
            RuleEffect::Override(hours) => Some(*hours),
            _ => None,
        })
        .collect();
    if !special.is_empty() {
        return DayPlan::Special(special);
    }

    DayPlan::Regular(
        effects
            .iter()
            .filter_map(|e| match e {
                RuleEffect::Base(hours) => Some(*hours),
                _ => None,
            })
            .collect(),
    )
}

/// The operating configuration of one bookable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCalendar {
    pub resource_id: String,
    /// IANA zone in which every rule's wall-clock times are read.
    pub timezone: String,
    #[serde(default)]
    pub dst_policy: DstPolicy,
    pub rules: Vec<OperatingRule>,
}

impl ResourceCalendar {
    pub fn new(
        resource_id: impl Into<String>,
        timezone: impl Into<String>,
        rules: Vec<OperatingRule>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            timezone: timezone.into(),
            dst_policy: DstPolicy::default(),
            rules,
        }
    }

    pub fn zone(&self) -> Result<Tz, AvailabilityError> {
        parse_timezone(&self.timezone)
    }

    /// Check the zone and every rule, reporting every problem found.
    pub fn validate(&self) -> Vec<AvailabilityError> {
        let mut errors = Vec::new();
        if let Err(e) = self.zone() {
            errors.push(e);
        }
        for (index, rule) in self.rules.iter().enumerate() {
            errors.extend(rule.validate(index));
        }
        errors
    }
}
