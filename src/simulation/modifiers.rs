use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::models::CategoryWeights;
use crate::simulation::constants::{seasonal_modifier, weekday_modifier};

/// A dated event shifting attendance and category preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialEvent {
    pub date: NaiveDate,
    pub name: String,
    pub attendance_mod: f64,
    pub veg_mod: f64,
    pub organic_mod: f64,
    pub quick_mod: f64,
}

impl SpecialEvent {
    fn new(date: (i32, u32, u32), name: &str, mods: [f64; 4]) -> Option<Self> {
        Some(Self {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)?,
            name: name.to_string(),
            attendance_mod: mods[0],
            veg_mod: mods[1],
            organic_mod: mods[2],
            quick_mod: mods[3],
        })
    }

    /// Every multiplier must be finite and non-negative.
    fn check_modifiers(&self) -> Result<()> {
        let mods = [
            ("attendance_mod", self.attendance_mod),
            ("veg_mod", self.veg_mod),
            ("organic_mod", self.organic_mod),
            ("quick_mod", self.quick_mod),
        ];
        match mods.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            Some((name, value)) => Err(SimError::InvalidEventModifier {
                date: self.date,
                reason: format!("{} must be finite and non-negative, got {}", name, value),
            }),
            None => Ok(()),
        }
    }

    pub fn preference_mods(&self) -> CategoryWeights {
        CategoryWeights {
            vegetarian: self.veg_mod,
            organic: self.organic_mod,
            quick: self.quick_mod,
        }
    }
}

/// Built-in event calendar for 2025.
pub fn default_special_events() -> Vec<SpecialEvent> {
    [
        ((2025, 1, 15), "New Year Health Kick", [1.2, 1.5, 1.2, 0.7]),
        ((2025, 2, 14), "Valentine's Day", [1.1, 1.0, 1.3, 0.8]),
        ((2025, 4, 22), "Earth Day", [1.1, 1.4, 1.3, 0.8]),
        ((2025, 5, 1), "Labor Day", [0.5, 1.0, 1.0, 1.0]),
        ((2025, 6, 5), "Constitution Day", [0.7, 1.0, 1.0, 1.0]),
        ((2025, 10, 16), "World Food Day", [1.2, 1.2, 1.3, 0.8]),
        ((2025, 11, 1), "World Vegan Day", [1.1, 2.0, 1.0, 0.7]),
        ((2025, 12, 15), "Christmas Lunch Season", [1.3, 0.8, 1.5, 0.7]),
    ]
    .into_iter()
    .filter_map(|(date, name, mods)| SpecialEvent::new(date, name, mods))
    .collect()
}

/// Event lookup keyed by date. At most one event per date.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    events: HashMap<NaiveDate, SpecialEvent>,
}

impl EventTable {
    /// Build the table, rejecting duplicate dates and invalid multipliers.
    pub fn new(events: Vec<SpecialEvent>) -> Result<Self> {
        let mut map = HashMap::with_capacity(events.len());
        for event in events {
            event.check_modifiers()?;
            let date = event.date;
            if map.insert(date, event).is_some() {
                return Err(SimError::DuplicateEventDate(date));
            }
        }
        Ok(Self { events: map })
    }

    pub fn get(&self, date: NaiveDate) -> Option<&SpecialEvent> {
        self.events.get(&date)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Modifiers that apply to everyone on a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayModifiers {
    /// Weekday x seasonal x event attendance multiplier.
    pub attendance: f64,
    /// Per-category preference multipliers (event driven, neutral otherwise).
    pub preferences: CategoryWeights,
    pub event: Option<String>,
}

/// Weekday index 0 (Monday) to 4 (Friday); `None` on weekends.
pub fn workday_index(date: NaiveDate) -> Option<usize> {
    let idx = date.weekday().num_days_from_monday() as usize;
    (idx < 5).then_some(idx)
}

/// Turns calendar dates into attendance and preference modifiers.
#[derive(Debug, Clone, Default)]
pub struct ModifierResolver {
    events: EventTable,
}

impl ModifierResolver {
    pub fn new(events: EventTable) -> Self {
        Self { events }
    }

    /// Resolver with the built-in event calendar.
    pub fn with_default_events() -> Result<Self> {
        Ok(Self::new(EventTable::new(default_special_events())?))
    }

    pub fn resolve(&self, date: NaiveDate) -> DayModifiers {
        let weekday = date.weekday().num_days_from_monday() as usize;
        let base = weekday_modifier(weekday) * seasonal_modifier(date.month());

        match self.events.get(date) {
            Some(event) => DayModifiers {
                attendance: base * event.attendance_mod,
                preferences: event.preference_mods(),
                event: Some(event.name.clone()),
            },
            None => DayModifiers {
                attendance: base,
                preferences: CategoryWeights::NEUTRAL,
                event: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_events_are_unique() {
        let events = default_special_events();
        assert_eq!(events.len(), 8);
        assert_eq!(EventTable::new(events).unwrap().len(), 8);
    }

    #[test]
    fn test_duplicate_event_date_rejected() {
        let mut events = default_special_events();
        let mut dup = events[0].clone();
        dup.name = "Copy".to_string();
        events.push(dup);
        assert!(matches!(
            EventTable::new(events),
            Err(SimError::DuplicateEventDate(d)) if d == date(2025, 1, 15)
        ));
    }

    #[test]
    fn test_negative_or_nan_modifier_rejected() {
        let mut negative = default_special_events();
        negative[1].veg_mod = -1.0;
        assert!(matches!(
            EventTable::new(negative),
            Err(SimError::InvalidEventModifier { date: d, .. }) if d == date(2025, 2, 14)
        ));

        let mut nan = default_special_events();
        nan[0].attendance_mod = f64::NAN;
        assert!(EventTable::new(nan).is_err());

        let mut zero = default_special_events();
        zero[0].quick_mod = 0.0;
        assert!(EventTable::new(zero).is_ok());
    }

    #[test]
    fn test_resolve_plain_day() {
        let resolver = ModifierResolver::with_default_events().unwrap();
        // Tuesday in March: 1.0 x 1.0
        let mods = resolver.resolve(date(2025, 3, 4));
        assert!((mods.attendance - 1.0).abs() < 1e-12);
        assert_eq!(mods.preferences, CategoryWeights::NEUTRAL);
        assert!(mods.event.is_none());
    }

    #[test]
    fn test_resolve_event_day_multiplies() {
        let resolver = ModifierResolver::with_default_events().unwrap();
        // Wednesday 2025-01-15: weekday 1.1 x January 0.9 x event 1.2
        let mods = resolver.resolve(date(2025, 1, 15));
        assert!((mods.attendance - 1.1 * 0.9 * 1.2).abs() < 1e-12);
        assert_eq!(mods.preferences.vegetarian, 1.5);
        assert_eq!(mods.preferences.quick, 0.7);
        assert_eq!(mods.event.as_deref(), Some("New Year Health Kick"));
    }

    #[test]
    fn test_workday_index() {
        assert_eq!(workday_index(date(2025, 1, 6)), Some(0)); // Monday
        assert_eq!(workday_index(date(2025, 1, 10)), Some(4)); // Friday
        assert_eq!(workday_index(date(2025, 1, 11)), None);
        assert_eq!(workday_index(date(2025, 1, 12)), None);
    }
}
