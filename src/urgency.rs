//! # Expiry Urgency
//!
//! Classifies how soon an ingredient has to be eaten.
//!
//! ```text
//! days until expiry:   < 0      0..=3      4..=7     > 7
//! level:             Expired  Critical   Warning    Good
//! ```
//!
//! Dates carry no time component, so the day difference is the exact calendar
//! difference against a time-zeroed "today".

use chrono::{Local, NaiveDate};

use crate::model::Ingredient;

/// Last day offset (inclusive) classified as critical
pub const CRITICAL_MAX_DAYS: i64 = 3;
/// Last day offset (inclusive) classified as warning
pub const WARNING_MAX_DAYS: i64 = 7;
/// Just-expired items still count as expiring soon for this many days
pub const EXPIRY_GRACE_DAYS: i64 = 1;

/// Freshness window of an ingredient relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrgencyLevel {
    /// No expiry date recorded
    None,
    Expired,
    Critical,
    Warning,
    Good,
}

impl UrgencyLevel {
    /// Localization key for the badge shown next to the ingredient, if any
    pub fn badge_key(&self) -> Option<&'static str> {
        match self {
            UrgencyLevel::Critical => Some("urgency-critical"),
            UrgencyLevel::Expired => Some("urgency-expired"),
            UrgencyLevel::Warning => Some("urgency-warning"),
            UrgencyLevel::Good | UrgencyLevel::None => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            UrgencyLevel::None => "⚪",
            UrgencyLevel::Expired => "⚫",
            UrgencyLevel::Critical => "🔴",
            UrgencyLevel::Warning => "🟠",
            UrgencyLevel::Good => "🟢",
        }
    }
}

/// Today's date in the local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole days from `today` until `date` (negative once the date has passed)
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}

/// Classify an optional expiry date against an explicit `today`
pub fn urgency_on(expiry: Option<NaiveDate>, today: NaiveDate) -> UrgencyLevel {
    let Some(date) = expiry else {
        return UrgencyLevel::None;
    };

    match days_until(date, today) {
        d if d < 0 => UrgencyLevel::Expired,
        d if d <= CRITICAL_MAX_DAYS => UrgencyLevel::Critical,
        d if d <= WARNING_MAX_DAYS => UrgencyLevel::Warning,
        _ => UrgencyLevel::Good,
    }
}

/// Classify an optional expiry date against the local calendar date
pub fn urgency(expiry: Option<NaiveDate>) -> UrgencyLevel {
    urgency_on(expiry, today())
}

/// Names of the ingredients that should be used first, in list order.
///
/// Includes items expiring within [`CRITICAL_MAX_DAYS`] and items that expired
/// no more than [`EXPIRY_GRACE_DAYS`] ago.
pub fn expiring_soon(ingredients: &[Ingredient], today: NaiveDate) -> Vec<String> {
    ingredients
        .iter()
        .filter(|ingredient| {
            ingredient.expiry_date.is_some_and(|date| {
                (-EXPIRY_GRACE_DAYS..=CRITICAL_MAX_DAYS).contains(&days_until(date, today))
            })
        })
        .map(|ingredient| ingredient.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_absent_date_is_none() {
        assert_eq!(urgency_on(None, base()), UrgencyLevel::None);
    }

    #[test]
    fn test_urgency_boundaries() {
        let today = base();
        let at = |days: i64| urgency_on(Some(today + Duration::days(days)), today);

        for days in [-30, -2, -1] {
            assert_eq!(at(days), UrgencyLevel::Expired, "offset {}", days);
        }
        for days in 0..=3 {
            assert_eq!(at(days), UrgencyLevel::Critical, "offset {}", days);
        }
        for days in 4..=7 {
            assert_eq!(at(days), UrgencyLevel::Warning, "offset {}", days);
        }
        for days in [8, 9, 30, 365] {
            assert_eq!(at(days), UrgencyLevel::Good, "offset {}", days);
        }
    }

    #[test]
    fn test_urgency_across_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(days_until(date, today), 4);
        assert_eq!(urgency_on(Some(date), today), UrgencyLevel::Warning);
    }

    #[test]
    fn test_expiring_soon_includes_one_day_grace() {
        let today = base();
        let ingredients = vec![
            Ingredient::new("milk").with_expiry(today - Duration::days(1)),
            Ingredient::new("yogurt").with_expiry(today - Duration::days(2)),
            Ingredient::new("spinach").with_expiry(today),
            Ingredient::new("cheese").with_expiry(today + Duration::days(3)),
            Ingredient::new("carrot").with_expiry(today + Duration::days(4)),
            Ingredient::new("egg"),
        ];

        assert_eq!(
            expiring_soon(&ingredients, today),
            vec!["milk".to_string(), "spinach".to_string(), "cheese".to_string()]
        );
    }

    #[test]
    fn test_badge_keys() {
        assert_eq!(UrgencyLevel::Critical.badge_key(), Some("urgency-critical"));
        assert_eq!(UrgencyLevel::Expired.badge_key(), Some("urgency-expired"));
        assert_eq!(UrgencyLevel::Good.badge_key(), None);
        assert_eq!(UrgencyLevel::None.badge_key(), None);
    }
}
