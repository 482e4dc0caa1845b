//! Validation module for user input
//!
//! Validation functions return `Err` with the localization key of the message
//! to show to the user, so handlers can pass the error straight to `t_lang`:
//!
//! - Expiry dates typed in reply to the "set expiry" prompt
//! - Allergy / excluded food text
//! - Downloaded image sizes

use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

/// Maximum number of characters accepted for the allergy text
pub const MAX_ALLERGIES_LENGTH: usize = 200;

lazy_static! {
    static ref ISO_DATE: Regex =
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("Invalid ISO date regex pattern");
    static ref DAY_FIRST_DATE: Regex = Regex::new(r"^(\d{1,2})[./](\d{1,2})[./](\d{4})$")
        .expect("Invalid day-first date regex pattern");
}

/// Parse an expiry date typed by the user
///
/// # Arguments
/// * `input` - The raw text sent by the user
/// * `today` - The date used to resolve "today" and "tomorrow"
///
/// # Returns
/// * `Ok(NaiveDate)` - The parsed calendar date
/// * `Err(&str)` - Error key: "expiry-invalid"
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use fridge_lens::validation::parse_expiry_date;
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
/// assert_eq!(parse_expiry_date("2025-06-30", today), NaiveDate::from_ymd_opt(2025, 6, 30).ok_or("expiry-invalid"));
/// assert_eq!(parse_expiry_date("30.06.2025", today), NaiveDate::from_ymd_opt(2025, 6, 30).ok_or("expiry-invalid"));
/// assert_eq!(parse_expiry_date("yarın", today), NaiveDate::from_ymd_opt(2025, 6, 16).ok_or("expiry-invalid"));
/// assert_eq!(parse_expiry_date("31.02.2025", today), Err("expiry-invalid"));
/// ```
pub fn parse_expiry_date(input: &str, today: NaiveDate) -> Result<NaiveDate, &'static str> {
    let trimmed = input.trim();

    match trimmed.to_lowercase().as_str() {
        "today" | "bugün" | "bugun" => return Ok(today),
        "tomorrow" | "yarın" | "yarin" => return Ok(today + Duration::days(1)),
        _ => {}
    }

    let date = if let Some(caps) = ISO_DATE.captures(trimmed) {
        ymd(&caps[1], &caps[2], &caps[3])
    } else if let Some(caps) = DAY_FIRST_DATE.captures(trimmed) {
        ymd(&caps[3], &caps[2], &caps[1])
    } else {
        None
    };

    date.ok_or("expiry-invalid")
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Whether the reply asks to clear the stored value instead of setting one
///
/// # Examples
/// ```
/// use fridge_lens::validation::is_clear_input;
///
/// assert!(is_clear_input(" - "));
/// assert!(!is_clear_input("2025-06-30"));
/// ```
pub fn is_clear_input(input: &str) -> bool {
    input.trim() == "-"
}

/// Validate the allergy / excluded food text
///
/// # Arguments
/// * `input` - The text to validate
///
/// # Returns
/// * `Ok(String)` - The trimmed text (empty means no allergies)
/// * `Err(&str)` - Error key: "allergies-too-long"
///
/// # Examples
/// ```
/// use fridge_lens::validation::validate_allergies;
///
/// assert_eq!(validate_allergies("  peanuts, milk "), Ok("peanuts, milk".to_string()));
/// assert_eq!(validate_allergies(&"a".repeat(201)), Err("allergies-too-long"));
/// ```
pub fn validate_allergies(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if trimmed.chars().count() > MAX_ALLERGIES_LENGTH {
        return Err("allergies-too-long");
    }

    Ok(trimmed.to_string())
}

/// Validate the size of a downloaded image
///
/// # Returns
/// * `Ok(())` - The image size is acceptable
/// * `Err(&str)` - Error key: "error-image-unreadable" or "error-file-too-large"
pub fn validate_image_size(size: u64, max_size: u64) -> Result<(), &'static str> {
    if size == 0 {
        return Err("error-image-unreadable");
    }

    if size > max_size {
        return Err("error-file-too-large");
    }

    Ok(())
}
