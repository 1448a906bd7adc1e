//! # Derived Fields
//!
//! Values shown next to each sample row but never stored: the sample
//! identifier and the projected break date. Both are pure functions of the
//! form header and the row's position and age, recomputed whenever a row is
//! displayed or submitted.
//!
//! ## Sample identifiers
//!
//! `{client initial}{project initial}-{set}-{sample}`, with 1-based set and
//! sample numbers and upper-cased initials. Missing names fall back to `C`
//! and `P`.
//!
//! The first release of the form numbered samples with one flattened counter
//! (`set * 10 + sample + 1`) and lower-cased initials. [`IdScheme::Legacy`]
//! reproduces that format so older reports can be matched up.
//!
//! ## Break dates
//!
//! Cast dates are calendar dates with no time zone attached, so adding the
//! age is plain calendar arithmetic on [`NaiveDate`]. There is no midnight
//! instant that could shift to a neighboring day.
//!
//! ```rust
//! use lab_core::derived::{projected_break_date_from_text, sample_identifier};
//!
//! assert_eq!(sample_identifier("Acme", "Tower", 0, 0), "AT-1-1");
//! assert_eq!(projected_break_date_from_text("2024-01-30", "28"), "2/27/2024");
//! assert_eq!(projected_break_date_from_text("2024-01-30", ""), "");
//! ```

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::form::{leading_integer, parse_cast_date};

/// Initial used when the client name is empty
pub const DEFAULT_CLIENT_INITIAL: char = 'C';

/// Initial used when the project name is empty
pub const DEFAULT_PROJECT_INITIAL: char = 'P';

/// Sample identifier format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdScheme {
    /// `AT-2-3`: upper-cased initials, set and sample numbered separately
    #[default]
    Standard,
    /// `at-13`: lower-cased initials, one counter of `set * 10 + sample + 1`
    Legacy,
}

/// Sample identifier in the standard format.
pub fn sample_identifier(client: &str, project: &str, set_index: usize, sample_index: usize) -> String {
    sample_identifier_with(IdScheme::Standard, client, project, set_index, sample_index)
}

/// Sample identifier in the given format.
///
/// Never fails; empty or whitespace-only names use the default initials.
pub fn sample_identifier_with(
    scheme: IdScheme,
    client: &str,
    project: &str,
    set_index: usize,
    sample_index: usize,
) -> String {
    let client_initial = initial(client, DEFAULT_CLIENT_INITIAL);
    let project_initial = initial(project, DEFAULT_PROJECT_INITIAL);

    match scheme {
        IdScheme::Standard => format!(
            "{}{}-{}-{}",
            upper(client_initial),
            upper(project_initial),
            set_index + 1,
            sample_index + 1
        ),
        IdScheme::Legacy => format!(
            "{}{}-{}",
            lower(client_initial),
            lower(project_initial),
            set_index * 10 + sample_index + 1
        ),
    }
}

fn initial(name: &str, default: char) -> char {
    name.trim_start().chars().next().unwrap_or(default)
}

// Case mappings can expand ('ß' upper-cases to "SS"); an initial stays one char.
fn upper(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

fn lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Read a sample age in whole days.
///
/// Fractions truncate (`"7.5"` is 7). Returns `None` when the text does not
/// start with a number.
pub fn parse_age_days(text: &str) -> Option<i64> {
    leading_integer(text)
}

/// Add `age_days` calendar days to the cast date.
///
/// Zero gives the cast date itself. Negative ages and dates past the
/// representable range give `None`.
pub fn break_date(cast_date: NaiveDate, age_days: i64) -> Option<NaiveDate> {
    let days = u64::try_from(age_days).ok()?;
    cast_date.checked_add_days(Days::new(days))
}

/// Render a date as `M/D/YYYY`.
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Projected break date for display, or an empty string.
///
/// The empty string stands in for "not yet known": no cast date, an age that
/// is not a number, or a negative age.
pub fn projected_break_date(cast_date: Option<NaiveDate>, age_text: &str) -> String {
    cast_date
        .zip(parse_age_days(age_text))
        .and_then(|(cast, age)| break_date(cast, age))
        .map(format_short_date)
        .unwrap_or_default()
}

/// Same as [`projected_break_date`] with the cast date still as form text.
pub fn projected_break_date_from_text(cast_text: &str, age_text: &str) -> String {
    projected_break_date(parse_cast_date(cast_text), age_text)
}
