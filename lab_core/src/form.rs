//! # Form Metadata
//!
//! The header of a test form: who the client is, which project and report the
//! samples belong to, when the concrete was cast, and how many test sets
//! the report carries.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::form::{FormMetadata, SetCount};
//!
//! let meta = FormMetadata::new("Acme Ready Mix", "Tower B", "2024-01-30");
//! assert!(meta.cast_date.is_some());
//! assert_eq!(meta.set_count, SetCount::default());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{LabError, LabResult};

/// Smallest number of test sets a form carries
pub const MIN_SETS: u8 = 1;

/// Largest number of test sets a form carries
pub const MAX_SETS: u8 = 5;

/// Number of test sets on a form, always within `MIN_SETS..=MAX_SETS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SetCount(u8);

impl SetCount {
    /// Create a set count, clamping into the supported range.
    pub fn new(count: u8) -> Self {
        SetCount(count.clamp(MIN_SETS, MAX_SETS))
    }

    /// Coerce user text into a set count.
    ///
    /// Leading integer digits are used (`"3.7"` reads as 3). Unparsable,
    /// zero and negative input all fall back to 1; anything above the
    /// maximum clamps to it.
    ///
    /// ```rust
    /// use lab_core::form::SetCount;
    ///
    /// assert_eq!(SetCount::from_input("3").get(), 3);
    /// assert_eq!(SetCount::from_input("abc").get(), 1);
    /// assert_eq!(SetCount::from_input("-2").get(), 1);
    /// assert_eq!(SetCount::from_input("9").get(), 5);
    /// ```
    pub fn from_input(text: &str) -> Self {
        match leading_integer(text) {
            Some(n) if n >= 1 => SetCount(n.min(i64::from(MAX_SETS)) as u8),
            _ => SetCount(MIN_SETS),
        }
    }

    /// The count as a plain number
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for SetCount {
    fn default() -> Self {
        SetCount(MIN_SETS)
    }
}

impl TryFrom<u8> for SetCount {
    type Error = LabError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_SETS..=MAX_SETS).contains(&value) {
            Ok(SetCount(value))
        } else {
            Err(LabError::invalid_input(
                "setOf",
                value.to_string(),
                format!("Set count must be between {} and {}", MIN_SETS, MAX_SETS),
            ))
        }
    }
}

impl From<SetCount> for u8 {
    fn from(count: SetCount) -> Self {
        count.0
    }
}

impl std::fmt::Display for SetCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read the integer at the start of `text`, ignoring surrounding whitespace.
///
/// Mirrors how a browser number field is read: an optional sign, then digits,
/// stopping at the first non-digit. Returns `None` when no digit is present.
/// Overlong digit runs saturate.
pub(crate) fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a cast date as entered on the form.
///
/// Accepts ISO `YYYY-MM-DD` (what a date picker produces) and `M/D/YYYY`.
/// Anything else, including an empty field, is treated as unset.
pub fn parse_cast_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .ok()
}

/// Header fields of one form-filling session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadata {
    /// Client name
    pub client: String,

    /// Project name
    pub project: String,

    /// Lab report number
    pub report_no: String,

    /// Field technician who cast the samples
    pub technician: String,

    /// Calendar date the concrete was cast (timezone-naive)
    pub cast_date: Option<NaiveDate>,

    /// Placement location on site
    pub location: String,

    /// Number of test sets
    #[serde(rename = "setOf")]
    pub set_count: SetCount,
}

impl FormMetadata {
    /// Create metadata with the fields needed to derive identifiers and dates.
    pub fn new(client: impl Into<String>, project: impl Into<String>, cast_date: &str) -> Self {
        FormMetadata {
            client: client.into(),
            project: project.into(),
            cast_date: parse_cast_date(cast_date),
            ..FormMetadata::default()
        }
    }

    /// Read a field as the text shown on the form.
    pub fn get(&self, field: MetaField) -> String {
        match field {
            MetaField::Client => self.client.clone(),
            MetaField::Project => self.project.clone(),
            MetaField::ReportNo => self.report_no.clone(),
            MetaField::Technician => self.technician.clone(),
            MetaField::CastDate => self
                .cast_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            MetaField::Location => self.location.clone(),
            MetaField::SetOf => self.set_count.to_string(),
        }
    }

    /// Replace a single field from user text.
    ///
    /// Setting `SetOf` here only records the count; rebuilding the test sets
    /// is the session's job (see [`crate::session::FormSession::set_set_count`]).
    pub fn set(&mut self, field: MetaField, value: impl Into<String>) {
        let value = value.into();
        match field {
            MetaField::Client => self.client = value,
            MetaField::Project => self.project = value,
            MetaField::ReportNo => self.report_no = value,
            MetaField::Technician => self.technician = value,
            MetaField::CastDate => self.cast_date = parse_cast_date(&value),
            MetaField::Location => self.location = value,
            MetaField::SetOf => self.set_count = SetCount::from_input(&value),
        }
    }

    /// Check that the required fields are filled in.
    ///
    /// Only emptiness is checked: client, project and cast date are required.
    pub fn validate(&self) -> LabResult<()> {
        if self.client.trim().is_empty() {
            return Err(LabError::missing_field("client"));
        }
        if self.project.trim().is_empty() {
            return Err(LabError::missing_field("project"));
        }
        if self.cast_date.is_none() {
            return Err(LabError::missing_field("castDate"));
        }
        Ok(())
    }
}

/// Addressable header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaField {
    Client,
    Project,
    ReportNo,
    Technician,
    CastDate,
    Location,
    SetOf,
}

impl MetaField {
    /// All header fields in form order
    pub const ALL: [MetaField; 7] = [
        MetaField::Client,
        MetaField::Project,
        MetaField::CastDate,
        MetaField::Location,
        MetaField::ReportNo,
        MetaField::Technician,
        MetaField::SetOf,
    ];

    /// Form label
    pub fn label(self) -> &'static str {
        match self {
            MetaField::Client => "Client",
            MetaField::Project => "Project",
            MetaField::ReportNo => "Report No",
            MetaField::Technician => "Technician",
            MetaField::CastDate => "Cast Date",
            MetaField::Location => "Location",
            MetaField::SetOf => "Set Of",
        }
    }

    /// Whether the form refuses to submit while this field is empty
    pub fn is_required(self) -> bool {
        matches!(self, MetaField::Client | MetaField::Project | MetaField::CastDate)
    }
}
