//! # Form Session
//!
//! The one piece of mutable state behind a form: header metadata plus the
//! test sets. Every edit is addressed by set index, sample index and field,
//! and touches only that value.
//!
//! Changing the set count rebuilds all test sets from scratch. Sample data
//! entered before the change is discarded, including the sets that would
//! have survived the resize.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::form::MetaField;
//! use lab_core::records::SampleField;
//! use lab_core::session::FormSession;
//!
//! let mut session = FormSession::new();
//! session.set_meta(MetaField::Client, "Acme");
//! session.set_meta(MetaField::Project, "Tower");
//! session.set_meta(MetaField::CastDate, "2024-01-30");
//! session.set_set_count("2");
//!
//! session.update_sample(1, 0, SampleField::Age, "7")?;
//! let rows = session.derived_rows();
//! assert_eq!(rows[1].sample_id, "AT-2-1");
//! assert_eq!(rows[1].break_date, "2/6/2024");
//! # Ok::<(), lab_core::errors::LabError>(())
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::derived::{projected_break_date, sample_identifier_with, IdScheme};
use crate::errors::{LabError, LabResult};
use crate::form::{FormMetadata, MetaField, SetCount};
use crate::records::{build_sets, InfoField, Sample, SampleField, TestSet};

/// Derived values for one rendered sample row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRow {
    pub set_index: usize,
    pub sample_index: usize,
    pub sample_id: String,
    /// `M/D/YYYY`, or empty when it cannot be projected yet
    pub break_date: String,
}

/// State of one form-filling session. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    /// Header fields
    pub meta: FormMetadata,

    sets: Vec<TestSet>,

    /// Identifier format for derived sample ids
    pub id_scheme: IdScheme,
}

impl FormSession {
    /// Start an empty form with a single test set.
    pub fn new() -> Self {
        let meta = FormMetadata::default();
        let sets = build_sets(meta.set_count);
        FormSession {
            meta,
            sets,
            id_scheme: IdScheme::default(),
        }
    }

    /// Start a form from already-entered header fields.
    pub fn with_metadata(meta: FormMetadata) -> Self {
        let sets = build_sets(meta.set_count);
        FormSession {
            meta,
            sets,
            id_scheme: IdScheme::default(),
        }
    }

    /// Test sets in form order
    pub fn sets(&self) -> &[TestSet] {
        &self.sets
    }

    /// Get one test set by index.
    pub fn set(&self, set_index: usize) -> LabResult<&TestSet> {
        let len = self.sets.len();
        self.sets
            .get(set_index)
            .ok_or_else(|| LabError::index_out_of_range("sets", set_index, len))
    }

    fn set_mut(&mut self, set_index: usize) -> LabResult<&mut TestSet> {
        let len = self.sets.len();
        self.sets
            .get_mut(set_index)
            .ok_or_else(|| LabError::index_out_of_range("sets", set_index, len))
    }

    /// Get one sample row.
    pub fn sample(&self, set_index: usize, sample_index: usize) -> LabResult<&Sample> {
        let set = self.set(set_index)?;
        set.samples
            .get(sample_index)
            .ok_or_else(|| LabError::index_out_of_range("samples", sample_index, set.samples.len()))
    }

    /// Edit a header field.
    ///
    /// `SetOf` is routed through [`FormSession::set_set_count`].
    pub fn set_meta(&mut self, field: MetaField, value: impl Into<String>) {
        let value = value.into();
        if field == MetaField::SetOf {
            self.set_set_count(&value);
        } else {
            self.meta.set(field, value);
        }
    }

    /// Change the number of test sets from user text.
    ///
    /// Returns `true` when the count changed and the sets were rebuilt. An
    /// unchanged count keeps existing edits.
    pub fn set_set_count(&mut self, text: &str) -> bool {
        let count = SetCount::from_input(text);
        if count == self.meta.set_count {
            return false;
        }

        debug!(from = %self.meta.set_count, to = %count, "rebuilding test sets");
        self.meta.set_count = count;
        self.sets = build_sets(count);
        true
    }

    /// Append an empty sample row to one set, returning the new row's index.
    pub fn add_sample(&mut self, set_index: usize) -> LabResult<usize> {
        let sample_index = self.set_mut(set_index)?.add_sample();
        debug!(set_index, sample_index, "added sample row");
        Ok(sample_index)
    }

    /// Replace one field of one sample row.
    pub fn update_sample(
        &mut self,
        set_index: usize,
        sample_index: usize,
        field: SampleField,
        value: impl Into<String>,
    ) -> LabResult<()> {
        let set = self.set_mut(set_index)?;
        let len = set.samples.len();
        let sample = set
            .samples
            .get_mut(sample_index)
            .ok_or_else(|| LabError::index_out_of_range("samples", sample_index, len))?;
        sample.set(field, value);
        Ok(())
    }

    /// Replace one additional-information field of one set.
    pub fn update_info(&mut self, set_index: usize, field: InfoField, value: impl Into<String>) -> LabResult<()> {
        self.set_mut(set_index)?.additional_info.set(field, value);
        Ok(())
    }

    /// Identifier of one sample row.
    pub fn sample_id(&self, set_index: usize, sample_index: usize) -> String {
        sample_identifier_with(
            self.id_scheme,
            &self.meta.client,
            &self.meta.project,
            set_index,
            sample_index,
        )
    }

    /// Projected break date of one sample row.
    pub fn break_date_for(&self, set_index: usize, sample_index: usize) -> LabResult<String> {
        let sample = self.sample(set_index, sample_index)?;
        Ok(projected_break_date(self.meta.cast_date, &sample.age))
    }

    /// Derived values for every sample row, in form order.
    pub fn derived_rows(&self) -> Vec<DerivedRow> {
        self.sets
            .iter()
            .enumerate()
            .flat_map(|(set_index, set)| {
                set.samples.iter().enumerate().map(move |(sample_index, sample)| DerivedRow {
                    set_index,
                    sample_index,
                    sample_id: self.sample_id(set_index, sample_index),
                    break_date: projected_break_date(self.meta.cast_date, &sample.age),
                })
            })
            .collect()
    }

    /// Total number of sample rows across all sets
    pub fn sample_count(&self) -> usize {
        self.sets.iter().map(|s| s.samples.len()).sum()
    }
}

impl Default for FormSession {
    fn default() -> Self {
        FormSession::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_session() -> FormSession {
        let mut session = FormSession::with_metadata(FormMetadata::new("Acme", "Tower", "2024-01-30"));
        session.set_set_count("3");
        session
    }

    #[test]
    fn test_new_session() {
        let session = FormSession::new();
        assert_eq!(session.sets().len(), 1);
        assert_eq!(session.sample_count(), 1);
        assert_eq!(session.id_scheme, IdScheme::Standard);
    }

    #[test]
    fn test_add_sample_only_touches_target_set() {
        let mut session = filled_session();
        session.update_sample(0, 0, SampleField::Age, "7").unwrap();
        let before = session.sets().to_vec();

        let idx = session.add_sample(1).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(session.sets()[1].samples.len(), 2);
        assert!(session.sets()[1].samples[1].is_empty());
        assert_eq!(session.sets()[0], before[0]);
        assert_eq!(session.sets()[2], before[2]);
        assert_eq!(session.sets()[1].samples[0], before[1].samples[0]);
    }

    #[test]
    fn test_add_sample_bad_index() {
        let mut session = filled_session();
        assert_eq!(session.add_sample(3), Err(LabError::index_out_of_range("sets", 3, 3)));
    }

    #[test]
    fn test_update_sample_touches_single_field() {
        let mut session = filled_session();
        session.add_sample(0).unwrap();
        session.update_sample(0, 1, SampleField::Strength, "4210").unwrap();

        let sample = session.sample(0, 1).unwrap();
        assert_eq!(sample.strength, "4210");
        assert_eq!(sample.age, "");
        assert!(session.sample(0, 0).unwrap().is_empty());
        assert!(session.sample(1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_update_sample_bad_indices() {
        let mut session = filled_session();
        assert_eq!(
            session.update_sample(0, 5, SampleField::Age, "7"),
            Err(LabError::index_out_of_range("samples", 5, 1))
        );
        assert!(session.update_sample(9, 0, SampleField::Age, "7").is_err());
    }

    #[test]
    fn test_update_info() {
        let mut session = filled_session();
        session.update_info(2, InfoField::Truck, "T-114").unwrap();
        assert_eq!(session.sets()[2].additional_info.truck, "T-114");
        assert_eq!(session.sets()[0].additional_info.truck, "");
        assert!(session.update_info(3, InfoField::Truck, "x").is_err());
    }

    #[test]
    fn test_set_count_change_resets_edits() {
        let mut session = filled_session();
        session.update_sample(0, 0, SampleField::Age, "7").unwrap();
        session.update_sample(1, 0, SampleField::Load, "52000").unwrap();
        session.add_sample(1).unwrap();

        assert!(session.set_set_count("2"));
        assert!(session.set_set_count("3"));

        assert_eq!(session.sets().len(), 3);
        assert_eq!(session.sets().to_vec(), build_sets(SetCount::new(3)));
    }

    #[test]
    fn test_same_set_count_keeps_edits() {
        let mut session = filled_session();
        session.update_sample(0, 0, SampleField::Age, "7").unwrap();

        assert!(!session.set_set_count("3"));
        assert!(!session.set_set_count("3.0"));
        assert_eq!(session.sample(0, 0).unwrap().age, "7");
    }

    #[test]
    fn test_set_meta_set_of_rebuilds() {
        let mut session = FormSession::new();
        session.set_meta(MetaField::SetOf, "4");
        assert_eq!(session.meta.set_count.get(), 4);
        assert_eq!(session.sets().len(), 4);

        session.set_meta(MetaField::SetOf, "junk");
        assert_eq!(session.sets().len(), 1);
    }

    #[test]
    fn test_derived_rows_follow_inputs() {
        let mut session = filled_session();
        session.add_sample(0).unwrap();
        session.update_sample(0, 0, SampleField::Age, "3").unwrap();
        session.update_sample(0, 1, SampleField::Age, "28").unwrap();

        let rows = session.derived_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].sample_id, "AT-1-1");
        assert_eq!(rows[0].break_date, "2/2/2024");
        assert_eq!(rows[1].sample_id, "AT-1-2");
        assert_eq!(rows[1].break_date, "2/27/2024");
        assert_eq!(rows[2].sample_id, "AT-2-1");
        assert_eq!(rows[2].break_date, "");
        assert_eq!(rows[3].sample_id, "AT-3-1");

        session.set_meta(MetaField::Client, "Baker");
        session.set_meta(MetaField::CastDate, "");
        let rows = session.derived_rows();
        assert_eq!(rows[0].sample_id, "BT-1-1");
        assert_eq!(rows[0].break_date, "");
    }

    #[test]
    fn test_legacy_scheme() {
        let mut session = filled_session();
        session.id_scheme = IdScheme::Legacy;
        assert_eq!(session.sample_id(1, 2), "at-13");
    }

    #[test]
    fn test_break_date_for() {
        let mut session = filled_session();
        session.update_sample(2, 0, SampleField::Age, "7").unwrap();
        assert_eq!(session.break_date_for(2, 0).unwrap(), "2/6/2024");
        assert!(session.break_date_for(2, 1).is_err());
    }
}
