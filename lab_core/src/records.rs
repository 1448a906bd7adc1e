//! # Test Set Records
//!
//! Each form carries one to five test sets. A test set is an ordered list of
//! sample rows plus a fixed block of delivery and field information.
//!
//! ## Structure
//!
//! ```text
//! Vec<TestSet>
//! └── TestSet (index fixed at creation)
//!     ├── samples: Vec<Sample> (one empty row at creation, append-only)
//!     └── additional_info: AdditionalInfo (19 named fields)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lab_core::form::SetCount;
//! use lab_core::records::build_sets;
//!
//! let sets = build_sets(SetCount::new(3));
//! assert_eq!(sets.len(), 3);
//! assert!(sets.iter().all(|s| s.samples.len() == 1));
//! assert_eq!(sets[2].index(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::form::SetCount;

/// One cylinder (or cube) row as entered by the technician.
///
/// All values are kept as the text the user typed; nothing here is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Age at break, in days
    pub age: String,
    /// Maximum load, lbs
    pub load: String,
    /// Loaded area, sq.in
    pub area: String,
    /// Compressive strength, psi
    pub strength: String,
    /// Strength as a percentage of design strength
    pub percent_design: String,
    /// Fracture type (free text, e.g. "Type 3")
    pub fracture_type: String,
}

impl Sample {
    pub fn get(&self, field: SampleField) -> &str {
        match field {
            SampleField::Age => &self.age,
            SampleField::Load => &self.load,
            SampleField::Area => &self.area,
            SampleField::Strength => &self.strength,
            SampleField::PercentDesign => &self.percent_design,
            SampleField::FractureType => &self.fracture_type,
        }
    }

    pub fn set(&mut self, field: SampleField, value: impl Into<String>) {
        let slot = match field {
            SampleField::Age => &mut self.age,
            SampleField::Load => &mut self.load,
            SampleField::Area => &mut self.area,
            SampleField::Strength => &mut self.strength,
            SampleField::PercentDesign => &mut self.percent_design,
            SampleField::FractureType => &mut self.fracture_type,
        };
        *slot = value.into();
    }

    /// True when nothing has been entered on this row
    pub fn is_empty(&self) -> bool {
        SampleField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// Addressable sample columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleField {
    Age,
    Load,
    Area,
    Strength,
    PercentDesign,
    FractureType,
}

impl SampleField {
    /// Columns in table order
    pub const ALL: [SampleField; 6] = [
        SampleField::Age,
        SampleField::Load,
        SampleField::Area,
        SampleField::Strength,
        SampleField::PercentDesign,
        SampleField::FractureType,
    ];

    /// Column heading
    pub fn label(self) -> &'static str {
        match self {
            SampleField::Age => "Age (Days)",
            SampleField::Load => "Load (lbs)",
            SampleField::Area => "Area (Sq.In)",
            SampleField::Strength => "Strength (psi)",
            SampleField::PercentDesign => "% Design",
            SampleField::FractureType => "Fracture Type",
        }
    }
}

/// Delivery ticket and field-test information recorded once per test set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub supplier: String,
    pub truck: String,
    pub audit_no: String,
    pub design_no: String,
    pub product_no: String,
    pub batch_time: String,
    pub sample_time: String,
    /// Concrete temperature, °F
    pub concrete_temp: String,
    /// Ambient temperature, °F
    pub ambient_temp: String,
    /// Slump, in
    pub slump: String,
    /// Air content, %
    pub air_content: String,
    /// Unit weight, pcf
    pub unit_weight: String,
    pub field_cured: String,
    pub sample_type: String,
    pub sample_size: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub remarks: String,
    pub person_notified: String,
}

impl AdditionalInfo {
    pub fn get(&self, field: InfoField) -> &str {
        match field {
            InfoField::Supplier => &self.supplier,
            InfoField::Truck => &self.truck,
            InfoField::AuditNo => &self.audit_no,
            InfoField::DesignNo => &self.design_no,
            InfoField::ProductNo => &self.product_no,
            InfoField::BatchTime => &self.batch_time,
            InfoField::SampleTime => &self.sample_time,
            InfoField::ConcreteTemp => &self.concrete_temp,
            InfoField::AmbientTemp => &self.ambient_temp,
            InfoField::Slump => &self.slump,
            InfoField::AirContent => &self.air_content,
            InfoField::UnitWeight => &self.unit_weight,
            InfoField::FieldCured => &self.field_cured,
            InfoField::SampleType => &self.sample_type,
            InfoField::SampleSize => &self.sample_size,
            InfoField::ArrivalTime => &self.arrival_time,
            InfoField::DepartureTime => &self.departure_time,
            InfoField::Remarks => &self.remarks,
            InfoField::PersonNotified => &self.person_notified,
        }
    }

    pub fn set(&mut self, field: InfoField, value: impl Into<String>) {
        let slot = match field {
            InfoField::Supplier => &mut self.supplier,
            InfoField::Truck => &mut self.truck,
            InfoField::AuditNo => &mut self.audit_no,
            InfoField::DesignNo => &mut self.design_no,
            InfoField::ProductNo => &mut self.product_no,
            InfoField::BatchTime => &mut self.batch_time,
            InfoField::SampleTime => &mut self.sample_time,
            InfoField::ConcreteTemp => &mut self.concrete_temp,
            InfoField::AmbientTemp => &mut self.ambient_temp,
            InfoField::Slump => &mut self.slump,
            InfoField::AirContent => &mut self.air_content,
            InfoField::UnitWeight => &mut self.unit_weight,
            InfoField::FieldCured => &mut self.field_cured,
            InfoField::SampleType => &mut self.sample_type,
            InfoField::SampleSize => &mut self.sample_size,
            InfoField::ArrivalTime => &mut self.arrival_time,
            InfoField::DepartureTime => &mut self.departure_time,
            InfoField::Remarks => &mut self.remarks,
            InfoField::PersonNotified => &mut self.person_notified,
        };
        *slot = value.into();
    }

    /// Fields that have a value, in declaration order.
    pub fn filled(&self) -> impl Iterator<Item = (InfoField, &str)> + '_ {
        InfoField::ALL
            .iter()
            .map(move |f| (*f, self.get(*f)))
            .filter(|(_, v)| !v.is_empty())
    }
}

/// Addressable additional-information fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfoField {
    Supplier,
    Truck,
    AuditNo,
    DesignNo,
    ProductNo,
    BatchTime,
    SampleTime,
    ConcreteTemp,
    AmbientTemp,
    Slump,
    AirContent,
    UnitWeight,
    FieldCured,
    SampleType,
    SampleSize,
    ArrivalTime,
    DepartureTime,
    Remarks,
    PersonNotified,
}

impl InfoField {
    /// Fields in declaration order
    pub const ALL: [InfoField; 19] = [
        InfoField::Supplier,
        InfoField::Truck,
        InfoField::AuditNo,
        InfoField::DesignNo,
        InfoField::ProductNo,
        InfoField::BatchTime,
        InfoField::SampleTime,
        InfoField::ConcreteTemp,
        InfoField::AmbientTemp,
        InfoField::Slump,
        InfoField::AirContent,
        InfoField::UnitWeight,
        InfoField::FieldCured,
        InfoField::SampleType,
        InfoField::SampleSize,
        InfoField::ArrivalTime,
        InfoField::DepartureTime,
        InfoField::Remarks,
        InfoField::PersonNotified,
    ];

    /// JSON key of this field
    pub fn key(self) -> &'static str {
        match self {
            InfoField::Supplier => "supplier",
            InfoField::Truck => "truck",
            InfoField::AuditNo => "auditNo",
            InfoField::DesignNo => "designNo",
            InfoField::ProductNo => "productNo",
            InfoField::BatchTime => "batchTime",
            InfoField::SampleTime => "sampleTime",
            InfoField::ConcreteTemp => "concreteTemp",
            InfoField::AmbientTemp => "ambientTemp",
            InfoField::Slump => "slump",
            InfoField::AirContent => "airContent",
            InfoField::UnitWeight => "unitWeight",
            InfoField::FieldCured => "fieldCured",
            InfoField::SampleType => "sampleType",
            InfoField::SampleSize => "sampleSize",
            InfoField::ArrivalTime => "arrivalTime",
            InfoField::DepartureTime => "departureTime",
            InfoField::Remarks => "remarks",
            InfoField::PersonNotified => "personNotified",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            InfoField::Supplier => "Supplier",
            InfoField::Truck => "Truck",
            InfoField::AuditNo => "Audit No",
            InfoField::DesignNo => "Design No",
            InfoField::ProductNo => "Product No",
            InfoField::BatchTime => "Batch Time",
            InfoField::SampleTime => "Sample Time",
            InfoField::ConcreteTemp => "Concrete Temp (F)",
            InfoField::AmbientTemp => "Ambient Temp (F)",
            InfoField::Slump => "Slump (in)",
            InfoField::AirContent => "Air Content (%)",
            InfoField::UnitWeight => "Unit Weight (pcf)",
            InfoField::FieldCured => "Field Cured",
            InfoField::SampleType => "Sample Type",
            InfoField::SampleSize => "Sample Size",
            InfoField::ArrivalTime => "Arrival Time",
            InfoField::DepartureTime => "Departure Time",
            InfoField::Remarks => "Remarks",
            InfoField::PersonNotified => "Person Notified",
        }
    }
}

/// One group of samples taken from the same load of concrete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSet {
    index: usize,
    pub samples: Vec<Sample>,
    pub additional_info: AdditionalInfo,
}

impl TestSet {
    /// Create a set holding one empty sample row.
    pub fn new(index: usize) -> Self {
        TestSet {
            index,
            samples: vec![Sample::default()],
            additional_info: AdditionalInfo::default(),
        }
    }

    /// Zero-based position of this set on the form
    pub fn index(&self) -> usize {
        self.index
    }

    /// Append an empty sample row, returning its index.
    ///
    /// Existing rows keep their positions.
    pub fn add_sample(&mut self) -> usize {
        self.samples.push(Sample::default());
        self.samples.len() - 1
    }

    /// Copy of this set with one more empty sample row.
    pub fn with_added_sample(&self) -> TestSet {
        let mut next = self.clone();
        next.add_sample();
        next
    }
}

/// Build `count` fresh test sets, indexed `0..count`.
///
/// Callers replace their whole set list with the result whenever the count
/// changes, so any sample data entered before is dropped.
pub fn build_sets(count: SetCount) -> Vec<TestSet> {
    (0..count.get()).map(TestSet::new).collect()
}

/// Build test sets from the raw "Set Of" text (see [`SetCount::from_input`]).
pub fn build_sets_from_input(text: &str) -> Vec<TestSet> {
    build_sets(SetCount::from_input(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_build_sets_shape() {
        for n in 1..=5u8 {
            let sets = build_sets(SetCount::new(n));
            assert_eq!(sets.len(), usize::from(n));
            for (i, set) in sets.iter().enumerate() {
                assert_eq!(set.index(), i);
                assert_eq!(set.samples.len(), 1);
                assert!(set.samples[0].is_empty());
                assert_eq!(set.additional_info, AdditionalInfo::default());
                assert_eq!(set.additional_info.filled().count(), 0);
            }
        }
    }

    #[test]
    fn test_build_sets_fail_soft() {
        for input in ["", "x", "0", "-1", "-20", " "] {
            assert_eq!(build_sets_from_input(input), build_sets(SetCount::new(1)), "input {:?}", input);
        }
    }

    #[test]
    fn test_additional_info_keys_all_present() {
        let json = serde_json::to_value(AdditionalInfo::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), InfoField::ALL.len());
        for field in InfoField::ALL {
            assert_eq!(obj.get(field.key()), Some(&serde_json::Value::String(String::new())));
        }
    }

    #[test]
    fn test_add_sample_appends_empty_row() {
        let mut set = TestSet::new(0);
        set.samples[0].set(SampleField::Age, "7");

        let idx = set.add_sample();
        assert_eq!(idx, 1);
        assert_eq!(set.samples.len(), 2);
        assert_eq!(set.samples[0].age, "7");
        assert!(set.samples[1].is_empty());
    }

    #[test]
    fn test_with_added_sample_leaves_original() {
        let set = TestSet::new(2);
        let next = set.with_added_sample();
        assert_eq!(set.samples.len(), 1);
        assert_eq!(next.samples.len(), 2);
        assert_eq!(next.index(), 2);
    }

    #[test]
    fn test_sample_field_access() {
        let mut sample = Sample::default();
        for (i, field) in SampleField::ALL.iter().enumerate() {
            sample.set(*field, i.to_string());
        }
        for (i, field) in SampleField::ALL.iter().enumerate() {
            assert_eq!(sample.get(*field), i.to_string());
        }

        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"percentDesign\":\"4\""));
        assert!(json.contains("\"fractureType\":\"5\""));
    }

    #[test]
    fn test_info_filled_in_order() {
        let mut info = AdditionalInfo::default();
        info.set(InfoField::Slump, "4");
        info.set(InfoField::Supplier, "Acme Ready Mix");

        let filled: Vec<_> = info.filled().collect();
        assert_eq!(filled, vec![(InfoField::Supplier, "Acme Ready Mix"), (InfoField::Slump, "4")]);
    }

    #[test]
    fn test_test_set_serialization() {
        let set = TestSet::new(1);
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.contains("\"index\":1"));
        assert!(json.contains("\"additionalInfo\""));

        let roundtrip: TestSet = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, set);
    }

    proptest! {
        #[test]
        fn prop_count_matches_coerced_input(n in -50i64..50) {
            let sets = build_sets_from_input(&n.to_string());
            let expected = n.clamp(1, 5) as usize;
            prop_assert_eq!(sets.len(), expected);
        }

        #[test]
        fn prop_garbage_input_builds_one_set(s in "[a-zA-Z ]{0,12}") {
            prop_assert_eq!(build_sets_from_input(&s).len(), 1);
        }
    }
}
