//! # lab_core - Concrete Test Form Engine
//!
//! `lab_core` is the logic behind Breaksheet, a data-entry form for concrete
//! compressive-strength testing. A technician fills in client and project
//! details plus per-sample measurements. The form derives sample identifiers
//! and projected break dates and packages everything into one JSON document
//! for a webhook.
//!
//! ## Design Philosophy
//!
//! - **Pure**: No I/O; delivering the document is the host's job
//! - **JSON-First**: All records implement Serialize/Deserialize
//! - **Fail-Soft Inputs**: Bad set counts and ages fall back to defaults, never errors
//! - **Typed Fields**: Every form field is a named struct field with an addressing enum
//!
//! ## Quick Start
//!
//! ```rust
//! use lab_core::form::MetaField;
//! use lab_core::records::SampleField;
//! use lab_core::session::FormSession;
//! use lab_core::submission::assemble_now;
//!
//! let mut session = FormSession::new();
//! session.set_meta(MetaField::Client, "Acme");
//! session.set_meta(MetaField::Project, "Tower");
//! session.set_meta(MetaField::CastDate, "2024-12-30");
//! session.update_sample(0, 0, SampleField::Age, "5").unwrap();
//!
//! let rows = session.derived_rows();
//! assert_eq!(rows[0].sample_id, "AT-1-1");
//! assert_eq!(rows[0].break_date, "1/4/2025");
//!
//! let json = assemble_now(&session).unwrap().to_json().unwrap();
//! assert!(json.contains("\"documentTitle\":\"Acme - Tower - \""));
//! ```
//!
//! ## Modules
//!
//! - [`form`] - Header metadata and the set count
//! - [`records`] - Test sets, sample rows, additional information
//! - [`derived`] - Sample identifiers and projected break dates
//! - [`session`] - Index-addressed editing of one form
//! - [`report`] - Plain-text rendering of a form
//! - [`submission`] - JSON submission document and outcome
//! - [`config`] - Webhook destination
//! - [`errors`] - Structured error types

pub mod config;
pub mod derived;
pub mod errors;
pub mod form;
pub mod records;
pub mod report;
pub mod session;
pub mod submission;

// Re-export commonly used types at crate root for convenience
pub use config::WebhookConfig;
pub use derived::{projected_break_date, sample_identifier, IdScheme};
pub use errors::{LabError, LabResult};
pub use form::{FormMetadata, MetaField, SetCount};
pub use records::{build_sets, AdditionalInfo, InfoField, Sample, SampleField, TestSet};
pub use session::{DerivedRow, FormSession};
pub use submission::{assemble, SubmissionDocument, SubmissionOutcome};
