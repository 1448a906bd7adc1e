//! # Submission Documents
//!
//! Turns a finished form session into the single JSON document that is
//! posted to the webhook. Delivery itself belongs to the host; this module
//! only builds the body and describes the outcome.
//!
//! ## Document shape
//!
//! ```text
//! {
//!   "client", "project", "reportNo", "technician", "castDate", "location", "setOf",
//!   "documentTitle":   "{client} - {project} - {reportNo}",
//!   "documentContent": plain-text report (see report module),
//!   "testSets": [ { "index", "samples": [ { "sampleId", "breakDate", "age", ... } ],
//!                   "additionalInfo": { ... } } ],
//!   "submissionId": UUID v4,
//!   "timestamp": RFC 3339 UTC
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lab_core::form::FormMetadata;
//! use lab_core::session::FormSession;
//! use lab_core::submission::assemble_now;
//!
//! let session = FormSession::with_metadata(FormMetadata::new("Acme", "Tower", "2024-01-30"));
//! let doc = assemble_now(&session)?;
//! assert_eq!(doc.document_title, "Acme - Tower - ");
//! let json = doc.to_json()?;
//! assert!(json.contains("\"sampleId\":\"AT-1-1\""));
//! # Ok::<(), lab_core::errors::LabError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::derived::projected_break_date;
use crate::errors::{LabError, LabResult};
use crate::form::FormMetadata;
use crate::records::{AdditionalInfo, Sample};
use crate::report::document_content;
use crate::session::FormSession;

/// The JSON body posted for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDocument {
    /// Header fields, flattened into the top level
    #[serde(flatten)]
    pub meta: FormMetadata,

    pub document_title: String,

    pub document_content: String,

    pub test_sets: Vec<SubmittedSet>,

    /// Unique per submission, lets the receiver spot duplicates
    pub submission_id: Uuid,

    pub timestamp: DateTime<Utc>,
}

/// A test set as submitted, with derived values echoed per sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedSet {
    pub index: usize,
    pub samples: Vec<SubmittedSample>,
    pub additional_info: AdditionalInfo,
}

/// A sample row as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedSample {
    pub sample_id: String,
    pub break_date: String,
    #[serde(flatten)]
    pub sample: Sample,
}

impl SubmissionDocument {
    /// Serialize as the request body.
    pub fn to_json(&self) -> LabResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize for display.
    pub fn to_json_pretty(&self) -> LabResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Title line used by the receiving side: `"{client} - {project} - {reportNo}"`.
pub fn document_title(meta: &FormMetadata) -> String {
    format!("{} - {} - {}", meta.client, meta.project, meta.report_no)
}

/// Build the submission document for a session at time `now`.
///
/// Fails only when a required header field is empty.
pub fn assemble(session: &FormSession, now: DateTime<Utc>) -> LabResult<SubmissionDocument> {
    session.meta.validate()?;

    let test_sets = session
        .sets()
        .iter()
        .map(|set| SubmittedSet {
            index: set.index(),
            samples: set
                .samples
                .iter()
                .enumerate()
                .map(|(sample_index, sample)| SubmittedSample {
                    sample_id: session.sample_id(set.index(), sample_index),
                    break_date: projected_break_date(session.meta.cast_date, &sample.age),
                    sample: sample.clone(),
                })
                .collect(),
            additional_info: set.additional_info.clone(),
        })
        .collect();

    let doc = SubmissionDocument {
        meta: session.meta.clone(),
        document_title: document_title(&session.meta),
        document_content: document_content(session),
        test_sets,
        submission_id: Uuid::new_v4(),
        timestamp: now,
    };

    info!(
        submission_id = %doc.submission_id,
        sets = doc.test_sets.len(),
        samples = session.sample_count(),
        "assembled submission"
    );
    Ok(doc)
}

/// [`assemble`] stamped with the current time.
pub fn assemble_now(session: &FormSession) -> LabResult<SubmissionDocument> {
    assemble(session, Utc::now())
}

/// What the user is told after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmissionOutcome {
    Succeeded,
    Failed { reason: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded)
    }

    /// Single-line notice for the user
    pub fn user_message(&self) -> String {
        match self {
            SubmissionOutcome::Succeeded => "Form submitted!".to_string(),
            SubmissionOutcome::Failed { reason } => format!("Submission failed: {}", reason),
        }
    }

    /// Convert into a result for `?`-style callers.
    pub fn into_result(self) -> LabResult<()> {
        match self {
            SubmissionOutcome::Succeeded => Ok(()),
            SubmissionOutcome::Failed { reason } => Err(LabError::transport_failed(reason)),
        }
    }
}
