//! # Report Text
//!
//! Plain-text rendering of a form, sent alongside the structured data so the
//! receiving side can drop it straight into a document or an email.

use std::fmt::Write;

use crate::derived::projected_break_date;
use crate::records::{SampleField, TestSet};
use crate::session::FormSession;

/// Render the whole form as a tab-separated text block.
///
/// Optional header lines and empty additional-information fields are
/// left out.
///
/// ```rust
/// use lab_core::form::FormMetadata;
/// use lab_core::report::document_content;
/// use lab_core::session::FormSession;
///
/// let session = FormSession::with_metadata(FormMetadata::new("Acme", "Tower", "2024-01-30"));
/// let text = document_content(&session);
/// assert!(text.starts_with("Project: Tower\nClient: Acme\n"));
/// assert!(text.contains("Test Data Set 1:"));
/// ```
pub fn document_content(session: &FormSession) -> String {
    let meta = &session.meta;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Project: {}", meta.project);
    let _ = writeln!(out, "Client: {}", meta.client);
    if let Some(cast) = meta.cast_date {
        let _ = writeln!(out, "Cast Date: {}", cast.format("%Y-%m-%d"));
    }
    optional_line(&mut out, "Location", &meta.location);
    optional_line(&mut out, "Report No", &meta.report_no);
    optional_line(&mut out, "Technician", &meta.technician);
    let _ = writeln!(out, "Set Of: {}", meta.set_count);
    out.push('\n');

    for set in session.sets() {
        write_set(&mut out, session, set);
    }

    out
}

fn optional_line(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "{}: {}", label, value);
    }
}

fn write_set(out: &mut String, session: &FormSession, set: &TestSet) {
    let set_index = set.index();
    let _ = writeln!(out, "Test Data Set {}:", set_index + 1);

    let columns: Vec<&str> = SampleField::ALL.iter().map(|f| f.label()).collect();
    let _ = writeln!(out, "Sample Number\tBreak Date\t{}", columns.join("\t"));

    for (sample_index, sample) in set.samples.iter().enumerate() {
        let values: Vec<&str> = SampleField::ALL.iter().map(|f| sample.get(*f)).collect();
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            session.sample_id(set_index, sample_index),
            projected_break_date(session.meta.cast_date, &sample.age),
            values.join("\t")
        );
    }

    out.push_str("\nAdditional Information:\n");
    for (field, value) in set.additional_info.filled() {
        let _ = writeln!(out, "{}: {}", field.label(), value);
    }
    out.push('\n');
}
