//! Interactive form filling on the terminal.
//!
//! Reads from any `BufRead` and writes prompts to any `Write`, so the whole
//! flow runs against in-memory buffers in tests. End of input counts as
//! a blank answer, except for required header fields, which are asked
//! again until they hold a usable value.

use std::io::{self, BufRead, Write};

use lab_core::derived::IdScheme;
use lab_core::errors::LabError;
use lab_core::form::{parse_cast_date, MetaField, MAX_SETS, MIN_SETS};
use lab_core::records::{InfoField, SampleField};
use lab_core::session::FormSession;

/// Read one trimmed answer; `None` at end of input.
fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    Ok(read_answer(input, output, prompt)?.unwrap_or_default())
}

fn prompt_yes<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<bool> {
    let answer = prompt_line(input, output, prompt)?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Ask for a header field, repeating until a required field is usable.
///
/// Running out of input while a required field is still empty is an
/// `UnexpectedEof` error.
fn prompt_meta<R: BufRead, W: Write>(input: &mut R, output: &mut W, field: MetaField) -> io::Result<String> {
    let hint = match field {
        MetaField::CastDate => " (YYYY-MM-DD)",
        _ => "",
    };
    let marker = if field.is_required() { "*" } else { "" };
    let prompt = format!("{}{}{}: ", field.label(), marker, hint);

    loop {
        let value = match read_answer(input, output, &prompt)? {
            Some(v) => v,
            None if field.is_required() => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("input ended before '{}' was entered", field.label()),
                ))
            }
            None => return Ok(String::new()),
        };

        if !field.is_required() {
            return Ok(value);
        }
        if value.is_empty() {
            writeln!(output, "  {} is required.", field.label())?;
        } else if field == MetaField::CastDate && parse_cast_date(&value).is_none() {
            writeln!(output, "  '{}' is not a date; use YYYY-MM-DD or M/D/YYYY.", value)?;
        } else {
            return Ok(value);
        }
    }
}

fn to_io(err: LabError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

/// Walk the technician through one form and return the filled session.
pub fn fill_session<R: BufRead, W: Write>(input: &mut R, output: &mut W, id_scheme: IdScheme) -> io::Result<FormSession> {
    let mut session = FormSession::new();
    session.id_scheme = id_scheme;

    writeln!(output, "Project Information")?;
    for field in MetaField::ALL {
        if field == MetaField::SetOf {
            continue;
        }
        let value = prompt_meta(input, output, field)?;
        session.set_meta(field, value);
    }

    let count = prompt_line(input, output, &format!("Set Of ({}-{}) [1]: ", MIN_SETS, MAX_SETS))?;
    session.set_set_count(&count);

    for set_index in 0..session.sets().len() {
        writeln!(output)?;
        writeln!(output, "Test Set {}", set_index + 1)?;
        fill_samples(input, output, &mut session, set_index)?;

        if prompt_yes(input, output, "Enter additional information? [y/N]: ")? {
            for field in InfoField::ALL {
                let value = prompt_line(input, output, &format!("  {}: ", field.label()))?;
                if !value.is_empty() {
                    session.update_info(set_index, field, value).map_err(to_io)?;
                }
            }
        }
    }

    Ok(session)
}

fn fill_samples<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    session: &mut FormSession,
    set_index: usize,
) -> io::Result<()> {
    let mut sample_index = 0;
    loop {
        let sample_id = session.sample_id(set_index, sample_index);
        let age = prompt_line(
            input,
            output,
            &format!("  {} {} (blank to finish): ", sample_id, SampleField::Age.label()),
        )?;
        if age.is_empty() {
            return Ok(());
        }

        if sample_index > 0 {
            session.add_sample(set_index).map_err(to_io)?;
        }
        session
            .update_sample(set_index, sample_index, SampleField::Age, age)
            .map_err(to_io)?;

        for field in SampleField::ALL.into_iter().skip(1) {
            let value = prompt_line(input, output, &format!("  {} {}: ", sample_id, field.label()))?;
            session
                .update_sample(set_index, sample_index, field, value)
                .map_err(to_io)?;
        }

        if let Ok(date) = session.break_date_for(set_index, sample_index) {
            if !date.is_empty() {
                writeln!(output, "  {} breaks on {}", sample_id, date)?;
            }
        }
        sample_index += 1;
    }
}

/// Print the derived sample table.
pub fn print_summary<W: Write>(output: &mut W, session: &FormSession) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "═══════════════════════════════════════")?;
    writeln!(output, "  SAMPLES")?;
    writeln!(output, "═══════════════════════════════════════")?;
    writeln!(output, "{:<12} {:<12} {:>6} {:>10}", "Sample", "Break Date", "Age", "Strength")?;

    for row in session.derived_rows() {
        let (age, strength) = match session.sample(row.set_index, row.sample_index) {
            Ok(sample) => (sample.age.as_str(), sample.strength.as_str()),
            Err(_) => ("", ""),
        };
        let date = if row.break_date.is_empty() { "-" } else { row.break_date.as_str() };
        writeln!(output, "{:<12} {:<12} {:>6} {:>10}", row.sample_id, date, age, strength)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> (FormSession, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let session = fill_session(&mut input, &mut output, IdScheme::Standard).unwrap();
        (session, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_fill_two_sets() {
        // client, project, cast date, location, report no, technician, set of
        let header = "Acme\nTower\n2024-01-30\nLevel 3\nR-17\nJ. Ortiz\n2\n";
        // set 1: two samples, then blank; skip info
        let set1 = "7\n61200\n28.27\n2165\n54\nType 3\n28\n\n\n\n\n\n\nn\n";
        // set 2: no samples; enter info with supplier only
        let set2 = format!("\ny\nAcme Ready Mix{}", "\n".repeat(19));
        let (session, out) = run(&format!("{}{}{}", header, set1, set2));

        assert_eq!(session.meta.client, "Acme");
        assert_eq!(session.meta.report_no, "R-17");
        assert_eq!(session.sets().len(), 2);

        let set = &session.sets()[0];
        assert_eq!(set.samples.len(), 2);
        assert_eq!(set.samples[0].load, "61200");
        assert_eq!(set.samples[0].fracture_type, "Type 3");
        assert_eq!(set.samples[1].age, "28");
        assert_eq!(set.samples[1].load, "");

        assert_eq!(session.sets()[1].samples.len(), 1);
        assert!(session.sets()[1].samples[0].is_empty());
        assert_eq!(session.sets()[1].additional_info.supplier, "Acme Ready Mix");

        assert!(out.contains("AT-1-1 breaks on 2/6/2024"));
        assert!(out.contains("AT-1-2 breaks on 2/27/2024"));
    }

    #[test]
    fn test_bad_cast_date_is_asked_again() {
        let header = "Acme\nTower\n1/30/24x\n2024-01-30\n\n\n\n1\n";
        let set1 = "7\n61200\n\n\n\n\n\nn\n";
        let (session, out) = run(&format!("{}{}", header, set1));

        assert_eq!(session.meta.get(MetaField::CastDate), "2024-01-30");
        assert_eq!(session.sets()[0].samples[0].load, "61200");
        assert_eq!(out.matches("Cast Date*").count(), 2);
        assert!(out.contains("'1/30/24x' is not a date"));
        assert!(lab_core::submission::assemble_now(&session).is_ok());
    }

    #[test]
    fn test_blank_required_fields_are_asked_again() {
        let (session, out) = run("\n  \nAcme\n\nTower\n2024-01-30\n\n\n\n\n\nn\n");
        assert_eq!(session.meta.client, "Acme");
        assert_eq!(session.meta.project, "Tower");
        assert_eq!(out.matches("Client is required.").count(), 2);
        assert_eq!(out.matches("Project is required.").count(), 1);
    }

    #[test]
    fn test_optional_fields_accept_blank() {
        let (session, out) = run("Acme\nTower\n2024-01-30\n\n\n\n\n\nn\n");
        assert_eq!(session.meta.location, "");
        assert_eq!(session.meta.technician, "");
        assert!(!out.contains("is required"));
    }

    #[test]
    fn test_input_ending_before_required_field_fails() {
        let mut input = Cursor::new(b"Acme\nTower\n".to_vec());
        let mut output = Vec::new();
        let err = fill_session(&mut input, &mut output, IdScheme::Standard).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_summary_lists_every_row() {
        let (session, _) = run("Acme\nTower\n2024-12-30\n\n\n\n1\n5\n\n\n4480\n\n\n\nn\n");
        let mut out = Vec::new();
        print_summary(&mut out, &session).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("AT-1-1"));
        assert!(text.contains("1/4/2025"));
        assert!(text.contains("4480"));
    }
}
