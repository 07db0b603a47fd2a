//! Tab-separated per-trial export.

use std::{
    collections::HashMap,
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::session::{ConfidenceRecord, Participant, ResponseRecord, SessionContext};

pub const EXPORT_HEADER: [&str; 12] = [
    "Participant_ID",
    "Age",
    "Gender",
    "Trial_Nr",
    "Shape",
    "Condition",
    "Grating_Orientation",
    "Response_Orientation",
    "Deviation",
    "Accuracy",
    "Confidence",
    "Feedback",
];

/// Rendered in place of any value that is missing or not finite.
pub const MISSING: &str = "NA";

pub fn export_file_name(participant_id: &str) -> String {
    format!("orientation_experiment_{participant_id}.txt")
}

fn fixed(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        MISSING.to_string()
    }
}

/// Free text with tabs and line breaks flattened to spaces, so a value can
/// never split a row or shift its columns.
fn cell(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

/// Render one header row plus one row per response record.
///
/// Rows keep the order of `responses` and are numbered from 1 in that order.
/// Confidence is joined from `confidences` by the record's trial number; a
/// record without a match exports `NA` rather than aborting the export.
pub fn render_tsv(
    participant: &Participant,
    responses: &[ResponseRecord],
    confidences: &[ConfidenceRecord],
) -> String {
    let by_trial: HashMap<usize, u8> = confidences
        .iter()
        .map(|record| (record.trial_nr, record.confidence_rating))
        .collect();

    let mut output = EXPORT_HEADER.join("\t");
    output.push('\n');

    for (index, record) in responses.iter().enumerate() {
        let confidence = match by_trial.get(&record.trial_nr) {
            Some(rating) => rating.to_string(),
            None => {
                warn!(
                    trial_nr = record.trial_nr,
                    "no confidence rating for trial; exporting NA"
                );
                MISSING.to_string()
            }
        };
        let outcome = &record.outcome;

        let _ = writeln!(
            &mut output,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            cell(participant.id()),
            cell(participant.age()),
            cell(participant.gender()),
            index + 1,
            record.shape,
            record.condition,
            fixed(outcome.stimulus_orientation_norm, 1),
            fixed(outcome.response_orientation_norm, 1),
            fixed(outcome.actual_deviation, 1),
            fixed(outcome.accuracy, 3),
            confidence,
            fixed(outcome.feedback_deviation, 1),
        );
    }

    output
}

/// Write the session export into `dir`, returning the file path.
pub fn write_export(dir: &Path, session: &SessionContext) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(session.participant().id()));
    let contents = render_tsv(session.participant(), session.responses(), session.confidences());
    fs::write(&path, contents)
        .with_context(|| format!("failed to write export to {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = session.responses().len(),
        "wrote trial export"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        condition::{Condition, Shape},
        outcome::TrialOutcome,
    };

    fn outcome(stimulus: f64, response: f64, deviation: f64, feedback: f64) -> TrialOutcome {
        TrialOutcome {
            stimulus_orientation_norm: stimulus,
            response_orientation_norm: response,
            actual_deviation: deviation,
            accuracy: 1.0 - deviation / 90.0,
            is_cardinal: false,
            feedback_deviation: feedback,
            biased_feedback_applied: feedback != deviation,
        }
    }

    fn participant() -> Participant {
        Participant::new("P01", "27", "Female").unwrap()
    }

    #[test]
    fn file_name_pattern() {
        assert_eq!(export_file_name("P01"), "orientation_experiment_P01.txt");
    }

    #[test]
    fn header_row_matches_column_order() {
        let tsv = render_tsv(&participant(), &[], &[]);
        assert_eq!(
            tsv,
            "Participant_ID\tAge\tGender\tTrial_Nr\tShape\tCondition\t\
             Grating_Orientation\tResponse_Orientation\tDeviation\tAccuracy\t\
             Confidence\tFeedback\n"
        );
    }

    #[test]
    fn rows_are_formatted_with_fixed_decimals() {
        let responses = vec![ResponseRecord::new(
            1,
            Shape::Hexagon,
            Condition::Negative,
            outcome(45.0, 80.0, 35.0, 50.0),
        )];
        let confidences = vec![ConfidenceRecord {
            trial_nr: 1,
            shape: Shape::Hexagon,
            condition: Condition::Negative,
            confidence_rating: 64,
        }];

        let tsv = render_tsv(&participant(), &responses, &confidences);
        let row = tsv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "P01\t27\tFemale\t1\thexagon\tnegative\t45.0\t80.0\t35.0\t0.611\t64\t50.0"
        );
    }

    #[test]
    fn zero_values_are_not_missing() {
        let responses = vec![ResponseRecord::new(
            1,
            Shape::Square,
            Condition::Positive,
            outcome(0.0, 0.0, 0.0, 0.0),
        )];
        let confidences = vec![ConfidenceRecord {
            trial_nr: 1,
            shape: Shape::Square,
            condition: Condition::Positive,
            confidence_rating: 0,
        }];
        let tsv = render_tsv(&participant(), &responses, &confidences);
        assert!(tsv.lines().nth(1).unwrap().ends_with("\t0.0\t0.0\t0.0\t1.000\t0\t0.0"));
    }

    #[test]
    fn missing_confidence_renders_na_and_keeps_going() {
        let responses = vec![
            ResponseRecord::new(
                1,
                Shape::Circle,
                Condition::Neutral,
                outcome(10.0, 12.0, 2.0, 2.0),
            ),
            ResponseRecord::new(
                2,
                Shape::Circle,
                Condition::Neutral,
                outcome(20.0, 30.0, 10.0, 10.0),
            ),
        ];
        let confidences = vec![ConfidenceRecord {
            trial_nr: 2,
            shape: Shape::Circle,
            condition: Condition::Neutral,
            confidence_rating: 90,
        }];

        let tsv = render_tsv(&participant(), &responses, &confidences);
        let rows: Vec<Vec<&str>> = tsv.lines().skip(1).map(|l| l.split('\t').collect()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][10], "NA");
        assert_eq!(rows[1][10], "90");
    }

    #[test]
    fn non_finite_values_render_na() {
        let responses = vec![ResponseRecord::new(
            1,
            Shape::Circle,
            Condition::Neutral,
            outcome(f64::NAN, 12.0, 2.0, 2.0),
        )];
        let tsv = render_tsv(&participant(), &responses, &[]);
        let row: Vec<&str> = tsv.lines().nth(1).unwrap().split('\t').collect();
        assert_eq!(row[6], "NA");
        assert_eq!(row[7], "12.0");
    }

    #[test]
    fn trial_numbers_follow_export_order() {
        let responses = vec![
            ResponseRecord::new(
                7,
                Shape::Circle,
                Condition::Neutral,
                outcome(10.0, 12.0, 2.0, 2.0),
            ),
            ResponseRecord::new(
                3,
                Shape::Circle,
                Condition::Neutral,
                outcome(20.0, 30.0, 10.0, 10.0),
            ),
        ];
        let confidences = vec![ConfidenceRecord {
            trial_nr: 3,
            shape: Shape::Circle,
            condition: Condition::Neutral,
            confidence_rating: 40,
        }];
        let tsv = render_tsv(&participant(), &responses, &confidences);
        let rows: Vec<Vec<&str>> = tsv.lines().skip(1).map(|l| l.split('\t').collect()).collect();
        assert_eq!(rows[0][3], "1");
        assert_eq!(rows[1][3], "2");
        assert_eq!(rows[1][10], "40");
    }

    #[test]
    fn free_text_cannot_break_row_layout() {
        // Deserialized participants skip constructor validation.
        let participant: Participant =
            serde_json::from_str(r#"{"id":"P01","age":"2\t4","gender":"Rather\r\nnot say"}"#)
                .unwrap();
        let responses = vec![ResponseRecord::new(
            1,
            Shape::Square,
            Condition::Neutral,
            outcome(10.0, 12.0, 2.0, 2.0),
        )];

        let tsv = render_tsv(&participant, &responses, &[]);
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        let row: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(row.len(), EXPORT_HEADER.len());
        assert_eq!(row[1], "2 4");
        assert_eq!(row[2], "Rather  not say");
        assert_eq!(row[3], "1");
    }
}
