//! Markdown session notebook with regions rewritten after every run.
//!
//! Regions are delimited by `<!-- SECTION:<id> start -->` and
//! `<!-- SECTION:<id> end -->`; text outside the markers is left untouched so
//! hand-written notes survive reruns.

use std::{fmt::Write as _, fs, path::Path};

use anyhow::{anyhow, Context, Result};

use crate::metrics::SessionSummary;

pub const DEFAULT_REPORT_TEMPLATE: &str = r"# Orientation Matching Session

<!-- SECTION:overview start -->
<!-- Participant details and run mode. -->
<!-- SECTION:overview end -->

## Shape Assignment

<!-- SECTION:assignment start -->
<!-- Shape-to-condition mapping derived from the participant id. -->
<!-- SECTION:assignment end -->

## Configuration

<!-- SECTION:configuration start -->
<!-- Parameters used for the latest run. -->
<!-- SECTION:configuration end -->

## Performance

<!-- SECTION:metrics start -->
<!-- Actual and feedback deviations per condition. -->
<!-- SECTION:metrics end -->

## Export

<!-- SECTION:export start -->
<!-- Location of the tab-separated trial file. -->
<!-- SECTION:export end -->

## Notes

Free-form observations go here; this part is never rewritten.
";

#[derive(Clone, Debug)]
pub struct ReportSection {
    id: String,
    content: String,
}

impl ReportSection {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    fn markers(&self) -> (String, String) {
        (
            format!("<!-- SECTION:{} start -->", self.id),
            format!("<!-- SECTION:{} end -->", self.id),
        )
    }
}

/// Create `path` from `template` unless it already exists.
pub fn ensure_report_file(path: &Path, template: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    if !path.exists() {
        fs::write(path, template)
            .with_context(|| format!("failed to write report template to {}", path.display()))?;
    }

    Ok(())
}

pub fn update_sections(path: &Path, sections: &[ReportSection]) -> Result<()> {
    let original = fs::read_to_string(path)
        .with_context(|| format!("failed to read report at {}", path.display()))?;

    let updated = sections
        .iter()
        .try_fold(original, |content, section| replace_section(&content, section))?;

    fs::write(path, updated)
        .with_context(|| format!("failed to write updated report to {}", path.display()))
}

fn replace_section(content: &str, section: &ReportSection) -> Result<String> {
    let (start_marker, end_marker) = section.markers();

    let start = content
        .find(&start_marker)
        .ok_or_else(|| anyhow!("report has no section {:?}", section.id))?;
    let body_start = start + start_marker.len();
    let end = content[body_start..]
        .find(&end_marker)
        .map(|offset| body_start + offset)
        .ok_or_else(|| anyhow!("section {:?} is missing its end marker", section.id))?;

    let body = section.content.trim_matches('\n');
    let mut updated = String::with_capacity(content.len() + body.len());
    updated.push_str(&content[..body_start]);
    updated.push('\n');
    if !body.is_empty() {
        updated.push_str(body);
        updated.push('\n');
    }
    updated.push_str(&content[end..]);
    Ok(updated)
}

/// Markdown table of per-condition deviations.
pub fn render_summary_table(summary: &SessionSummary) -> String {
    let mut output = String::new();
    let _ = writeln!(&mut output, "- Total trials: {}", summary.total_trials);
    let _ = writeln!(
        &mut output,
        "- Average deviation: {:.2}°\n- Average accuracy: {:.3}\n",
        summary.mean_actual_deviation, summary.mean_accuracy
    );

    let _ = writeln!(
        &mut output,
        "| Condition | Shape | Trials | Biased | Avg. Actual Deviation | Avg. Feedback Deviation |"
    );
    let _ = writeln!(&mut output, "| --- | --- | --- | --- | --- | --- |");
    for row in &summary.conditions {
        let _ = writeln!(
            &mut output,
            "| {} | {} | {} | {} | {:.2}° | {:.2}° |",
            row.condition,
            row.shape,
            row.trials,
            row.biased_trials,
            row.mean_actual_deviation,
            row.mean_feedback_deviation
        );
    }

    output
}
