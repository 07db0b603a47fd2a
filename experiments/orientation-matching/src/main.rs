mod observer;

use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use orimatch_core::{
    build_trials, ensure_report_file, load_or_init, render_summary_table, seeded_rng,
    update_sections, write_export, Condition, ExperimentConfig, ExperimentMode, OutcomeEngine,
    Participant, ReportSection, Screen, SessionArgs, SessionContext, SessionSummary,
    ShapeAssignment, Timeline, DEFAULT_REPORT_TEMPLATE,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::observer::SimulatedObserver;

struct SessionPaths {
    dir: PathBuf,
    config: PathBuf,
    report: PathBuf,
}

struct SessionResult {
    assignment: ShapeAssignment,
    summary: SessionSummary,
    export_path: PathBuf,
    trials_per_shape: usize,
}

fn main() -> Result<()> {
    init_logging();

    let args = SessionArgs::parse_from_env()?;
    if args.help_requested() {
        print_usage();
        return Ok(());
    }

    let participant_id = args
        .participant_id()
        .ok_or_else(|| anyhow!("--participant is required (see --help)"))?;
    let participant = Participant::new(participant_id, args.age(), args.gender())?;

    let paths = initialize_paths(args.output_dir(), participant.id())?;
    let config: ExperimentConfig = load_or_init(&paths.config, ExperimentConfig::default)?;
    config
        .validate()
        .with_context(|| format!("invalid config at {}", paths.config.display()))?;
    ensure_report_file(&paths.report, DEFAULT_REPORT_TEMPLATE)?;

    info!(
        mode = args.mode().label(),
        participant = participant.id(),
        "running orientation matching session"
    );

    let mode = args.mode();
    let result = run_session(participant.clone(), &config, mode, &paths.dir)?;

    write_report(&paths.report, &participant, &config, mode, &result)?;
    info!(report = %paths.report.display(), "session report updated");

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_usage() {
    println!(
        "Usage: cargo run -p orimatch-experiment-orientation -- --participant ID \
         [--age A] [--gender G] [--mode full|test] [--output DIR]"
    );
}

fn initialize_paths(output: Option<&PathBuf>, participant_id: &str) -> Result<SessionPaths> {
    let dir = match output {
        Some(dir) => dir.clone(),
        None => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sessions"),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create session directory {}", dir.display()))?;

    Ok(SessionPaths {
        config: dir.join("config.json"),
        report: dir.join(format!("report_{participant_id}.md")),
        dir,
    })
}

fn run_session(
    participant: Participant,
    config: &ExperimentConfig,
    mode: ExperimentMode,
    export_dir: &Path,
) -> Result<SessionResult> {
    let mut session = SessionContext::new(participant, OutcomeEngine::new(config.bias));
    let stream = config.seed.wrapping_add(session.assignment().seed());
    let mut sequence_rng = seeded_rng(stream);
    let mut gate_rng = seeded_rng(stream.wrapping_add(1));
    let mut observer_rng = seeded_rng(stream.wrapping_add(2));
    let observer = SimulatedObserver::new(config.observer);

    let trials_per_shape = mode.trials_per_shape(config.trials_per_shape);
    let trials = build_trials(
        session.assignment(),
        trials_per_shape,
        &config.cardinal_directions,
        &mut sequence_rng,
    );
    let timeline = Timeline::new(&trials, config.timing);

    let mut export_path = None;
    let mut summary = None;

    for screen in timeline.screens() {
        match screen {
            Screen::Intake => {
                let participant = session.participant();
                info!(
                    id = participant.id(),
                    age = participant.age(),
                    gender = participant.gender(),
                    "participant registered"
                );
            }
            Screen::ConditionInfo => {
                for condition in Condition::ALL {
                    info!(
                        shape = %session.assignment().shape_for(condition),
                        %condition,
                        "{}",
                        condition.description()
                    );
                }
            }
            Screen::Fixation { duration_ms } => debug!(duration_ms, "fixation"),
            Screen::Stimulus { trial, duration_ms } => debug!(
                shape = %trial.shape,
                orientation = trial.stimulus_orientation,
                duration_ms,
                "stimulus"
            ),
            Screen::Response { trial } => {
                let angle = observer.respond(trial, &mut observer_rng);
                session.confirm_response(trial, angle, &mut gate_rng)?;
            }
            Screen::Confidence => {
                let perceived_error = session
                    .pending()
                    .map(|record| record.outcome.actual_deviation)
                    .ok_or_else(|| anyhow!("confidence screen reached without a response"))?;
                let position = observer.rate_confidence(
                    perceived_error,
                    session.confidence_scale(),
                    &mut observer_rng,
                );
                session.record_confidence(position)?;
            }
            Screen::Feedback => {
                let feedback = session.deliver_feedback()?;
                debug!(
                    trial_nr = feedback.trial_nr,
                    "your orientation was off by {:.1} degrees",
                    feedback.feedback_shown
                );
            }
            Screen::End => {
                export_path = Some(write_export(export_dir, &session)?);
            }
            Screen::Summary => {
                let stats = SessionSummary::from_records(session.responses(), session.assignment());
                info!(
                    trials = stats.total_trials,
                    "average deviation {:.2} degrees",
                    stats.mean_actual_deviation
                );
                for row in &stats.conditions {
                    info!(
                        condition = %row.condition,
                        shape = %row.shape,
                        trials = row.trials,
                        "actual {:.2}, feedback {:.2}",
                        row.mean_actual_deviation,
                        row.mean_feedback_deviation
                    );
                }
                summary = Some(stats);
            }
            Screen::Welcome | Screen::Instructions => debug!(screen = screen.label(), "shown"),
        }
    }

    Ok(SessionResult {
        assignment: session.assignment().clone(),
        summary: summary.ok_or_else(|| anyhow!("timeline ended without a summary screen"))?,
        export_path: export_path.ok_or_else(|| anyhow!("timeline ended without an end screen"))?,
        trials_per_shape,
    })
}

fn write_report(
    report_path: &Path,
    participant: &Participant,
    config: &ExperimentConfig,
    mode: ExperimentMode,
    result: &SessionResult,
) -> Result<()> {
    let sections = [
        ReportSection::new("overview", render_overview_section(participant, mode)),
        ReportSection::new("assignment", render_assignment_section(&result.assignment)),
        ReportSection::new(
            "configuration",
            render_configuration_section(config, result.trials_per_shape),
        ),
        ReportSection::new("metrics", render_summary_table(&result.summary)),
        ReportSection::new(
            "export",
            format!("- Trial file: `{}`\n", result.export_path.display()),
        ),
    ];

    update_sections(report_path, &sections)
}

fn render_overview_section(participant: &Participant, mode: ExperimentMode) -> String {
    format!(
        "- Participant ID: {}\n- Age: {}\n- Gender: {}\n- Mode: {}\n",
        participant.id(),
        participant.age(),
        participant.gender(),
        mode.label()
    )
}

fn render_assignment_section(assignment: &ShapeAssignment) -> String {
    let mut output = String::new();
    let _ = writeln!(
        &mut output,
        "- Participant seed: {}\n- Confidence scale: {}\n",
        assignment.seed(),
        assignment.confidence_scale().label()
    );
    for (shape, condition) in assignment.pairs() {
        let _ = writeln!(
            &mut output,
            "- **{}**: {} ({})",
            shape,
            condition,
            condition.description()
        );
    }
    output
}

fn render_configuration_section(config: &ExperimentConfig, trials_per_shape: usize) -> String {
    format!(
        "- Seed: {}\n- Trials per shape: {}\n- Cardinal directions: {:?}\n\
         - Bias gate probability: {:.2}\n- Bias magnitude: {:.1}°\n\
         - Cardinal tolerance: {:.1}°\n- Fixation / stimulus: {} ms / {} ms\n\
         - Observer noise: ±{:.1}°\n",
        config.seed,
        trials_per_shape,
        config.cardinal_directions,
        config.bias.gate_probability,
        config.bias.magnitude_deg,
        config.bias.cardinal_tolerance_deg,
        config.timing.fixation_ms,
        config.timing.stimulus_ms,
        config.observer.noise_deg
    )
}
