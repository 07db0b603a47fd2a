pub mod condition;
pub mod config;
pub mod error;
pub mod experiment;
pub mod export;
pub mod input;
pub mod metrics;
pub mod orientation;
pub mod outcome;
pub mod report;
pub mod rng;
pub mod sequencer;
pub mod session;

pub use condition::{Condition, Shape};
pub use config::{load_or_init, ExperimentConfig, ObserverConfig};
pub use error::{ConditionError, ConfigError, ParticipantError, SessionError};
pub use experiment::{ExperimentMode, SessionArgs};
pub use export::{export_file_name, render_tsv, write_export};
pub use input::{ConfidenceScale, ConfidenceSlider, RotationDial};
pub use metrics::{ConditionSummary, SessionSummary};
pub use outcome::{BiasPolicy, OutcomeEngine, TrialInput, TrialOutcome};
pub use report::{
    ensure_report_file, render_summary_table, update_sections, ReportSection,
    DEFAULT_REPORT_TEMPLATE,
};
pub use rng::{seeded_rng, FixedDraws, UniformSource};
pub use sequencer::{build_trials, Screen, ScreenTiming, ShapeAssignment, Timeline, TrialSpec};
pub use session::{
    ConfidenceRecord, FeedbackRecord, Participant, ResponseRecord, SessionContext, TrialPhase,
};
