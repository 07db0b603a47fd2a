//! Session context threaded through every screen of a run.
//!
//! A trial moves through three stages: the response is confirmed, a
//! confidence rating is taken, feedback is shown. The record produced at the
//! first stage sits in a single pending slot until the feedback stage clears
//! it, so at most one trial is ever in flight.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    condition::{Condition, Shape},
    error::{ParticipantError, SessionError},
    input::ConfidenceScale,
    outcome::{OutcomeEngine, TrialInput, TrialOutcome},
    rng::UniformSource,
    sequencer::{ShapeAssignment, TrialSpec},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: String,
    age: String,
    gender: String,
}

impl Participant {
    /// The id ends up in the export file name, so separators and control
    /// characters are rejected. Age and gender are free text but must not
    /// carry control characters, which would split export rows.
    pub fn new(
        id: impl Into<String>,
        age: impl Into<String>,
        gender: impl Into<String>,
    ) -> Result<Self, ParticipantError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ParticipantError::EmptyId);
        }
        if let Some(found) = id
            .chars()
            .find(|ch| matches!(ch, '/' | '\\' | ':') || ch.is_control())
        {
            return Err(ParticipantError::InvalidCharacter { id, found });
        }

        Ok(Self {
            id,
            age: free_text("age", age.into())?,
            gender: free_text("gender", gender.into())?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn age(&self) -> &str {
        &self.age
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }
}

fn free_text(field: &'static str, value: String) -> Result<String, ParticipantError> {
    let value = value.trim();
    match value.chars().find(|ch| ch.is_control()) {
        Some(found) => Err(ParticipantError::ControlCharacter { field, found }),
        None => Ok(value.to_string()),
    }
}

/// Canonical per-trial record, created when the response is confirmed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub trial_nr: usize,
    pub shape: Shape,
    pub condition: Condition,
    pub outcome: TrialOutcome,
    confidence_rating: Option<u8>,
    feedback_shown: Option<f64>,
}

impl ResponseRecord {
    pub fn new(trial_nr: usize, shape: Shape, condition: Condition, outcome: TrialOutcome) -> Self {
        Self {
            trial_nr,
            shape,
            condition,
            outcome,
            confidence_rating: None,
            feedback_shown: None,
        }
    }

    pub fn confidence_rating(&self) -> Option<u8> {
        self.confidence_rating
    }

    pub fn feedback_shown(&self) -> Option<f64> {
        self.feedback_shown
    }

    fn set_confidence(&mut self, rating: u8) -> Result<(), SessionError> {
        if self.confidence_rating.is_some() {
            return Err(SessionError::AlreadyRecorded {
                trial_nr: self.trial_nr,
                field: "confidence_rating",
            });
        }
        self.confidence_rating = Some(rating);
        Ok(())
    }

    fn set_feedback_shown(&mut self, value: f64) -> Result<(), SessionError> {
        if self.feedback_shown.is_some() {
            return Err(SessionError::AlreadyRecorded {
                trial_nr: self.trial_nr,
                field: "feedback_shown",
            });
        }
        self.feedback_shown = Some(value);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceRecord {
    pub trial_nr: usize,
    pub shape: Shape,
    pub condition: Condition,
    pub confidence_rating: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub trial_nr: usize,
    pub shape: Shape,
    pub condition: Condition,
    pub feedback_shown: f64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrialPhase {
    AwaitingResponse,
    AwaitingConfidence,
    AwaitingFeedback,
}

impl TrialPhase {
    fn label(&self) -> &'static str {
        match self {
            Self::AwaitingResponse => "response",
            Self::AwaitingConfidence => "confidence",
            Self::AwaitingFeedback => "feedback",
        }
    }
}

pub struct SessionContext {
    participant: Participant,
    assignment: ShapeAssignment,
    engine: OutcomeEngine,
    trial_counter: usize,
    phase: TrialPhase,
    pending: Option<usize>,
    responses: Vec<ResponseRecord>,
    confidences: Vec<ConfidenceRecord>,
    feedback: Vec<FeedbackRecord>,
}

impl SessionContext {
    pub fn new(participant: Participant, engine: OutcomeEngine) -> Self {
        let assignment = ShapeAssignment::for_participant(participant.id());
        info!(
            participant = participant.id(),
            seed = assignment.seed(),
            scale = assignment.confidence_scale().label(),
            "session started"
        );
        for (shape, condition) in assignment.pairs() {
            info!(%shape, %condition, "shape assignment");
        }

        Self {
            participant,
            assignment,
            engine,
            trial_counter: 0,
            phase: TrialPhase::AwaitingResponse,
            pending: None,
            responses: Vec::new(),
            confidences: Vec::new(),
            feedback: Vec::new(),
        }
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn assignment(&self) -> &ShapeAssignment {
        &self.assignment
    }

    pub fn confidence_scale(&self) -> ConfidenceScale {
        self.assignment.confidence_scale()
    }

    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    pub fn responses(&self) -> &[ResponseRecord] {
        &self.responses
    }

    pub fn confidences(&self) -> &[ConfidenceRecord] {
        &self.confidences
    }

    pub fn feedback_records(&self) -> &[FeedbackRecord] {
        &self.feedback
    }

    /// The record waiting for its confidence rating or feedback, if any.
    pub fn pending(&self) -> Option<&ResponseRecord> {
        self.pending.and_then(|index| self.responses.get(index))
    }

    fn expect_phase(&self, requested: TrialPhase) -> Result<(), SessionError> {
        if self.phase == requested {
            Ok(())
        } else {
            Err(SessionError::OutOfOrder {
                expected: self.phase.label(),
                found: requested.label(),
            })
        }
    }

    fn pending_mut(&mut self) -> Result<&mut ResponseRecord, SessionError> {
        let index = self.pending.ok_or(SessionError::NothingPending)?;
        self.responses
            .get_mut(index)
            .ok_or(SessionError::NothingPending)
    }

    /// Confirm the dial angle for `trial` and compute its outcome.
    pub fn confirm_response<S>(
        &mut self,
        trial: &TrialSpec,
        response_deg: f64,
        source: &mut S,
    ) -> Result<&ResponseRecord, SessionError>
    where
        S: UniformSource + ?Sized,
    {
        self.expect_phase(TrialPhase::AwaitingResponse)?;

        self.trial_counter += 1;
        let outcome = self.engine.evaluate(
            TrialInput {
                stimulus_deg: trial.stimulus_orientation,
                response_deg,
                condition: trial.condition,
            },
            source,
        );
        let record = ResponseRecord::new(self.trial_counter, trial.shape, trial.condition, outcome);

        info!(
            trial_nr = record.trial_nr,
            shape = %record.shape,
            condition = %record.condition,
            deviation = outcome.actual_deviation,
            accuracy = outcome.accuracy,
            feedback = outcome.feedback_deviation,
            biased = outcome.biased_feedback_applied,
            "response confirmed"
        );

        self.responses.push(record);
        let index = self.responses.len() - 1;
        self.pending = Some(index);
        self.phase = TrialPhase::AwaitingConfidence;
        Ok(&self.responses[index])
    }

    /// Record the slider position for the pending trial, mapped through the
    /// participant's scale direction.
    pub fn record_confidence(
        &mut self,
        slider_position: u8,
    ) -> Result<&ConfidenceRecord, SessionError> {
        self.expect_phase(TrialPhase::AwaitingConfidence)?;
        if slider_position > 100 {
            return Err(SessionError::ConfidenceOutOfRange(slider_position));
        }

        let rating = self.confidence_scale().rating(slider_position);
        let record = self.pending_mut()?;
        record.set_confidence(rating)?;
        let confidence = ConfidenceRecord {
            trial_nr: record.trial_nr,
            shape: record.shape,
            condition: record.condition,
            confidence_rating: rating,
        };

        self.confidences.push(confidence);
        self.phase = TrialPhase::AwaitingFeedback;
        Ok(&self.confidences[self.confidences.len() - 1])
    }

    /// Show feedback for the pending trial and release the slot.
    pub fn deliver_feedback(&mut self) -> Result<&FeedbackRecord, SessionError> {
        self.expect_phase(TrialPhase::AwaitingFeedback)?;

        let record = self.pending_mut()?;
        let shown = record.outcome.feedback_deviation;
        record.set_feedback_shown(shown)?;
        let feedback = FeedbackRecord {
            trial_nr: record.trial_nr,
            shape: record.shape,
            condition: record.condition,
            feedback_shown: shown,
        };

        self.feedback.push(feedback);
        self.pending = None;
        self.phase = TrialPhase::AwaitingResponse;
        Ok(&self.feedback[self.feedback.len() - 1])
    }
}
