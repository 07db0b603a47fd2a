//! Per-trial outcome computation.
//!
//! Turns a presented grating angle and the participant's dial angle into the
//! true error, an accuracy score and the (possibly biased) error value the
//! participant is shown.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    condition::Condition,
    orientation::{
        accuracy_from_deviation, angular_deviation, is_cardinal_within, normalize_response,
        normalize_stimulus, CARDINAL_TOLERANCE_DEG, MAX_ERROR_DEG,
    },
    rng::UniformSource,
};

/// Parameters of the feedback manipulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasPolicy {
    /// Probability that a non-cardinal trial is considered for biasing.
    pub gate_probability: f64,
    /// Degrees added (negative arm) or removed (positive arm).
    pub magnitude_deg: f64,
    /// Ceiling for inflated feedback.
    pub max_error_deg: f64,
    /// Stimuli this close to 0°, 90° or 180° always get truthful feedback.
    pub cardinal_tolerance_deg: f64,
}

impl Default for BiasPolicy {
    fn default() -> Self {
        Self {
            gate_probability: 0.75,
            magnitude_deg: 15.0,
            max_error_deg: MAX_ERROR_DEG,
            cardinal_tolerance_deg: CARDINAL_TOLERANCE_DEG,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialInput {
    pub stimulus_deg: f64,
    pub response_deg: f64,
    pub condition: Condition,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub stimulus_orientation_norm: f64,
    pub response_orientation_norm: f64,
    pub actual_deviation: f64,
    pub accuracy: f64,
    pub is_cardinal: bool,
    pub feedback_deviation: f64,
    pub biased_feedback_applied: bool,
}

/// What the bias policy decided for one trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedbackDecision {
    pub feedback_deviation: f64,
    pub biased: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutcomeEngine {
    policy: BiasPolicy,
}

impl OutcomeEngine {
    pub fn new(policy: BiasPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BiasPolicy {
        &self.policy
    }

    pub fn evaluate<S>(&self, input: TrialInput, source: &mut S) -> TrialOutcome
    where
        S: UniformSource + ?Sized,
    {
        let stimulus_norm = normalize_stimulus(input.stimulus_deg);
        let response_norm = normalize_response(input.response_deg);
        let actual_deviation = angular_deviation(stimulus_norm, response_norm);
        let accuracy = accuracy_from_deviation(actual_deviation);
        let cardinal = is_cardinal_within(stimulus_norm, self.policy.cardinal_tolerance_deg);

        let decision = self.feedback_for(actual_deviation, cardinal, input.condition, source);

        debug!(
            condition = %input.condition,
            stimulus = stimulus_norm,
            response = response_norm,
            actual_deviation,
            accuracy,
            cardinal,
            feedback = decision.feedback_deviation,
            biased = decision.biased,
            "evaluated trial outcome"
        );

        TrialOutcome {
            stimulus_orientation_norm: stimulus_norm,
            response_orientation_norm: response_norm,
            actual_deviation,
            accuracy,
            is_cardinal: cardinal,
            feedback_deviation: decision.feedback_deviation,
            biased_feedback_applied: decision.biased,
        }
    }

    /// Apply the bias policy to an already computed deviation.
    ///
    /// Cardinal trials never consume a draw. For the neutral arm the gate may
    /// fire but the value is left alone, so the flag stays false.
    pub fn feedback_for<S>(
        &self,
        actual_deviation: f64,
        cardinal: bool,
        condition: Condition,
        source: &mut S,
    ) -> FeedbackDecision
    where
        S: UniformSource + ?Sized,
    {
        let truthful = FeedbackDecision {
            feedback_deviation: actual_deviation,
            biased: false,
        };

        if cardinal {
            return truthful;
        }

        let draw = source.next_uniform();
        if draw >= self.policy.gate_probability {
            return truthful;
        }

        match condition {
            Condition::Neutral => truthful,
            Condition::Negative => FeedbackDecision {
                feedback_deviation: (actual_deviation + self.policy.magnitude_deg)
                    .min(self.policy.max_error_deg),
                biased: true,
            },
            Condition::Positive => FeedbackDecision {
                feedback_deviation: (actual_deviation - self.policy.magnitude_deg).max(0.0),
                biased: true,
            },
        }
    }
}
