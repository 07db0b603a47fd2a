use serde::{Deserialize, Serialize};

use crate::{
    condition::{Condition, Shape},
    session::ResponseRecord,
    sequencer::ShapeAssignment,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub condition: Condition,
    pub shape: Shape,
    pub trials: usize,
    pub mean_actual_deviation: f64,
    pub mean_feedback_deviation: f64,
    pub biased_trials: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_trials: usize,
    pub mean_actual_deviation: f64,
    pub mean_accuracy: f64,
    pub conditions: Vec<ConditionSummary>,
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl SessionSummary {
    /// Aggregate completed responses; conditions without trials report zeros.
    pub fn from_records(records: &[ResponseRecord], assignment: &ShapeAssignment) -> Self {
        let conditions = Condition::ALL
            .iter()
            .map(|&condition| {
                let arm: Vec<&ResponseRecord> =
                    records.iter().filter(|r| r.condition == condition).collect();
                let actual: f64 = arm.iter().map(|r| r.outcome.actual_deviation).sum();
                let feedback: f64 = arm.iter().map(|r| r.outcome.feedback_deviation).sum();

                ConditionSummary {
                    condition,
                    shape: assignment.shape_for(condition),
                    trials: arm.len(),
                    mean_actual_deviation: mean(actual, arm.len()),
                    mean_feedback_deviation: mean(feedback, arm.len()),
                    biased_trials: arm
                        .iter()
                        .filter(|r| r.outcome.biased_feedback_applied)
                        .count(),
                }
            })
            .collect();

        let total_deviation: f64 = records.iter().map(|r| r.outcome.actual_deviation).sum();
        let total_accuracy: f64 = records.iter().map(|r| r.outcome.accuracy).sum();

        Self {
            total_trials: records.len(),
            mean_actual_deviation: mean(total_deviation, records.len()),
            mean_accuracy: mean(total_accuracy, records.len()),
            conditions,
        }
    }

    pub fn condition(&self, condition: Condition) -> Option<&ConditionSummary> {
        self.conditions.iter().find(|c| c.condition == condition)
    }
}
