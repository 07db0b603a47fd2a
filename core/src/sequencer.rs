//! Builds the ordered list of screens a session walks through.

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    condition::{Condition, Shape},
    input::ConfidenceScale,
    rng::{participant_seed, seeded_permutation},
};

/// Shape-to-condition mapping derived from the participant id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeAssignment {
    seed: u64,
    pairs: [(Shape, Condition); 3],
    scale: ConfidenceScale,
}

impl ShapeAssignment {
    /// Permute the shapes with the participant seed and pair them, in order,
    /// with neutral, negative and positive.
    pub fn for_participant(participant_id: &str) -> Self {
        let seed = participant_seed(participant_id);
        let mut shapes = Shape::ALL;
        seeded_permutation(&mut shapes, seed);

        let pairs = [
            (shapes[0], Condition::ALL[0]),
            (shapes[1], Condition::ALL[1]),
            (shapes[2], Condition::ALL[2]),
        ];

        Self {
            seed,
            pairs,
            scale: ConfidenceScale::from_seed(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn pairs(&self) -> &[(Shape, Condition)] {
        &self.pairs
    }

    pub fn confidence_scale(&self) -> ConfidenceScale {
        self.scale
    }

    pub fn shape_for(&self, condition: Condition) -> Shape {
        self.pairs
            .iter()
            .find(|(_, c)| *c == condition)
            .map(|(shape, _)| *shape)
            .unwrap_or(Shape::Square)
    }

    pub fn condition_for(&self, shape: Shape) -> Condition {
        self.pairs
            .iter()
            .find(|(s, _)| *s == shape)
            .map(|(_, condition)| *condition)
            .unwrap_or(Condition::Neutral)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialSpec {
    pub shape: Shape,
    pub condition: Condition,
    pub stimulus_orientation: f64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenTiming {
    pub fixation_ms: u64,
    pub stimulus_ms: u64,
}

impl Default for ScreenTiming {
    fn default() -> Self {
        Self {
            fixation_ms: 500,
            stimulus_ms: 500,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Intake,
    Welcome,
    Instructions,
    ConditionInfo,
    Fixation { duration_ms: u64 },
    Stimulus { trial: TrialSpec, duration_ms: u64 },
    Response { trial: TrialSpec },
    Confidence,
    Feedback,
    End,
    Summary,
}

impl Screen {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Welcome => "welcome",
            Self::Instructions => "instructions",
            Self::ConditionInfo => "condition-info",
            Self::Fixation { .. } => "fixation",
            Self::Stimulus { .. } => "stimulus",
            Self::Response { .. } => "response",
            Self::Confidence => "confidence",
            Self::Feedback => "feedback",
            Self::End => "end",
            Self::Summary => "summary",
        }
    }
}

/// Orientations for one condition arm: every cardinal direction, topped up
/// with uniform whole-degree draws, then shuffled.
pub fn arm_orientations<R>(
    trials_per_shape: usize,
    cardinal_directions: &[u16],
    rng: &mut R,
) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let mut orientations: Vec<f64> = cardinal_directions
        .iter()
        .map(|&deg| f64::from(deg))
        .collect();
    while orientations.len() < trials_per_shape {
        orientations.push(f64::from(rng.gen_range(0u16..180)));
    }
    orientations.shuffle(rng);
    orientations.truncate(trials_per_shape);
    orientations
}

/// All trials of a session in presentation order.
pub fn build_trials<R>(
    assignment: &ShapeAssignment,
    trials_per_shape: usize,
    cardinal_directions: &[u16],
    rng: &mut R,
) -> Vec<TrialSpec>
where
    R: Rng + ?Sized,
{
    let mut trials = Vec::with_capacity(trials_per_shape * assignment.pairs().len());
    for &(shape, condition) in assignment.pairs() {
        for stimulus_orientation in arm_orientations(trials_per_shape, cardinal_directions, rng) {
            trials.push(TrialSpec {
                shape,
                condition,
                stimulus_orientation,
            });
        }
    }
    trials.shuffle(rng);
    trials
}

#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    screens: Vec<Screen>,
}

impl Timeline {
    pub fn new(trials: &[TrialSpec], timing: ScreenTiming) -> Self {
        let mut screens = Vec::with_capacity(trials.len() * 5 + 6);
        screens.extend([
            Screen::Intake,
            Screen::Welcome,
            Screen::Instructions,
            Screen::ConditionInfo,
        ]);

        for &trial in trials {
            screens.push(Screen::Fixation {
                duration_ms: timing.fixation_ms,
            });
            screens.push(Screen::Stimulus {
                trial,
                duration_ms: timing.stimulus_ms,
            });
            screens.push(Screen::Response { trial });
            screens.push(Screen::Confidence);
            screens.push(Screen::Feedback);
        }

        screens.extend([Screen::End, Screen::Summary]);

        info!(trials = trials.len(), screens = screens.len(), "built session timeline");
        Self { screens }
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn trial_count(&self) -> usize {
        self.screens
            .iter()
            .filter(|screen| matches!(screen, Screen::Response { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;

    #[test]
    fn assignment_is_deterministic_per_participant() {
        let a = ShapeAssignment::for_participant("P07");
        let b = ShapeAssignment::for_participant("P07");
        assert_eq!(a, b);
    }

    #[test]
    fn assignment_covers_every_shape_and_condition_once() {
        for id in ["A", "B", "P01", "participant-42", "zz"] {
            let assignment = ShapeAssignment::for_participant(id);
            for shape in Shape::ALL {
                assert_eq!(assignment.pairs().iter().filter(|(s, _)| *s == shape).count(), 1);
            }
            for condition in Condition::ALL {
                let shape = assignment.shape_for(condition);
                assert_eq!(assignment.condition_for(shape), condition);
            }
        }
    }

    #[test]
    fn assignment_for_seed_one() {
        // "\u{1}" sums to 1: shapes permute to [circle, hexagon, square]
        let assignment = ShapeAssignment::for_participant("\u{1}");
        assert_eq!(assignment.shape_for(Condition::Neutral), Shape::Circle);
        assert_eq!(assignment.shape_for(Condition::Negative), Shape::Hexagon);
        assert_eq!(assignment.shape_for(Condition::Positive), Shape::Square);
        assert_eq!(assignment.confidence_scale(), ConfidenceScale::RightLow);
    }

    #[test]
    fn arms_always_contain_cardinals() {
        let mut rng = seeded_rng(11);
        for _ in 0..20 {
            let orientations = arm_orientations(8, &[0, 90], &mut rng);
            assert_eq!(orientations.len(), 8);
            assert!(orientations.contains(&0.0));
            assert!(orientations.contains(&90.0));
            assert!(orientations.iter().all(|o| (0.0..180.0).contains(o) && o.fract() == 0.0));
        }
    }

    #[test]
    fn build_trials_balances_conditions() {
        let assignment = ShapeAssignment::for_participant("P01");
        let trials = build_trials(&assignment, 10, &[0, 90], &mut seeded_rng(5));
        assert_eq!(trials.len(), 30);
        for condition in Condition::ALL {
            let arm: Vec<_> = trials.iter().filter(|t| t.condition == condition).collect();
            assert_eq!(arm.len(), 10);
            assert!(arm.iter().all(|t| t.shape == assignment.shape_for(condition)));
        }
    }

    #[test]
    fn build_trials_is_reproducible_with_same_seed() {
        let assignment = ShapeAssignment::for_participant("P01");
        let a = build_trials(&assignment, 6, &[0, 90], &mut seeded_rng(99));
        let b = build_trials(&assignment, 6, &[0, 90], &mut seeded_rng(99));
        assert_eq!(a, b);
    }

    #[test]
    fn timeline_flattens_five_screens_per_trial() {
        let assignment = ShapeAssignment::for_participant("P01");
        let trials = build_trials(&assignment, 2, &[0, 90], &mut seeded_rng(1));
        let timeline = Timeline::new(&trials, ScreenTiming::default());

        assert_eq!(timeline.screens().len(), 4 + trials.len() * 5 + 2);
        assert_eq!(timeline.trial_count(), trials.len());
        assert_eq!(timeline.screens()[0], Screen::Intake);
        assert_eq!(timeline.screens().last(), Some(&Screen::Summary));

        let labels: Vec<_> = timeline.screens()[4..9].iter().map(Screen::label).collect();
        assert_eq!(labels, ["fixation", "stimulus", "response", "confidence", "feedback"]);
        assert_eq!(
            timeline.screens()[6],
            Screen::Response { trial: trials[0] }
        );
    }
}
