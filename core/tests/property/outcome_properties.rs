use orimatch_core::{
    orientation::{
        accuracy_from_deviation, angular_deviation, is_cardinal, normalize_response,
        normalize_stimulus,
    },
    Condition, FixedDraws, OutcomeEngine, TrialInput,
};
use proptest::prelude::*;

fn condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        Just(Condition::Neutral),
        Just(Condition::Negative),
        Just(Condition::Positive),
    ]
}

proptest! {
    #[test]
    fn deviation_is_symmetric(a in 0.0f64..180.0, b in 0.0f64..180.0) {
        prop_assert_eq!(angular_deviation(a, b), angular_deviation(b, a));
    }

    #[test]
    fn deviation_stays_within_ninety(a in 0.0f64..180.0, b in 0.0f64..180.0) {
        let deviation = angular_deviation(a, b);
        prop_assert!((0.0..=90.0).contains(&deviation));
    }

    #[test]
    fn identical_orientations_are_perfect(stim in 0.0f64..180.0) {
        prop_assert_eq!(angular_deviation(stim, stim), 0.0);
        prop_assert_eq!(accuracy_from_deviation(angular_deviation(stim, stim)), 1.0);
    }

    #[test]
    fn perpendicular_orientations_score_zero(stim in 0u16..180) {
        let stim = f64::from(stim);
        let perpendicular = (stim + 90.0) % 180.0;
        prop_assert_eq!(angular_deviation(stim, perpendicular), 90.0);
        prop_assert_eq!(accuracy_from_deviation(90.0), 0.0);
    }

    #[test]
    fn response_normalization_is_half_turn_periodic(resp in -2000.0f64..2000.0, turns in -5i32..5) {
        let norm = normalize_response(resp);
        prop_assert!((0.0..=180.0).contains(&norm));
        let shifted = normalize_response(resp + 180.0 * f64::from(turns));
        let gap = angular_deviation(norm % 180.0, shifted % 180.0);
        prop_assert!(gap < 1e-6, "gap {} between {} and {}", gap, norm, shifted);
    }

    #[test]
    fn accuracy_is_bounded(deviation in -500.0f64..500.0) {
        let accuracy = accuracy_from_deviation(deviation);
        prop_assert!((0.0..=1.0).contains(&accuracy));
    }

    #[test]
    fn closed_gate_never_biases(
        stim in 0.0f64..180.0,
        resp in -720.0f64..720.0,
        draw in 0.75f64..1.0,
        condition in condition(),
    ) {
        let outcome = OutcomeEngine::default().evaluate(
            TrialInput { stimulus_deg: stim, response_deg: resp, condition },
            &mut FixedDraws::constant(draw),
        );
        prop_assert_eq!(outcome.feedback_deviation, outcome.actual_deviation);
        prop_assert!(!outcome.biased_feedback_applied);
    }

    #[test]
    fn cardinal_trials_are_always_truthful(
        offset in -4.9f64..4.9,
        anchor in prop_oneof![Just(0.0f64), Just(90.0f64)],
        resp in -720.0f64..720.0,
        draw in 0.0f64..1.0,
        condition in condition(),
    ) {
        let stim = normalize_stimulus(anchor + offset);
        prop_assume!(is_cardinal(stim));
        let outcome = OutcomeEngine::default().evaluate(
            TrialInput { stimulus_deg: stim, response_deg: resp, condition },
            &mut FixedDraws::constant(draw),
        );
        prop_assert!(outcome.is_cardinal);
        prop_assert_eq!(outcome.feedback_deviation, outcome.actual_deviation);
        prop_assert!(!outcome.biased_feedback_applied);
    }

    #[test]
    fn open_gate_moves_feedback_in_the_condition_direction(
        stim in 6.0f64..84.0,
        resp in 0.0f64..180.0,
        draw in 0.0f64..0.75,
        condition in condition(),
    ) {
        let outcome = OutcomeEngine::default().evaluate(
            TrialInput { stimulus_deg: stim, response_deg: resp, condition },
            &mut FixedDraws::constant(draw),
        );
        prop_assert!((0.0..=90.0).contains(&outcome.feedback_deviation));
        match condition {
            Condition::Neutral => {
                prop_assert_eq!(outcome.feedback_deviation, outcome.actual_deviation);
                prop_assert!(!outcome.biased_feedback_applied);
            }
            Condition::Negative => {
                prop_assert!(outcome.feedback_deviation >= outcome.actual_deviation);
                prop_assert!(outcome.biased_feedback_applied);
            }
            Condition::Positive => {
                prop_assert!(outcome.feedback_deviation <= outcome.actual_deviation);
                prop_assert!(outcome.biased_feedback_applied);
            }
        }
    }
}
