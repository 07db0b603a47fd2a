use orimatch_core::{ConfidenceScale, ConfidenceSlider, ObserverConfig, RotationDial, TrialSpec};
use rand::Rng;

/// Stand-in participant: turns the dial and moves the confidence slider the
/// way a person would with the F/J keys.
pub struct SimulatedObserver {
    config: ObserverConfig,
}

impl SimulatedObserver {
    pub fn new(config: ObserverConfig) -> Self {
        Self { config }
    }

    /// Final dial angle after stepping from a random start towards a noisy
    /// estimate of the stimulus.
    pub fn respond<R: Rng + ?Sized>(&self, trial: &TrialSpec, rng: &mut R) -> f64 {
        let mut dial = RotationDial::random_start(rng);
        let noise = if self.config.noise_deg > 0.0 {
            rng.gen_range(-self.config.noise_deg..=self.config.noise_deg)
        } else {
            0.0
        };
        let target = (trial.stimulus_orientation + noise).round();

        // Shortest turn on the undirected scale, in (-90, 90].
        let mut delta = (target - dial.angle()).rem_euclid(180.0);
        if delta > 90.0 {
            delta -= 180.0;
        }
        if rng.gen_bool(self.config.long_way_probability) {
            delta += if delta >= 0.0 { 360.0 } else { -360.0 };
        }

        let steps = delta.abs() as u32;
        for _ in 0..steps {
            if delta >= 0.0 {
                dial.rotate_cw();
            } else {
                dial.rotate_ccw();
            }
        }
        dial.angle()
    }

    /// Slider position reached from the midpoint, given how wrong the
    /// observer believes it was.
    pub fn rate_confidence<R: Rng + ?Sized>(
        &self,
        perceived_error: f64,
        scale: ConfidenceScale,
        rng: &mut R,
    ) -> u8 {
        let jitter = rng.gen_range(-10.0..=10.0);
        let rating = (100.0 * (1.0 - perceived_error / 45.0) + jitter)
            .clamp(0.0, 100.0)
            .round() as u8;
        let target = match scale {
            ConfidenceScale::LeftLow => rating,
            ConfidenceScale::RightLow => ConfidenceSlider::MAX - rating,
        };

        let mut slider = ConfidenceSlider::default();
        while slider.position() < target {
            slider.nudge_right();
        }
        while slider.position() > target {
            slider.nudge_left();
        }
        slider.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orimatch_core::{seeded_rng, Condition, Shape};

    fn trial(orientation: f64) -> TrialSpec {
        TrialSpec {
            shape: Shape::Square,
            condition: Condition::Neutral,
            stimulus_orientation: orientation,
        }
    }

    #[test]
    fn noiseless_observer_lands_on_the_stimulus() {
        let observer = SimulatedObserver::new(ObserverConfig {
            noise_deg: 0.0,
            long_way_probability: 0.0,
        });
        let mut rng = seeded_rng(8);
        for orientation in [0.0, 17.0, 90.0, 179.0] {
            let angle = observer.respond(&trial(orientation), &mut rng);
            assert_eq!(angle.rem_euclid(180.0), orientation);
        }
    }

    #[test]
    fn long_way_round_still_matches_orientation() {
        let observer = SimulatedObserver::new(ObserverConfig {
            noise_deg: 0.0,
            long_way_probability: 1.0,
        });
        let mut rng = seeded_rng(2);
        let angle = observer.respond(&trial(45.0), &mut rng);
        assert!(angle.abs() > 180.0);
        assert_eq!(angle.rem_euclid(180.0), 45.0);
    }

    #[test]
    fn confidence_position_respects_scale_direction() {
        let observer = SimulatedObserver::new(ObserverConfig::default());
        let mut a = seeded_rng(4);
        let mut b = seeded_rng(4);
        let left = observer.rate_confidence(10.0, ConfidenceScale::LeftLow, &mut a);
        let right = observer.rate_confidence(10.0, ConfidenceScale::RightLow, &mut b);
        assert_eq!(left + right, 100);
        assert_eq!(ConfidenceScale::RightLow.rating(right), left);
    }
}
