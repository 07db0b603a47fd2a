use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which end of the confidence slider means "not confident".
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceScale {
    LeftLow,
    RightLow,
}

impl ConfidenceScale {
    /// Even participant seeds get the low end on the left.
    pub fn from_seed(seed: u64) -> Self {
        if seed % 2 == 0 {
            Self::LeftLow
        } else {
            Self::RightLow
        }
    }

    /// Convert a slider position (0 = far left) into a 0–100 rating.
    pub fn rating(&self, position: u8) -> u8 {
        let position = position.min(ConfidenceSlider::MAX);
        match self {
            Self::LeftLow => position,
            Self::RightLow => ConfidenceSlider::MAX - position,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LeftLow => "left_low",
            Self::RightLow => "right_low",
        }
    }
}

/// Line the participant rotates one degree per key press.
///
/// The angle is not wrapped; the outcome engine normalizes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationDial {
    angle: f64,
}

impl RotationDial {
    pub const STEP_DEG: f64 = 1.0;

    pub fn starting_at(angle: f64) -> Self {
        Self { angle }
    }

    /// Start at a random whole-degree angle in [0, 180).
    pub fn random_start<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::starting_at(f64::from(rng.gen_range(0u16..180)))
    }

    pub fn rotate_ccw(&mut self) {
        self.angle -= Self::STEP_DEG;
    }

    pub fn rotate_cw(&mut self) {
        self.angle += Self::STEP_DEG;
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConfidenceSlider {
    position: u8,
}

impl Default for ConfidenceSlider {
    fn default() -> Self {
        Self { position: 50 }
    }
}

impl ConfidenceSlider {
    pub const MAX: u8 = 100;

    pub fn nudge_left(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn nudge_right(&mut self) {
        self.position = (self.position + 1).min(Self::MAX);
    }

    pub fn position(&self) -> u8 {
        self.position
    }
}
