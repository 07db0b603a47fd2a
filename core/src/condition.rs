use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConditionError;

/// Outline the grating is drawn inside.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Square,
    Circle,
    Hexagon,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Square, Shape::Circle, Shape::Hexagon];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Hexagon => "hexagon",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Shape {
    type Err = ConditionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "square" => Ok(Self::Square),
            "circle" => Ok(Self::Circle),
            "hexagon" => Ok(Self::Hexagon),
            other => Err(ConditionError::UnknownShape(other.to_string())),
        }
    }
}

/// Feedback-bias arm a shape is assigned to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Feedback is always the true deviation.
    Neutral,
    /// Feedback overstates the error when the bias gate fires.
    Negative,
    /// Feedback understates the error when the bias gate fires.
    Positive,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Neutral, Condition::Negative, Condition::Positive];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Negative => "negative",
            Self::Positive => "positive",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Neutral => "accurate feedback",
            Self::Negative => "feedback shows the error as larger than it was",
            Self::Positive => "feedback shows the error as smaller than it was",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            "positive" => Ok(Self::Positive),
            other => Err(ConditionError::UnknownCondition(other.to_string())),
        }
    }
}
