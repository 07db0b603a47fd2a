//! Angle arithmetic for undirected orientations.
//!
//! A line at θ is indistinguishable from one at θ + 180°, so every quantity
//! here lives on a 180°-periodic scale and the largest possible error is 90°.

/// Period of an undirected orientation in degrees.
pub const ORIENTATION_PERIOD: f64 = 180.0;

/// Largest circular distance between two orientations.
pub const MAX_ERROR_DEG: f64 = 90.0;

/// Default window around each cardinal angle.
pub const CARDINAL_TOLERANCE_DEG: f64 = 5.0;

const CARDINAL_ANCHORS: [f64; 3] = [0.0, 90.0, 180.0];

/// Reduce a stimulus angle to [0, 180).
pub fn normalize_stimulus(stimulus_deg: f64) -> f64 {
    stimulus_deg.rem_euclid(ORIENTATION_PERIOD)
}

/// Reduce a free-running dial angle to [0, 180).
///
/// The dial may have been turned past a full revolution or below zero, so the
/// angle is first folded into [0, 360) and then onto the undirected range.
pub fn normalize_response(response_deg: f64) -> f64 {
    let turn = response_deg.rem_euclid(360.0);
    turn % ORIENTATION_PERIOD
}

/// Minimum circular distance between two normalized orientations, in [0, 90].
pub fn angular_deviation(stimulus_norm: f64, response_norm: f64) -> f64 {
    let raw = (stimulus_norm - response_norm).abs();
    if raw > MAX_ERROR_DEG {
        ORIENTATION_PERIOD - raw
    } else {
        raw
    }
}

/// Linear score: 1 at an exact match, 0 at a perpendicular response.
pub fn accuracy_from_deviation(deviation_deg: f64) -> f64 {
    (1.0 - deviation_deg / MAX_ERROR_DEG).clamp(0.0, 1.0)
}

/// True when the normalized stimulus lies strictly within `tolerance_deg` of
/// 0°, 90° or 180°.
pub fn is_cardinal_within(stimulus_norm: f64, tolerance_deg: f64) -> bool {
    CARDINAL_ANCHORS
        .iter()
        .any(|anchor| (stimulus_norm - anchor).abs() < tolerance_deg)
}

pub fn is_cardinal(stimulus_norm: f64) -> bool {
    is_cardinal_within(stimulus_norm, CARDINAL_TOLERANCE_DEG)
}
