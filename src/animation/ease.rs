/// Rate functions mapping normalized transition progress to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Identity.
    Linear,
    /// Smoothstep-style ease-in/out. Default for most transitions.
    #[default]
    Smooth,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Rises to 1 at the midpoint and returns to 0; used by highlight pulses.
    ThereAndBack,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Smooth => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::ThereAndBack => {
                let folded = if t < 0.5 { 2.0 * t } else { 2.0 - 2.0 * t };
                Self::Smooth.apply(folded)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
