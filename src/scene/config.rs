use crate::foundation::core::{Color, Rect, Seconds};
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::render::visual::Style;
use serde::{Deserialize, Serialize};

/// Colours and stroke metrics used by the built-in delegates.
///
/// Passed explicitly to every delegate constructor; there is no process-wide theme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Scene background.
    pub background: Color,
    /// Default outline colour.
    pub stroke: Color,
    /// Default fill colour for closed shapes.
    pub fill: Color,
    /// Highlight colour (indicate effects, vectors).
    pub accent: Color,
    /// Label text colour.
    pub label: Color,
    /// Outline width in scene units.
    pub stroke_width: f64,
    /// Radius of point dots.
    pub point_radius: f64,
    /// Opacity applied to fills.
    pub fill_opacity: f64,
    /// Length of vector arrow heads.
    pub vector_tip_length: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::rgb(0.07, 0.07, 0.09),
            stroke: Color::rgb(0.93, 0.93, 0.93),
            fill: Color::rgb(0.35, 0.55, 0.85),
            accent: Color::rgb(1.0, 0.84, 0.0),
            label: Color::WHITE,
            stroke_width: 0.04,
            point_radius: 0.08,
            fill_opacity: 0.5,
            vector_tip_length: 0.25,
        }
    }
}

impl Theme {
    /// Outline-only style.
    pub fn stroke_style(&self) -> Style {
        Style {
            stroke: Some(self.stroke),
            stroke_width: self.stroke_width,
            fill: None,
            opacity: 1.0,
        }
    }

    /// Outline plus translucent fill.
    pub fn filled_style(&self) -> Style {
        Style {
            fill: Some(self.fill.with_alpha(self.fill_opacity)),
            ..self.stroke_style()
        }
    }

    /// Solid dot style for points.
    pub fn point_style(&self) -> Style {
        Style {
            stroke: None,
            stroke_width: 0.0,
            fill: Some(self.stroke),
            opacity: 1.0,
        }
    }

    /// Accent-coloured outline.
    pub fn accent_style(&self) -> Style {
        Style {
            stroke: Some(self.accent),
            fill: Some(self.accent),
            ..self.stroke_style()
        }
    }
}

/// Scene-wide settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Frames presented per second of scene time.
    pub fps: f64,
    /// Run time used when an effect does not request one.
    pub default_run_time: Seconds,
    /// Tail of narration left unanimated after the last bookmark fragment.
    pub narration_buffer: Seconds,
    /// Initial camera frame.
    pub camera: Rect,
    /// Delegate styling.
    pub theme: Theme,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            default_run_time: 1.0,
            narration_buffer: 0.1,
            camera: Rect::new(-7.1, -4.0, 7.1, 4.0),
            theme: Theme::default(),
        }
    }
}

impl SceneConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> GeomotionResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| GeomotionError::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the scene cannot run with.
    pub fn validate(&self) -> GeomotionResult<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(GeomotionError::config("fps must be finite and > 0"));
        }
        if !self.default_run_time.is_finite() || self.default_run_time <= 0.0 {
            return Err(GeomotionError::config("default_run_time must be finite and > 0"));
        }
        if !self.narration_buffer.is_finite() || self.narration_buffer < 0.0 {
            return Err(GeomotionError::config("narration_buffer must be finite and >= 0"));
        }
        if self.camera.width() <= 0.0 || self.camera.height() <= 0.0 {
            return Err(GeomotionError::config("camera frame must have positive area"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
