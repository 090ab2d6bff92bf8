use crate::animation::lerp::Lerp;
use crate::foundation::core::{Affine, BezPath, Color, Point};
use kurbo::{PathEl, Shape};

/// Paint attributes of a visual.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Style {
    /// Outline colour; `None` disables stroking.
    pub stroke: Option<Color>,
    /// Outline width in scene units.
    pub stroke_width: f64,
    /// Fill colour; `None` disables filling.
    pub fill: Option<Color>,
    /// Overall opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Some(Color::WHITE),
            stroke_width: 0.04,
            fill: None,
            opacity: 1.0,
        }
    }
}

impl Lerp for Style {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_color(a: Option<Color>, b: Option<Color>, t: f64) -> Option<Color> {
            match (a, b) {
                (Some(a), Some(b)) => Some(<Color as Lerp>::lerp(&a, &b, t)),
                (Some(a), None) => Some(a.with_alpha(a.a * (1.0 - t))),
                (None, Some(b)) => Some(b.with_alpha(b.a * t)),
                (None, None) => None,
            }
        }
        Self {
            stroke: lerp_color(a.stroke, b.stroke, t),
            stroke_width: <f64 as Lerp>::lerp(&a.stroke_width, &b.stroke_width, t),
            fill: lerp_color(a.fill, b.fill, t),
            opacity: <f64 as Lerp>::lerp(&a.opacity, &b.opacity, t),
        }
    }
}

/// Backend-agnostic visual representation: an outline plus paint, optionally a text label.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    /// Geometry in scene coordinates.
    pub path: BezPath,
    /// Paint attributes.
    pub style: Style,
    /// Text drawn at [`Visual::anchor`], if any.
    pub label: Option<String>,
}

impl Visual {
    /// Unlabelled visual.
    pub fn new(path: BezPath, style: Style) -> Self {
        Self {
            path,
            style,
            label: None,
        }
    }

    /// Attach a text label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Centre of the bounding box (the label anchor).
    pub fn anchor(&self) -> Point {
        if self.path.elements().is_empty() {
            return Point::ORIGIN;
        }
        self.path.bounding_box().center()
    }

    /// Same visual with the geometry mapped through `affine`.
    pub fn transformed(&self, affine: Affine) -> Self {
        Self {
            path: affine * self.path.clone(),
            ..self.clone()
        }
    }

    /// Sub-path covering the segment fraction `[from, to]` of this outline.
    pub fn partial(&self, from: f64, to: f64) -> Self {
        let segments: Vec<_> = self.path.segments().collect();
        let n = segments.len();
        let from = from.clamp(0.0, 1.0);
        let to = to.clamp(from, 1.0);
        let lo = (from * n as f64).floor() as usize;
        let hi = ((to * n as f64).ceil() as usize).min(n);
        Self {
            path: BezPath::from_path_segments(segments[lo.min(hi)..hi].iter().copied()),
            style: self.style.clone(),
            label: self.label.clone(),
        }
    }

    /// Interpolate geometry and paint toward `to`.
    ///
    /// Outlines with matching element structure morph point-by-point; otherwise the geometry
    /// switches to `to` once `t` reaches 1.
    pub fn interpolate(&self, to: &Self, t: f64) -> Self {
        let style = <Style as Lerp>::lerp(&self.style, &to.style, t);
        let label = if t < 1.0 {
            self.label.clone()
        } else {
            to.label.clone()
        };
        let path = lerp_paths(&self.path, &to.path, t).unwrap_or_else(|| {
            if t < 1.0 {
                self.path.clone()
            } else {
                to.path.clone()
            }
        });
        Self { path, style, label }
    }
}

fn lerp_paths(a: &BezPath, b: &BezPath, t: f64) -> Option<BezPath> {
    let (ea, eb) = (a.elements(), b.elements());
    if ea.len() != eb.len() {
        return None;
    }
    let p = |x: Point, y: Point| <Point as Lerp>::lerp(&x, &y, t);
    let mut out = BezPath::new();
    for (x, y) in ea.iter().zip(eb) {
        let el = match (*x, *y) {
            (PathEl::MoveTo(a), PathEl::MoveTo(b)) => PathEl::MoveTo(p(a, b)),
            (PathEl::LineTo(a), PathEl::LineTo(b)) => PathEl::LineTo(p(a, b)),
            (PathEl::QuadTo(a1, a2), PathEl::QuadTo(b1, b2)) => {
                PathEl::QuadTo(p(a1, b1), p(a2, b2))
            }
            (PathEl::CurveTo(a1, a2, a3), PathEl::CurveTo(b1, b2, b3)) => {
                PathEl::CurveTo(p(a1, b1), p(a2, b2), p(a3, b3))
            }
            (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
            _ => return None,
        };
        out.push(el);
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/visual.rs"]
mod tests;
