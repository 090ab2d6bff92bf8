//! Render-facing counterparts of models.
//!
//! A delegate holds a handle to its model and rebuilds a [`Visual`] from the model's current state
//! on demand. Capabilities are traits implemented per concrete kind: every delegate is a
//! [`Delegate`]; outlines that can be drawn in part also implement [`PartiallyRenderable`].

use crate::foundation::core::{BezPath, Circle, Line, Point, Vec2};
use crate::foundation::error::GeomotionResult;
use crate::foundation::math::{Conic, ConicKind};
use crate::model::geometry::{Angle, Vector};
use crate::model::observable::Model;
use crate::render::visual::{Style, Visual};
use crate::scene::config::Theme;
use smallvec::SmallVec;
use std::f64::consts::TAU;

/// Segments used when sampling curved outlines. Fixed so successive visuals morph pointwise.
const CURVE_SAMPLES: usize = 64;

/// How a delegate first appears when registered with animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Entrance {
    /// Opacity ramps from 0 to 1.
    #[default]
    Fade,
    /// Outline is drawn progressively.
    Write,
}

/// Produces the visual of one model.
pub trait Delegate {
    /// Build the visual from the model's current state.
    fn visual(&self) -> GeomotionResult<Visual>;

    /// Entrance transition used by the registry.
    fn entrance(&self) -> Entrance {
        Entrance::Fade
    }
}

/// Delegates whose outline can be drawn in part.
pub trait PartiallyRenderable: Delegate {
    /// Visual restricted to the outline fraction `[from, to]`.
    fn partial_visual(&self, from: f64, to: f64) -> GeomotionResult<Visual> {
        Ok(self.visual()?.partial(from, to))
    }
}

fn polyline(points: impl IntoIterator<Item = Point>, closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.into_iter();
    if let Some(first) = iter.next() {
        path.move_to(first);
        for p in iter {
            path.line_to(p);
        }
        if closed {
            path.close_path();
        }
    }
    path
}

fn dot(path: &mut BezPath, center: Point, radius: f64) {
    let n = CURVE_SAMPLES / 4;
    for i in 0..n {
        let p = center + Vec2::from_angle(TAU * i as f64 / n as f64) * radius;
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
}

/// State that renders as a set of dots.
pub trait PointSet {
    /// Points to draw; may be empty.
    fn points(&self) -> SmallVec<[Point; 2]>;
}

impl PointSet for Point {
    fn points(&self) -> SmallVec<[Point; 2]> {
        smallvec::smallvec![*self]
    }
}

impl PointSet for Option<Point> {
    fn points(&self) -> SmallVec<[Point; 2]> {
        self.iter().copied().collect()
    }
}

impl PointSet for SmallVec<[Point; 2]> {
    fn points(&self) -> SmallVec<[Point; 2]> {
        self.clone()
    }
}

/// Dot(s) for a point, an optional intersection, or an intersection set.
pub struct PointDelegate<T> {
    model: Model<T>,
    radius: f64,
    style: Style,
}

impl<T: PointSet + Clone + 'static> PointDelegate<T> {
    /// Dots sized and coloured by `theme`.
    pub fn new(model: &Model<T>, theme: &Theme) -> Self {
        Self {
            model: model.clone(),
            radius: theme.point_radius,
            style: theme.point_style(),
        }
    }
}

impl<T: PointSet + Clone + 'static> Delegate for PointDelegate<T> {
    fn visual(&self) -> GeomotionResult<Visual> {
        let mut path = BezPath::new();
        for p in self.model.borrow().points() {
            dot(&mut path, p, self.radius);
        }
        Ok(Visual::new(path, self.style.clone()))
    }
}

/// Straight segment between the line's endpoints, or the full carrier line when `extend` > 0.
pub struct SegmentDelegate {
    model: Model<Line>,
    extend: f64,
    style: Style,
}

impl SegmentDelegate {
    /// Finite segment.
    pub fn new(model: &Model<Line>, theme: &Theme) -> Self {
        Self {
            model: model.clone(),
            extend: 0.0,
            style: theme.stroke_style(),
        }
    }

    /// Carrier line, drawn `length` scene units past each endpoint.
    pub fn extended(model: &Model<Line>, length: f64, theme: &Theme) -> Self {
        Self {
            extend: length.max(0.0),
            ..Self::new(model, theme)
        }
    }
}

impl Delegate for SegmentDelegate {
    fn visual(&self) -> GeomotionResult<Visual> {
        let line = *self.model.borrow();
        let dir = line.p1 - line.p0;
        let (p0, p1) = match dir.hypot() {
            len if self.extend > 0.0 && len > 0.0 => {
                let d = dir * (self.extend / len);
                (line.p0 - d, line.p1 + d)
            }
            _ => (line.p0, line.p1),
        };
        Ok(Visual::new(polyline([p0, p1], false), self.style.clone()))
    }

    fn entrance(&self) -> Entrance {
        Entrance::Write
    }
}

impl PartiallyRenderable for SegmentDelegate {}

/// Arrow from a vector's tail to its tip.
pub struct VectorDelegate {
    model: Model<Vector>,
    tip_length: f64,
    style: Style,
}

impl VectorDelegate {
    /// Accent-coloured arrow.
    pub fn new(model: &Model<Vector>, theme: &Theme) -> Self {
        Self {
            model: model.clone(),
            tip_length: theme.vector_tip_length,
            style: theme.accent_style(),
        }
    }
}

impl Delegate for VectorDelegate {
    fn visual(&self) -> GeomotionResult<Visual> {
        let v = *self.model.borrow();
        let tip = v.tip();
        let len = v.components.hypot();
        let mut path = polyline([v.tail, tip], false);
        if len > 0.0 {
            let head = self.tip_length.min(len / 2.0);
            let back = v.components * (-head / len);
            let side = Vec2::new(-back.y, back.x) * 0.5;
            path.move_to(tip);
            path.line_to(tip + back + side);
            path.line_to(tip + back - side);
            path.close_path();
        }
        Ok(Visual::new(path, self.style.clone()))
    }

    fn entrance(&self) -> Entrance {
        Entrance::Write
    }
}

/// Closed, filled outline through a list of vertices.
pub struct PolygonDelegate {
    model: Model<Vec<Point>>,
    style: Style,
}

impl PolygonDelegate {
    /// Filled polygon; pass [`crate::Polygon::outline`] or a regular-polygon model.
    pub fn new(model: &Model<Vec<Point>>, theme: &Theme) -> Self {
        Self {
            model: model.clone(),
            style: theme.filled_style(),
        }
    }
}

impl Delegate for PolygonDelegate {
    fn visual(&self) -> GeomotionResult<Visual> {
        let pts = self.model.borrow().clone();
        Ok(Visual::new(polyline(pts, true), self.style.clone()))
    }

    fn entrance(&self) -> Entrance {
        Entrance::Write
    }
}

impl PartiallyRenderable for PolygonDelegate {}

/// Circle outline.
pub struct CircleDelegate {
    model: Model<Circle>,
    style: Style,
}

impl CircleDelegate {
    /// Unfilled circle.
    pub fn new(model: &Model<Circle>, theme: &Theme) -> Self {
        Self {
            model: model.clone(),
            style: theme.stroke_style(),
        }
    }
}

impl Delegate for CircleDelegate {
    fn visual(&self) -> GeomotionResult<Visual> {
        let c = *self.model.borrow();
        let pts = (0..CURVE_SAMPLES)
            .map(|i| c.center + Vec2::from_angle(TAU * i as f64 / CURVE_SAMPLES as f64) * c.radius);
        Ok(Visual::new(polyline(pts, true), self.style.clone()))
    }

    fn entrance(&self) -> Entrance {
        Entrance::Write
    }
}

impl PartiallyRenderable for CircleDelegate {}

/// Ellipse outline, or both branches of a hyperbola.
pub struct ConicDelegate {
    model: Model<Conic>,
    reach: f64,
    style: Style,
}

impl ConicDelegate {
    /// Hyperbola branches are drawn for hyperbolic parameter `|t| <= 2`.
    pub fn new(model: &Model<Conic>, theme: &Theme) -> Self {
        Self {
            model: model.clone(),
            reach: 2.0,
            style: theme.stroke_style(),
        }
    }

    /// Change how far hyperbola branches extend.
    pub fn with_reach(mut self, reach: f64) -> Self {
        self.reach = reach.abs();
        self
    }
}

impl Delegate for ConicDelegate {
    fn visual(&self) -> GeomotionResult<Visual> {
        let c = *self.model.borrow();
        let path = match c.kind {
            ConicKind::Ellipse => {
                let pts = (0..CURVE_SAMPLES).map(|i| {
                    let t = TAU * i as f64 / CURVE_SAMPLES as f64;
                    c.local_to_scene(c.a * t.cos(), c.b * t.sin())
                });
                polyline(pts, true)
            }
            ConicKind::Hyperbola => {
                let (half, reach) = (CURVE_SAMPLES / 2, self.reach);
                let branch = move |sign: f64| {
                    (0..=half).map(move |i| {
                        let t = -reach + 2.0 * reach * i as f64 / half as f64;
                        c.local_to_scene(sign * c.a * t.cosh(), c.b * t.sinh())
                    })
                };
                let mut path = polyline(branch(1.0), false);
                for el in polyline(branch(-1.0), false).elements() {
                    path.push(*el);
                }
                path
            }
        };
        Ok(Visual::new(path, self.style.clone()))
    }

    fn entrance(&self) -> Entrance {
        Entrance::Write
    }
}

impl PartiallyRenderable for ConicDelegate {}

/// Filled circular sector marking an angle. Register it in the background.
pub struct AngleDelegate {
    model: Model<Angle>,
    radius: f64,
    style: Style,
}

impl AngleDelegate {
    /// Sector of the given radius.
    pub fn new(model: &Model<Angle>, radius: f64, theme: &Theme) -> Self {
        Self {
            model: model.clone(),
            radius,
            style: theme.filled_style(),
        }
    }
}

impl Delegate for AngleDelegate {
    fn visual(&self) -> GeomotionResult<Visual> {
        let a = *self.model.borrow();
        let arc = (0..=CURVE_SAMPLES / 4).map(|i| {
            let theta = a.start + a.sweep * i as f64 / (CURVE_SAMPLES / 4) as f64;
            a.vertex + Vec2::from_angle(theta) * self.radius
        });
        let pts = std::iter::once(a.vertex).chain(arc);
        Ok(Visual::new(polyline(pts, true), self.style.clone()))
    }
}

/// Text label following an anchor point.
pub struct LabelDelegate {
    anchor: Model<Point>,
    text: String,
    offset: Vec2,
    style: Style,
}

impl LabelDelegate {
    /// Label drawn at `anchor + offset`.
    pub fn new(anchor: &Model<Point>, text: impl Into<String>, offset: Vec2, theme: &Theme) -> Self {
        Self {
            anchor: anchor.clone(),
            text: text.into(),
            offset,
            style: Style {
                stroke: None,
                stroke_width: 0.0,
                fill: Some(theme.label),
                opacity: 1.0,
            },
        }
    }
}

impl Delegate for LabelDelegate {
    fn visual(&self) -> GeomotionResult<Visual> {
        let at = self.anchor.get() + self.offset;
        Ok(Visual::new(polyline([at, at], false), self.style.clone()).with_label(self.text.clone()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/delegates.rs"]
mod tests;
