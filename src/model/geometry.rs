//! Factories for geometric entities.
//!
//! Leaf factories validate their input once through [`PointInput`]; derived factories follow the
//! same recipe: compute from current source state, build the single [`Derived`] instance, and
//! subscribe its recompute to every source.

use crate::foundation::core::{Circle, Line, Point, PointInput, Vec2};
use crate::foundation::error::GeomotionResult;
use crate::foundation::math::{self, Complex, Conic};
use crate::model::derived::Derived;
use crate::model::observable::Model;
use serde::Serialize;
use smallvec::SmallVec;

/// Free vector anchored at a tail point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Vector {
    /// Anchor of the arrow.
    pub tail: Point,
    /// Components.
    pub components: Vec2,
}

impl Vector {
    /// Arrow tip.
    pub fn tip(&self) -> Point {
        self.tail + self.components
    }
}

/// Angle at `vertex`, measured counter-clockwise from `start` over `sweep` radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Angle {
    /// Apex.
    pub vertex: Point,
    /// Direction of the first arm, radians.
    pub start: f64,
    /// Counter-clockwise opening, radians in `[0, 2π)`.
    pub sweep: f64,
}

/// Leaf point model.
pub fn point(input: impl Into<PointInput>) -> GeomotionResult<Model<Point>> {
    Ok(Model::new(input.into().resolve()?))
}

/// Midpoint of two points.
pub fn midpoint(a: &Model<Point>, b: &Model<Point>) -> GeomotionResult<Derived<Point>> {
    let (wa, wb) = (a.downgrade(), b.downgrade());
    Derived::new(&[a, b], move || Ok(wa.get()?.midpoint(wb.get()?)))
}

/// Vector from `a` to `b`, anchored at `a`.
pub fn vector_from_points(a: &Model<Point>, b: &Model<Point>) -> GeomotionResult<Derived<Vector>> {
    let (wa, wb) = (a.downgrade(), b.downgrade());
    Derived::new(&[a, b], move || {
        let (tail, head) = (wa.get()?, wb.get()?);
        Ok(Vector {
            tail,
            components: head - tail,
        })
    })
}

/// Segment through two points. Also serves as the carrier of an infinite line.
pub fn line_from_points(a: &Model<Point>, b: &Model<Point>) -> GeomotionResult<Derived<Line>> {
    let (wa, wb) = (a.downgrade(), b.downgrade());
    Derived::new(&[a, b], move || Ok(Line::new(wa.get()?, wb.get()?)))
}

/// Intersection of the infinite lines carried by two segments; `None` while they are parallel.
pub fn line_intersection(
    l1: &Model<Line>,
    l2: &Model<Line>,
) -> GeomotionResult<Derived<Option<Point>>> {
    let (w1, w2) = (l1.downgrade(), l2.downgrade());
    Derived::new(&[l1, l2], move || {
        Ok(math::line_line_intersection(w1.get()?, w2.get()?))
    })
}

/// Circle from a centre point and a radius model.
pub fn circle(center: &Model<Point>, radius: &Model<f64>) -> GeomotionResult<Derived<Circle>> {
    let (wc, wr) = (center.downgrade(), radius.downgrade());
    Derived::new(&[center, radius], move || {
        Ok(Circle::new(wc.get()?, wr.get()?.abs()))
    })
}

/// Intersections of a circle with a line, ordered along the line.
pub fn circle_line_intersection(
    circle: &Model<Circle>,
    line: &Model<Line>,
) -> GeomotionResult<Derived<SmallVec<[Point; 2]>>> {
    let (wc, wl) = (circle.downgrade(), line.downgrade());
    Derived::new(&[circle, line], move || {
        Ok(math::circle_line_intersections(wc.get()?, wl.get()?))
    })
}

/// Ellipse with foci `f1`, `f2` through `on_curve`.
pub fn ellipse_from_foci(
    f1: &Model<Point>,
    f2: &Model<Point>,
    on_curve: &Model<Point>,
) -> GeomotionResult<Derived<Conic>> {
    let (w1, w2, wp) = (f1.downgrade(), f2.downgrade(), on_curve.downgrade());
    Derived::new(&[f1, f2, on_curve], move || {
        Conic::ellipse_from_foci(w1.get()?, w2.get()?, wp.get()?)
    })
}

/// Hyperbola with foci `f1`, `f2` through `on_curve`.
pub fn hyperbola_from_foci(
    f1: &Model<Point>,
    f2: &Model<Point>,
    on_curve: &Model<Point>,
) -> GeomotionResult<Derived<Conic>> {
    let (w1, w2, wp) = (f1.downgrade(), f2.downgrade(), on_curve.downgrade());
    Derived::new(&[f1, f2, on_curve], move || {
        Conic::hyperbola_from_foci(w1.get()?, w2.get()?, wp.get()?)
    })
}

/// Angle `a–vertex–b`.
pub fn angle(
    vertex: &Model<Point>,
    a: &Model<Point>,
    b: &Model<Point>,
) -> GeomotionResult<Derived<Angle>> {
    let (wv, wa, wb) = (vertex.downgrade(), a.downgrade(), b.downgrade());
    Derived::new(&[vertex, a, b], move || {
        let vertex = wv.get()?;
        let (start, sweep) = math::angle_sweep(vertex, wa.get()?, wb.get()?)?;
        Ok(Angle {
            vertex,
            start,
            sweep,
        })
    })
}

/// Point `a / b` with both points read as complex numbers.
pub fn complex_quotient(a: &Model<Point>, b: &Model<Point>) -> GeomotionResult<Derived<Point>> {
    let (wa, wb) = (a.downgrade(), b.downgrade());
    Derived::new(&[a, b], move || {
        let q = Complex::from_point(wa.get()?).checked_div(Complex::from_point(wb.get()?))?;
        Ok(q.to_point())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/model/geometry.rs"]
mod tests;
