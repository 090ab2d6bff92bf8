//! Closed-form plane geometry used by the derived-model factories.
//!
//! Everything here is a pure function of its inputs.

use crate::foundation::error::{GeomotionError, GeomotionResult};
use kurbo::{Circle, Line, Point, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

const EPS: f64 = 1e-12;

/// Complex number, used for rotations and similarity maps between points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// Build `re + i·im`.
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Read a point as a complex number.
    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y)
    }

    /// Read a vector as a complex number.
    pub fn from_vec2(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }

    /// Convert back to a point.
    pub fn to_point(self) -> Point {
        Point::new(self.re, self.im)
    }

    /// Squared modulus.
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Complex product.
    pub fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }

    /// Complex quotient; a zero-magnitude divisor is an arithmetic error.
    pub fn checked_div(self, rhs: Self) -> GeomotionResult<Self> {
        let d = rhs.norm_sqr();
        if d <= EPS {
            return Err(GeomotionError::arithmetic("division by a zero-magnitude complex number"));
        }
        Ok(Self::new(
            (self.re * rhs.re + self.im * rhs.im) / d,
            (self.im * rhs.re - self.re * rhs.im) / d,
        ))
    }
}

/// Unit vector along `v`; zero-length input is an arithmetic error.
pub fn normalize(v: Vec2) -> GeomotionResult<Vec2> {
    let len = v.hypot();
    if len <= EPS {
        return Err(GeomotionError::arithmetic("cannot normalize a zero vector"));
    }
    Ok(v / len)
}

/// Intersection of the infinite lines through `a` and `b`. `None` when parallel.
pub fn line_line_intersection(a: Line, b: Line) -> Option<Point> {
    let r = a.p1 - a.p0;
    let s = b.p1 - b.p0;
    let denom = r.cross(s);
    if denom.abs() <= EPS {
        return None;
    }
    let t = (b.p0 - a.p0).cross(s) / denom;
    Some(a.p0 + r * t)
}

/// Intersections of a circle with the infinite line through `line`, ordered along the line.
pub fn circle_line_intersections(circle: Circle, line: Line) -> SmallVec<[Point; 2]> {
    let d = line.p1 - line.p0;
    let f = line.p0 - circle.center;
    let a = d.dot(d);
    let mut out = SmallVec::new();
    if a <= EPS {
        return out;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - circle.radius * circle.radius;
    let disc = b * b - 4.0 * a * c;
    if disc < -EPS {
        return out;
    }
    if disc.abs() <= EPS {
        out.push(line.p0 + d * (-b / (2.0 * a)));
        return out;
    }
    let sq = disc.sqrt();
    out.push(line.p0 + d * ((-b - sq) / (2.0 * a)));
    out.push(line.p0 + d * ((-b + sq) / (2.0 * a)));
    out
}

/// Start angle and counter-clockwise sweep (radians, `[0, 2π)`) of the angle `a–vertex–b`.
pub fn angle_sweep(vertex: Point, a: Point, b: Point) -> GeomotionResult<(f64, f64)> {
    let va = a - vertex;
    let vb = b - vertex;
    if va.hypot() <= EPS || vb.hypot() <= EPS {
        return Err(GeomotionError::arithmetic("angle arm has zero length"));
    }
    let start = va.atan2();
    let sweep = (vb.atan2() - start).rem_euclid(std::f64::consts::TAU);
    Ok((start, sweep))
}

/// Which branch family a [`Conic`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConicKind {
    /// Sum of focal distances is constant.
    Ellipse,
    /// Difference of focal distances is constant.
    Hyperbola,
}

/// Central conic in both geometric and implicit form.
///
/// The implicit form is `A x² + B xy + C y² + D x + E y + F = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conic {
    /// Family.
    pub kind: ConicKind,
    /// Midpoint of the foci.
    pub center: Point,
    /// Angle of the focal axis, radians.
    pub rotation: f64,
    /// Semi-major (ellipse) or semi-transverse (hyperbola) axis.
    pub a: f64,
    /// Semi-minor (ellipse) or semi-conjugate (hyperbola) axis.
    pub b: f64,
    coeffs: [f64; 6],
}

impl Conic {
    /// Ellipse with foci `f1`, `f2` passing through `p`.
    pub fn ellipse_from_foci(f1: Point, f2: Point, p: Point) -> GeomotionResult<Self> {
        let a = (p.distance(f1) + p.distance(f2)) / 2.0;
        let c = f1.distance(f2) / 2.0;
        let b2 = a * a - c * c;
        if a <= EPS || b2 <= EPS {
            return Err(GeomotionError::invalid_input("ellipse point lies on the focal segment"));
        }
        Ok(Self::build(ConicKind::Ellipse, f1, f2, a, b2.sqrt()))
    }

    /// Hyperbola with foci `f1`, `f2` passing through `p`.
    pub fn hyperbola_from_foci(f1: Point, f2: Point, p: Point) -> GeomotionResult<Self> {
        let c = f1.distance(f2) / 2.0;
        if c <= EPS {
            return Err(GeomotionError::invalid_input("hyperbola needs two distinct foci"));
        }
        let a = (p.distance(f1) - p.distance(f2)).abs() / 2.0;
        let b2 = c * c - a * a;
        if a <= EPS || b2 <= EPS {
            return Err(GeomotionError::invalid_input(
                "hyperbola point is degenerate for these foci",
            ));
        }
        Ok(Self::build(ConicKind::Hyperbola, f1, f2, a, b2.sqrt()))
    }

    fn build(kind: ConicKind, f1: Point, f2: Point, a: f64, b: f64) -> Self {
        let center = f1.midpoint(f2);
        let axis = f2 - f1;
        let rotation = if axis.hypot() <= EPS { 0.0 } else { axis.atan2() };
        let (s, c) = rotation.sin_cos();
        let p = 1.0 / (a * a);
        let q = match kind {
            ConicKind::Ellipse => 1.0 / (b * b),
            ConicKind::Hyperbola => -1.0 / (b * b),
        };
        let ca = p * c * c + q * s * s;
        let cb = 2.0 * c * s * (p - q);
        let cc = p * s * s + q * c * c;
        let (h, k) = (center.x, center.y);
        let coeffs = [
            ca,
            cb,
            cc,
            -2.0 * ca * h - cb * k,
            -2.0 * cc * k - cb * h,
            ca * h * h + cb * h * k + cc * k * k - 1.0,
        ];
        Self {
            kind,
            center,
            rotation,
            a,
            b,
            coeffs,
        }
    }

    /// Implicit coefficients `[A, B, C, D, E, F]`.
    pub fn coefficients(&self) -> [f64; 6] {
        self.coeffs
    }

    /// Evaluate the implicit function at `p`; zero on the curve.
    pub fn eval(&self, p: Point) -> f64 {
        let [a, b, c, d, e, f] = self.coeffs;
        a * p.x * p.x + b * p.x * p.y + c * p.y * p.y + d * p.x + e * p.y + f
    }

    /// Foci of the conic.
    pub fn foci(&self) -> (Point, Point) {
        let c = match self.kind {
            ConicKind::Ellipse => (self.a * self.a - self.b * self.b).max(0.0).sqrt(),
            ConicKind::Hyperbola => (self.a * self.a + self.b * self.b).sqrt(),
        };
        let dir = Vec2::from_angle(self.rotation) * c;
        (self.center - dir, self.center + dir)
    }

    /// Map a point in the conic's local frame to scene coordinates.
    pub fn local_to_scene(&self, u: f64, v: f64) -> Point {
        let (s, c) = self.rotation.sin_cos();
        Point::new(
            self.center.x + u * c - v * s,
            self.center.y + u * s + v * c,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
