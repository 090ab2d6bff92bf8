use crate::foundation::core::{Color, Point, Vec2};

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Value at progress `t` between `a` (t = 0) and `b` (t = 1).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

// Weighted form so both endpoints are reproduced exactly.
impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a * (1.0 - t) + b * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        <f64 as Lerp>::lerp(&(*a as f64), &(*b as f64), t) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self::new(
            <f64 as Lerp>::lerp(&a.x, &b.x, t),
            <f64 as Lerp>::lerp(&a.y, &b.y, t),
        )
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self::new(
            <f64 as Lerp>::lerp(&a.x, &b.x, t),
            <f64 as Lerp>::lerp(&a.y, &b.y, t),
        )
    }
}

impl Lerp for Color {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self::rgba(
            <f64 as Lerp>::lerp(&a.r, &b.r, t),
            <f64 as Lerp>::lerp(&a.g, &b.g, t),
            <f64 as Lerp>::lerp(&a.b, &b.b, t),
            <f64 as Lerp>::lerp(&a.a, &b.a, t),
        )
    }
}

impl Lerp for kurbo::Rect {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self::new(
            <f64 as Lerp>::lerp(&a.x0, &b.x0, t),
            <f64 as Lerp>::lerp(&a.y0, &b.y0, t),
            <f64 as Lerp>::lerp(&a.x1, &b.x1, t),
            <f64 as Lerp>::lerp(&a.y1, &b.y1, t),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/lerp.rs"]
mod tests;
