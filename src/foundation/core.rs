use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::math::Complex;
use serde::{Deserialize, Serialize};

pub use kurbo::{Affine, BezPath, Circle, Line, Point, Rect, Vec2};

/// Scene time in seconds.
pub type Seconds = f64;

/// Point coordinates as accepted at the authoring boundary.
///
/// Every factory that takes a location resolves it exactly once through
/// [`PointInput::resolve`], so downstream code only ever sees a validated [`Point`].
#[derive(Clone, Debug, PartialEq)]
pub enum PointInput {
    /// `(x, y)`.
    Xy(f64, f64),
    /// `(x, y, z)`; the scene is planar, so `z` must be zero.
    Xyz(f64, f64, f64),
    /// Loose coordinate list, must hold two or three values.
    Slice(Vec<f64>),
    /// Already a point.
    Point(Point),
    /// Complex number `re + i·im` read as `(re, im)`.
    Complex(Complex),
}

impl PointInput {
    /// Validate the representation and convert to a planar point.
    pub fn resolve(self) -> GeomotionResult<Point> {
        let p = match self {
            Self::Xy(x, y) => Point::new(x, y),
            Self::Xyz(x, y, z) => {
                if z != 0.0 {
                    return Err(GeomotionError::invalid_input(format!(
                        "planar point expects z == 0, got {z}"
                    )));
                }
                Point::new(x, y)
            }
            Self::Slice(v) => match v.as_slice() {
                [x, y] => Point::new(*x, *y),
                [x, y, z] => return Self::Xyz(*x, *y, *z).resolve(),
                other => {
                    return Err(GeomotionError::invalid_input(format!(
                        "point expects 2 or 3 coordinates, got {}",
                        other.len()
                    )));
                }
            },
            Self::Point(p) => p,
            Self::Complex(c) => Point::new(c.re, c.im),
        };
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(GeomotionError::invalid_input("point coordinates must be finite"));
        }
        Ok(p)
    }
}

impl From<(f64, f64)> for PointInput {
    fn from((x, y): (f64, f64)) -> Self {
        Self::Xy(x, y)
    }
}

impl From<(f64, f64, f64)> for PointInput {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::Xyz(x, y, z)
    }
}

impl From<[f64; 2]> for PointInput {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::Xy(x, y)
    }
}

impl From<Vec<f64>> for PointInput {
    fn from(v: Vec<f64>) -> Self {
        Self::Slice(v)
    }
}

impl From<&[f64]> for PointInput {
    fn from(v: &[f64]) -> Self {
        Self::Slice(v.to_vec())
    }
}

impl From<Point> for PointInput {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Complex> for PointInput {
    fn from(c: Complex) -> Self {
        Self::Complex(c)
    }
}

/// Straight-alpha RGBA colour with channels in `[0, 1]`.
///
/// Deserializes from `"#RRGGBB"`, `"#RRGGBBAA"`, `[r, g, b]`, `[r, g, b, a]` or
/// `{ "r": .., "g": .., "b": .., "a": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Build an opaque colour.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build a colour with explicit alpha.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
    pub fn from_hex(s: &str) -> GeomotionResult<Self> {
        parse_hex(s).map_err(GeomotionError::invalid_input)
    }

    /// Same colour with alpha replaced.
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "colour array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<f64, String> {
        u8::from_str_radix(pair, 16)
            .map(|b| f64::from(b) / 255.0)
            .map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex colour must be ASCII".to_owned());
    }
    match s.len() {
        6 => Ok(Color::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Color::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("hex colour must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
