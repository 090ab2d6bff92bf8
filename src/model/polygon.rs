use crate::foundation::core::{Line, Point, PointInput};
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::model::derived::Derived;
use crate::model::observable::{Model, Observe, Propagate};
use std::f64::consts::TAU;

/// Fixed-arity polygon built from vertex models.
///
/// The outline is a derived model over every vertex. Two update paths exist and both are kept:
/// moving a single vertex through its own model recomputes the outline immediately, while
/// [`Polygon::set_points`] writes all vertices quietly and recomputes the outline once.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Model<Point>>,
    outline: Derived<Vec<Point>>,
}

impl Polygon {
    /// Build a polygon from at least three points.
    pub fn new<I, P>(points: I) -> GeomotionResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PointInput>,
    {
        let vertices = points
            .into_iter()
            .map(|p| {
                let input: PointInput = p.into();
                input.resolve().map(Model::new)
            })
            .collect::<GeomotionResult<Vec<_>>>()?;
        Self::from_vertices(vertices)
    }

    /// Build a polygon over existing vertex models (shared with other entities).
    pub fn from_vertices(vertices: Vec<Model<Point>>) -> GeomotionResult<Self> {
        if vertices.len() < 3 {
            return Err(GeomotionError::invalid_input(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        let weak: Vec<_> = vertices.iter().map(Model::downgrade).collect();
        let sources: Vec<&dyn Observe> = vertices.iter().map(|v| v as &dyn Observe).collect();
        let outline = Derived::new(&sources, move || {
            weak.iter().map(|w| w.get()).collect::<GeomotionResult<Vec<_>>>()
        })?;
        Ok(Self { vertices, outline })
    }

    /// Number of vertices (and sides).
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`; a polygon has at least three vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex model at `index`.
    pub fn vertex(&self, index: usize) -> GeomotionResult<&Model<Point>> {
        self.vertices.get(index).ok_or_else(|| {
            GeomotionError::index_out_of_range(format!(
                "vertex {index} of a {}-gon",
                self.vertices.len()
            ))
        })
    }

    /// Side `index`, from vertex `index` to the next one (wrapping).
    pub fn side(&self, index: usize) -> GeomotionResult<Line> {
        let n = self.vertices.len();
        if index >= n {
            return Err(GeomotionError::index_out_of_range(format!(
                "side {index} of a {n}-gon"
            )));
        }
        let pts = self.outline.borrow();
        Ok(Line::new(pts[index], pts[(index + 1) % n]))
    }

    /// Current vertex positions.
    pub fn points(&self) -> Vec<Point> {
        self.outline.get()
    }

    /// Aggregate outline model; subscribe here to observe the polygon as a whole.
    pub fn outline(&self) -> &Derived<Vec<Point>> {
        &self.outline
    }

    /// Move every vertex at once and notify the outline a single time.
    ///
    /// `points.len()` must equal [`Polygon::len`]; otherwise nothing is modified.
    pub fn set_points(&self, points: &[Point]) -> GeomotionResult<()> {
        if points.len() != self.vertices.len() {
            return Err(GeomotionError::count_mismatch(format!(
                "polygon has {} vertices, got {} points",
                self.vertices.len(),
                points.len()
            )));
        }
        for (vertex, &p) in self.vertices.iter().zip(points) {
            vertex.set(p, Propagate::Defer)?;
        }
        self.outline.recompute()
    }
}

/// Regular `sides`-gon around `center` with circumradius `radius`, first vertex on the +x axis.
pub fn regular_polygon(
    center: &Model<Point>,
    radius: &Model<f64>,
    sides: usize,
) -> GeomotionResult<Derived<Vec<Point>>> {
    if sides < 3 {
        return Err(GeomotionError::invalid_input(format!(
            "regular polygon needs at least 3 sides, got {sides}"
        )));
    }
    let (wc, wr) = (center.downgrade(), radius.downgrade());
    Derived::new(&[center, radius], move || {
        let (c, r) = (wc.get()?, wr.get()?);
        Ok((0..sides)
            .map(|i| {
                let theta = TAU * i as f64 / sides as f64;
                Point::new(c.x + r * theta.cos(), c.y + r * theta.sin())
            })
            .collect())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/model/polygon.rs"]
mod tests;
