use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointId(Uuid);

impl PointId {
    fn fresh() -> Self {
        PointId(Uuid::new_v4())
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// A user-entered data point, in graph coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn create(x: f64, y: f64) -> Self {
        Point {
            id: PointId::fresh(),
            x,
            y,
        }
    }
}

/// Ordered collection of data points.
#[derive(Clone, Debug, Default)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point at the origin and returns it.
    pub fn add(&mut self) -> Point {
        let point = Point::create(0.0, 0.0);
        self.points.push(point);
        point
    }

    /// Sets one coordinate of a point. Returns `false`, changing nothing, when
    /// the id is unknown or `value` is not finite.
    pub fn update(&mut self, id: PointId, axis: Axis, value: f64) -> bool {
        if !value.is_finite() {
            warn!("ignored non-finite {:?} value {} for point {}", axis, value, id);
            return false;
        }
        match self.points.iter_mut().find(|p| p.id == id) {
            Some(point) => {
                match axis {
                    Axis::X => point.x = value,
                    Axis::Y => point.y = value,
                }
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: PointId) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        self.points.len() != before
    }

    /// Replaces every point with fresh points built from `rows`.
    ///
    /// The rows are expected to be validated already; see
    /// [`crate::loader::parse_points_csv`] for the fallible path.
    pub fn replace_all(&mut self, rows: &[(f64, f64)]) {
        self.points = rows.iter().map(|&(x, y)| Point::create(x, y)).collect();
        info!("point set replaced with {} rows", self.points.len());
    }

    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
