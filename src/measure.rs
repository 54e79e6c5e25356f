//! On-canvas distance and angle measurements.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MeasureError;
use crate::viewport::GraphPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Distance,
    Angle,
}

impl Tool {
    /// Clicks needed to complete one measurement.
    pub fn required_points(self) -> usize {
        match self {
            Tool::Distance => 2,
            Tool::Angle => 3,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Distance => write!(f, "distance"),
            Tool::Angle => write!(f, "angle"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ToolState {
    Idle,
    Collecting { tool: Tool, pending: Vec<GraphPoint> },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasureValue {
    /// Euclidean length in graph units.
    Distance(f64),
    /// Angle at the middle point, in degrees.
    Angle(f64),
}

impl MeasureValue {
    pub fn value(self) -> f64 {
        match self {
            MeasureValue::Distance(v) | MeasureValue::Angle(v) => v,
        }
    }

    /// `5.00` for distances, `90.0°` for angles.
    pub fn label(self) -> String {
        match self {
            MeasureValue::Distance(d) => format!("{:.2}", d),
            MeasureValue::Angle(a) => format!("{:.1}°", a),
        }
    }
}

/// A completed measurement. Never changes after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub tool: Tool,
    pub points: Vec<GraphPoint>,
    pub value: MeasureValue,
}

pub fn distance(a: GraphPoint, b: GraphPoint) -> f64 {
    a.distance(b)
}

/// Angle at `vertex` between the rays towards `a` and `b`, in degrees.
pub fn angle(a: GraphPoint, vertex: GraphPoint, b: GraphPoint) -> Result<f64, MeasureError> {
    let (v1x, v1y) = (a.x - vertex.x, a.y - vertex.y);
    let (v2x, v2y) = (b.x - vertex.x, b.y - vertex.y);
    let m1 = v1x.hypot(v1y);
    let m2 = v2x.hypot(v2y);
    if m1 == 0.0 || m2 == 0.0 {
        return Err(MeasureError::DegenerateAngle);
    }
    let cos = ((v1x * v2x + v1y * v2y) / (m1 * m2)).clamp(-1.0, 1.0);
    Ok(cos.acos().to_degrees())
}

#[derive(Clone, Debug)]
pub struct MeasurementEngine {
    state: ToolState,
    measurements: Vec<Measurement>,
}

impl Default for MeasurementEngine {
    fn default() -> Self {
        Self {
            state: ToolState::Idle,
            measurements: Vec::new(),
        }
    }
}

impl MeasurementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn active_tool(&self) -> Option<Tool> {
        match &self.state {
            ToolState::Idle => None,
            ToolState::Collecting { tool, .. } => Some(*tool),
        }
    }

    pub fn pending(&self) -> &[GraphPoint] {
        match &self.state {
            ToolState::Idle => &[],
            ToolState::Collecting { pending, .. } => pending,
        }
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Activates `tool`, or goes idle if it is already active. Pending clicks are dropped.
    pub fn select_tool(&mut self, tool: Tool) {
        self.state = match self.active_tool() {
            Some(active) if active == tool => ToolState::Idle,
            _ => ToolState::Collecting {
                tool,
                pending: Vec::new(),
            },
        };
        debug!("tool state now {:?}", self.state);
    }

    /// Goes idle without touching completed measurements.
    pub fn deselect(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Records a click. Returns the measurement it completed, if any.
    ///
    /// Clicks while idle are ignored. The tool stays active after a
    /// measurement completes.
    ///
    /// # Errors
    /// * [`MeasureError::DegenerateAngle`] when an angle's vertex coincides with
    ///   one of the other points. The pending clicks are discarded.
    pub fn click_at(&mut self, point: GraphPoint) -> Result<Option<Measurement>, MeasureError> {
        let ToolState::Collecting { tool, pending } = &mut self.state else {
            return Ok(None);
        };
        let tool = *tool;
        pending.push(point);
        if pending.len() < tool.required_points() {
            return Ok(None);
        }

        let points = std::mem::take(pending);
        let value = match tool {
            Tool::Distance => MeasureValue::Distance(distance(points[0], points[1])),
            Tool::Angle => match angle(points[0], points[1], points[2]) {
                Ok(degrees) => MeasureValue::Angle(degrees),
                Err(e) => {
                    warn!("angle measurement dropped: {}", e);
                    return Err(e);
                }
            },
        };

        let measurement = Measurement {
            tool,
            points,
            value,
        };
        info!("{} measured: {}", tool, value.label());
        self.measurements.push(measurement.clone());
        Ok(Some(measurement))
    }

    /// Drops every completed measurement and goes idle.
    pub fn clear_all(&mut self) {
        self.measurements.clear();
        self.state = ToolState::Idle;
    }
}
