use crate::foundation::core::{Point, Vec2};

/// One generative line segment.
///
/// `end` is derived from the other fields and never stored.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Branch {
    /// Origin of the segment.
    pub start: Point,
    /// Segment length in surface units (always positive).
    pub length: f64,
    /// Direction of growth in radians.
    pub theta: f64,
    /// Generations since the root (root is 0).
    pub depth: u32,
}

impl Branch {
    /// The seed every session starts from: origin, pointing down-right at `pi/4`, length 1.
    pub fn root() -> Self {
        Self {
            start: Point::ORIGIN,
            length: 1.0,
            theta: std::f64::consts::FRAC_PI_4,
            depth: 0,
        }
    }

    /// Point reached by walking `length` along `theta` from `start`.
    pub fn end(&self) -> Point {
        self.start + Vec2::from_angle(self.theta) * self.length
    }

    /// Child growing from this branch's end at one generation deeper.
    pub fn child(&self, length: f64, theta: f64) -> Self {
        Self {
            start: self.end(),
            length,
            theta,
            depth: self.depth + 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/growth/branch.rs"]
mod tests;
