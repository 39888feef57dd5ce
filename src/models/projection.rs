use serde::{Deserialize, Serialize};

/// Closed-form GBM projection: expected price path plus the symmetric
/// log-space confidence band, one entry per future day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionPath {
    pub expected: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ProjectionPath {
    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }
}
