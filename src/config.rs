#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Combined vertex count above which the z-order curve index is built.
pub const DEFAULT_CURVE_INDEX_THRESHOLD: usize = 80;

/// Coordinates are mapped onto `0..=DEFAULT_CURVE_RESOLUTION` before interleaving.
pub const DEFAULT_CURVE_RESOLUTION: u32 = 1000;

/// How the working 2D coordinates are derived from the input points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Projection {
    /// use the first two coordinates as they are
    #[default]
    Xy,
    /// rotate the outer ring's plane onto XY (needs at least three coordinates;
    /// falls back to `Xy` otherwise)
    BestFit,
}

/// Tuning knobs of a [`Triangulator`](crate::Triangulator).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Config {
    pub curve_index_threshold: usize,
    pub curve_resolution: u32,
    /// Upper bound on ear tests plus diagonal tests per call. `None` means no
    /// bound; the algorithm terminates anyway, but can take quadratic time on
    /// adversarial input.
    pub max_operations: Option<usize>,
    pub projection: Projection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            curve_index_threshold: DEFAULT_CURVE_INDEX_THRESHOLD,
            curve_resolution: DEFAULT_CURVE_RESOLUTION,
            max_operations: None,
            projection: Projection::Xy,
        }
    }
}

impl Config {
    pub fn with_curve_index_threshold(mut self, threshold: usize) -> Self {
        self.curve_index_threshold = threshold;
        self
    }

    pub fn with_curve_resolution(mut self, resolution: u32) -> Self {
        self.curve_resolution = resolution;
        self
    }

    pub fn with_max_operations(mut self, max_operations: usize) -> Self {
        self.max_operations = Some(max_operations);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // the morton spread covers 16 bits per axis
        if !(1..=u16::MAX as u32).contains(&self.curve_resolution) {
            return Err(ConfigError::CurveResolution(self.curve_resolution));
        }
        if self.max_operations == Some(0) {
            return Err(ConfigError::ZeroBudget);
        }
        Ok(())
    }
}
