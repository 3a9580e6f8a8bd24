//! Input file format and the command-line overrides applied on top of it.

use sle_geometry::errors::SleGeometryError;
use sle_geometry::hyperplane::Hyperplane;
use sle_geometry::numeric::Tolerance;
use sle_geometry::system::LinearSystem;

use serde::Deserialize;

/// `{ "planes": [...], "tolerance": {...}, "precision": 30 }`; only `planes` is required.
#[derive(Debug, Deserialize)]
pub struct SystemFile {
    pub planes: Vec<Hyperplane>,
    #[serde(default)]
    pub tolerance: Option<Tolerance>,
    #[serde(default)]
    pub precision: Option<u32>,
}

/// Numeric settings after merging the file with the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericConfig {
    pub tolerance: Tolerance,
    pub precision: Option<u32>,
}

impl NumericConfig {
    /// Command-line values win over the file, the file wins over the defaults.
    pub fn resolve(file: &SystemFile, precision: Option<u32>, near_zero: Option<f64>) -> Self {
        let tolerance = file.tolerance.unwrap_or_default();
        let tolerance = match near_zero {
            Some(eps) => tolerance.with_near_zero(eps),
            None => tolerance,
        };

        Self {
            tolerance,
            precision: precision.or(file.precision),
        }
    }
}

impl SystemFile {
    pub fn from_json(text: &str) -> Result<Self, SleGeometryError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_system(self, config: &NumericConfig) -> Result<LinearSystem, SleGeometryError> {
        let system = LinearSystem::try_with(self.planes)?.with_tolerance(config.tolerance);
        Ok(match config.precision {
            Some(precision) => system.with_precision(precision),
            None => system,
        })
    }
}
