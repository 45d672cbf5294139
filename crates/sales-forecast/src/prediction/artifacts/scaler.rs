use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::{check_width, open, read_json, ArtifactError, Scaler};
use crate::prediction::features::FEATURE_NAMES;

/// Per-column standardisation `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feature_names: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ScalerExport {
    mean: Vec<f64>,
    scale: Vec<f64>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

impl ScalerExport {
    fn into_scaler(self) -> Result<StandardScaler, ArtifactError> {
        let scaler = StandardScaler {
            mean: self.mean,
            scale: self.scale,
            feature_names: self.feature_names,
        };
        scaler.check()?;
        Ok(scaler)
    }
}

impl<'de> Deserialize<'de> for StandardScaler {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ScalerExport::deserialize(deserializer)?
            .into_scaler()
            .map_err(serde::de::Error::custom)
    }
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        ScalerExport {
            mean,
            scale,
            feature_names: None,
        }
        .into_scaler()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = open(path)?;
        Self::from_reader(file, path)
    }

    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, ArtifactError> {
        let export: ScalerExport = read_json(reader, origin)?;
        export.into_scaler()
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    fn check(&self) -> Result<(), ArtifactError> {
        if self.mean.len() != self.scale.len() {
            return Err(ArtifactError::Invalid(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.len() != FEATURE_NAMES.len() {
            return Err(ArtifactError::ShapeMismatch {
                expected: FEATURE_NAMES.len(),
                found: self.mean.len(),
            });
        }
        if self
            .mean
            .iter()
            .chain(&self.scale)
            .any(|value| !value.is_finite())
        {
            return Err(ArtifactError::Invalid(
                "scaler contains non-finite statistics".to_string(),
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES) {
                return Err(ArtifactError::Invalid(format!(
                    "scaler was fitted on columns {names:?}, expected {FEATURE_NAMES:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ArtifactError> {
        rows.iter()
            .map(|row| {
                check_width(row, self.width())?;
                Ok(row
                    .iter()
                    .zip(self.mean.iter().zip(&self.scale))
                    .map(|(value, (mean, scale))| {
                        // Constant training columns carry a zero scale.
                        let scale = if *scale == 0.0 { 1.0 } else { *scale };
                        (value - mean) / scale
                    })
                    .collect())
            })
            .collect()
    }
}
