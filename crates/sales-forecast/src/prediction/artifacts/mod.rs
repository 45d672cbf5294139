//! Pre-fitted numeric collaborators and their on-disk representations.
//!
//! The pipeline only sees the [`Scaler`] and [`Regressor`] traits. The concrete
//! [`StandardScaler`] and [`TreeEnsemble`] load JSON exports produced alongside the
//! training run.

mod ensemble;
mod scaler;

pub use ensemble::{RegressionTree, TreeEnsemble, TreeNode};
pub use scaler::StandardScaler;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

/// Normalizer fitted on the training feature matrix.
pub trait Scaler: Send + Sync {
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ArtifactError>;
}

/// Regressor fitted on scaled feature rows; yields one value per row.
pub trait Regressor: Send + Sync {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ArtifactError>;
}

/// Errors raised while loading or invoking an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact {path} is not valid JSON for this format: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid artifact: {0}")]
    Invalid(String),
    #[error("expected rows with {expected} features, got {found}")]
    ShapeMismatch { expected: usize, found: usize },
}

pub(crate) fn read_json<T, R>(reader: R, origin: &Path) -> Result<T, ArtifactError>
where
    T: DeserializeOwned,
    R: Read,
{
    serde_json::from_reader(BufReader::new(reader)).map_err(|source| ArtifactError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

pub(crate) fn open(path: &Path) -> Result<File, ArtifactError> {
    File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn check_width(row: &[f64], expected: usize) -> Result<(), ArtifactError> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(ArtifactError::ShapeMismatch {
            expected,
            found: row.len(),
        })
    }
}
