//! Artifact persistence.
//!
//! Model files land in the model directory as `<name>.txt`, prediction tables
//! in the table directory as `<name>.csv`. Every write goes to a temporary
//! file in the destination directory and is then renamed over the target, so
//! a reader never sees a partially written artifact and a re-run replaces the
//! previous file in one step.

use crate::boosting::TrainedModel;
use crate::config::core::FixtureConfig;
use crate::core::error::{FixtureError, Result};
use crate::prediction::table::PredictionTable;
use crate::variant::naming::ArtifactName;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `bytes` to `path`, replacing any existing file atomically.
///
/// Missing parent directories are created.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = tempfile::Builder::new()
        .prefix(".artifact")
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| FixtureError::from(err.error))?;

    Ok(())
}

/// Writes models and prediction tables under their artifact names.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    model_dir: PathBuf,
    table_dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer over the given directories.
    pub fn new<M: Into<PathBuf>, T: Into<PathBuf>>(model_dir: M, table_dir: T) -> Self {
        ArtifactWriter {
            model_dir: model_dir.into(),
            table_dir: table_dir.into(),
        }
    }

    /// Create a writer over the directories of `config`.
    pub fn from_config(config: &FixtureConfig) -> Self {
        Self::new(&config.model_dir, &config.table_dir)
    }

    /// Location of a model artifact.
    pub fn model_path(&self, name: &ArtifactName) -> PathBuf {
        self.model_dir.join(name.model_file_name())
    }

    /// Location of a prediction table.
    pub fn table_path(&self, name: &ArtifactName) -> PathBuf {
        self.table_dir.join(name.table_file_name())
    }

    /// Serialize and store a model.
    pub fn write_model<M: TrainedModel>(&self, model: &M, name: &ArtifactName) -> Result<PathBuf> {
        let bytes = model
            .save_model()
            .map_err(|e| {
                FixtureError::serialization(format!("Failed to serialize model {}: {}", name, e))
            })?;

        let path = self.model_path(name);
        write_atomic(&path, &bytes)
            .map_err(|e| {
                FixtureError::serialization(format!("Failed to write {}: {}", path.display(), e))
            })?;

        log::info!("Wrote model {}", path.display());
        Ok(path)
    }

    /// Store a prediction table.
    pub fn write_predictions(
        &self,
        table: &PredictionTable,
        name: &ArtifactName,
    ) -> Result<PathBuf> {
        let bytes = table.to_csv_bytes()?;

        let path = self.table_path(name);
        write_atomic(&path, &bytes)?;

        log::info!("Wrote prediction table {} ({} rows)", path.display(), table.num_rows());
        Ok(path)
    }

    /// Read back a previously written model artifact.
    pub fn read_model(&self, name: &ArtifactName) -> Result<Vec<u8>> {
        let path = self.model_path(name);
        fs::read(&path).map_err(|e| {
            let message = format!("Failed to read model {}: {}", path.display(), e);
            FixtureError::serialization(message)
        })
    }
}
