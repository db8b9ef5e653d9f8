use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::StoreError;
use super::graph::ProjectModel;

/// Durable source and sink for the node/link lists.
pub trait ModelStore {
    fn load_model(&self) -> Result<ProjectModel, StoreError>;
    fn save_model(&self, model: &ProjectModel) -> Result<(), StoreError>;
}

#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ModelStore for JsonFileStore {
    fn load_model(&self) -> Result<ProjectModel, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "model file missing, starting empty");
                return Ok(ProjectModel::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let model: ProjectModel =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(
            path = %self.path.display(),
            nodes = model.nodes.len(),
            links = model.links.len(),
            "loaded model"
        );
        Ok(model)
    }

    fn save_model(&self, model: &ProjectModel) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(model)?;
        let temp = self.temp_path();

        fs::write(&temp, encoded).map_err(|source| StoreError::Write {
            path: temp.clone(),
            source,
        })?;
        fs::rename(&temp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = %self.path.display(), nodes = model.nodes.len(), "saved model");
        Ok(())
    }
}
