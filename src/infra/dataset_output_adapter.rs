use crate::app::ports::DatasetOutputPort;
use crate::error::Result;
use crate::types::OutputDataset;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the dataset as pretty-printed JSON, replacing the file in one go.
pub struct FileDatasetOutputAdapter {
    file_path: PathBuf,
}

impl FileDatasetOutputAdapter {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait::async_trait]
impl DatasetOutputPort for FileDatasetOutputAdapter {
    async fn write_dataset(&self, dataset: &OutputDataset) -> Result<()> {
        let json = serde_json::to_string_pretty(dataset)?;
        if let Some(dir) = self.file_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.file_path, json).await?;
        info!(
            "Wrote {} organizations to {}",
            dataset.organizations.len(),
            self.file_path.display()
        );
        Ok(())
    }
}
