use crate::{
    error::{GenomeViewerError, Result},
    feature_table::TableFormat,
    genome_dataset::{FeatureType, GenomeDataset},
    geometry::{DEFAULT_OUTLINE_POINTS, MAX_OUTLINE_POINTS},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Explicit type selection; `None` selects every type present.
    pub feature_types: Option<Vec<FeatureType>>,
    /// Outline points per circular segment.
    pub arc_resolution: usize,
    pub table_format: TableFormat,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            feature_types: None,
            arc_resolution: DEFAULT_OUTLINE_POINTS,
            table_format: TableFormat::default(),
        }
    }
}

impl ViewerSettings {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        if !(DEFAULT_OUTLINE_POINTS..=MAX_OUTLINE_POINTS).contains(&settings.arc_resolution) {
            return Err(GenomeViewerError::Settings(format!(
                "arc_resolution must be between {DEFAULT_OUTLINE_POINTS} and {MAX_OUTLINE_POINTS}, got {}",
                settings.arc_resolution
            )));
        }
        Ok(settings)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            GenomeViewerError::Settings(format!(
                "could not read settings '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&text)
    }

    /// The type filter to apply to `dataset`.
    pub fn selected_types(&self, dataset: &GenomeDataset) -> Vec<FeatureType> {
        match &self.feature_types {
            Some(types) => types.clone(),
            None => dataset.feature_types(),
        }
    }
}
