//! Well-known artifact locations shared by training and serving

use std::path::{Path, PathBuf};

/// File name of the fitted preprocessor inside the models directory
pub const PREPROCESSOR_FILE: &str = "preprocessor.json";

/// File name of the fitted regression model inside the models directory
pub const MODEL_FILE: &str = "flight_price_model.json";

/// Resolved paths of both artifacts for one models directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub preprocessor: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(models_dir: impl AsRef<Path>) -> Self {
        let dir = models_dir.as_ref();
        Self {
            preprocessor: dir.join(PREPROCESSOR_FILE),
            model: dir.join(MODEL_FILE),
        }
    }
}
