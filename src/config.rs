//! Where the model artifacts live and the fixed constants of the pipeline.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Set by the hosting platform to the directory the model was unpacked into.
pub const MODEL_DIR_ENV: &str = "AZUREML_MODEL_DIR";

pub const MODEL_SUBDIR: &str = "aiy_vision_classifier_plants";
pub const MODEL_FILE: &str = "model.onnx";
pub const LABELMAP_FILE: &str = "aiy_plants_V1_labelmap.csv";

/// Side length of the square image the classifier expects.
pub const INPUT_SIZE: u32 = 224;
pub const SIGNATURE: &str = "default";
pub const OUTPUT_KEY: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLayout {
    base_dir: PathBuf,
    model_subdir: String,
    model_file: String,
    labelmap_file: String,
}

impl ModelLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            model_subdir: MODEL_SUBDIR.to_owned(),
            model_file: MODEL_FILE.to_owned(),
            labelmap_file: LABELMAP_FILE.to_owned(),
        }
    }

    /// Reads the base directory from [`MODEL_DIR_ENV`].
    pub fn from_env() -> Result<Self, LoadError> {
        Self::from_var(std::env::var_os(MODEL_DIR_ENV))
    }

    pub(crate) fn from_var(value: Option<OsString>) -> Result<Self, LoadError> {
        match value {
            Some(dir) if !dir.is_empty() => Ok(Self::new(dir)),
            _ => Err(LoadError::MissingEnv(MODEL_DIR_ENV)),
        }
    }

    pub fn with_model_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.model_subdir = subdir.into();
        self
    }

    pub fn with_model_file(mut self, file: impl Into<String>) -> Self {
        self.model_file = file.into();
        self
    }

    pub fn with_labelmap_file(mut self, file: impl Into<String>) -> Self {
        self.labelmap_file = file.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn model_dir(&self) -> PathBuf {
        self.base_dir.join(&self.model_subdir)
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join(&self.model_file)
    }

    pub fn labelmap_path(&self) -> PathBuf {
        self.model_dir().join(&self.labelmap_file)
    }

    pub fn check_base_dir(&self) -> Result<(), LoadError> {
        if self.base_dir.is_dir() {
            Ok(())
        } else {
            Err(LoadError::MissingDirectory(self.base_dir.clone()))
        }
    }
}
