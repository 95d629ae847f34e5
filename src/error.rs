use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal errors raised while loading the model artifacts. An instance that
/// hits one of these must not be marked ready.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("model directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("model artifact {} does not exist", .0.display())]
    MissingArtifact(PathBuf),

    #[error("failed to load model from {}: {source}", path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("failed to read label table {}: {source}", path.display())]
    LabelTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("label table {} has no `{column}` column", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("label table {} lists id {id} more than once", path.display())]
    DuplicateLabel { path: PathBuf, id: i64 },

    #[error("label table {} has no rows", .0.display())]
    EmptyLabelTable(PathBuf),
}

/// The request payload could not be turned into an image.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("request body is not a scoring request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`data` is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("`data` does not decode to a supported image: {0}")]
    Image(#[from] image::ImageError),

    #[error("image could not be resized: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model has no signature named `{0}`")]
    SignatureNotFound(String),

    #[error("model output has no tensor named `{0}`")]
    MissingOutput(String),

    #[error("model output `{name}` is not an f32 tensor: {source}")]
    OutputType {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("model output has unexpected shape {0:?}")]
    UnexpectedShape(Vec<usize>),

    #[error("model output has no classes")]
    EmptyOutput,

    #[error("model rejected the input: {0}")]
    Runtime(#[source] BoxError),
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("class index {index} has no entry in the label table")]
    UnknownClass { index: usize },
}

/// Everything that can abort a single scoring request.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl ScoringError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::Decode(_) => "DecodeError",
            ScoringError::Inference(_) => "InferenceError",
            ScoringError::Lookup(_) => "LookupError",
        }
    }
}
