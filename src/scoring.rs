use std::time::Instant;

use ndarray::{ArrayD, Axis};
use tracing::{debug, info, instrument};

use crate::config::{ModelLayout, OUTPUT_KEY, SIGNATURE};
use crate::envelope::{ScoreRequest, ScoreResponse};
use crate::error::{InferenceError, LoadError, ScoringError};
use crate::graph::{InferenceGraph, OnnxGraph};
use crate::labels::LabelTable;
use crate::preprocess::{decode_image, Preprocessor};

/// Everything a scoring request needs, loaded once per process and shared
/// read-only between requests.
pub struct ScoringContext {
    graph: Box<dyn InferenceGraph>,
    labels: LabelTable,
    preprocessor: Preprocessor,
}

impl ScoringContext {
    /// Loads the artifacts from the directory named by `AZUREML_MODEL_DIR`.
    pub fn from_env() -> Result<Self, LoadError> {
        Self::load(&ModelLayout::from_env()?)
    }

    pub fn load(layout: &ModelLayout) -> Result<Self, LoadError> {
        layout.check_base_dir()?;
        let graph = OnnxGraph::load(&layout.model_path())?;
        let labels = LabelTable::from_csv_path(&layout.labelmap_path())?;
        info!(
            base_dir = %layout.base_dir().display(),
            signatures = ?graph.signatures(),
            labels = labels.len(),
            "scoring context ready"
        );
        Ok(Self::new(graph, labels))
    }

    pub fn new(graph: impl InferenceGraph + 'static, labels: LabelTable) -> Self {
        Self {
            graph: Box::new(graph),
            labels,
            preprocessor: Preprocessor::default(),
        }
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Scores one request body and returns the response body.
    #[instrument(level = "debug", skip_all, fields(payload_len = raw.len()))]
    pub fn run(&self, raw: &str) -> Result<String, ScoringError> {
        let request = ScoreRequest::parse(raw)?;
        let bytes = request.image_bytes()?;
        let class_name = self.classify(&bytes)?;
        Ok(ScoreResponse {
            class_name: class_name.to_owned(),
        }
        .to_json())
    }

    /// Classifies an encoded image and returns the label of the top class.
    pub fn classify(&self, image_bytes: &[u8]) -> Result<&str, ScoringError> {
        let start = Instant::now();
        let image = decode_image(image_bytes)?;
        debug!(
            width = image.width(),
            height = image.height(),
            "decoded image"
        );
        let input = self.preprocessor.pre_processing(&image)?;

        let mut outputs = self.graph.run(SIGNATURE, input.view())?;
        let scores = outputs
            .remove(OUTPUT_KEY)
            .ok_or_else(|| InferenceError::MissingOutput(OUTPUT_KEY.to_owned()))?;
        let index = top_class(&scores)?;
        let class_name = self.labels.get(index)?;

        debug!(index, class_name, elapsed = ?start.elapsed(), "classified");
        Ok(class_name)
    }
}

/// Index of the highest score along the class dimension of a `(N)` or
/// `(1, N)` tensor. Ties go to the lower index; NaN never beats a number.
pub fn top_class(scores: &ArrayD<f32>) -> Result<usize, InferenceError> {
    let row = match scores.shape() {
        [_] => scores.view(),
        [1, _] => scores.index_axis(Axis(0), 0),
        shape => return Err(InferenceError::UnexpectedShape(shape.to_vec())),
    };
    row.iter()
        .copied()
        .enumerate()
        .reduce(|best, item| {
            if item.1 > best.1 || (best.1.is_nan() && !item.1.is_nan()) {
                item
            } else {
                best
            }
        })
        .map(|(index, _)| index)
        .ok_or(InferenceError::EmptyOutput)
}
