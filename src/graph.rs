use std::collections::HashMap;
use std::path::Path;

use ndarray::{ArrayD, ArrayView4};
use ort::{inputs, GraphOptimizationLevel, Session};
use tracing::{debug, info};

use crate::config::{OUTPUT_KEY, SIGNATURE};
use crate::error::{BoxError, InferenceError, LoadError};

/// Output tensors of one signature call, keyed by output name.
pub type NamedOutputs = HashMap<String, ArrayD<f32>>;

/// A loaded, frozen inference graph.
///
/// Implementations must accept concurrent `run` calls; the scoring context is
/// shared across request threads without a lock.
pub trait InferenceGraph: Send + Sync {
    fn signatures(&self) -> Vec<&str>;

    /// Runs the entry point `signature` on an NHWC batch.
    fn run(
        &self,
        signature: &str,
        input: ArrayView4<'_, f32>,
    ) -> Result<NamedOutputs, InferenceError>;
}

/// ONNX export of the classifier, executed by ONNX Runtime.
///
/// The graph has a single signature, [`SIGNATURE`]. It feeds the graph input
/// of the same name, or the first input when the export renamed it. Outputs
/// other than [`OUTPUT_KEY`] that are not `f32` are left out of the result.
#[derive(Debug)]
pub struct OnnxGraph {
    session: Session,
    input_name: String,
}

impl OnnxGraph {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.is_file() {
            return Err(LoadError::MissingArtifact(path.to_path_buf()));
        }
        let model_error = |source: BoxError| LoadError::Model {
            path: path.to_path_buf(),
            source,
        };

        // Without a configured intra-op pool the session spins up one thread per core.
        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|err| model_error(err.into()))?;

        let input_name = session
            .inputs
            .iter()
            .find(|input| input.name == SIGNATURE)
            .or_else(|| session.inputs.first())
            .map(|input| input.name.clone())
            .ok_or_else(|| model_error("graph declares no inputs".into()))?;

        info!(
            path = %path.display(),
            input = %input_name,
            outputs = ?session.outputs.iter().map(|output| &output.name).collect::<Vec<_>>(),
            "model loaded"
        );
        Ok(Self {
            session,
            input_name,
        })
    }
}

fn runtime_error(err: ort::Error) -> InferenceError {
    InferenceError::Runtime(err.into())
}

impl InferenceGraph for OnnxGraph {
    fn signatures(&self) -> Vec<&str> {
        vec![SIGNATURE]
    }

    fn run(
        &self,
        signature: &str,
        input: ArrayView4<'_, f32>,
    ) -> Result<NamedOutputs, InferenceError> {
        if signature != SIGNATURE {
            return Err(InferenceError::SignatureNotFound(signature.to_owned()));
        }

        let outputs = self
            .session
            .run(inputs![self.input_name.as_str() => input.view()].map_err(runtime_error)?)
            .map_err(runtime_error)?;

        let mut named = NamedOutputs::new();
        for output in &self.session.outputs {
            match outputs[output.name.as_str()].try_extract_tensor::<f32>() {
                Ok(tensor) => {
                    named.insert(output.name.clone(), tensor.into_owned());
                }
                Err(err) if output.name == OUTPUT_KEY => {
                    return Err(InferenceError::OutputType {
                        name: output.name.clone(),
                        source: err.into(),
                    })
                }
                Err(err) => debug!(output = %output.name, %err, "skipping non-f32 output"),
            }
        }
        Ok(named)
    }
}
