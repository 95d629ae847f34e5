//! Scoring adapter for the Korotu plant classifier.
//!
//! [`ScoringContext::load`] reads the ONNX graph and the label table once;
//! [`ScoringContext::run`] then turns each `{"data": "<base64 image>"}`
//! request into `{"class_name": "<plant>"}`.

pub mod config;
pub mod envelope;
pub mod error;
pub mod graph;
pub mod host;
pub mod labels;
pub mod preprocess;
pub mod scoring;
pub mod utils;

pub use config::ModelLayout;
pub use envelope::{ScoreRequest, ScoreResponse};
pub use error::{DecodeError, InferenceError, LoadError, LookupError, ScoringError};
pub use graph::{InferenceGraph, NamedOutputs, OnnxGraph};
pub use labels::LabelTable;
pub use scoring::{top_class, ScoringContext};
