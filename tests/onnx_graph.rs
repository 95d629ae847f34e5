//! Loads and runs real ONNX graphs from `tests/fixtures` (see `build_fixtures.py`).
//!
//! `channel_mean` averages each colour channel, so the top class of a solid
//! image is its dominant channel: 0 red, 1 green, 2 blue.

use std::io::Cursor;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;

use korotu_scoring::{
    InferenceError, InferenceGraph, ModelLayout, OnnxGraph, ScoringContext, ScoringError,
};

fn fixture(case: &str) -> ModelLayout {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(case);
    ModelLayout::new(base)
}

fn request(width: u32, height: u32, color: [u8; 3]) -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png).unwrap();
    serde_json::json!({ "data": STANDARD.encode(png.into_inner()) }).to_string()
}

#[test]
fn load_and_score_end_to_end() {
    let context = ScoringContext::load(&fixture("channel_mean")).unwrap();
    assert_eq!(context.labels().len(), 3);

    let cases = [
        ((300, 300), [200, 30, 30], "Papaver rhoeas"),
        ((224, 224), [10, 180, 20], "Polypodium vulgare"),
        ((64, 480), [40, 60, 250], "Hyacinthoides non-scripta"),
    ];
    for ((width, height), color, expected) in cases {
        let body = context.run(&request(width, height, color)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "class_name": expected }).to_string()
        );
    }
}

#[test]
fn first_input_is_fed_and_only_f32_outputs_are_returned() {
    let graph = OnnxGraph::load(&fixture("channel_mean").model_path()).unwrap();
    assert_eq!(graph.signatures(), ["default"]);

    let mut input = Array4::<f32>::zeros((1, 224, 224, 3));
    input.slice_mut(ndarray::s![.., .., .., 1]).fill(0.5);
    let outputs = graph.run("default", input.view()).unwrap();

    // `input_shape` is int64 and is left out.
    assert_eq!(outputs.len(), 1);
    let scores = &outputs["default"];
    assert_eq!(scores.shape(), &[1, 3]);
    assert!(scores[[0, 0]].abs() < 1e-6);
    assert!((scores[[0, 1]] - 0.5).abs() < 1e-6);
    assert!(scores[[0, 2]].abs() < 1e-6);
}

#[test]
fn unknown_signature_is_rejected_before_running() {
    let graph = OnnxGraph::load(&fixture("channel_mean").model_path()).unwrap();
    let input = Array4::<f32>::zeros((1, 224, 224, 3));
    assert!(matches!(
        graph.run("serving_default", input.view()),
        Err(InferenceError::SignatureNotFound(name)) if name == "serving_default"
    ));
}

#[test]
fn wrong_input_shape_is_a_runtime_error() {
    let graph = OnnxGraph::load(&fixture("channel_mean").model_path()).unwrap();
    let input = Array4::<f32>::zeros((1, 32, 32, 3));
    assert!(matches!(
        graph.run("default", input.view()),
        Err(InferenceError::Runtime(_))
    ));
}

#[test]
fn integer_default_output_names_the_dtype_problem() {
    let context = ScoringContext::load(&fixture("int_output")).unwrap();
    let err = context.run(&request(8, 8, [0, 0, 0])).unwrap_err();
    assert!(matches!(
        err,
        ScoringError::Inference(InferenceError::OutputType { ref name, .. }) if name == "default"
    ));
    assert_eq!(err.kind(), "InferenceError");
}
